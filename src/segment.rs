//! Segments: ordered groups of fields that are packed and encoded independently.

use crate::{
    errors::CompileError,
    field::{Field, FieldKind},
    value::Value,
};

/// Definition of one segment of a section.
#[derive(Debug, Clone)]
pub struct Segment {
    pub name: String,
    /// Value of the leading tag bits that identifies this segment.
    pub tag: u64,
    /// Optional segments may be left out of an encoded token.
    pub optional: bool,
    /// Fields in bit order. The first field carries the tag.
    pub fields: Vec<Field>,
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::SegmentDef> for Segment {
    type Error = CompileError;

    fn try_from(value: crate::serde::SegmentDef) -> Result<Self, Self::Error> {
        let fields = value
            .fields
            .into_iter()
            .map(Field::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Segment {
            name: value.name,
            tag: value.tag,
            optional: value.optional,
            fields,
        })
    }
}

impl Segment {
    /// The mandatory core segment. Its tag is implied to be 0 and is read from
    /// the top bits of its first field.
    pub fn core(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Segment {
            name: name.into(),
            tag: 0,
            optional: false,
            fields,
        }
    }

    /// An optional extension segment whose first field is its tag field.
    pub fn extension(name: impl Into<String>, tag: u64, fields: Vec<Field>) -> Self {
        Segment {
            name: name.into(),
            tag,
            optional: true,
            fields,
        }
    }
}

/// A validated segment with its total bit length.
#[derive(Debug, Clone)]
pub struct CompiledSegment {
    pub name: String,
    pub tag: u64,
    pub optional: bool,
    /// Sum of the declared widths of all fields.
    pub total_bits: usize,
    pub fields: Vec<Field>,
}

impl CompiledSegment {
    pub(crate) fn compile(segment: &Segment, tag_width: usize) -> Result<Self, CompileError> {
        let first = segment
            .fields
            .first()
            .ok_or_else(|| CompileError::EmptySegment(segment.name.clone()))?;

        if tag_width < 64 && segment.tag >> tag_width != 0 {
            return Err(CompileError::TagOutOfRange {
                segment: segment.name.clone(),
                tag: segment.tag,
            });
        }

        for field in &segment.fields {
            field.check()?;
        }

        // The leading field must start with the tag in its top bits.
        if tag_width > 0 {
            match (first.kind, &first.default) {
                (FieldKind::FixedInteger { width }, Value::Int(default))
                    if width >= tag_width && default >> (width - tag_width) == segment.tag => {}
                _ => return Err(CompileError::MissingTagField(segment.name.clone())),
            }
        }

        let total_bits = segment
            .fields
            .iter()
            .try_fold(0usize, |total, field| total.checked_add(field.bit_width()))
            .ok_or_else(|| CompileError::InvalidFieldSize(segment.name.clone()))?;

        Ok(CompiledSegment {
            name: segment.name.clone(),
            tag: segment.tag,
            optional: segment.optional,
            total_bits,
            fields: segment.fields.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_core() {
        let segment = Segment::core(
            "core",
            vec![
                Field::fixed_integer("version", 6, 1),
                Field::fixed_integer_list("consents", 2, vec![0; 9]),
            ],
        );
        let compiled = CompiledSegment::compile(&segment, 3).unwrap();
        assert_eq!(compiled.total_bits, 24);
        assert_eq!(compiled.tag, 0);
        assert!(!compiled.optional);
    }

    #[test]
    fn test_compile_extension() {
        let segment = Segment::extension(
            "gpc",
            1,
            vec![
                Field::fixed_integer("gpc_segment_type", 3, 1),
                Field::boolean("gpc", false),
            ],
        );
        let compiled = CompiledSegment::compile(&segment, 3).unwrap();
        assert_eq!(compiled.total_bits, 4);
        assert!(compiled.optional);
    }

    #[test]
    fn test_compile_empty_segment() {
        let segment = Segment::core("core", vec![]);
        assert_eq!(
            CompiledSegment::compile(&segment, 3).unwrap_err(),
            CompileError::EmptySegment("core".to_string())
        );
    }

    #[test]
    fn test_compile_tag_out_of_range() {
        let segment = Segment::extension("ext", 8, vec![Field::fixed_integer("t", 3, 0)]);
        assert_eq!(
            CompiledSegment::compile(&segment, 3).unwrap_err(),
            CompileError::TagOutOfRange {
                segment: "ext".to_string(),
                tag: 8
            }
        );
    }

    #[test]
    fn test_compile_missing_tag_field() {
        // Tag field default disagrees with the declared tag.
        let mismatched = Segment::extension("gpc", 1, vec![Field::fixed_integer("t", 3, 2)]);
        assert_eq!(
            CompiledSegment::compile(&mismatched, 3).unwrap_err(),
            CompileError::MissingTagField("gpc".to_string())
        );

        let leading_bool = Segment::core("core", vec![Field::boolean("flag", false)]);
        assert_eq!(
            CompiledSegment::compile(&leading_bool, 3).unwrap_err(),
            CompileError::MissingTagField("core".to_string())
        );

        // A version wide enough to reach into the tag bits.
        let big_version = Segment::core("core", vec![Field::fixed_integer("version", 6, 8)]);
        assert_eq!(
            CompiledSegment::compile(&big_version, 3).unwrap_err(),
            CompileError::MissingTagField("core".to_string())
        );
    }
}
