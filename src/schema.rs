//! Schema: compiled list of segments that together describe one section.

use std::collections::BTreeMap;

use crate::{
    errors::CompileError,
    field::Field,
    segment::{CompiledSegment, Segment},
};

/// Tag width used by every section in current use.
pub const DEFAULT_TAG_WIDTH: usize = 3;

/// A compiled section schema. Use [Schema::compile] to build it from [Segment]s.
///
/// Every encoded segment starts with `tag_width` bits naming its slot. Extension
/// segments carry an explicit tag field. The core segment has no tag of its own:
/// its tag is the top bits of its first field (the encoding version), which are
/// zero only while versions stay below `2^(width - tag_width)`. Compilation and
/// encoding both reject values that would break that assumption.
#[derive(Debug, Clone)]
pub struct Schema {
    id: u32,
    name: String,
    tag_width: usize,
    segments: Vec<CompiledSegment>,
    /// Field name to (segment index, field index).
    index: BTreeMap<String, (usize, usize)>,
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::SectionDef> for Schema {
    type Error = CompileError;

    fn try_from(value: crate::serde::SectionDef) -> Result<Self, Self::Error> {
        let segments = value
            .segments
            .into_iter()
            .map(Segment::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let mut schema = Schema::compile(value.tag_width, &segments)?;
        schema.set_identity(value.id, value.name);
        Ok(schema)
    }
}

impl Schema {
    /// Compiles `segments` in canonical order (core first). Fails if any
    /// segment or field is invalid, or if tags or field names collide.
    pub fn compile(tag_width: usize, segments: &[Segment]) -> Result<Self, CompileError> {
        if segments.is_empty() {
            return Err(CompileError::EmptySection);
        }

        if tag_width > 64 || (tag_width == 0 && segments.len() > 1) {
            return Err(CompileError::InvalidTagWidth(tag_width));
        }

        let mut compiled_segments: Vec<CompiledSegment> = Vec::with_capacity(segments.len());
        let mut index = BTreeMap::new();

        for (segment_index, segment) in segments.iter().enumerate() {
            let compiled = CompiledSegment::compile(segment, tag_width)?;

            if segment_index > 0 && !compiled.optional {
                return Err(CompileError::MandatoryExtension(compiled.name));
            }

            if compiled_segments.iter().any(|s| s.tag == compiled.tag) {
                return Err(CompileError::DuplicateTag(compiled.tag));
            }

            for (field_index, field) in compiled.fields.iter().enumerate() {
                if index
                    .insert(field.name.clone(), (segment_index, field_index))
                    .is_some()
                {
                    return Err(CompileError::InvalidFieldName(field.name.clone()));
                }
            }

            compiled_segments.push(compiled);
        }

        Ok(Self {
            id: 0,
            name: String::new(),
            tag_width,
            segments: compiled_segments,
            index,
        })
    }

    /// Sets the catalog identity of the section (e.g. `8`, `"uspca"`).
    pub fn set_identity(&mut self, id: u32, name: impl Into<String>) -> &mut Self {
        self.id = id;
        self.name = name.into();
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag_width(&self) -> usize {
        self.tag_width
    }

    /// Segments in canonical order.
    pub fn segments(&self) -> &[CompiledSegment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&CompiledSegment> {
        self.segments.get(index)
    }

    /// Looks up a field by name across all segments.
    pub fn field(&self, name: &str) -> Option<&Field> {
        let &(segment, field) = self.index.get(name)?;
        self.segments.get(segment)?.fields.get(field)
    }

    /// Index of the segment that holds `name`.
    pub fn segment_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|&(segment, _)| segment)
    }

    /// All fields in encoding order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.segments.iter().flat_map(|s| s.fields.iter())
    }

    /// Slot of the segment declaring `tag`. Linear scan; sections have few segments.
    pub fn segment_by_tag(&self, tag: u64) -> Option<usize> {
        self.segments.iter().position(|s| s.tag == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core() -> Segment {
        Segment::core(
            "core",
            vec![
                Field::fixed_integer("version", 6, 1),
                Field::fixed_integer("sale_opt_out", 2, 0),
            ],
        )
    }

    fn gpc() -> Segment {
        Segment::extension(
            "gpc",
            1,
            vec![
                Field::fixed_integer("gpc_segment_type", 3, 1),
                Field::boolean("gpc", false),
            ],
        )
    }

    #[test]
    fn test_compile_empty() {
        assert_eq!(
            Schema::compile(DEFAULT_TAG_WIDTH, &[]).unwrap_err(),
            CompileError::EmptySection
        );
    }

    #[test]
    fn test_compile_section() {
        let mut schema = Schema::compile(DEFAULT_TAG_WIDTH, &[core(), gpc()]).unwrap();
        schema.set_identity(8, "uspca");

        assert_eq!(schema.id(), 8);
        assert_eq!(schema.name(), "uspca");
        assert_eq!(schema.segments().len(), 2);
        assert_eq!(schema.segment_of("gpc"), Some(1));
        assert_eq!(schema.field("sale_opt_out").map(Field::bit_width), Some(2));
        assert_eq!(schema.field("missing"), None);
        assert_eq!(
            schema.fields().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["version", "sale_opt_out", "gpc_segment_type", "gpc"]
        );
    }

    #[test]
    fn test_segment_by_tag() {
        let schema = Schema::compile(DEFAULT_TAG_WIDTH, &[core(), gpc()]).unwrap();
        assert_eq!(schema.segment_by_tag(0), Some(0));
        assert_eq!(schema.segment_by_tag(1), Some(1));
        assert_eq!(schema.segment_by_tag(2), None);
    }

    #[test]
    fn test_compile_duplicate_tag() {
        let mut other = gpc();
        other.name = "other".to_string();
        other.fields = vec![Field::fixed_integer("other_type", 3, 1)];

        assert_eq!(
            Schema::compile(DEFAULT_TAG_WIDTH, &[core(), gpc(), other]).unwrap_err(),
            CompileError::DuplicateTag(1)
        );
    }

    #[test]
    fn test_compile_duplicate_field_name() {
        let mut other = gpc();
        other.tag = 2;
        other.fields[0] = Field::fixed_integer("other_type", 3, 2);

        assert_eq!(
            Schema::compile(DEFAULT_TAG_WIDTH, &[core(), gpc(), other]).unwrap_err(),
            CompileError::InvalidFieldName("gpc".to_string())
        );
    }

    #[test]
    fn test_compile_mandatory_extension() {
        let mut mandatory = gpc();
        mandatory.optional = false;

        assert_eq!(
            Schema::compile(DEFAULT_TAG_WIDTH, &[core(), mandatory]).unwrap_err(),
            CompileError::MandatoryExtension("gpc".to_string())
        );
    }

    #[test]
    fn test_compile_untagged_single_segment() {
        let segment = Segment::core(
            "flags",
            vec![Field::boolean("flag", false), Field::fixed_integer("level", 3, 0)],
        );
        let schema = Schema::compile(0, &[segment.clone()]).unwrap();
        assert_eq!(schema.segments()[0].total_bits, 4);

        assert_eq!(
            Schema::compile(0, &[core(), gpc()]).unwrap_err(),
            CompileError::InvalidTagWidth(0)
        );
        assert_eq!(
            Schema::compile(65, &[segment]).unwrap_err(),
            CompileError::InvalidTagWidth(65)
        );
    }
}
