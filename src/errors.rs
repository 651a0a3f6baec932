//! Error types for schema compilation, field encoding and token decoding.

use thiserror::Error;

/// Errors produced when compiling [crate::segment::Segment]s into a [crate::schema::Schema].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A section needs at least one segment.
    #[error("section has no segments")]
    EmptySection,
    /// A segment has no fields.
    #[error("segment {0:?} has no fields")]
    EmptySegment(String),
    /// Field name is empty or already used elsewhere in the section.
    #[error("invalid or duplicate field name {0:?}")]
    InvalidFieldName(String),
    /// Integer width is 0 or greater than 64 bits.
    #[error("field {0:?} has an invalid bit width")]
    InvalidFieldSize(String),
    /// List element count is zero.
    #[error("field {0:?} has an invalid list count")]
    InvalidListCount(String),
    /// Default value does not satisfy the field's kind or width.
    #[error("field {field:?} has an invalid default")]
    InvalidDefault {
        field: String,
        #[source]
        source: ContractViolation,
    },
    /// Tag width is 0 or greater than 64 bits.
    #[error("invalid tag width {0}")]
    InvalidTagWidth(usize),
    /// Tag does not fit in the section's tag width.
    #[error("segment {segment:?} tag {tag} does not fit in the tag width")]
    TagOutOfRange { segment: String, tag: u64 },
    /// Two segments share a tag.
    #[error("tag {0} is used by more than one segment")]
    DuplicateTag(u64),
    /// The segment's first field cannot carry its tag.
    #[error("segment {0:?} does not start with a field carrying its tag")]
    MissingTagField(String),
    /// Only the first segment of a section may be mandatory.
    #[error("segment {0:?} must be optional")]
    MandatoryExtension(String),
}

/// A caller supplied a value that does not fit the field it targets.
///
/// These are programming errors. They are reported before any store is
/// mutated and before any bits are emitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("unknown field {0:?}")]
    UnknownField(String),
    #[error("unknown segment {0:?}")]
    UnknownSegment(String),
    #[error("segment {0:?} is mandatory and is always encoded")]
    MandatorySegment(String),
    #[error("field {field:?} holds a {expected}, not a {found}")]
    KindMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("value {value} does not fit in {width} bits")]
    OutOfRange { value: u64, width: usize },
    #[error("expected {expected} list elements, got {actual}")]
    ListLength { expected: usize, actual: usize },
}

/// Errors produced when parsing a raw slice of '0'/'1' characters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitsError {
    /// A character other than '0' or '1' was found.
    #[error("expected '0' or '1', found {0:?}")]
    NotABit(char),
    /// The slice length does not match what the codec needs.
    #[error("expected {expected} bits, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// More than 64 bits were requested in a single integer.
    #[error("{0} bits do not fit in a 64-bit integer")]
    TooManyBits(usize),
}

/// Errors produced when reading from a [crate::bit_reader::BitReader].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// Requested bit range is beyond the end of the bitstring.
    #[error("needed {needed} bits, {remaining} remaining")]
    OutOfBounds { needed: usize, remaining: usize },
}

/// Errors produced while packing a segment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("field {field:?}: {source}")]
    Contract {
        field: String,
        #[source]
        source: ContractViolation,
    },
    /// The store has no value for a schema field.
    #[error("no value for field {0:?}")]
    MissingValue(String),
    /// The packed segment would not route back to its own slot.
    #[error("segment leads with tag {found}, expected {expected}")]
    TagMismatch { expected: u64, found: u64 },
}

/// Errors produced while decoding one encoded segment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Character outside the URL-safe sextet alphabet.
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },
    /// Leading tag bits match no segment of the section.
    #[error("unknown segment tag {0}")]
    UnknownSegmentTag(u64),
    /// Fewer bits remained than the next field requires.
    #[error("segment truncated at {field:?}: needed {needed} bits, {remaining} remaining")]
    TruncatedSegment {
        field: String,
        needed: usize,
        remaining: usize,
    },
    /// A field's raw bits could not be parsed as its declared kind.
    #[error("malformed field {field:?}")]
    MalformedField {
        field: String,
        #[source]
        source: BitsError,
    },
    /// The token carries the same segment twice.
    #[error("segment {0:?} appears more than once")]
    DuplicateSegment(String),
}

/// Errors surfaced by the section orchestrator, with the segment they came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SectionError {
    /// `segment` is the schema index of the segment being packed.
    #[error("failed to encode segment {segment}: {source}")]
    Encoding {
        segment: usize,
        #[source]
        source: EncodeError,
    },
    /// `segment` is the position of the piece within the token.
    #[error("failed to decode segment {segment}: {source}")]
    Decoding {
        segment: usize,
        #[source]
        source: DecodeError,
    },
    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

impl SectionError {
    /// The underlying decode failure, if this is one.
    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            SectionError::Decoding { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DecodeError::InvalidCharacter {
                character: '*',
                position: 3
            }
            .to_string(),
            "invalid character '*' at position 3"
        );
        assert_eq!(
            ContractViolation::OutOfRange { value: 8, width: 3 }.to_string(),
            "value 8 does not fit in 3 bits"
        );
    }

    #[test]
    fn test_section_error_context() {
        let err = SectionError::Decoding {
            segment: 1,
            source: DecodeError::UnknownSegmentTag(2),
        };
        assert_eq!(err.to_string(), "failed to decode segment 1: unknown segment tag 2");
        assert_eq!(err.decode_error(), Some(&DecodeError::UnknownSegmentTag(2)));
    }

    #[test]
    fn test_contract_violation_conversion() {
        let err: SectionError = ContractViolation::UnknownField("gpc".to_string()).into();
        assert!(matches!(err, SectionError::Contract(_)));
        assert_eq!(err.decode_error(), None);
    }
}
