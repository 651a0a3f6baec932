//! Segment framer: packs a segment's fields into one bitstring and routes
//! decoded bitstrings back to their segment by the leading tag bits.

use crate::{
    bit_reader::BitReader,
    bits,
    bitstring::BitString,
    errors::{ContractViolation, DecodeError, EncodeError, ReadError},
    field::{Field, FieldKind},
    schema::Schema,
    segment::CompiledSegment,
    store::ValueStore,
    value::Value,
};

/// Encodes every field of `segment` from `store`, in declared order.
///
/// The packed segment must lead with the segment's own tag in its first
/// `tag_width` bits, otherwise it could not be routed back on decode.
pub fn pack_segment<S: ValueStore + ?Sized>(
    segment: &CompiledSegment,
    tag_width: usize,
    store: &S,
) -> Result<BitString, EncodeError> {
    let mut bits = BitString::with_capacity(segment.total_bits);

    for field in &segment.fields {
        let value = store
            .value(field)
            .ok_or_else(|| EncodeError::MissingValue(field.name.clone()))?;
        bits.append(&encode_field(field, &value)?);
    }

    assert_eq!(
        bits.len(),
        segment.total_bits,
        "packed width of segment {:?} differs from its declared width",
        segment.name
    );

    let found = BitReader::new(bits.as_str())
        .read_bits_at(0, tag_width)
        .ok()
        .and_then(|tag| bits::decode_fixed_integer(tag).ok());
    if found != Some(segment.tag) {
        return Err(EncodeError::TagMismatch {
            expected: segment.tag,
            found: found.unwrap_or_default(),
        });
    }

    tracing::trace!(segment = %segment.name, bits = bits.len(), "packed segment");
    Ok(bits)
}

fn encode_field(field: &Field, value: &Value) -> Result<BitString, EncodeError> {
    let contract = |source| EncodeError::Contract {
        field: field.name.clone(),
        source,
    };

    field.validate(value).map_err(contract)?;

    match (field.kind, value) {
        (FieldKind::Boolean, Value::Bool(b)) => Ok(bits::encode_boolean(*b)),
        (FieldKind::FixedInteger { width }, Value::Int(v)) => {
            bits::encode_fixed_integer(*v, width).map_err(contract)
        }
        (FieldKind::FixedIntegerList { element_width, .. }, Value::List(values)) => {
            bits::encode_fixed_integer_list(values, element_width).map_err(contract)
        }
        // validate() has already rejected every other pairing.
        (kind, value) => Err(contract(ContractViolation::KindMismatch {
            field: field.name.clone(),
            expected: kind.name(),
            found: value.kind_name(),
        })),
    }
}

/// Reads the leading tag bits of `bits` and returns the index of the matching
/// segment in `schema`.
pub fn identify_segment(bits: &BitString, schema: &Schema) -> Result<usize, DecodeError> {
    let reader = BitReader::new(bits.as_str());
    let raw = reader
        .read_bits_at(0, schema.tag_width())
        .map_err(|e| truncated("segment tag", e))?;
    let tag = bits::decode_fixed_integer(raw).map_err(|source| DecodeError::MalformedField {
        field: "segment tag".to_string(),
        source,
    })?;

    let index = schema
        .segment_by_tag(tag)
        .ok_or(DecodeError::UnknownSegmentTag(tag))?;

    tracing::trace!(tag, segment = index, "identified segment");
    Ok(index)
}

/// Decodes every field of `segment` from `bits`, left to right. Bits past the
/// segment's declared width are padding and are ignored.
pub fn unpack_segment<'s>(
    segment: &'s CompiledSegment,
    bits: &BitString,
) -> Result<Vec<(&'s Field, Value)>, DecodeError> {
    let mut reader = BitReader::new(bits.as_str());
    let mut values = Vec::with_capacity(segment.fields.len());

    for field in &segment.fields {
        let raw = reader
            .read_bits(field.bit_width())
            .map_err(|e| truncated(&field.name, e))?;
        values.push((field, decode_field(field, raw)?));
    }

    Ok(values)
}

fn decode_field(field: &Field, raw: &str) -> Result<Value, DecodeError> {
    let value = match field.kind {
        FieldKind::Boolean => bits::decode_boolean(raw).map(Value::Bool),
        FieldKind::FixedInteger { .. } => bits::decode_fixed_integer(raw).map(Value::Int),
        FieldKind::FixedIntegerList {
            count,
            element_width,
        } => bits::decode_fixed_integer_list(raw, element_width, count).map(Value::List),
    };

    value.map_err(|source| DecodeError::MalformedField {
        field: field.name.clone(),
        source,
    })
}

fn truncated(field: &str, err: ReadError) -> DecodeError {
    let ReadError::OutOfBounds { needed, remaining } = err;
    DecodeError::TruncatedSegment {
        field: field.to_string(),
        needed,
        remaining,
    }
}
