//! Section orchestrator: joins encoded segments into a token and routes the
//! pieces of a token back to their segments.

use std::sync::Arc;

use crate::{
    errors::{ContractViolation, DecodeError, SectionError},
    framer,
    schema::Schema,
    sextet,
    store::{FieldValues, ValueStore},
    value::Value,
};

/// Separates encoded segments in a token.
pub const SEGMENT_DELIMITER: char = '.';

/// Encodes the core segment and every included optional segment of `store`,
/// in canonical order. Nothing is returned unless every segment packs.
pub fn encode<S: ValueStore + ?Sized>(schema: &Schema, store: &S) -> Result<String, SectionError> {
    let mut encoded = Vec::with_capacity(schema.segments().len());

    for (index, segment) in schema.segments().iter().enumerate() {
        if segment.optional && !store.is_segment_included(index) {
            continue;
        }

        let bits = framer::pack_segment(segment, schema.tag_width(), store).map_err(|source| {
            SectionError::Encoding {
                segment: index,
                source,
            }
        })?;
        encoded.push(sextet::encode(&bits));
    }

    tracing::debug!(
        section = schema.name(),
        segments = encoded.len(),
        "encoded section"
    );

    let mut token = String::new();
    for (i, piece) in encoded.iter().enumerate() {
        if i > 0 {
            token.push(SEGMENT_DELIMITER);
        }
        token.push_str(piece);
    }

    Ok(token)
}

/// Decodes `token` into `store`.
///
/// Pieces are routed by their tag, not their position. The store is only
/// replaced once every piece has decoded; on error it is left untouched.
/// Optional segments are marked included exactly when they appear in the
/// token. Fields of segments absent from the token keep their current values.
pub fn decode_into<S: ValueStore + Clone>(
    schema: &Schema,
    token: &str,
    store: &mut S,
) -> Result<(), SectionError> {
    let mut staged = store.clone();
    let mut seen = vec![false; schema.segments().len()];

    for (position, piece) in token.split(SEGMENT_DELIMITER).enumerate() {
        let wrap = |source| SectionError::Decoding {
            segment: position,
            source,
        };

        let bits = sextet::decode(piece).map_err(wrap)?;
        let index = framer::identify_segment(&bits, schema).map_err(wrap)?;
        let segment = &schema.segments()[index];

        if seen[index] {
            return Err(wrap(DecodeError::DuplicateSegment(segment.name.clone())));
        }
        seen[index] = true;

        for (field, value) in framer::unpack_segment(segment, &bits).map_err(wrap)? {
            staged.set_value(field, value)?;
        }
    }

    for (index, segment) in schema.segments().iter().enumerate() {
        if segment.optional {
            staged.set_segment_included(index, seen[index]);
        }
    }

    tracing::debug!(
        section = schema.name(),
        segments = seen.iter().filter(|s| **s).count(),
        "decoded section"
    );

    *store = staged;
    Ok(())
}

/// Decodes `token` into a fresh store holding the schema defaults.
pub fn decode(schema: &Schema, token: &str) -> Result<FieldValues, SectionError> {
    let mut values = FieldValues::defaults(schema);
    decode_into(schema, token, &mut values)?;
    Ok(values)
}

/// One section value: a shared schema plus the current field values.
#[derive(Debug, Clone)]
pub struct Section {
    schema: Arc<Schema>,
    values: FieldValues,
}

impl Section {
    /// A section holding the schema defaults.
    pub fn new(schema: Arc<Schema>) -> Self {
        let values = FieldValues::defaults(&schema);
        Self { schema, values }
    }

    /// Decodes `token` into a new section. An empty token yields the defaults.
    pub fn from_token(schema: Arc<Schema>, token: &str) -> Result<Self, SectionError> {
        let mut section = Self::new(schema);
        if !token.is_empty() {
            section.decode(token)?;
        }
        Ok(section)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn id(&self) -> u32 {
        self.schema.id()
    }

    pub fn name(&self) -> &str {
        self.schema.name()
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn encode(&self) -> Result<String, SectionError> {
        encode(&self.schema, &self.values)
    }

    /// Decodes `token` over the current values. See [decode_into].
    pub fn decode(&mut self, token: &str) -> Result<(), SectionError> {
        decode_into(&self.schema, token, &mut self.values)
    }

    pub fn get(&self, name: &str) -> Result<&Value, ContractViolation> {
        self.values
            .get(name)
            .ok_or_else(|| ContractViolation::UnknownField(name.to_string()))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, ContractViolation> {
        let value = self.get(name)?;
        value.as_bool().ok_or_else(|| mismatch(name, "boolean", value))
    }

    pub fn get_int(&self, name: &str) -> Result<u64, ContractViolation> {
        let value = self.get(name)?;
        value.as_int().ok_or_else(|| mismatch(name, "integer", value))
    }

    pub fn get_list(&self, name: &str) -> Result<&[u64], ContractViolation> {
        let value = self.get(name)?;
        value
            .as_list()
            .ok_or_else(|| mismatch(name, "integer list", value))
    }

    /// Validates `value` against the field's kind and width, then stores it.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ContractViolation> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| ContractViolation::UnknownField(name.to_string()))?;
        let value = value.into();

        field.validate(&value)?;
        self.values.set_value(field, value)
    }

    pub fn set_bool(&mut self, name: &str, value: bool) -> Result<(), ContractViolation> {
        self.set(name, value)
    }

    pub fn set_int(&mut self, name: &str, value: u64) -> Result<(), ContractViolation> {
        self.set(name, value)
    }

    pub fn set_list(&mut self, name: &str, values: Vec<u64>) -> Result<(), ContractViolation> {
        self.set(name, values)
    }

    pub fn is_segment_included(&self, segment: &str) -> bool {
        self.segment_index(segment)
            .is_some_and(|index| self.values.is_segment_included(index))
    }

    /// Controls whether an optional segment is written by [Section::encode].
    /// The core segment is always written and cannot be toggled.
    pub fn set_segment_included(
        &mut self,
        segment: &str,
        included: bool,
    ) -> Result<(), ContractViolation> {
        let index = self
            .segment_index(segment)
            .ok_or_else(|| ContractViolation::UnknownSegment(segment.to_string()))?;
        if !self.schema.segments()[index].optional {
            return Err(ContractViolation::MandatorySegment(segment.to_string()));
        }
        self.values.set_segment_included(index, included);
        Ok(())
    }

    fn segment_index(&self, segment: &str) -> Option<usize> {
        self.schema
            .segments()
            .iter()
            .position(|s| s.name == segment)
    }
}

fn mismatch(name: &str, expected: &'static str, found: &Value) -> ContractViolation {
    ContractViolation::KindMismatch {
        field: name.to_string(),
        expected,
        found: found.kind_name(),
    }
}
