//! Value stores: where a section's field values live between encode and decode.

use std::{borrow::Cow, collections::BTreeMap};

use crate::{errors::ContractViolation, field::Field, schema::Schema, value::Value};

/// Name-addressed access to a section's field values.
///
/// The [Schema] supplies the ordered field list; a store only has to answer
/// for the values. Hosts can implement this on a typed struct instead of using
/// [FieldValues].
pub trait ValueStore {
    /// Current value of `field`, or `None` if the store does not hold it.
    fn value(&self, field: &Field) -> Option<Cow<'_, Value>>;

    /// Replaces the value of `field`. Callers validate `value` against `field` first.
    fn set_value(&mut self, field: &Field, value: Value) -> Result<(), ContractViolation>;

    /// Whether the optional segment at `segment` goes into the encoded token.
    fn is_segment_included(&self, _segment: usize) -> bool {
        true
    }

    fn set_segment_included(&mut self, _segment: usize, _included: bool) {}
}

/// Map-backed [ValueStore] created from a schema's defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValues {
    values: BTreeMap<String, Value>,
    included: Vec<bool>,
}

impl FieldValues {
    /// One entry per schema field, set to its default. All segments start included.
    pub fn defaults(schema: &Schema) -> Self {
        let values = schema
            .fields()
            .map(|field| (field.name.clone(), field.default.clone()))
            .collect();

        Self {
            values,
            included: vec![true; schema.segments().len()],
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl ValueStore for FieldValues {
    fn value(&self, field: &Field) -> Option<Cow<'_, Value>> {
        self.values.get(&field.name).map(Cow::Borrowed)
    }

    fn set_value(&mut self, field: &Field, value: Value) -> Result<(), ContractViolation> {
        match self.values.get_mut(&field.name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ContractViolation::UnknownField(field.name.clone())),
        }
    }

    fn is_segment_included(&self, segment: usize) -> bool {
        self.included.get(segment).copied().unwrap_or(false)
    }

    fn set_segment_included(&mut self, segment: usize, included: bool) {
        if let Some(slot) = self.included.get_mut(segment) {
            *slot = included;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{schema::DEFAULT_TAG_WIDTH, segment::Segment};

    fn schema() -> Schema {
        Schema::compile(
            DEFAULT_TAG_WIDTH,
            &[
                Segment::core(
                    "core",
                    vec![
                        Field::fixed_integer("version", 6, 1),
                        Field::fixed_integer_list("consents", 2, vec![0, 0]),
                    ],
                ),
                Segment::extension(
                    "gpc",
                    1,
                    vec![
                        Field::fixed_integer("gpc_segment_type", 3, 1),
                        Field::boolean("gpc", false),
                    ],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let schema = schema();
        let values = FieldValues::defaults(&schema);
        assert_eq!(values.get("version"), Some(&Value::Int(1)));
        assert_eq!(values.get("consents"), Some(&Value::List(vec![0, 0])));
        assert_eq!(values.get("gpc"), Some(&Value::Bool(false)));
        assert_eq!(values.iter().count(), 4);
        assert!(values.is_segment_included(0));
        assert!(values.is_segment_included(1));
        assert!(!values.is_segment_included(2));
    }

    #[test]
    fn test_set_value() {
        let schema = schema();
        let mut values = FieldValues::defaults(&schema);
        let gpc = schema.field("gpc").unwrap();
        values.set_value(gpc, Value::Bool(true)).unwrap();
        assert_eq!(values.value(gpc).as_deref(), Some(&Value::Bool(true)));

        let stray = Field::boolean("stray", false);
        assert_eq!(
            values.set_value(&stray, Value::Bool(true)),
            Err(ContractViolation::UnknownField("stray".to_string()))
        );
    }

    #[test]
    fn test_segment_inclusion() {
        let schema = schema();
        let mut values = FieldValues::defaults(&schema);
        values.set_segment_included(1, false);
        assert!(!values.is_segment_included(1));
        values.set_segment_included(7, true);
        assert!(!values.is_segment_included(7));
    }
}
