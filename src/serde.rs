//! JSON-deserializable section schema description.
//!
//! These types describe the *shape* of a signal as a signal catalog would ship
//! it (for example a JSON file per section and version). They are compiled into
//! a [`crate::schema::Schema`] with `Schema::try_from`.

use serde::{Deserialize, Serialize};

fn default_tag_width() -> usize {
    crate::schema::DEFAULT_TAG_WIDTH
}

/// Top-level section definition.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SectionDef {
    /// Catalog id of the section.
    pub id: u32,
    /// Short catalog name, e.g. `"uspca"`.
    pub name: String,
    /// Width of the leading segment tag; defaults to 3.
    #[serde(default = "default_tag_width")]
    pub tag_width: usize,
    /// Segments in canonical order, core first.
    pub segments: Vec<SegmentDef>,
}

/// Description of one segment.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SegmentDef {
    pub name: String,
    /// Tag value; 0 for the core segment.
    #[serde(default)]
    pub tag: u64,
    /// Whether the segment may be left out of a token.
    #[serde(default)]
    pub optional: bool,
    /// Fields in bit order.
    pub fields: Vec<FieldDef>,
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldDef {
    /// Key in the value store.
    pub name: String,
    /// Codec and width.
    pub kind: FieldKindDef,
    /// Default value; all zeros when omitted.
    #[serde(default)]
    pub default: Option<ValueDef>,
}

/// Kind of field.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type")]
pub enum FieldKindDef {
    Boolean,
    FixedInteger {
        width: usize,
    },
    FixedIntegerList {
        count: usize,
        element_width: usize,
    },
}

/// Default value, written as a plain JSON boolean, number or array.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ValueDef {
    Bool(bool),
    Int(u64),
    List(Vec<u64>),
}

impl From<ValueDef> for crate::value::Value {
    fn from(value: ValueDef) -> Self {
        match value {
            ValueDef::Bool(b) => crate::value::Value::Bool(b),
            ValueDef::Int(v) => crate::value::Value::Int(v),
            ValueDef::List(values) => crate::value::Value::List(values),
        }
    }
}
