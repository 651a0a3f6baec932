//! Definition of the named fields that make up a [crate::segment::Segment].

use crate::{
    bits::fits,
    errors::{CompileError, ContractViolation},
    value::Value,
};

/// Most elements a [FieldKind::FixedIntegerList] may declare.
pub const MAX_LIST_COUNT: usize = 1024;

/// A single named, fixed-width field with its default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Key in the value store. Unique within a section.
    pub name: String,
    /// Codec and width of the field.
    pub kind: FieldKind,
    /// Value the store starts with.
    pub default: Value,
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::FieldDef> for Field {
    type Error = CompileError;

    fn try_from(value: crate::serde::FieldDef) -> Result<Self, Self::Error> {
        let kind: FieldKind = value.kind.into();
        // The zero default is sized by the declared count.
        kind.check(&value.name)?;

        let default = match value.default {
            Some(default) => default.into(),
            None => kind.zero_value(),
        };

        Ok(Field {
            name: value.name,
            kind,
            default,
        })
    }
}

/// Closed set of field codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// One bit.
    Boolean,
    /// Unsigned big-endian integer of `width` bits.
    FixedInteger { width: usize },
    /// `count` unsigned integers of `element_width` bits each.
    FixedIntegerList { count: usize, element_width: usize },
}

#[cfg(feature = "serde")]
impl From<crate::serde::FieldKindDef> for FieldKind {
    fn from(value: crate::serde::FieldKindDef) -> Self {
        match value {
            crate::serde::FieldKindDef::Boolean => FieldKind::Boolean,
            crate::serde::FieldKindDef::FixedInteger { width } => FieldKind::FixedInteger { width },
            crate::serde::FieldKindDef::FixedIntegerList {
                count,
                element_width,
            } => FieldKind::FixedIntegerList {
                count,
                element_width,
            },
        }
    }
}

impl FieldKind {
    /// Number of bits the field occupies in its segment.
    pub fn bit_width(&self) -> usize {
        match *self {
            FieldKind::Boolean => 1,
            FieldKind::FixedInteger { width } => width,
            FieldKind::FixedIntegerList {
                count,
                element_width,
            } => count.saturating_mul(element_width),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Boolean => "boolean",
            FieldKind::FixedInteger { .. } => "integer",
            FieldKind::FixedIntegerList { .. } => "integer list",
        }
    }

    /// Rejects widths and counts the codecs cannot handle. `name` labels the error.
    pub(crate) fn check(&self, name: &str) -> Result<(), CompileError> {
        match *self {
            FieldKind::Boolean => Ok(()),
            FieldKind::FixedInteger { width } if width == 0 || width > 64 => {
                Err(CompileError::InvalidFieldSize(name.to_string()))
            }
            FieldKind::FixedInteger { .. } => Ok(()),
            FieldKind::FixedIntegerList { element_width, .. }
                if element_width == 0 || element_width > 64 =>
            {
                Err(CompileError::InvalidFieldSize(name.to_string()))
            }
            FieldKind::FixedIntegerList { count, .. } if count == 0 || count > MAX_LIST_COUNT => {
                Err(CompileError::InvalidListCount(name.to_string()))
            }
            FieldKind::FixedIntegerList { .. } => Ok(()),
        }
    }

    /// The all-zero value of this kind.
    pub fn zero_value(&self) -> Value {
        match *self {
            FieldKind::Boolean => Value::Bool(false),
            FieldKind::FixedInteger { .. } => Value::Int(0),
            FieldKind::FixedIntegerList { count, .. } => Value::List(vec![0; count]),
        }
    }
}

impl Field {
    pub fn boolean(name: impl Into<String>, default: bool) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Boolean,
            default: Value::Bool(default),
        }
    }

    pub fn fixed_integer(name: impl Into<String>, width: usize, default: u64) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::FixedInteger { width },
            default: Value::Int(default),
        }
    }

    /// The list's element count is taken from `defaults`.
    pub fn fixed_integer_list(
        name: impl Into<String>,
        element_width: usize,
        defaults: Vec<u64>,
    ) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::FixedIntegerList {
                count: defaults.len(),
                element_width,
            },
            default: Value::List(defaults),
        }
    }

    pub fn bit_width(&self) -> usize {
        self.kind.bit_width()
    }

    /// Checks that `value` has this field's kind and fits its declared width.
    pub fn validate(&self, value: &Value) -> Result<(), ContractViolation> {
        match (self.kind, value) {
            (FieldKind::Boolean, Value::Bool(_)) => Ok(()),
            (FieldKind::FixedInteger { width }, Value::Int(v)) => {
                if fits(*v, width) {
                    Ok(())
                } else {
                    Err(ContractViolation::OutOfRange { value: *v, width })
                }
            }
            (
                FieldKind::FixedIntegerList {
                    count,
                    element_width,
                },
                Value::List(values),
            ) => {
                if values.len() != count {
                    return Err(ContractViolation::ListLength {
                        expected: count,
                        actual: values.len(),
                    });
                }
                match values.iter().find(|v| !fits(**v, element_width)) {
                    Some(v) => Err(ContractViolation::OutOfRange {
                        value: *v,
                        width: element_width,
                    }),
                    None => Ok(()),
                }
            }
            (kind, value) => Err(ContractViolation::KindMismatch {
                field: self.name.clone(),
                expected: kind.name(),
                found: value.kind_name(),
            }),
        }
    }

    /// Rejects definitions the codecs cannot handle.
    pub(crate) fn check(&self) -> Result<(), CompileError> {
        if self.name.is_empty() {
            return Err(CompileError::InvalidFieldName(self.name.clone()));
        }

        self.kind.check(&self.name)?;

        self.validate(&self.default)
            .map_err(|source| CompileError::InvalidDefault {
                field: self.name.clone(),
                source,
            })
    }
}
