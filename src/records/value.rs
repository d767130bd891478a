//! # Record Value Model
//!
//! One row's data, already shaped to match the schema tree. The variants
//! mirror the output type nodes: `Scalar` for primitives, `Sequence` for
//! arrays and lists, `Struct` for records with field order preserved.

use crate::types::OutputKind;

/// A single encoded scalar, already widened to its output kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
}

impl ScalarValue {
    pub fn kind(&self) -> OutputKind {
        match self {
            ScalarValue::Boolean(_) => OutputKind::Boolean,
            ScalarValue::Int(_) => OutputKind::Int,
            ScalarValue::Long(_) => OutputKind::Long,
            ScalarValue::Float(_) => OutputKind::Float,
            ScalarValue::Double(_) => OutputKind::Double,
            ScalarValue::Str(_) => OutputKind::Str,
        }
    }

    /// Exact integer content, when this scalar holds one. Used to read
    /// array length counters out of already-encoded sibling fields.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ScalarValue::Int(value) => Some(i64::from(*value)),
            ScalarValue::Long(value) => Some(*value),
            _ => None,
        }
    }
}

/// One encoded row, or one piece of it.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    Scalar(ScalarValue),
    Sequence(Vec<RecordValue>),
    Struct(Vec<(String, RecordValue)>),
}

impl RecordValue {
    /// Field lookup for struct values; `None` for other variants.
    pub fn field(&self, name: &str) -> Option<&RecordValue> {
        match self {
            RecordValue::Struct(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[RecordValue]> {
        match self {
            RecordValue::Sequence(items) => Some(items),
            _ => None,
        }
    }
}
