//! # Dataset Reader Interface
//!
//! The collaborator boundary between treecast and whatever supplies the
//! actual data: a [`DatasetReader`] exposes branch metadata once, a row
//! count, and per-row access to raw values. The row walker only ever sees
//! [`RawValue`]s through a [`RowAccessor`]; it never touches the reader's
//! storage directly.
//!
//! Raw values are already materialized per row; recursive structures
//! arrive as finite nested structs, so encoding depth is bounded by the
//! row's actual data, not by the schema.
//!
//! ## Module Structure
//!
//! - `memory`: [`MemoryDataset`], a JSON-fixture-backed reader

pub mod memory;


pub use memory::MemoryDataset;

use crate::error::Result;
use crate::types::TypeDescriptor;

/// Raw per-row value as supplied by a reader, before widening.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Seq(Vec<RawValue>),
    Struct(Vec<(String, RawValue)>),
}

impl RawValue {
    /// Field lookup for struct values; `None` for other variants.
    pub fn field(&self, name: &str) -> Option<&RawValue> {
        match self {
            RawValue::Struct(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Short variant name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "integer",
            RawValue::UInt(_) => "integer",
            RawValue::Float(_) => "float",
            RawValue::Str(_) => "string",
            RawValue::Seq(_) => "sequence",
            RawValue::Struct(_) => "struct",
        }
    }
}

/// One row's raw branch values, addressable by branch name.
pub trait RowAccessor: std::fmt::Debug {
    fn branch(&self, name: &str) -> Option<&RawValue>;
}

/// A source dataset: branch metadata, row count, per-row raw values.
pub trait DatasetReader {
    /// Dataset/table name, used as the default schema name.
    fn name(&self) -> &str;

    /// Ordered branch declarations, as reported by the source.
    fn branches(&self) -> &[(String, TypeDescriptor)];

    fn row_count(&self) -> u64;

    /// Accessor for one row. Failures surface as `ReaderIo`.
    fn read_row(&self, row: u64) -> Result<&dyn RowAccessor>;
}
