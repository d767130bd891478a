//! # Conversion Driver
//!
//! Ties the pipeline together: derive the schema from the reader's branch
//! declarations once, then either print the declaration (schema mode) or
//! stream the selected entry range as one record line each (data mode).
//!
//! Rows are processed strictly in order and any error aborts the stream;
//! a partially converted dataset is never silently emitted.

use std::io::Write;

use eyre::{Result, WrapErr};
use tracing::debug;

use crate::codec::JsonCodec;
use crate::reader::DatasetReader;
use crate::records::RowWalker;
use crate::schema::SchemaBuilder;

/// What the driver emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Print the schema declaration only.
    Schema,
    /// Stream the converted records, one per line.
    #[default]
    Data,
}

/// Conversion parameters, all optional beyond the mode.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub mode: Mode,
    /// First entry to convert (inclusive). Defaults to 0.
    pub start: Option<u64>,
    /// End of the entry range (exclusive). Defaults to the row count.
    pub end: Option<u64>,
    /// Overrides the dataset name as the root record's type name.
    pub schema_name: Option<String>,
    /// Dot-separated namespace qualifying every record identity.
    pub namespace: Option<String>,
}

/// Runs one conversion end to end, writing to `out`.
pub fn convert<W: Write>(
    reader: &dyn DatasetReader,
    options: &ConvertOptions,
    out: &mut W,
) -> Result<()> {
    let name = options
        .schema_name
        .clone()
        .unwrap_or_else(|| reader.name().to_string());
    let mut builder = SchemaBuilder::new(&name);
    if let Some(namespace) = &options.namespace {
        builder = builder.with_namespace(namespace.clone());
    }
    let schema = builder
        .build(reader.branches())
        .wrap_err_with(|| format!("schema derivation failed for `{name}`"))?;

    let codec = JsonCodec::new();
    if options.mode == Mode::Schema {
        writeln!(out, "{}", codec.emit_schema(&schema))?;
        return Ok(());
    }

    let total = reader.row_count();
    let start = options.start.unwrap_or(0).min(total);
    let end = options.end.unwrap_or(total).min(total);
    debug!(dataset = reader.name(), start, end, "converting entry range");

    let walker = RowWalker::new(&schema);
    for row in start..end {
        let accessor = reader.read_row(row)?;
        let record = walker
            .encode_row(row, accessor)
            .wrap_err_with(|| format!("conversion aborted at row {row}"))?;
        writeln!(out, "{}", codec.emit_record(&record))?;
    }
    Ok(())
}
