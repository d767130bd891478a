//! # treecast - Typed Columnar Tree Conversion
//!
//! treecast derives a canonical, recursion-aware output schema from a
//! source dataset's typed branch declarations, then re-encodes the
//! dataset row by row against that schema. It targets scientific
//! columnar sources whose native type systems are wider than the output
//! format's: every source primitive is widened to the nearest of six
//! output kinds, counter-driven buffers become real variable-length
//! arrays, and self-referential structures fold into named recursive
//! references.
//!
//! ## Quick Start
//!
//! ```ignore
//! use treecast::driver::{convert, ConvertOptions};
//! use treecast::reader::MemoryDataset;
//!
//! let dataset = MemoryDataset::from_path("events.json".as_ref())?;
//! let mut out = std::io::stdout().lock();
//! convert(&dataset, &ConvertOptions::default(), &mut out)?;
//! ```
//!
//! ## Architecture
//!
//! The pipeline is a straight line, derived once and streamed after:
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │       Driver (convert, modes)        │
//! ├─────────────────────────────────────┤
//! │  Schema Builder (widen, fold, memo)  │
//! ├─────────────────────────────────────┤
//! │   Row Walker (shape-directed enc.)   │
//! ├─────────────────────────────────────┤
//! │      Output Codec (JSON lines)       │
//! ├─────────────────────────────────────┤
//! │   Dataset Reader (branches + rows)   │
//! └─────────────────────────────────────┘
//! ```
//!
//! The schema is built exactly once per dataset; all structural errors
//! (unsupported primitives, bad counters, unbounded recursion) surface
//! before the first row is read. Row encoding is then a pure function of
//! the schema and one row's raw values.
//!
//! ## Module Overview
//!
//! - [`types`]: source/output primitive kinds and type descriptors
//! - [`schema`]: schema tree derivation and the record registry
//! - [`records`]: encoded row values and the row walker
//! - [`reader`]: the dataset reader boundary and the JSON-fixture reader
//! - [`codec`]: schema declaration and per-record JSON rendering
//! - [`driver`]: end-to-end conversion entry point
//! - [`config`]: compile-time limits
//! - [`error`]: the conversion error taxonomy

pub mod codec;
pub mod config;
pub mod driver;
pub mod error;
pub mod reader;
pub mod records;
pub mod schema;
pub mod types;

pub use driver::{convert, ConvertOptions, Mode};
pub use error::{Error, Result};
pub use reader::{DatasetReader, MemoryDataset, RawValue, RowAccessor};
pub use records::{RecordValue, RowWalker, ScalarValue};
pub use schema::{SchemaBuilder, SchemaTree};
pub use types::{OutputKind, SourceKind, TypeDescriptor};
