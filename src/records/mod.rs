//! # Record Encoding
//!
//! The in-memory representation of one encoded row and the row walker
//! that produces it.
//!
//! A [`RecordValue`] mirrors the schema tree's shape: scalars for
//! primitives, sequences for arrays and lists, structs for records. It is
//! created fresh per row, owned exclusively by the walker until handed to
//! the output codec, then discarded; nothing outlives the row's encoding
//! step.
//!
//! The walker itself is a pure function of (schema tree, raw row data):
//! no cross-row state, no mutation of the schema, no I/O beyond reads
//! through the row accessor.
//!
//! ## Module Structure
//!
//! - `value`: `RecordValue` and `ScalarValue`
//! - `encoder`: `RowWalker`, the recursive shape-directed encoder

pub mod encoder;
pub mod value;


pub use encoder::RowWalker;
pub use value::{RecordValue, ScalarValue};
