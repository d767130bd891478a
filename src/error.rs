//! # Error Taxonomy
//!
//! Every failure mode of schema construction and row encoding is a named
//! variant carrying the offending branch/field path, and the row index for
//! errors that occur while streaming. Schema-build errors are fatal before
//! any row is processed; per-row errors abort the stream at that row, so a
//! row either fully encodes or the whole run fails.
//!
//! The binary wraps these in `eyre` for user-facing context; library code
//! and tests match on the variants directly.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported primitive type `{type_name}` at {path}")]
    UnsupportedPrimitive { path: String, type_name: String },

    #[error("type at {path} is not representable: {reason}")]
    UnrepresentableType { path: String, reason: String },

    #[error("duplicate field or type name `{name}` at {path}")]
    DuplicateFieldName { path: String, name: String },

    #[error("length source `{counter}` for array at {path} could not be resolved: {reason}")]
    UnresolvedLengthSource {
        path: String,
        counter: String,
        reason: String,
    },

    #[error("invalid length {length} for array at {path} (row {row})")]
    InvalidLength { path: String, row: u64, length: i64 },

    #[error("short read for array at {path} (row {row}): expected {expected} elements, got {actual}")]
    ArrayShortRead {
        path: String,
        row: u64,
        expected: usize,
        actual: usize,
    },

    #[error("missing field at {path} (row {row})")]
    MissingField { path: String, row: u64 },

    #[error("value at {path} (row {row}) does not match its declared type: {reason}")]
    TypeMismatch {
        path: String,
        row: u64,
        reason: String,
    },

    #[error("unbounded recursion through type `{identity}` at {path}")]
    RecursionDepthUnbounded { path: String, identity: String },

    #[error("type reference `{target}` at {path} does not name an enclosing record")]
    UnresolvedTypeReference { path: String, target: String },

    #[error("reader error at row {row}: {message}")]
    ReaderIo { row: u64, message: String },
}

impl Error {
    /// The branch/field path the error refers to, for diagnostics.
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::UnsupportedPrimitive { path, .. }
            | Error::UnrepresentableType { path, .. }
            | Error::DuplicateFieldName { path, .. }
            | Error::UnresolvedLengthSource { path, .. }
            | Error::InvalidLength { path, .. }
            | Error::ArrayShortRead { path, .. }
            | Error::MissingField { path, .. }
            | Error::TypeMismatch { path, .. }
            | Error::RecursionDepthUnbounded { path, .. }
            | Error::UnresolvedTypeReference { path, .. } => Some(path),
            Error::ReaderIo { .. } => None,
        }
    }

    /// The row index for errors raised while encoding a row.
    pub fn row(&self) -> Option<u64> {
        match self {
            Error::InvalidLength { row, .. }
            | Error::ArrayShortRead { row, .. }
            | Error::MissingField { row, .. }
            | Error::TypeMismatch { row, .. }
            | Error::ReaderIo { row, .. } => Some(*row),
            _ => None,
        }
    }
}
