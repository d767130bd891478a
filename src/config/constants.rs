//! # Treecast Limit Constants
//!
//! Bounds enforced during schema construction and row encoding. Source
//! frameworks cap string and sequence lengths at a signed 32-bit maximum,
//! so anything past these limits indicates reader corruption rather than
//! real data.
//!
//! ## Dependency Graph
//!
//! ```text
//! MAX_SEQUENCE_LENGTH (i32::MAX)
//!       │
//!       └─> Sequence counters are read as signed 32-bit integers in the
//!           source framework; a resolved length above this bound cannot
//!           have come from a well-formed counter field.
//!
//! MAX_STRING_LENGTH (i32::MAX)
//!       │
//!       └─> Same signed 32-bit cap, applied to string payload bytes.
//!
//! MAX_UNROLL_DEPTH (128)
//!       │
//!       └─> Bounds recursive-record re-entry per row. The encoder
//!           recurses a few stack frames per level, so the bound must
//!           keep worst-case stack usage well inside a default worker
//!           thread stack. 128 also matches the nesting limit the JSON
//!           fixture parser enforces on its own input.
//! ```

/// Longest string value a row may carry, in bytes.
pub const MAX_STRING_LENGTH: usize = i32::MAX as usize;

/// Longest sequence (array or list instance) a row may carry.
pub const MAX_SEQUENCE_LENGTH: usize = i32::MAX as usize;

/// Deepest chain of recursive-record re-entries allowed while encoding one
/// row. Must stay small enough that the encoder's per-level stack frames
/// fit a 2 MiB thread stack with room to spare.
pub const MAX_UNROLL_DEPTH: usize = 128;

const _: () = assert!(MAX_UNROLL_DEPTH >= 1);
// Roughly 4 frames per level; 256 levels is already most of a 2 MiB stack.
const _: () = assert!(MAX_UNROLL_DEPTH <= 256);
const _: () = assert!(MAX_STRING_LENGTH <= i32::MAX as usize);
const _: () = assert!(MAX_SEQUENCE_LENGTH <= i32::MAX as usize);
