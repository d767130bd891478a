//! # Type System
//!
//! The closed set of source primitive kinds, the output primitive kinds of
//! the interchange format, the numeric widening rules between them, and the
//! recursive [`TypeDescriptor`] describing one branch's shape.
//!
//! Descriptors are derived once from reader-supplied metadata and are
//! immutable for the dataset's lifetime. All later logic dispatches on
//! these closed variant sets, never on runtime type inspection.

pub mod descriptor;
pub mod primitive;


pub use descriptor::TypeDescriptor;
pub use primitive::{OutputKind, SourceKind};
