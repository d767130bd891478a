//! # Schema Inference
//!
//! Turns the ordered list of (branch name, [`crate::types::TypeDescriptor`]) pairs
//! reported by a dataset reader into a canonical [`SchemaTree`]: a root
//! record (the row type) plus a registry of named nested record types.
//!
//! The tree is built once per dataset and read-only thereafter, shared by
//! the row walker (as the shape contract for every row) and by the output
//! codec (to emit the schema declaration).
//!
//! ## Guarantees
//!
//! - Output field order equals input branch declaration order.
//! - Every nested record type is registered under exactly one identity;
//!   a second structurally different declaration under the same identity
//!   fails the build.
//! - Self-referential types are folded into [`OutputType::RecursiveRef`]
//!   after exactly one unrolling, and every recursion cycle is checked to
//!   cross a sequence boundary.
//! - Primitive leaves are rewritten through the numeric widening rules;
//!   the original source kind is preserved alongside for the row walker's
//!   sign-exact coercion.

pub mod builder;
pub mod tree;

#[cfg(test)]
mod tests;

pub use builder::{sanitize, SchemaBuilder};
pub use tree::{OutputType, RecordType, SchemaTree};
