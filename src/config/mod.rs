//! # Treecast Configuration Module
//!
//! This module centralizes the hard limits treecast enforces while building
//! schemas and encoding rows. Keeping them in one place makes their
//! interdependencies visible and lets compile-time assertions catch
//! mismatched edits.
//!
//! ## Module Organization
//!
//! - [`constants`]: All numeric limits with dependency documentation

pub mod constants;
pub use constants::*;
