//! # Output Codec
//!
//! Turns the abstract schema tree and per-row record values into the wire
//! representation. The codec never shapes data; everything it receives
//! already matches the schema, so its only job is rendering.
//!
//! ## Module Structure
//!
//! - `json`: JSON schema declaration and one-object-per-line
//!   record output

pub mod json;

pub use json::JsonCodec;
