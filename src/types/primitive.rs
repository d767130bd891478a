//! # Primitive Kinds and Numeric Widening
//!
//! Two closed enumerations and one pure function between them.
//!
//! [`SourceKind`] is every primitive type a dataset reader can declare for
//! a branch. [`OutputKind`] is the interchange format's primitive set. The
//! widening rules pick, for each source kind, the narrowest output kind
//! that represents the source's full value range losslessly.
//!
//! ## Widening Table
//!
//! | Source | Output | Notes |
//! |--------|--------|-------|
//! | bool | boolean | identical |
//! | int8 | int | byte reinterpreted two's-complement (255 → -1) |
//! | uint8 | int | 0–255 preserved non-negative |
//! | int16, uint16, int32 | int | |
//! | uint32 | long | exceeds the signed 32-bit range |
//! | int64 | long | |
//! | uint64 | double | rounds above 2^53, documented approximation |
//! | float32 | float | identical |
//! | float64 | double | identical |
//! | char-array, string, framework string | string | |
//! | C-string pointer | (none) | rejected, buffer not stable between rows |

use std::fmt;

/// Primitive type a dataset reader can declare for a branch or field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    /// Fixed-size character sequence.
    CharArray,
    /// Growable character sequence.
    StdString,
    /// Framework-specific string type that owns its buffer.
    FrameworkString,
    /// Raw character pointer that does not own its buffer. Never
    /// representable: the pointed-to data is not guaranteed stable between
    /// rows.
    CStringPtr,
}

impl SourceKind {
    /// The output kind that losslessly holds this kind's full value range,
    /// or `None` for kinds that cannot be represented at all.
    ///
    /// Pure and total over the enumeration; the only `None` is
    /// [`SourceKind::CStringPtr`].
    pub fn widened(self) -> Option<OutputKind> {
        match self {
            SourceKind::Bool => Some(OutputKind::Boolean),
            SourceKind::Int8
            | SourceKind::UInt8
            | SourceKind::Int16
            | SourceKind::UInt16
            | SourceKind::Int32 => Some(OutputKind::Int),
            SourceKind::UInt32 | SourceKind::Int64 => Some(OutputKind::Long),
            SourceKind::UInt64 => Some(OutputKind::Double),
            SourceKind::Float32 => Some(OutputKind::Float),
            SourceKind::Float64 => Some(OutputKind::Double),
            SourceKind::CharArray | SourceKind::StdString | SourceKind::FrameworkString => {
                Some(OutputKind::Str)
            }
            SourceKind::CStringPtr => None,
        }
    }

    /// True for kinds whose widened output is an exact integer, i.e. kinds
    /// usable as a variable-array length source. `uint64` is excluded: its
    /// output kind is `double`, which cannot index exactly.
    pub fn is_counter(self) -> bool {
        matches!(
            self.widened(),
            Some(OutputKind::Int) | Some(OutputKind::Long)
        )
    }

    /// True for string-like kinds.
    pub fn is_string(self) -> bool {
        matches!(
            self,
            SourceKind::CharArray
                | SourceKind::StdString
                | SourceKind::FrameworkString
                | SourceKind::CStringPtr
        )
    }

    /// The declaration name used by the reader metadata grammar.
    pub fn name(self) -> &'static str {
        match self {
            SourceKind::Bool => "bool",
            SourceKind::Int8 => "int8",
            SourceKind::UInt8 => "uint8",
            SourceKind::Int16 => "int16",
            SourceKind::UInt16 => "uint16",
            SourceKind::Int32 => "int32",
            SourceKind::UInt32 => "uint32",
            SourceKind::Int64 => "int64",
            SourceKind::UInt64 => "uint64",
            SourceKind::Float32 => "float32",
            SourceKind::Float64 => "float64",
            SourceKind::CharArray => "chars",
            SourceKind::StdString => "string",
            SourceKind::FrameworkString => "fstring",
            SourceKind::CStringPtr => "cstring",
        }
    }

    /// Parses a declaration name. `None` for unknown names; the caller
    /// reports `UnsupportedPrimitive` with its own path context.
    pub fn parse(name: &str) -> Option<SourceKind> {
        let kind = match name {
            "bool" => SourceKind::Bool,
            "int8" => SourceKind::Int8,
            "uint8" => SourceKind::UInt8,
            "int16" => SourceKind::Int16,
            "uint16" => SourceKind::UInt16,
            "int32" => SourceKind::Int32,
            "uint32" => SourceKind::UInt32,
            "int64" => SourceKind::Int64,
            "uint64" => SourceKind::UInt64,
            "float32" => SourceKind::Float32,
            "float64" => SourceKind::Float64,
            "chars" => SourceKind::CharArray,
            "string" => SourceKind::StdString,
            "fstring" => SourceKind::FrameworkString,
            "cstring" => SourceKind::CStringPtr,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Primitive kind of the output type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Str,
}

impl OutputKind {
    /// The name used in the emitted schema declaration.
    pub fn name(self) -> &'static str {
        match self {
            OutputKind::Boolean => "boolean",
            OutputKind::Int => "int",
            OutputKind::Long => "long",
            OutputKind::Float => "float",
            OutputKind::Double => "double",
            OutputKind::Str => "string",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
