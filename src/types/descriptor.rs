//! # Type Descriptors
//!
//! An immutable, recursively-defined value describing one branch's or
//! field's shape. Descriptors are the reified form of the reader's type
//! metadata: the schema builder walks them once per dataset and the rest
//! of the pipeline never touches reader metadata again.
//!
//! The descriptor tree may describe self-referential types two ways:
//! readers that expand recursion report it as deeply-nested repeats of the
//! same record type name, and readers that mark it explicitly use
//! [`TypeDescriptor::SelfRef`]. Either way the schema builder folds the
//! repetition back into a reference after exactly one unrolling.

use crate::types::SourceKind;

/// Shape of one branch or nested field.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// A single scalar of the given source kind.
    Primitive(SourceKind),

    /// Fixed-size array; `len` is known at schema-build time and constant
    /// across all rows.
    FixedArray {
        element: Box<TypeDescriptor>,
        len: usize,
    },

    /// Variable-length array whose per-row length is read from a sibling
    /// integer field named `counter`, declared before the array. `capacity`
    /// is the declared maximum when the source backs the array with a
    /// fixed-size buffer.
    VariableArray {
        element: Box<TypeDescriptor>,
        counter: String,
        capacity: Option<usize>,
    },

    /// Dynamically-sized list; the length travels with the value itself.
    List { element: Box<TypeDescriptor> },

    /// Nested record with named, ordered fields. `type_name` is the
    /// declared type identity used for deduplication and recursion
    /// detection.
    Record {
        type_name: String,
        fields: Vec<(String, TypeDescriptor)>,
    },

    /// Reference back to an enclosing record's declared type name. Must
    /// resolve to an ancestor in the descriptor tree.
    SelfRef { type_name: String },
}

impl TypeDescriptor {
    pub fn fixed_array(element: TypeDescriptor, len: usize) -> TypeDescriptor {
        TypeDescriptor::FixedArray {
            element: Box::new(element),
            len,
        }
    }

    pub fn variable_array(element: TypeDescriptor, counter: impl Into<String>) -> TypeDescriptor {
        TypeDescriptor::VariableArray {
            element: Box::new(element),
            counter: counter.into(),
            capacity: None,
        }
    }

    pub fn list(element: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::List {
            element: Box::new(element),
        }
    }

    pub fn record(
        type_name: impl Into<String>,
        fields: Vec<(String, TypeDescriptor)>,
    ) -> TypeDescriptor {
        TypeDescriptor::Record {
            type_name: type_name.into(),
            fields,
        }
    }

    /// True if this descriptor is a primitive usable as an array length
    /// source.
    pub fn is_counter(&self) -> bool {
        matches!(self, TypeDescriptor::Primitive(kind) if kind.is_counter())
    }

    /// Structural fingerprint: two descriptors with equal fingerprints have
    /// identical shape. Used to verify that every occurrence of a declared
    /// type name really is the same type, without relying on pointer
    /// identity.
    ///
    /// Recursive occurrences are normalized: a record whose type name is
    /// already being expanded higher in the same fingerprint prints as a
    /// reference, so one unrolling of a self-referential type fingerprints
    /// the same as its ancestor.
    pub fn fingerprint(&self) -> String {
        let mut out = String::new();
        let mut stack = Vec::new();
        self.write_fingerprint(&mut out, &mut stack);
        out
    }

    fn write_fingerprint(&self, out: &mut String, stack: &mut Vec<String>) {
        match self {
            TypeDescriptor::Primitive(kind) => {
                out.push_str(kind.name());
            }
            TypeDescriptor::FixedArray { element, len } => {
                out.push_str("arr[");
                out.push_str(&len.to_string());
                out.push(']');
                element.write_fingerprint(out, stack);
            }
            TypeDescriptor::VariableArray {
                element, counter, ..
            } => {
                out.push_str("var[");
                out.push_str(counter);
                out.push(']');
                element.write_fingerprint(out, stack);
            }
            TypeDescriptor::List { element } => {
                out.push_str("list;");
                element.write_fingerprint(out, stack);
            }
            TypeDescriptor::Record { type_name, fields } => {
                if stack.iter().any(|seen| seen == type_name) {
                    out.push('&');
                    out.push_str(type_name);
                    return;
                }
                stack.push(type_name.clone());
                out.push_str("rec(");
                out.push_str(type_name);
                out.push(')');
                out.push('{');
                for (name, field) in fields {
                    out.push_str(name);
                    out.push(':');
                    field.write_fingerprint(out, stack);
                    out.push(',');
                }
                out.push('}');
                stack.pop();
            }
            TypeDescriptor::SelfRef { type_name } => {
                out.push('&');
                out.push_str(type_name);
            }
        }
    }
}
