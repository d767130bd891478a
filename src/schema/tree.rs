//! # Schema Tree
//!
//! The canonicalized, name-deduplicated form of a dataset's type
//! descriptors. A [`SchemaTree`] owns a registry of named record types;
//! [`OutputType::Record`] and [`OutputType::RecursiveRef`] nodes refer
//! into the registry by identity instead of nesting definitions, which is
//! what lets self-referential types exist without cyclic ownership.

use hashbrown::HashMap;

use crate::types::{OutputKind, SourceKind};

/// Shape of one output field after widening and canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputType {
    /// Scalar leaf. `source` is kept so the row walker can apply the
    /// sign-exact coercion for the original kind (int8 vs uint8 both widen
    /// to `int` but read the stored byte differently).
    Primitive { kind: OutputKind, source: SourceKind },

    /// Sequence field. Exactly one of `fixed_len` / `counter` is set for
    /// fixed and counter-sized arrays; both are `None` for self-describing
    /// lists.
    Array {
        items: Box<OutputType>,
        fixed_len: Option<usize>,
        counter: Option<String>,
        capacity: Option<usize>,
    },

    /// Nested record, by registry identity.
    Record(String),

    /// Reference back to an enclosing record type, terminating type
    /// recursion. Also resolved through the registry.
    RecursiveRef(String),
}

impl OutputType {
    /// True for integer-valued scalars, i.e. fields usable as an array
    /// length source.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            OutputType::Primitive {
                kind: OutputKind::Int | OutputKind::Long,
                ..
            }
        )
    }
}

/// One named record type: ordered fields, unique names.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    pub identity: String,
    pub fields: Vec<(String, OutputType)>,
}

impl RecordType {
    pub fn field(&self, name: &str) -> Option<&OutputType> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, ty)| ty)
    }
}

/// Canonical output schema for one dataset: the root record (the row
/// type) plus every named nested record type, keyed by identity.
#[derive(Debug, Clone)]
pub struct SchemaTree {
    root_identity: String,
    registry: HashMap<String, RecordType>,
}

impl SchemaTree {
    pub(crate) fn new(root_identity: String, registry: HashMap<String, RecordType>) -> SchemaTree {
        debug_assert!(registry.contains_key(&root_identity));
        SchemaTree {
            root_identity,
            registry,
        }
    }

    /// Identity of the row type.
    pub fn root_identity(&self) -> &str {
        &self.root_identity
    }

    /// The row type itself.
    pub fn root(&self) -> &RecordType {
        &self.registry[&self.root_identity]
    }

    /// Looks up a named record type. Every `Record`/`RecursiveRef` node in
    /// the tree resolves here; a miss is an internal invariant violation.
    pub fn record(&self, identity: &str) -> Option<&RecordType> {
        self.registry.get(identity)
    }

    /// Resolves an identity taken from a `Record`/`RecursiveRef` node of
    /// this tree. The builder registers every identity before it can
    /// appear in a node, so a miss cannot happen for identities read out
    /// of the tree itself.
    pub(crate) fn resolve(&self, identity: &str) -> &RecordType {
        match self.registry.get(identity) {
            Some(record) => record,
            None => unreachable!("identity `{identity}` not in the schema registry"),
        }
    }

    /// Number of named record types, the root included.
    pub fn record_count(&self) -> usize {
        self.registry.len()
    }
}
