//! # Schema Builder
//!
//! Consumes the ordered (branch name, descriptor) pairs for one dataset
//! and produces a [`SchemaTree`], or the first build error. Runs once per
//! dataset; all errors here are fatal before any row is processed.
//!
//! ## Algorithm
//!
//! 1. Branch and field names are sanitized to output-format identifier
//!    rules; collisions after sanitization fail with `DuplicateFieldName`.
//! 2. Record identities are the declared type names, namespace-qualified
//!    when a namespace is configured. Every occurrence of an identity is
//!    checked structurally (by fingerprint) against the first one.
//! 3. A record whose identity already appears as an ancestor on the
//!    current path is folded into a `RecursiveRef` instead of being
//!    re-expanded, and the cycle must cross at least one sequence
//!    boundary or the build fails with `RecursionDepthUnbounded`.
//! 4. Primitive leaves are rewritten through the widening rules.
//! 5. Variable-array counters must resolve to an integer-typed sibling
//!    declared before the array at the same record level.

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::tree::{OutputType, RecordType, SchemaTree};
use crate::types::TypeDescriptor;

/// Builds a [`SchemaTree`] from reader-supplied branch descriptors.
pub struct SchemaBuilder {
    name: String,
    namespace: Option<String>,
}

/// One enclosing record on the current descriptor path. `seq_count` is the
/// number of sequence boundaries crossed from the root at the time the
/// record was entered; a recursive reference back to it is only bounded if
/// more boundaries have been crossed since.
struct Ancestor {
    identity: String,
    seq_count: usize,
}

struct BuildState {
    registry: HashMap<String, RecordType>,
    fingerprints: HashMap<String, String>,
    ancestors: SmallVec<[Ancestor; 8]>,
}

impl SchemaBuilder {
    /// `name` becomes the row record's type name (sanitized).
    pub fn new(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            namespace: None,
        }
    }

    /// Dot-separated namespace prefixed to every record identity.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> SchemaBuilder {
        let namespace = namespace.into();
        if !namespace.is_empty() {
            self.namespace = Some(namespace);
        }
        self
    }

    /// Derives the canonical output schema for one dataset.
    pub fn build(&self, branches: &[(String, TypeDescriptor)]) -> Result<SchemaTree> {
        let root_identity = self.qualify(&sanitize(&self.name));
        let mut state = BuildState {
            registry: HashMap::new(),
            fingerprints: HashMap::new(),
            ancestors: SmallVec::new(),
        };
        state.ancestors.push(Ancestor {
            identity: root_identity.clone(),
            seq_count: 0,
        });

        let mut fields: Vec<(String, OutputType)> = Vec::with_capacity(branches.len());
        let mut seen = HashSet::with_capacity(branches.len());
        for (branch, descriptor) in branches {
            let field_name = sanitize(branch);
            if !seen.insert(field_name.clone()) {
                return Err(Error::DuplicateFieldName {
                    path: branch.clone(),
                    name: field_name,
                });
            }
            let ty = self.convert(descriptor, branch, &fields, 0, &mut state)?;
            fields.push((field_name, ty));
        }

        state.ancestors.pop();
        state.registry.insert(
            root_identity.clone(),
            RecordType {
                identity: root_identity.clone(),
                fields,
            },
        );

        debug!(
            root = %root_identity,
            records = state.registry.len(),
            branches = branches.len(),
            "schema built"
        );
        Ok(SchemaTree::new(root_identity, state.registry))
    }

    fn convert(
        &self,
        descriptor: &TypeDescriptor,
        path: &str,
        siblings: &[(String, OutputType)],
        seq_count: usize,
        state: &mut BuildState,
    ) -> Result<OutputType> {
        match descriptor {
            TypeDescriptor::Primitive(source) => match source.widened() {
                Some(kind) => Ok(OutputType::Primitive {
                    kind,
                    source: *source,
                }),
                None => Err(Error::UnrepresentableType {
                    path: path.to_string(),
                    reason: format!(
                        "`{source}` does not own its buffer and is not stable between rows"
                    ),
                }),
            },

            TypeDescriptor::FixedArray { element, len } => {
                let element_path = format!("{path}[]");
                let items = self.convert(element, &element_path, siblings, seq_count + 1, state)?;
                Ok(OutputType::Array {
                    items: Box::new(items),
                    fixed_len: Some(*len),
                    counter: None,
                    capacity: None,
                })
            }

            TypeDescriptor::VariableArray {
                element,
                counter,
                capacity,
            } => {
                let counter_name = sanitize(counter);
                let resolved = siblings
                    .iter()
                    .find(|(name, _)| *name == counter_name)
                    .map(|(_, ty)| ty);
                match resolved {
                    None => Err(Error::UnresolvedLengthSource {
                        path: path.to_string(),
                        counter: counter.clone(),
                        reason: "no such field declared before the array at this level".into(),
                    }),
                    Some(ty) if !ty.is_integer() => Err(Error::UnresolvedLengthSource {
                        path: path.to_string(),
                        counter: counter.clone(),
                        reason: "field is not integer-typed".into(),
                    }),
                    Some(_) => {
                        let element_path = format!("{path}[]");
                        let items =
                            self.convert(element, &element_path, siblings, seq_count + 1, state)?;
                        Ok(OutputType::Array {
                            items: Box::new(items),
                            fixed_len: None,
                            counter: Some(counter_name),
                            capacity: *capacity,
                        })
                    }
                }
            }

            TypeDescriptor::List { element } => {
                let element_path = format!("{path}[]");
                let items = self.convert(element, &element_path, siblings, seq_count + 1, state)?;
                Ok(OutputType::Array {
                    items: Box::new(items),
                    fixed_len: None,
                    counter: None,
                    capacity: None,
                })
            }

            TypeDescriptor::Record { type_name, fields } => {
                let identity = self.qualify(&sanitize(type_name));

                // A record already being expanded higher on this path is a
                // recursive occurrence: fold it after the one unrolling the
                // reader supplied.
                if let Some(ancestor) = state
                    .ancestors
                    .iter()
                    .find(|ancestor| ancestor.identity == identity)
                {
                    if ancestor.seq_count == seq_count {
                        return Err(Error::RecursionDepthUnbounded {
                            path: path.to_string(),
                            identity,
                        });
                    }
                    let fingerprint = descriptor.fingerprint();
                    if state.fingerprints.get(&identity) != Some(&fingerprint) {
                        return Err(Error::DuplicateFieldName {
                            path: path.to_string(),
                            name: identity,
                        });
                    }
                    return Ok(OutputType::RecursiveRef(identity));
                }

                // Same declared type appearing again outside its own
                // expansion: reuse the registered definition.
                if let Some(known) = state.fingerprints.get(&identity) {
                    if *known != descriptor.fingerprint() {
                        return Err(Error::DuplicateFieldName {
                            path: path.to_string(),
                            name: identity,
                        });
                    }
                    return Ok(OutputType::Record(identity));
                }

                state
                    .fingerprints
                    .insert(identity.clone(), descriptor.fingerprint());
                state.ancestors.push(Ancestor {
                    identity: identity.clone(),
                    seq_count,
                });

                let mut converted: Vec<(String, OutputType)> = Vec::with_capacity(fields.len());
                let mut seen = HashSet::with_capacity(fields.len());
                for (field, field_descriptor) in fields {
                    let field_name = sanitize(field);
                    let field_path = format!("{path}.{field}");
                    if !seen.insert(field_name.clone()) {
                        return Err(Error::DuplicateFieldName {
                            path: field_path,
                            name: field_name,
                        });
                    }
                    let ty =
                        self.convert(field_descriptor, &field_path, &converted, seq_count, state)?;
                    converted.push((field_name, ty));
                }

                state.ancestors.pop();
                state.registry.insert(
                    identity.clone(),
                    RecordType {
                        identity: identity.clone(),
                        fields: converted,
                    },
                );
                Ok(OutputType::Record(identity))
            }

            TypeDescriptor::SelfRef { type_name } => {
                let identity = self.qualify(&sanitize(type_name));
                let ancestor = state
                    .ancestors
                    .iter()
                    .find(|ancestor| ancestor.identity == identity)
                    .ok_or_else(|| Error::UnresolvedTypeReference {
                        path: path.to_string(),
                        target: type_name.clone(),
                    })?;
                if ancestor.seq_count == seq_count {
                    return Err(Error::RecursionDepthUnbounded {
                        path: path.to_string(),
                        identity,
                    });
                }
                Ok(OutputType::RecursiveRef(identity))
            }
        }
    }

    fn qualify(&self, identity: &str) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}.{identity}"),
            None => identity.to_string(),
        }
    }
}

/// Maps a source name to the output format's identifier rules: anything
/// outside `[A-Za-z0-9_]` becomes `_`, and a leading digit gets a `_`
/// prefix.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() || out.as_bytes()[0].is_ascii_digit() {
        out.insert(0, '_');
    }
    out
}
