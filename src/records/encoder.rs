//! # Row Walker
//!
//! Encodes one row at a time: given the schema tree and the row's raw
//! branch values, produces one [`RecordValue`] matching the schema's
//! shape. Fields encode left-to-right in declared order, which is what
//! guarantees a variable array's length counter is already encoded when
//! the array is reached.
//!
//! Numeric coercion happens here, at the scalar leaves: the schema keeps
//! the original source kind next to each widened output kind, and the
//! walker re-reads the raw value through the source kind's sign rules
//! (a byte declared signed reinterprets 255 as -1; declared unsigned it
//! stays 255).

use crate::config::{MAX_SEQUENCE_LENGTH, MAX_STRING_LENGTH, MAX_UNROLL_DEPTH};
use crate::error::{Error, Result};
use crate::reader::{RawValue, RowAccessor};
use crate::records::value::{RecordValue, ScalarValue};
use crate::schema::{OutputType, SchemaTree};
use crate::types::SourceKind;

/// Shape-directed encoder for one dataset. Stateless across rows; the
/// schema tree is shared read-only.
pub struct RowWalker<'a> {
    schema: &'a SchemaTree,
}

impl<'a> RowWalker<'a> {
    pub fn new(schema: &'a SchemaTree) -> RowWalker<'a> {
        RowWalker { schema }
    }

    /// Encodes the row at `row` into a struct matching the root record.
    /// Any error aborts the row; no partial record is ever returned.
    pub fn encode_row(&self, row: u64, accessor: &dyn RowAccessor) -> Result<RecordValue> {
        let root = self.schema.root();
        let mut fields: Vec<(String, RecordValue)> = Vec::with_capacity(root.fields.len());
        for (name, ty) in &root.fields {
            let raw = accessor.branch(name).ok_or_else(|| Error::MissingField {
                path: name.clone(),
                row,
            })?;
            let value = self.encode(ty, raw, name, row, &fields, 0)?;
            fields.push((name.clone(), value));
        }
        Ok(RecordValue::Struct(fields))
    }

    /// `siblings` are the already-encoded fields of the innermost
    /// enclosing record, used to resolve array length counters. `depth`
    /// counts recursive-record re-entries.
    fn encode(
        &self,
        ty: &OutputType,
        raw: &RawValue,
        path: &str,
        row: u64,
        siblings: &[(String, RecordValue)],
        depth: usize,
    ) -> Result<RecordValue> {
        match ty {
            OutputType::Primitive { source, .. } => {
                coerce(*source, raw, path, row).map(RecordValue::Scalar)
            }

            OutputType::Array {
                items,
                fixed_len,
                counter,
                capacity,
            } => {
                let elements = match raw {
                    RawValue::Seq(elements) => elements,
                    other => {
                        return Err(type_mismatch(path, row, "sequence", other));
                    }
                };

                let len = if let Some(expected) = fixed_len {
                    // Fixed-size buffers must be supplied in full.
                    if elements.len() < *expected {
                        return Err(Error::ArrayShortRead {
                            path: path.to_string(),
                            row,
                            expected: *expected,
                            actual: elements.len(),
                        });
                    }
                    if elements.len() > *expected {
                        return Err(Error::InvalidLength {
                            path: path.to_string(),
                            row,
                            length: elements.len() as i64,
                        });
                    }
                    *expected
                } else if let Some(counter) = counter {
                    let resolved = resolve_counter(siblings, counter, path, row)?;
                    if resolved < 0 {
                        return Err(Error::InvalidLength {
                            path: path.to_string(),
                            row,
                            length: resolved,
                        });
                    }
                    let resolved = resolved as usize;
                    if capacity.is_some_and(|cap| resolved > cap)
                        || resolved > MAX_SEQUENCE_LENGTH
                    {
                        return Err(Error::InvalidLength {
                            path: path.to_string(),
                            row,
                            length: resolved as i64,
                        });
                    }
                    // Padded buffers may carry extra elements past the
                    // counter; fewer than the counter is corruption.
                    if elements.len() < resolved {
                        return Err(Error::ArrayShortRead {
                            path: path.to_string(),
                            row,
                            expected: resolved,
                            actual: elements.len(),
                        });
                    }
                    resolved
                } else {
                    // Self-describing list.
                    if elements.len() > MAX_SEQUENCE_LENGTH {
                        return Err(Error::InvalidLength {
                            path: path.to_string(),
                            row,
                            length: elements.len() as i64,
                        });
                    }
                    elements.len()
                };

                let mut out = Vec::with_capacity(len);
                for (index, element) in elements.iter().take(len).enumerate() {
                    let element_path = format!("{path}[{index}]");
                    out.push(self.encode(items, element, &element_path, row, siblings, depth)?);
                }
                Ok(RecordValue::Sequence(out))
            }

            OutputType::Record(identity) => self.encode_record(identity, raw, path, row, depth),

            OutputType::RecursiveRef(identity) => {
                if depth >= MAX_UNROLL_DEPTH {
                    return Err(Error::RecursionDepthUnbounded {
                        path: path.to_string(),
                        identity: identity.clone(),
                    });
                }
                self.encode_record(identity, raw, path, row, depth)
            }
        }
    }

    fn encode_record(
        &self,
        identity: &str,
        raw: &RawValue,
        path: &str,
        row: u64,
        depth: usize,
    ) -> Result<RecordValue> {
        let record = self.schema.resolve(identity);
        let raw_fields = match raw {
            RawValue::Struct(_) => raw,
            other => {
                return Err(type_mismatch(path, row, "struct", other));
            }
        };

        let mut fields: Vec<(String, RecordValue)> = Vec::with_capacity(record.fields.len());
        for (name, ty) in &record.fields {
            let field_path = format!("{path}.{name}");
            let raw_field = raw_fields
                .field(name)
                .ok_or_else(|| Error::MissingField {
                    path: field_path.clone(),
                    row,
                })?;
            let value = self.encode(ty, raw_field, &field_path, row, &fields, depth + 1)?;
            fields.push((name.clone(), value));
        }
        Ok(RecordValue::Struct(fields))
    }
}

/// Reads an array length out of the already-encoded sibling fields.
/// The schema builder guaranteed the counter exists and is integer-typed;
/// absence at encode time means the row itself is malformed.
fn resolve_counter(
    siblings: &[(String, RecordValue)],
    counter: &str,
    path: &str,
    row: u64,
) -> Result<i64> {
    let value = siblings
        .iter()
        .find(|(name, _)| name == counter)
        .map(|(_, value)| value)
        .ok_or_else(|| Error::UnresolvedLengthSource {
            path: path.to_string(),
            counter: counter.to_string(),
            reason: format!("counter not encoded before the array in row {row}"),
        })?;
    match value {
        RecordValue::Scalar(scalar) => {
            scalar
                .as_integer()
                .ok_or_else(|| Error::UnresolvedLengthSource {
                    path: path.to_string(),
                    counter: counter.to_string(),
                    reason: "counter field is not integer-valued".into(),
                })
        }
        _ => Err(Error::UnresolvedLengthSource {
            path: path.to_string(),
            counter: counter.to_string(),
            reason: "counter field is not a scalar".into(),
        }),
    }
}

/// Widens one raw scalar to its output kind, applying the source kind's
/// sign rules exactly. 8-bit kinds read the low byte of whatever integer
/// the reader supplied, so fixtures can state bytes as 0–255 regardless
/// of declared signedness.
fn coerce(source: SourceKind, raw: &RawValue, path: &str, row: u64) -> Result<ScalarValue> {
    match source {
        SourceKind::Bool => match raw {
            RawValue::Bool(value) => Ok(ScalarValue::Boolean(*value)),
            other => Err(type_mismatch(path, row, "bool", other)),
        },

        SourceKind::Int8 => {
            let byte = raw_low_byte(raw, path, row)?;
            Ok(ScalarValue::Int(i32::from(byte as i8)))
        }
        SourceKind::UInt8 => {
            let byte = raw_low_byte(raw, path, row)?;
            Ok(ScalarValue::Int(i32::from(byte)))
        }

        SourceKind::Int16 => {
            let value = raw_integer(raw, path, row)?;
            let narrowed = i16::try_from(value)
                .map_err(|_| range_mismatch(path, row, value, "int16"))?;
            Ok(ScalarValue::Int(i32::from(narrowed)))
        }
        SourceKind::UInt16 => {
            let value = raw_integer(raw, path, row)?;
            let narrowed = u16::try_from(value)
                .map_err(|_| range_mismatch(path, row, value, "uint16"))?;
            Ok(ScalarValue::Int(i32::from(narrowed)))
        }
        SourceKind::Int32 => {
            let value = raw_integer(raw, path, row)?;
            let narrowed = i32::try_from(value)
                .map_err(|_| range_mismatch(path, row, value, "int32"))?;
            Ok(ScalarValue::Int(narrowed))
        }
        SourceKind::UInt32 => {
            let value = raw_integer(raw, path, row)?;
            let narrowed = u32::try_from(value)
                .map_err(|_| range_mismatch(path, row, value, "uint32"))?;
            Ok(ScalarValue::Long(i64::from(narrowed)))
        }
        SourceKind::Int64 => {
            let value = raw_integer(raw, path, row)?;
            Ok(ScalarValue::Long(value))
        }
        SourceKind::UInt64 => match raw {
            // Rounds above 2^53; documented approximation of the widening
            // rules, not an error.
            RawValue::UInt(value) => Ok(ScalarValue::Double(*value as f64)),
            RawValue::Int(value) if *value >= 0 => Ok(ScalarValue::Double(*value as f64)),
            other => Err(type_mismatch(path, row, "uint64", other)),
        },

        SourceKind::Float32 => {
            let value = raw_float(raw, path, row)?;
            Ok(ScalarValue::Float(value as f32))
        }
        SourceKind::Float64 => {
            let value = raw_float(raw, path, row)?;
            Ok(ScalarValue::Double(value))
        }

        SourceKind::CharArray | SourceKind::StdString | SourceKind::FrameworkString => match raw {
            RawValue::Str(value) => {
                if value.len() > MAX_STRING_LENGTH {
                    return Err(Error::InvalidLength {
                        path: path.to_string(),
                        row,
                        length: value.len() as i64,
                    });
                }
                Ok(ScalarValue::Str(value.clone()))
            }
            other => Err(type_mismatch(path, row, "string", other)),
        },

        // Rejected at schema build; a schema tree can never contain one.
        SourceKind::CStringPtr => Err(Error::UnrepresentableType {
            path: path.to_string(),
            reason: "cstring survived schema construction".into(),
        }),
    }
}

fn raw_integer(raw: &RawValue, path: &str, row: u64) -> Result<i64> {
    match raw {
        RawValue::Int(value) => Ok(*value),
        RawValue::UInt(value) => {
            i64::try_from(*value).map_err(|_| range_mismatch(path, row, i64::MAX, "integer"))
        }
        other => Err(type_mismatch(path, row, "integer", other)),
    }
}

fn raw_low_byte(raw: &RawValue, path: &str, row: u64) -> Result<u8> {
    let value = raw_integer(raw, path, row)?;
    if !(i64::from(i8::MIN)..=i64::from(u8::MAX)).contains(&value) {
        return Err(range_mismatch(path, row, value, "8-bit"));
    }
    Ok(value as u8)
}

fn raw_float(raw: &RawValue, path: &str, row: u64) -> Result<f64> {
    match raw {
        RawValue::Float(value) => Ok(*value),
        RawValue::Int(value) => Ok(*value as f64),
        RawValue::UInt(value) => Ok(*value as f64),
        other => Err(type_mismatch(path, row, "float", other)),
    }
}

fn type_mismatch(path: &str, row: u64, expected: &str, got: &RawValue) -> Error {
    Error::TypeMismatch {
        path: path.to_string(),
        row,
        reason: format!("expected {expected}, got {}", got.kind_name()),
    }
}

fn range_mismatch(path: &str, row: u64, value: i64, declared: &str) -> Error {
    Error::TypeMismatch {
        path: path.to_string(),
        row,
        reason: format!("value {value} out of range for declared {declared}"),
    }
}
