//! # In-Memory Dataset
//!
//! A [`DatasetReader`] backed by a JSON fixture document, the same shape
//! the conversion test suites use:
//!
//! ```json
//! {
//!   "name": "events",
//!   "branches": [
//!     ["d", "int32"],
//!     ["x", {"element": "int8", "counter": "d"}]
//!   ],
//!   "rows": [
//!     {"d": 0, "x": []},
//!     {"d": 2, "x": [5, -6]}
//!   ]
//! }
//! ```
//!
//! ## Type Declaration Grammar
//!
//! - Primitives by name: `"bool"`, `"int8"` … `"float64"`, `"string"`,
//!   `"chars"`, `"fstring"`, `"cstring"`.
//! - Bracket dimensions, outermost first: `"int8[5]"` is a fixed array,
//!   `"float32[n]"` a variable array counted by sibling `n`,
//!   `"float32[3][4]"` nests.
//! - `"list<...>"` for self-describing lists.
//! - `"&TypeName"` for a reference back to an enclosing record.
//! - Objects for the long forms: `{"record": name, "fields": [[name,
//!   type], ...]}` and `{"element": type, "counter"/"len"/"capacity":
//!   ...}` (neither `counter` nor `len` means a list).

use eyre::{bail, Result, WrapErr};
use serde::Deserialize;
use serde_json::Value as Json;
use std::path::Path;

use crate::error::Error;
use crate::reader::{DatasetReader, RawValue, RowAccessor};
use crate::schema::sanitize;
use crate::types::{SourceKind, TypeDescriptor};

/// One materialized row.
#[derive(Debug, Clone, Default)]
pub struct MemoryRow {
    fields: Vec<(String, RawValue)>,
}

impl RowAccessor for MemoryRow {
    fn branch(&self, name: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

/// Fully materialized dataset, loaded from a JSON fixture or built by
/// hand in tests.
#[derive(Debug, Clone)]
pub struct MemoryDataset {
    name: String,
    branches: Vec<(String, TypeDescriptor)>,
    rows: Vec<MemoryRow>,
}

#[derive(Deserialize)]
struct FixtureDoc {
    name: String,
    branches: Vec<(String, Json)>,
    #[serde(default)]
    rows: Vec<Json>,
}

impl MemoryDataset {
    pub fn new(name: impl Into<String>, branches: Vec<(String, TypeDescriptor)>) -> MemoryDataset {
        MemoryDataset {
            name: name.into(),
            branches,
            rows: Vec::new(),
        }
    }

    /// Appends one row. Field names are stored as supplied; callers use
    /// the sanitized branch names the schema will carry.
    pub fn push_row(&mut self, fields: Vec<(String, RawValue)>) {
        self.rows.push(MemoryRow { fields });
    }

    pub fn from_json_str(text: &str) -> Result<MemoryDataset> {
        let doc: FixtureDoc =
            serde_json::from_str(text).wrap_err("malformed dataset document")?;

        let mut branches = Vec::with_capacity(doc.branches.len());
        for (name, declaration) in &doc.branches {
            let descriptor = parse_type(declaration, name)
                .wrap_err_with(|| format!("bad type declaration for branch `{name}`"))?;
            branches.push((name.clone(), descriptor));
        }

        let mut dataset = MemoryDataset::new(doc.name, branches);
        for (index, row) in doc.rows.iter().enumerate() {
            let Json::Object(fields) = row else {
                bail!("row {index} is not an object");
            };
            let mut converted = Vec::with_capacity(fields.len());
            for (key, value) in fields {
                let raw = convert_value(value)
                    .wrap_err_with(|| format!("bad value for `{key}` in row {index}"))?;
                converted.push((sanitize(key), raw));
            }
            dataset.push_row(converted);
        }
        Ok(dataset)
    }

    pub fn from_path(path: &Path) -> Result<MemoryDataset> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read dataset at {}", path.display()))?;
        MemoryDataset::from_json_str(&text)
    }
}

impl DatasetReader for MemoryDataset {
    fn name(&self) -> &str {
        &self.name
    }

    fn branches(&self) -> &[(String, TypeDescriptor)] {
        &self.branches
    }

    fn row_count(&self) -> u64 {
        self.rows.len() as u64
    }

    fn read_row(&self, row: u64) -> crate::error::Result<&dyn RowAccessor> {
        let found = usize::try_from(row)
            .ok()
            .and_then(|index| self.rows.get(index));
        match found {
            Some(memory_row) => Ok(memory_row),
            None => Err(Error::ReaderIo {
                row,
                message: format!("row out of range (dataset has {})", self.rows.len()),
            }),
        }
    }
}

/// Parses one branch/field type declaration.
pub fn parse_type(declaration: &Json, path: &str) -> Result<TypeDescriptor> {
    match declaration {
        Json::String(text) => parse_type_str(text, path),
        Json::Object(object) => {
            if let Some(record_name) = object.get("record") {
                let Json::String(type_name) = record_name else {
                    bail!("record name at `{path}` is not a string");
                };
                let Some(Json::Array(fields)) = object.get("fields") else {
                    bail!("record `{type_name}` at `{path}` has no field list");
                };
                let mut parsed = Vec::with_capacity(fields.len());
                for field in fields {
                    let pair = field.as_array().filter(|pair| pair.len() == 2);
                    let Some(pair) = pair else {
                        bail!("field of record `{type_name}` is not a [name, type] pair");
                    };
                    let Json::String(field_name) = &pair[0] else {
                        bail!("field name in record `{type_name}` is not a string");
                    };
                    let field_path = format!("{path}.{field_name}");
                    parsed.push((field_name.clone(), parse_type(&pair[1], &field_path)?));
                }
                return Ok(TypeDescriptor::Record {
                    type_name: type_name.clone(),
                    fields: parsed,
                });
            }

            let Some(element) = object.get("element") else {
                bail!("object type at `{path}` has neither `record` nor `element`");
            };
            let element = parse_type(element, &format!("{path}[]"))?;
            let capacity = match object.get("capacity") {
                Some(value) => Some(
                    value
                        .as_u64()
                        .map(|capacity| capacity as usize)
                        .ok_or_else(|| eyre::eyre!("capacity at `{path}` is not an integer"))?,
                ),
                None => None,
            };
            if let Some(counter) = object.get("counter") {
                let Json::String(counter) = counter else {
                    bail!("counter at `{path}` is not a string");
                };
                return Ok(TypeDescriptor::VariableArray {
                    element: Box::new(element),
                    counter: counter.clone(),
                    capacity,
                });
            }
            if let Some(len) = object.get("len") {
                let len = len
                    .as_u64()
                    .ok_or_else(|| eyre::eyre!("len at `{path}` is not an integer"))?;
                return Ok(TypeDescriptor::FixedArray {
                    element: Box::new(element),
                    len: len as usize,
                });
            }
            Ok(TypeDescriptor::List {
                element: Box::new(element),
            })
        }
        other => bail!("type declaration at `{path}` is a {other}"),
    }
}

fn parse_type_str(text: &str, path: &str) -> Result<TypeDescriptor> {
    let text = text.trim();

    if let Some(target) = text.strip_prefix('&') {
        return Ok(TypeDescriptor::SelfRef {
            type_name: target.trim().to_string(),
        });
    }

    if let Some(inner) = text.strip_prefix("list<") {
        let Some(inner) = inner.strip_suffix('>') else {
            bail!("unterminated list declaration `{text}` at `{path}`");
        };
        return Ok(TypeDescriptor::list(parse_type_str(inner, path)?));
    }

    let (base, dims) = match text.find('[') {
        Some(bracket) => (&text[..bracket], parse_dims(&text[bracket..], path)?),
        None => (text, Vec::new()),
    };

    let Some(kind) = SourceKind::parse(base) else {
        return Err(Error::UnsupportedPrimitive {
            path: path.to_string(),
            type_name: base.to_string(),
        }
        .into());
    };

    let mut descriptor = TypeDescriptor::Primitive(kind);
    for dim in dims.iter().rev() {
        descriptor = match dim.parse::<usize>() {
            Ok(len) => TypeDescriptor::fixed_array(descriptor, len),
            Err(_) => TypeDescriptor::variable_array(descriptor, dim.clone()),
        };
    }
    Ok(descriptor)
}

/// Splits `[a][b]...` into its dimension expressions, outermost first.
fn parse_dims(text: &str, path: &str) -> Result<Vec<String>> {
    let mut dims = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let Some(stripped) = rest.strip_prefix('[') else {
            bail!("malformed array dimensions `{text}` at `{path}`");
        };
        let Some(close) = stripped.find(']') else {
            bail!("unterminated array dimension `{text}` at `{path}`");
        };
        let dim = stripped[..close].trim();
        if dim.is_empty() {
            bail!("empty array dimension `{text}` at `{path}`");
        }
        dims.push(dim.to_string());
        rest = &stripped[close + 1..];
    }
    Ok(dims)
}

fn convert_value(value: &Json) -> Result<RawValue> {
    match value {
        Json::Bool(flag) => Ok(RawValue::Bool(*flag)),
        Json::Number(number) => {
            if let Some(int) = number.as_i64() {
                Ok(RawValue::Int(int))
            } else if let Some(uint) = number.as_u64() {
                Ok(RawValue::UInt(uint))
            } else {
                // as_f64 is total for JSON numbers that are neither i64
                // nor u64.
                Ok(RawValue::Float(number.as_f64().unwrap_or_default()))
            }
        }
        Json::String(text) => Ok(RawValue::Str(text.clone())),
        Json::Array(items) => {
            let mut converted = Vec::with_capacity(items.len());
            for item in items {
                converted.push(convert_value(item)?);
            }
            Ok(RawValue::Seq(converted))
        }
        Json::Object(fields) => {
            let mut converted = Vec::with_capacity(fields.len());
            for (key, value) in fields {
                converted.push((sanitize(key), convert_value(value)?));
            }
            Ok(RawValue::Struct(converted))
        }
        Json::Null => bail!("null values are not representable"),
    }
}
