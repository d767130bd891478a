//! # JSON Codec
//!
//! Emits the schema declaration as a self-describing JSON document and each
//! record as a single-line JSON object.
//!
//! Nested record types are inlined in full the first time they appear in
//! the declaration and referenced by name everywhere after, recursive
//! references included; the same memoization keeps self-referential
//! schemas finite.

use hashbrown::HashSet;
use serde_json::{json, Map, Value};

use crate::records::{RecordValue, ScalarValue};
use crate::schema::{OutputType, SchemaTree};

#[derive(Debug, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> JsonCodec {
        JsonCodec
    }

    /// Renders the schema declaration document.
    pub fn emit_schema(&self, schema: &SchemaTree) -> String {
        let mut emitted = HashSet::new();
        let root = self.record_declaration(schema, schema.root_identity(), &mut emitted);
        serde_json::to_string_pretty(&root).expect("schema declaration serializes")
    }

    /// Renders one encoded row as a single line.
    pub fn emit_record(&self, value: &RecordValue) -> String {
        serde_json::to_string(&self.value_json(value)).expect("record value serializes")
    }

    fn record_declaration(
        &self,
        schema: &SchemaTree,
        identity: &str,
        emitted: &mut HashSet<String>,
    ) -> Value {
        if !emitted.insert(identity.to_string()) {
            return Value::String(identity.to_string());
        }
        let record = schema.resolve(identity);
        let fields: Vec<Value> = record
            .fields
            .iter()
            .map(|(name, ty)| {
                json!({
                    "name": name,
                    "type": self.type_declaration(schema, ty, emitted),
                })
            })
            .collect();
        json!({
            "type": "record",
            "name": identity,
            "fields": fields,
        })
    }

    fn type_declaration(
        &self,
        schema: &SchemaTree,
        ty: &OutputType,
        emitted: &mut HashSet<String>,
    ) -> Value {
        match ty {
            OutputType::Primitive { kind, .. } => Value::String(kind.name().to_string()),
            OutputType::Array { items, .. } => json!({
                "type": "array",
                "items": self.type_declaration(schema, items, emitted),
            }),
            OutputType::Record(identity) | OutputType::RecursiveRef(identity) => {
                self.record_declaration(schema, identity, emitted)
            }
        }
    }

    fn value_json(&self, value: &RecordValue) -> Value {
        match value {
            RecordValue::Scalar(scalar) => match scalar {
                ScalarValue::Boolean(flag) => json!(flag),
                ScalarValue::Int(int) => json!(int),
                ScalarValue::Long(long) => json!(long),
                ScalarValue::Float(float) => json!(float),
                ScalarValue::Double(double) => json!(double),
                ScalarValue::Str(text) => json!(text),
            },
            RecordValue::Sequence(items) => {
                Value::Array(items.iter().map(|item| self.value_json(item)).collect())
            }
            RecordValue::Struct(fields) => {
                let mut object = Map::with_capacity(fields.len());
                for (name, field) in fields {
                    object.insert(name.clone(), self.value_json(field));
                }
                Value::Object(object)
            }
        }
    }
}
