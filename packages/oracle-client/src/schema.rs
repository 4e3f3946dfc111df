//! Named response schemas: generation from Rust types and validation of
//! oracle output.
//!
//! Schemas are derived with `schemars` and rewritten into the strict dialect
//! structured-output providers accept:
//! 1. `additionalProperties: false` on every object
//! 2. every property listed in `required` (nullable ones included)
//! 3. no `$ref` indirection and no `definitions` section
//!
//! The same strict schema is then compiled with `jsonschema` so responses
//! are checked locally instead of trusting the provider.
//!
//! ```rust,ignore
//! let mut schemas = SchemaRegistry::new();
//! let name = schemas.register::<MorphologyResponse>()?;
//! schemas.validate(&name, &response_json)?;
//! ```

use std::collections::HashMap;

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{OracleError, Result};

/// A type the oracle can be asked to produce.
///
/// Blanket-implemented for every `JsonSchema + DeserializeOwned` type.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Strict schema for this type.
    fn strict_schema() -> Value {
        let generated = serde_json::to_value(schema_for!(Self)).unwrap_or_default();
        to_strict_schema(generated)
    }

    /// Name under which the schema is registered and sent to the provider.
    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Rewrite a draft-07 `schemars` document into the strict dialect.
pub fn to_strict_schema(mut schema: Value) -> Value {
    let definitions = schema
        .as_object_mut()
        .and_then(|root| root.remove("definitions"))
        .unwrap_or(Value::Null);

    inline_refs(&mut schema, &definitions);
    close_objects(&mut schema);

    if let Value::Object(root) = &mut schema {
        root.remove("$schema");
    }
    schema
}

fn inline_refs(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
                .cloned();

            if let Some(mut resolved) = target {
                inline_refs(&mut resolved, definitions);
                *value = resolved;
                return;
            }

            for child in map.values_mut() {
                inline_refs(child, definitions);
            }
        }
        Value::Array(items) => {
            for item in items {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}

fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if is_object_schema(map) {
                map.insert("additionalProperties".into(), Value::Bool(false));
                let required: Vec<Value> = map
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|props| props.keys().cloned().map(Value::String).collect())
                    .unwrap_or_default();
                map.insert("required".into(), Value::Array(required));
            }
            for child in map.values_mut() {
                close_objects(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                close_objects(item);
            }
        }
        _ => {}
    }
}

fn is_object_schema(map: &Map<String, Value>) -> bool {
    match map.get("type") {
        Some(Value::String(t)) => t == "object",
        Some(Value::Array(types)) => types.iter().any(|t| t == "object"),
        _ => false,
    }
}

struct RegisteredSchema {
    schema: Value,
    validator: jsonschema::Validator,
}

/// Schemas known to a client, addressed by name.
#[derive(Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, RegisteredSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the strict schema of `T` and return its name.
    pub fn register<T: StructuredOutput>(&mut self) -> Result<String> {
        let name = T::type_name();
        self.insert(name.clone(), T::strict_schema())?;
        Ok(name)
    }

    /// Register a hand-written schema under an explicit name.
    pub fn insert(&mut self, name: impl Into<String>, schema: Value) -> Result<()> {
        let name = name.into();
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| OracleError::Config(format!("invalid schema {}: {}", name, e)))?;
        self.schemas
            .insert(name, RegisteredSchema { schema, validator });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// The schema document registered under `name`.
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.schemas
            .get(name)
            .map(|s| &s.schema)
            .ok_or_else(|| OracleError::UnknownSchema(name.to_string()))
    }

    /// Check `instance` against the schema registered under `name`.
    pub fn validate(&self, name: &str, instance: &Value) -> Result<()> {
        let registered = self
            .schemas
            .get(name)
            .ok_or_else(|| OracleError::UnknownSchema(name.to_string()))?;

        let errors: Vec<String> = registered
            .validator
            .iter_errors(instance)
            .map(|e| format!("{}: {}", e.instance_path, e))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(OracleError::SchemaValidation {
                schema: name.to_string(),
                errors,
            })
        }
    }
}
