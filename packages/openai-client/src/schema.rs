//! Strict-mode JSON schemas generated from Rust types.
//!
//! Uses `schemars` to describe a type, then rewrites the result into the
//! subset OpenAI accepts for `strict: true` structured outputs.
//!
//! # Example
//!
//! ```rust,ignore
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use openai_client::StructuredOutput;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Links {
//!     urls: Vec<String>,
//! }
//!
//! let schema = Links::openai_schema();
//! ```

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Trait for types that can be requested as OpenAI structured output.
///
/// Blanket-implemented for every `JsonSchema + DeserializeOwned` type.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// OpenAI-compatible schema for this type.
    ///
    /// Strict mode requires every object to set `additionalProperties: false`
    /// and to list every property as required (optional fields stay
    /// nullable through their type). Nested definitions must be inlined.
    fn openai_schema() -> Value {
        let generated = serde_json::to_value(schema_for!(Self)).unwrap_or_default();
        into_strict_schema(generated)
    }

    /// Schema name, used as the `json_schema.name` of a request.
    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Rewrite a schemars document into strict-mode form.
pub fn into_strict_schema(mut root: Value) -> Value {
    let definitions = match &mut root {
        Value::Object(map) => {
            map.remove("$schema");
            map.remove("definitions")
        }
        _ => None,
    };

    let definitions = definitions.unwrap_or(Value::Object(Map::new()));
    resolve(&mut root, &definitions);
    root
}

fn resolve(node: &mut Value, definitions: &Value) {
    match node {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
                .cloned();

            if let Some(mut inlined) = target {
                resolve(&mut inlined, definitions);
                *node = inlined;
                return;
            }

            if map.get("type").and_then(Value::as_str) == Some("object") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
                if let Some(Value::Object(props)) = map.get("properties") {
                    let required = props.keys().cloned().map(Value::String).collect();
                    map.insert("required".to_string(), Value::Array(required));
                }
            }

            for child in map.values_mut() {
                resolve(child, definitions);
            }
        }
        Value::Array(items) => {
            for item in items {
                resolve(item, definitions);
            }
        }
        _ => {}
    }
}
