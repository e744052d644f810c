//! Structural JSON-LD checks and canonical byte encoding.
//!
//! Full JSON-LD expansion and compaction belong to an external processor;
//! the engine only needs nodes to be structurally sound, a deterministic
//! byte form for hashing, and order-insensitive equality for update
//! idempotence.

use serde_json::Value;

use crate::types::ValidationError;

/// Validate that a value is a usable JSON-LD node object.
///
/// The node must be a JSON object; `@id` and `@type` entries must be
/// strings (or, for `@type`, an array of strings). Nested objects and
/// arrays are checked recursively.
pub fn validate_node(node: &Value) -> Result<(), ValidationError> {
    let Value::Object(map) = node else {
        return Err("JSON-LD node must be an object".into());
    };
    for (key, value) in map {
        match key.as_str() {
            "@id" => {
                if !value.is_string() {
                    return Err("JSON-LD @id must be a string".into());
                }
            }
            "@type" => {
                let valid = match value {
                    Value::String(_) => true,
                    Value::Array(items) => items.iter().all(Value::is_string),
                    _ => false,
                };
                if !valid {
                    return Err("JSON-LD @type must be a string or array of strings".into());
                }
            }
            _ => validate_nested(value)?,
        }
    }
    Ok(())
}

fn validate_nested(value: &Value) -> Result<(), ValidationError> {
    match value {
        Value::Object(_) => validate_node(value),
        Value::Array(items) => items.iter().try_for_each(validate_nested),
        _ => Ok(()),
    }
}

/// Deterministic byte encoding of a node, suitable for hashing.
///
/// `serde_json` maps sort their keys, so serializing yields a canonical
/// form: identical nodes produce identical bytes regardless of the key
/// order they were built with.
pub fn canonical_bytes(node: &Value) -> Vec<u8> {
    serde_json::to_vec(node).expect("serializable")
}

/// Order-insensitive structural equality between two optional nodes.
pub fn nodes_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    a == b
}
