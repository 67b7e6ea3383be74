//! JSON bridging.
//!
//! Flattens a JSON document into the field-path mapping records carry. Paths
//! are JSON pointers (`/a/b`, with `~` and `/` escaped as `~0` and `~1`).
//! Nested objects contribute their leaves only.

use hella_core::{Object, Value};
use serde_json::Value as Json;

use crate::error::{HellaError, Result};

/// Escape one reference token of a JSON pointer.
pub fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Flatten a JSON object into `pointer -> value` entries in document order.
pub fn flatten(doc: &Json) -> Result<Object> {
    let map = doc
        .as_object()
        .ok_or_else(|| HellaError::UnsupportedJson("top level must be an object".into()))?;

    let mut out = Object::new();
    flatten_into(&mut out, "", map)?;
    Ok(out)
}

fn flatten_into(
    out: &mut Object,
    base: &str,
    map: &serde_json::Map<String, Json>,
) -> Result<()> {
    for (key, value) in map {
        let path = format!("{}/{}", base, escape_segment(key));
        match value {
            Json::Object(inner) => flatten_into(out, &path, inner)?,
            other => {
                let converted = convert(other, &path)?;
                out.insert(path, converted);
            }
        }
    }
    Ok(())
}

/// Convert a non-object JSON value. Integers that fit `i64` stay integers;
/// every other number becomes a float.
fn convert(value: &Json, path: &str) -> Result<Value> {
    Ok(match value {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().ok_or_else(|| {
                HellaError::UnsupportedJson(format!("{}: number {} is not representable", path, n))
            })?),
        },
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| convert(item, path))
                .collect::<Result<Vec<_>>>()?,
        ),
        Json::Object(_) => {
            return Err(HellaError::UnsupportedJson(format!(
                "{}: objects inside arrays cannot be flattened",
                path
            )))
        }
    })
}
