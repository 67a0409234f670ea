//! Request identity derivation.
//!
//! Two requests with the same method, path, body, and parameter values must
//! produce the same identity string regardless of parameter key ordering;
//! any difference in method, path, body, or values must produce a different
//! one. The identity feeds the pending-request tracker, which cancels an
//! in-flight duplicate before dispatching its successor.

use reqwest::Method;
use serde_json::Value;

/// Derives the identity string for a request.
///
/// Joins method, path, encoded body, and encoded parameters with `&`. Pure
/// and side-effect-free.
pub fn request_key(
    method: &Method,
    path: &str,
    body: Option<&Value>,
    params: Option<&Value>,
) -> String {
    [
        method.as_str(),
        path,
        &stable_encode(body),
        &stable_encode(params),
    ]
    .join("&")
}

/// Serializes a JSON value into a stable query-string form.
///
/// Objects encode as `key=value` pairs joined by `&` with keys sorted
/// lexicographically, so insertion order never affects the result.
/// Array-valued keys are repeated (`tags=1&tags=2`) rather than
/// bracket-indexed. Absent or null input encodes to the empty string.
/// Non-object top-level values encode as their percent-encoded literal form.
pub fn stable_encode(value: Option<&Value>) -> String {
    let value = match value {
        None | Some(Value::Null) => return String::new(),
        Some(v) => v,
    };

    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let mut pairs = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                let key = urlencoding::encode(key);
                match value {
                    Value::Array(items) => {
                        for item in items {
                            pairs.push(format!("{key}={}", encode_value(item)));
                        }
                    }
                    Value::Null => pairs.push(format!("{key}=")),
                    other => pairs.push(format!("{key}={}", encode_value(other))),
                }
            }
            pairs.join("&")
        }
        other => encode_value(other),
    }
}

/// Percent-encodes a single value in its literal form: strings unquoted,
/// everything else in compact JSON rendering.
fn encode_value(value: &Value) -> String {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    urlencoding::encode(&raw).into_owned()
}
