//! Config redaction: safe-to-print config snapshots with secrets masked.

use serde_json::Value;

/// Keys whose string values are always secrets.
static SECRET_KEYS: &[&str] = &["token", "botToken", "bot_token", "secret", "password"];

const MASK: &str = "***";

/// Redact a config JSON value, replacing sensitive fields with `"***"`.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "", &mut Vec::new())
}

/// Paths of the fields [`redact`] would mask.
pub fn collect_redacted_paths(value: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    redact_recursive(value, "", &mut paths);
    paths
}

fn is_sensitive_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_recursive(value: &Value, path: &str, masked: &mut Vec<String>) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                let child = if path.is_empty() { k.clone() } else { format!("{path}.{k}") };
                let redacted = match v {
                    Value::String(s) if is_sensitive_key(k) && !s.is_empty() => {
                        masked.push(child);
                        Value::String(MASK.to_string())
                    }
                    other => redact_recursive(other, &child, masked),
                };
                out.insert(k.clone(), redacted);
            }
            Value::Object(out)
        }
        Value::Array(arr) => Value::Array(
            arr.iter()
                .enumerate()
                .map(|(i, v)| redact_recursive(v, &format!("{path}[{i}]"), masked))
                .collect(),
        ),
        other => other.clone(),
    }
}
