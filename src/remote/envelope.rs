use serde_json::Value;

/// Flatten a failure body into one display string.
///
/// A top-level `message` wins. Otherwise `error` may be a string, an array
/// of strings, or an object keyed by field whose values are strings or
/// arrays; all pieces are joined with ", " (object fields in key order).
pub fn flatten_error(body: &Value) -> Option<String> {
    if let Some(message) = non_blank(body.get("message")) {
        return Some(message);
    }

    let mut parts = Vec::new();
    match body.get("error")? {
        Value::String(s) => return non_blank_str(s),
        Value::Array(items) => items.iter().for_each(|v| collect_text(v, &mut parts)),
        Value::Object(fields) => fields.values().for_each(|v| collect_text(v, &mut parts)),
        _ => return None,
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn collect_text(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.trim().is_empty() => out.push(s.clone()),
        Value::Number(n) => out.push(n.to_string()),
        Value::Bool(b) => out.push(b.to_string()),
        Value::Array(items) => items.iter().for_each(|v| collect_text(v, out)),
        _ => {}
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).and_then(non_blank_str)
}

fn non_blank_str(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
