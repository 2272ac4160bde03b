use crate::reference::{EditState, expand_relative_path};
use serde_json::Value;

/// Resolves a property expression from an action or control definition.
///
/// * Booleans and numbers are returned as-is.
/// * A string starting with `"` is a literal; every quote character is stripped.
/// * A string starting with `.` is a relative reference; the current edit-state value
///   at the expanded path is returned, or `Null` when nothing is recorded there.
/// * Anything else is returned verbatim.
pub fn resolve_property(property: &Value, values: &EditState) -> Value {
    match property {
        Value::String(text) if text.starts_with('"') => Value::String(text.replace('"', "")),
        Value::String(text) if text.starts_with('.') => values
            .get(expand_relative_path(text))
            .cloned()
            .unwrap_or(Value::Null),
        other => other.clone(),
    }
}

/// Like [`resolve_property`], but renders the result as display text.
pub fn resolve_text(property: &Value, values: &EditState) -> String {
    value_to_text(&resolve_property(property, values))
}

/// Display text of a scalar value. `Null` renders empty, strings without quotes.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
