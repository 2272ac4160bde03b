use super::segment::parse_segment;
use crate::model::{Group, Row};
use serde_json::{Map, Value};

/// Synthesizes a blank row modelled on an existing element of a repeat container.
///
/// A PageList uses its first element, a PageGroup its first entry. Scalars become `""`,
/// nested lists are cut down to a single (blanked) element and nested pages are blanked
/// recursively. An empty or non-container input yields `{}`.
pub fn blank_row_template(container: &Value) -> Value {
    let model = match container {
        Value::Array(rows) => rows.first(),
        Value::Object(entries) => entries.values().next(),
        _ => None,
    };
    model.map_or_else(empty_row, blank_value)
}

fn empty_row() -> Value {
    Value::Object(Map::new())
}

fn blank_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, child)| (key.clone(), blank_value(child)))
                .collect(),
        ),
        Value::Array(rows) => Value::Array(rows.first().map(blank_value).into_iter().collect()),
        _ => Value::String(String::new()),
    }
}

/// Appends a blank row to a PageList.
pub fn push_blank_row(rows: &mut Vec<Value>) {
    let template = rows.first().map_or_else(empty_row, blank_value);
    rows.push(template);
}

/// Removes the last row of a PageList unless it is the only one. Returns whether a row
/// was removed.
pub fn pop_row(rows: &mut Vec<Value>) -> bool {
    if rows.len() > 1 {
        rows.pop();
        true
    } else {
        false
    }
}

/// Adds a blank entry under `key` to a PageGroup. Existing entries are never replaced;
/// returns `false` when `key` is already present.
pub fn insert_blank_entry(entries: &mut Map<String, Value>, key: &str) -> bool {
    if entries.contains_key(key) {
        return false;
    }
    let template = entries.values().next().map_or_else(empty_row, blank_value);
    entries.insert(key.to_string(), template);
    true
}

/// Removes the entry under `key` from a PageGroup. Returns whether it existed.
pub fn remove_entry(entries: &mut Map<String, Value>, key: &str) -> bool {
    entries.remove(key).is_some()
}

/// Finds the PageGroup key a grid row belongs to.
///
/// The first field in the row with a reference decides: its deepest repeat segment
/// supplies the key, so `Accounts(Primary).Owners(Main).Name` yields `Main`.
pub fn page_group_key_from_row(row: &Row) -> Option<&str> {
    row.groups
        .iter()
        .filter_map(|group| match group {
            Group::Field(field) if field.is_bound() => Some(field.reference.as_str()),
            _ => None,
        })
        .find_map(deepest_subscript)
}

fn deepest_subscript(reference: &str) -> Option<&str> {
    reference.rsplit('.').find_map(|part| {
        let segment = parse_segment(reference, part).ok()?;
        if !segment.is_repeat() {
            return None;
        }
        let open = part.find('(')?;
        part.get(open + 1..part.len() - 1)
    })
}
