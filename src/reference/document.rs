use super::segment::Segment;
use super::{EditState, ReferenceTranslator};
use crate::error::ReferenceError;
use crate::model::RepeatKind;
use itertools::Itertools;
use log::debug;
use serde_json::{Map, Value};

impl ReferenceTranslator {
    /// Builds the nested submission document from a flat edit state.
    ///
    /// Keys are applied in sorted order so that errors are reported deterministically.
    /// Where a scalar and a container compete for the same slot the container wins,
    /// which keeps the result independent of key order.
    pub fn to_nested_document(&self, values: &EditState) -> Result<Value, ReferenceError> {
        let mut document = Value::Object(Map::new());
        for (reference, value) in values.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            self.add_entry(&mut document, reference, value.clone())?;
        }
        Ok(document)
    }

    /// Writes a single `reference -> value` entry into `document`, creating any
    /// intermediate pages, PageList elements and PageGroup entries on the way.
    pub fn add_entry(
        &self,
        document: &mut Value,
        reference: &str,
        value: Value,
    ) -> Result<(), ReferenceError> {
        let parsed = self.parse(reference)?;
        let mut node = ensure_object(document);
        for segment in &parsed.containers {
            node = descend(node, segment, reference)?;
        }
        assign(node, &parsed.leaf, value, reference)
    }

    /// Locates the repeat container named by `reference` inside `document`, creating
    /// it (`{}` for a PageGroup, `[]` for a PageList) when absent.
    pub fn resolve_repeat_container<'d>(
        &self,
        reference: &str,
        kind: RepeatKind,
        document: &'d mut Value,
    ) -> Result<&'d mut Value, ReferenceError> {
        let parsed = self.parse(reference)?;
        let Segment::Page(name) = parsed.leaf else {
            return Err(ReferenceError::malformed(
                reference,
                &parsed.leaf.to_string(),
                "a repeat container must be addressed by a plain name",
            ));
        };

        let mut node = ensure_object(document);
        for segment in &parsed.containers {
            node = descend(node, segment, reference)?;
        }

        let map = as_object(node);
        let slot = map.entry(name.to_string()).or_insert(Value::Null);
        match (kind, &*slot) {
            (RepeatKind::Group, Value::Object(_)) | (RepeatKind::List, Value::Array(_)) => {}
            (RepeatKind::Group, Value::Array(_)) | (RepeatKind::List, Value::Object(_)) => {
                return Err(ReferenceError::conflict(reference, name));
            }
            _ => {
                debug!("Initialising {:?} repeat container '{}'", kind, reference);
                *slot = match kind {
                    RepeatKind::Group => Value::Object(Map::new()),
                    RepeatKind::List => Value::Array(Vec::new()),
                };
            }
        }
        Ok(slot)
    }
}

/// Turns `value` into an object if it is not one already and returns it.
fn ensure_object(value: &mut Value) -> &mut Value {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    value
}

/// Borrows the map of a value that is known to be an object.
fn as_object(value: &mut Value) -> &mut Map<String, Value> {
    match ensure_object(value) {
        Value::Object(map) => map,
        _ => unreachable!("ensure_object always yields an object"),
    }
}

/// Steps from `node` into the container addressed by `segment`.
fn descend<'d>(
    node: &'d mut Value,
    segment: &Segment<'_>,
    reference: &str,
) -> Result<&'d mut Value, ReferenceError> {
    let map = as_object(node);
    match *segment {
        Segment::Page(name) => {
            let slot = map
                .entry(name.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if slot.is_array() {
                return Err(ReferenceError::conflict(reference, name));
            }
            Ok(ensure_object(slot))
        }
        Segment::ListItem { name, index } => {
            let rows = list_slot(map, name, reference, segment)?;
            if rows.len() <= index {
                rows.resize_with(index + 1, || Value::Object(Map::new()));
            }
            Ok(ensure_object(&mut rows[index]))
        }
        Segment::GroupEntry { name, key } => {
            let entries = group_slot(map, name, reference, segment)?;
            let entry = entries
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            Ok(ensure_object(entry))
        }
    }
}

/// Writes `value` at the final segment unless a populated container already occupies
/// the slot.
fn assign(
    node: &mut Value,
    leaf: &Segment<'_>,
    value: Value,
    reference: &str,
) -> Result<(), ReferenceError> {
    let map = as_object(node);
    let slot = match *leaf {
        Segment::Page(name) => map.entry(name.to_string()).or_insert(Value::Null),
        Segment::ListItem { name, index } => {
            let rows = list_slot(map, name, reference, leaf)?;
            if rows.len() <= index {
                rows.resize(index + 1, Value::Null);
            }
            &mut rows[index]
        }
        Segment::GroupEntry { name, key } => group_slot(map, name, reference, leaf)?
            .entry(key.to_string())
            .or_insert(Value::Null),
    };

    if occupied_by_container(slot) {
        debug!(
            "Skipping scalar write to '{}': a container already occupies the slot",
            reference
        );
        return Ok(());
    }
    *slot = value;
    Ok(())
}

/// Empty pages are padding left by earlier list writes and may be overwritten.
fn occupied_by_container(slot: &Value) -> bool {
    match slot {
        Value::Object(map) => !map.is_empty(),
        Value::Array(_) => true,
        _ => false,
    }
}

fn list_slot<'d>(
    map: &'d mut Map<String, Value>,
    name: &str,
    reference: &str,
    segment: &Segment<'_>,
) -> Result<&'d mut Vec<Value>, ReferenceError> {
    let slot = map
        .entry(name.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if slot.is_object() {
        return Err(ReferenceError::conflict(reference, &segment.to_string()));
    }
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(rows) => Ok(rows),
        _ => unreachable!("slot was just made an array"),
    }
}

fn group_slot<'d>(
    map: &'d mut Map<String, Value>,
    name: &str,
    reference: &str,
    segment: &Segment<'_>,
) -> Result<&'d mut Map<String, Value>, ReferenceError> {
    let slot = map
        .entry(name.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if slot.is_array() {
        return Err(ReferenceError::conflict(reference, &segment.to_string()));
    }
    Ok(as_object(slot))
}

/// Flattens a nested document back into the reference keyspace.
///
/// Arrays become one-based `name(n)` segments. Nested objects are written as plain
/// pages, so PageGroup entries come back as `Accounts.Primary.Balance`.
pub fn flatten_document(document: &Value) -> EditState {
    let mut values = EditState::new();
    if let Value::Object(map) = document {
        for (key, child) in map {
            flatten_into(key, child, &mut values);
        }
    }
    values
}

fn flatten_into(path: &str, value: &Value, values: &mut EditState) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(&format!("{}.{}", path, key), child, values);
            }
        }
        Value::Array(rows) if !rows.is_empty() => {
            for (index, row) in rows.iter().enumerate() {
                flatten_into(&format!("{}({})", path, index + 1), row, values);
            }
        }
        Value::Object(_) | Value::Array(_) => {}
        scalar => {
            values.insert(path.to_string(), scalar.clone());
        }
    }
}
