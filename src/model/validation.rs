use crate::reference::expand_relative_path;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Server-side validation payload, `{ValidationMessages: [{Path?, ValidationMessage}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidationPayload {
    #[serde(default)]
    pub validation_messages: Vec<ValidationMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidationMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub validation_message: String,
}

/// Validation messages keyed by fully qualified reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    by_reference: AHashMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the map from a server payload. Messages without a path are not field-bound
    /// and are skipped; relative paths are expanded before storage.
    pub fn from_payload(payload: &ValidationPayload) -> Self {
        let mut errors = Self::new();
        errors.merge(payload);
        errors
    }

    pub fn merge(&mut self, payload: &ValidationPayload) {
        for message in &payload.validation_messages {
            if let Some(path) = message.path.as_deref().filter(|p| !p.is_empty()) {
                self.by_reference.insert(
                    expand_relative_path(path).to_string(),
                    message.validation_message.clone(),
                );
            }
        }
    }

    pub fn insert(&mut self, reference: impl Into<String>, message: impl Into<String>) {
        self.by_reference.insert(reference.into(), message.into());
    }

    pub fn get(&self, reference: &str) -> Option<&str> {
        self.by_reference.get(reference).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.by_reference.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.by_reference.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_reference.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_reference
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
