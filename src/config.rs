use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Tunables shared by the translator, the interpreter and the controller.
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormConfig {
    /// Root-page marker that never appears in a nested document.
    pub root_page: String,
    /// Prefix applied to URLs that do not start with `http`.
    pub default_url_scheme: String,
    /// `chrono` format used when storing date edits.
    pub date_format: String,
    /// `chrono` format used when rendering read-only dates.
    pub display_date_format: String,
    /// Highest one-based PageList position a reference may address.
    pub max_list_index: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            root_page: "pyWorkPage".to_string(),
            default_url_scheme: "http://".to_string(),
            date_format: "%Y%m%d".to_string(),
            display_date_format: "%m/%d/%Y".to_string(),
            max_list_index: 10_000,
        }
    }
}

impl FormConfig {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        serde_json::from_str(json).map_err(|e| ModelError::Json(e.to_string()))
    }
}
