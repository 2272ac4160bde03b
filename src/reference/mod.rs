//! Conversion between the flat reference keyspace used for edit tracking and the
//! nested document shape the case-management API accepts.
//!
//! A reference such as `pyWorkPage.Address(1).Street` addresses the first element of
//! the `Address` PageList; `Accounts(Primary).Balance` addresses the `Primary` entry
//! of the `Accounts` PageGroup. The root-page marker never reaches the document.

use crate::config::FormConfig;
use crate::error::ReferenceError;
use ahash::AHashMap;
use serde_json::Value;

mod document;
mod initial;
mod repeat;
pub mod segment;

pub use document::flatten_document;
pub use initial::extract_initial_values;
pub use repeat::{
    blank_row_template, insert_blank_entry, page_group_key_from_row, pop_row, push_blank_row,
    remove_entry,
};
pub use segment::{ParsedReference, Segment};

/// Flat edit state: fully qualified reference to scalar value.
pub type EditState = AHashMap<String, Value>;

/// Strips one leading `.` from a relative reference (`.Address.City` -> `Address.City`).
pub fn expand_relative_path(path: &str) -> &str {
    path.strip_prefix('.').unwrap_or(path)
}

/// Translates references against a configured root-page marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTranslator {
    root_page: String,
    max_list_index: usize,
}

impl Default for ReferenceTranslator {
    fn default() -> Self {
        Self::from_config(&FormConfig::default())
    }
}

impl ReferenceTranslator {
    pub fn new(root_page: impl Into<String>) -> Self {
        Self {
            root_page: root_page.into(),
            max_list_index: FormConfig::default().max_list_index,
        }
    }

    pub fn from_config(config: &FormConfig) -> Self {
        Self {
            root_page: config.root_page.clone(),
            max_list_index: config.max_list_index,
        }
    }

    /// Caps the one-based PageList position a reference may address.
    pub fn with_max_list_index(mut self, max_list_index: usize) -> Self {
        self.max_list_index = max_list_index;
        self
    }

    pub fn root_page(&self) -> &str {
        &self.root_page
    }

    /// Parses a reference, dropping root-page markers from its container segments.
    ///
    /// PageList positions above the configured maximum are rejected before anything
    /// is allocated for them.
    pub fn parse<'r>(&self, reference: &'r str) -> Result<ParsedReference<'r>, ReferenceError> {
        let parsed = segment::parse_reference(reference, &self.root_page)?;
        let oversized = parsed
            .containers
            .iter()
            .chain(std::iter::once(&parsed.leaf))
            .find(|segment| {
                matches!(segment, Segment::ListItem { index, .. } if *index >= self.max_list_index)
            });
        if let Some(segment) = oversized {
            return Err(ReferenceError::InvalidIndex {
                reference: reference.to_string(),
                segment: segment.to_string(),
            });
        }
        Ok(parsed)
    }
}
