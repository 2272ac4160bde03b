use crate::model::ValidationPayload;
use thiserror::Error;

/// Errors raised while parsing or walking a fully qualified property reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Reference '{reference}' has a malformed segment '{segment}': {reason}")]
    MalformedReference {
        reference: String,
        segment: String,
        reason: String,
    },

    #[error("Reference '{reference}' uses an invalid list index in segment '{segment}'")]
    InvalidIndex { reference: String, segment: String },

    #[error(
        "Segment '{segment}' of reference '{reference}' conflicts with the shape already present in the document"
    )]
    ShapeConflict { reference: String, segment: String },
}

impl ReferenceError {
    pub(crate) fn malformed(reference: &str, segment: &str, reason: &str) -> Self {
        ReferenceError::MalformedReference {
            reference: reference.to_string(),
            segment: segment.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn conflict(reference: &str, segment: &str) -> Self {
        ReferenceError::ShapeConflict {
            reference: reference.to_string(),
            segment: segment.to_string(),
        }
    }
}

/// Errors that can occur while executing a composed field handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("No script is registered under the name '{0}'")]
    UnregisteredScript(String),

    #[error("Script '{name}' failed: {message}")]
    ScriptFailed { name: String, message: String },

    #[error("Action '{action}' is missing its '{parameter}' parameter")]
    MissingParameter { action: String, parameter: String },
}

/// Failures reported by the case-management transport.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Network failure: {0}")]
    Network(String),

    #[error("Server responded with status {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Server rejected the submitted content ({} validation message(s))", .0.validation_messages.len())]
    Validation(ValidationPayload),

    #[error("The session has ended; sign in again to continue")]
    Unauthenticated,
}

/// Errors produced when decoding layout documents.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Failed to parse layout JSON: {0}")]
    Json(String),

    #[error("A group may carry only one of view, layout, paragraph, caption or field, found {0}")]
    GroupVariant(usize),
}

/// Errors surfaced by a form controller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Assignment '{assignment_id}' does not have any actions configured")]
    NoActions { assignment_id: String },

    #[error("The form has been closed")]
    Disposed,

    #[error("A row operation on '{0}' is already in flight")]
    RepeatBusy(String),

    #[error("Group '{reference}' already contains the key '{key}'")]
    DuplicateGroupKey { reference: String, key: String },

    #[error("A group key for '{0}' must not be empty")]
    EmptyGroupKey(String),

    #[error("The form is not bound to an assignment")]
    NoAssignment,
}
