use super::transport::RefreshRequest;
use crate::model::View;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;

/// An assignment as listed by the API: a unit of work with its available actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "caseID")]
    pub case_id: String,
    #[serde(default)]
    pub actions: Vec<AssignmentAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentAction {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Identifiers a form operates against. The controller is the single owner of the
/// active action id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentContext {
    pub case_id: String,
    pub assignment_id: String,
    pub action_id: String,
    pub etag: Option<String>,
}

/// What a form is bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum FormSource {
    /// The view of an action on an assignment.
    Assignment {
        context: AssignmentContext,
        view: View,
    },
    /// A harness page (e.g. `New` or `Confirm`), optionally tied to a case.
    Page { case_id: Option<String>, page: View },
}

/// A raw edit coming from a control.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Text(String),
    Checked(bool),
    Date(NaiveDate),
    /// A dropdown, radio or autocomplete selection.
    Selection(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatOperation {
    Add,
    Remove,
}

/// How a refresh round trip ended from the form's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The response was applied to the form.
    Applied,
    /// A newer request was issued before this one resolved; its response was discarded.
    Superseded,
    /// The form was closed before the response arrived.
    Disposed,
    /// The user cancelled before anything was sent.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The same assignment continues with another action; its view is loaded.
    ActionChanged { action_id: String },
    /// The case moved on to a different assignment.
    NextAssignment { assignment_id: String },
    /// No further assignment; the case shows `next_page_id`, if any.
    Completed { next_page_id: Option<String> },
}

/// Sequence number attached to an outgoing refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing tickets; only the newest is allowed to apply.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }
}

/// Shared flag telling continuations whether their form is still open.
#[derive(Debug, Clone)]
pub struct LivenessHandle(Rc<Cell<bool>>);

impl LivenessHandle {
    pub(crate) fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    pub(crate) fn dispose(&self) {
        self.0.set(false);
    }
}

/// A refresh that has been built but whose response has not been applied yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRefresh {
    pub ticket: RequestTicket,
    pub request: RefreshRequest,
    /// Repeat container whose loading flag this request holds.
    pub container: Option<String>,
}

impl FieldInput {
    /// Converts the raw edit to the stored value. Dates use `date_format`.
    pub fn into_value(self, date_format: &str) -> Value {
        match self {
            FieldInput::Text(text) | FieldInput::Selection(text) => Value::String(text),
            FieldInput::Checked(checked) => Value::Bool(checked),
            FieldInput::Date(date) => Value::String(date.format(date_format).to_string()),
        }
    }
}
