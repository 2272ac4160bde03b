use crate::error::TransportError;
use crate::model::View;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Credentials for one signed-in user, passed explicitly to every transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    user: String,
    token: Option<String>,
}

impl SessionContext {
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            token: Some(token.into()),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// The bearer token, or `Unauthenticated` once the session has ended.
    pub fn token(&self) -> Result<&str, TransportError> {
        self.token.as_deref().ok_or(TransportError::Unauthenticated)
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }

    /// Tears the session down. Every later call through it fails with `Unauthenticated`.
    pub fn end(&mut self) {
        self.token = None;
    }
}

/// Body of every write to the case-management API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub content: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub case_id: String,
    pub assignment_id: String,
    pub action_id: String,
    pub payload: SubmissionPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub case_id: String,
    pub assignment_id: String,
    pub action_id: String,
    pub payload: SubmissionPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub case_id: String,
    /// Concurrency token of the case, when the server supplied one.
    pub etag: Option<String>,
    pub payload: SubmissionPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaseRequest {
    pub case_type_id: String,
    pub payload: SubmissionPayload,
}

/// What the server reports after an action was performed on an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default, rename = "nextAssignmentID")]
    pub next_assignment_id: Option<String>,
    #[serde(default, rename = "nextActionID")]
    pub next_action_id: Option<String>,
    #[serde(default, rename = "nextPageID")]
    pub next_page_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateCaseResponse {
    #[serde(rename = "ID")]
    pub case_id: String,
    #[serde(default, rename = "nextAssignmentID")]
    pub next_assignment_id: Option<String>,
    #[serde(default, rename = "nextPageID")]
    pub next_page_id: Option<String>,
}

/// The request-dispatch collaborator. Implementations own HTTP, retries and auth
/// headers; the form controller only sees typed requests and results.
#[allow(async_fn_in_trait)]
pub trait CaseTransport {
    /// Loads the view for `action_id` on an assignment.
    async fn fetch_action_view(
        &self,
        session: &SessionContext,
        assignment_id: &str,
        action_id: &str,
    ) -> Result<View, TransportError>;

    /// Posts the current content and returns the re-evaluated view.
    async fn refresh(
        &self,
        session: &SessionContext,
        request: &RefreshRequest,
    ) -> Result<View, TransportError>;

    async fn perform_action(
        &self,
        session: &SessionContext,
        request: &SubmitRequest,
    ) -> Result<SubmitResponse, TransportError>;

    async fn update_case(
        &self,
        session: &SessionContext,
        request: &SaveRequest,
    ) -> Result<(), TransportError>;

    async fn create_case(
        &self,
        session: &SessionContext,
        request: &CreateCaseRequest,
    ) -> Result<CreateCaseResponse, TransportError>;
}
