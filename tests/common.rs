//! Common test utilities: layout fixtures and recording collaborators.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::result::Result;
use yoshiki::controller::{
    AssignmentContext, CreateCaseRequest, CreateCaseResponse, RefreshRequest, SaveRequest,
    SubmitRequest, SubmitResponse,
};
use yoshiki::prelude::*;

/// A customer form: an inline grid of simple fields, a PageList grid of addresses,
/// a PageGroup grid of accounts and a paragraph.
#[allow(dead_code)]
pub const CUSTOMER_VIEW_JSON: &str = r#"{
    "name": "CustomerInfo",
    "visible": true,
    "groups": [
        {"layout": {
            "title": "Customer",
            "groupFormat": "Inline grid double",
            "groups": [
                {"field": {
                    "reference": "FirstName", "value": "Ada", "label": "First name",
                    "required": true, "control": {"type": "pxTextInput"}
                }},
                {"field": {
                    "reference": "Address.City", "value": "London", "label": "City",
                    "control": {
                        "type": "pxTextInput",
                        "actionSets": [{
                            "actions": [
                                {"action": "setValue", "actionProcess": {"setValuePairs": [
                                    {"name": ".Address.Country", "value": "\"UK\""}
                                ]}},
                                {"action": "refresh"}
                            ],
                            "events": [{"event": "change"}]
                        }]
                    }
                }},
                {"field": {
                    "reference": "Subscribed", "value": true, "label": "Subscribed",
                    "control": {"type": "pxCheckbox"}
                }},
                {"field": {
                    "reference": "Secret", "value": "s3cr3t",
                    "control": {"type": "pxHidden"}
                }}
            ]
        }},
        {"layout": {
            "title": "Addresses",
            "groupFormat": "Grid",
            "reference": "Addresses",
            "referenceType": "List",
            "header": {"groups": [
                {"field": {"label": "Street", "control": {"type": "label"}}}
            ]},
            "rows": [
                {"groups": [{"field": {
                    "reference": "Addresses(1).Street", "value": "Main St",
                    "control": {"type": "pxTextInput"}
                }}]},
                {"groups": [{"field": {
                    "reference": "Addresses(2).Street", "value": "High St",
                    "control": {"type": "pxTextInput"}
                }}]}
            ]
        }},
        {"layout": {
            "title": "Accounts",
            "groupFormat": "Grid",
            "reference": "Accounts",
            "referenceType": "Group",
            "header": {"groups": [
                {"field": {"label": "Balance", "control": {"type": "label"}}}
            ]},
            "rows": [
                {"groups": [{"field": {
                    "reference": "Accounts(Primary).Balance", "value": 100,
                    "control": {"type": "pxInteger"}
                }}]}
            ]
        }},
        {"paragraph": {"value": "<p>Please review the details.</p>"}}
    ]
}"#;

/// A form whose only field runs a script and opens a window when clicked.
#[allow(dead_code)]
pub const HELP_VIEW_JSON: &str = r#"{
    "name": "Help",
    "visible": true,
    "groups": [
        {"field": {
            "reference": "Topic", "value": "billing",
            "control": {"type": "pxTextInput"}
        }},
        {"field": {
            "control": {
                "type": "pxButton",
                "label": "\"Help\"",
                "actionSets": [{
                    "actions": [
                        {"action": "runScript", "actionProcess": {
                            "functionName": "showHelp",
                            "functionParameters": [
                                {"name": "topic", "value": ".Topic"},
                                {"name": "tone", "value": "\"friendly\""}
                            ]
                        }},
                        {"action": "openUrlInWindow", "actionProcess": {
                            "urlBase": "\"docs.example.com/help\"",
                            "windowName": "help",
                            "windowOptions": "width=400"
                        }}
                    ],
                    "events": [{"event": "click"}]
                }]
            }
        }}
    ]
}"#;

#[allow(dead_code)]
pub fn load_view(json: &str) -> View {
    View::from_json(json).expect("fixture view should parse")
}

#[allow(dead_code)]
pub fn customer_view() -> View {
    load_view(CUSTOMER_VIEW_JSON)
}

/// A minimal view with a single text field.
#[allow(dead_code)]
pub fn single_field_view(name: &str, reference: &str, value: &str) -> View {
    let json = serde_json::json!({
        "name": name,
        "visible": true,
        "groups": [{"field": {
            "reference": reference,
            "value": value,
            "control": {"type": "pxTextInput"}
        }}]
    });
    serde_json::from_value(json).expect("fixture view should parse")
}

#[allow(dead_code)]
pub fn assignment_context() -> AssignmentContext {
    AssignmentContext {
        case_id: "C-1".to_string(),
        assignment_id: "ASSIGN-1".to_string(),
        action_id: "Collect".to_string(),
        etag: Some("\"20240101\"".to_string()),
    }
}

/// Transport double that replays scripted responses and records every request.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockTransport {
    pub views: Rc<RefCell<VecDeque<Result<View, TransportError>>>>,
    pub refreshes: Rc<RefCell<VecDeque<Result<View, TransportError>>>>,
    pub submits: Rc<RefCell<VecDeque<Result<SubmitResponse, TransportError>>>>,
    pub saves: Rc<RefCell<VecDeque<Result<(), TransportError>>>>,
    pub created: Rc<RefCell<VecDeque<Result<CreateCaseResponse, TransportError>>>>,

    pub fetched: Rc<RefCell<Vec<(String, String)>>>,
    pub refresh_requests: Rc<RefCell<Vec<RefreshRequest>>>,
    pub submit_requests: Rc<RefCell<Vec<SubmitRequest>>>,
    pub save_requests: Rc<RefCell<Vec<SaveRequest>>>,
    pub create_requests: Rc<RefCell<Vec<CreateCaseRequest>>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn push_view(&self, result: Result<View, TransportError>) {
        self.views.borrow_mut().push_back(result);
    }

    pub fn push_refresh(&self, result: Result<View, TransportError>) {
        self.refreshes.borrow_mut().push_back(result);
    }

    pub fn push_submit(&self, result: Result<SubmitResponse, TransportError>) {
        self.submits.borrow_mut().push_back(result);
    }

    pub fn push_create(&self, result: Result<CreateCaseResponse, TransportError>) {
        self.created.borrow_mut().push_back(result);
    }

    pub fn last_refresh_content(&self) -> serde_json::Value {
        self.refresh_requests
            .borrow()
            .last()
            .map(|request| request.payload.content.clone())
            .expect("a refresh should have been sent")
    }
}

fn unscripted<T>() -> Result<T, TransportError> {
    Err(TransportError::Network("no scripted response".to_string()))
}

impl CaseTransport for MockTransport {
    async fn fetch_action_view(
        &self,
        _session: &SessionContext,
        assignment_id: &str,
        action_id: &str,
    ) -> Result<View, TransportError> {
        self.fetched
            .borrow_mut()
            .push((assignment_id.to_string(), action_id.to_string()));
        self.views.borrow_mut().pop_front().unwrap_or_else(unscripted)
    }

    async fn refresh(
        &self,
        _session: &SessionContext,
        request: &RefreshRequest,
    ) -> Result<View, TransportError> {
        self.refresh_requests.borrow_mut().push(request.clone());
        self.refreshes.borrow_mut().pop_front().unwrap_or_else(unscripted)
    }

    async fn perform_action(
        &self,
        _session: &SessionContext,
        request: &SubmitRequest,
    ) -> Result<SubmitResponse, TransportError> {
        self.submit_requests.borrow_mut().push(request.clone());
        self.submits.borrow_mut().pop_front().unwrap_or_else(unscripted)
    }

    async fn update_case(
        &self,
        _session: &SessionContext,
        request: &SaveRequest,
    ) -> Result<(), TransportError> {
        self.save_requests.borrow_mut().push(request.clone());
        self.saves.borrow_mut().pop_front().unwrap_or(Ok(()))
    }

    async fn create_case(
        &self,
        _session: &SessionContext,
        request: &CreateCaseRequest,
    ) -> Result<CreateCaseResponse, TransportError> {
        self.create_requests.borrow_mut().push(request.clone());
        self.created.borrow_mut().pop_front().unwrap_or_else(unscripted)
    }
}

/// Host double that answers prompts from a queue and records everything else.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockHost {
    pub answers: Rc<RefCell<VecDeque<Option<String>>>>,
    pub prompts: Rc<RefCell<Vec<String>>>,
    pub notifications: Rc<RefCell<Vec<Notification>>>,
    pub windows: Rc<RefCell<Vec<(String, String, String)>>>,
}

#[allow(dead_code)]
impl MockHost {
    pub fn answer(&self, answer: Option<&str>) {
        self.answers
            .borrow_mut()
            .push_back(answer.map(str::to_string));
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications
            .borrow()
            .iter()
            .map(|notification| notification.message.clone())
            .collect()
    }
}

impl HostEnvironment for MockHost {
    fn notify(&self, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
    }

    fn prompt(&self, message: &str, _default: &str) -> Option<String> {
        self.prompts.borrow_mut().push(message.to_string());
        self.answers.borrow_mut().pop_front().flatten()
    }

    fn open_window(&self, url: &str, name: &str, options: &str) {
        self.windows
            .borrow_mut()
            .push((url.to_string(), name.to_string(), options.to_string()));
    }
}

#[allow(dead_code)]
pub fn session() -> SessionContext {
    SessionContext::new("operator@example.com", "token-1")
}

/// A controller bound to `view` on the fixture assignment, with handles on its doubles.
#[allow(dead_code)]
pub fn assignment_form(view: View) -> (FormController<MockTransport, MockHost>, MockTransport, MockHost) {
    let transport = MockTransport::default();
    let host = MockHost::default();
    let form = FormController::builder(transport.clone(), host.clone(), session()).build(
        FormSource::Assignment {
            context: assignment_context(),
            view,
        },
    );
    (form, transport, host)
}
