use serde::{Deserialize, Serialize};
use serde_json::Value;

tagged_kind! {
    /// Declarative action kinds a field may bind.
    pub enum ActionKind {
        SetValue => "setValue",
        PostValue => "postValue",
        Refresh => "refresh",
        PerformAction => "takeAction" | "performAction",
        RunScript => "runScript",
        OpenUrl => "openUrlInWindow",
    }
    fallback Other
}

impl ActionKind {
    /// Whether the action resolver composes this kind into a handler.
    pub fn is_supported(&self) -> bool {
        !matches!(self, ActionKind::Other(_))
    }
}

/// A list of actions and the events that fire them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionSet {
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub events: Vec<EventBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBinding {
    pub event: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub action: ActionKind,
    #[serde(default)]
    pub action_process: ActionProcess,
}

/// Kind-specific parameters of an action.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionProcess {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub set_value_pairs: Vec<SetValuePair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub function_parameters: Vec<FunctionParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_base: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_options: Option<String>,
}

/// `name` is a (possibly relative) reference, `value` a property expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetValuePair {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionParameter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: Value,
}
