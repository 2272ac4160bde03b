use crate::error::ActionError;
use crate::model::{Action, ActionKind, Field, SetValuePair};
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

/// One step of a composed field handler. Steps run in order when the field's trigger fires.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum HandlerStep {
    /// Base step of every handler: suppress the host's default behaviour.
    PreventDefault,
    /// Write the pairs straight into the edit state.
    SetValue { pairs: Vec<SetValuePair> },
    /// Post the current edit state to the server. `set_values` are applied to the
    /// outgoing document only, after it is built from the edit state.
    Refresh { set_values: Vec<SetValuePair> },
    /// Load the view for another action on the same assignment.
    PerformAction { action_name: String },
    /// Call a registered script with arguments resolved at dispatch time.
    RunScript {
        function_name: String,
        parameters: Vec<Value>,
    },
    /// Ask the host to open a URL resolved at dispatch time.
    OpenUrl {
        url_base: Value,
        window_name: String,
        window_options: String,
    },
}

impl HandlerStep {
    /// Whether running this step issues a server round trip.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            HandlerStep::Refresh { .. } | HandlerStep::PerformAction { .. }
        )
    }
}

/// The single handler built from all action bindings of a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedHandler {
    pub steps: Vec<HandlerStep>,
    /// Events named by the contributing action sets, in declaration order.
    pub events: Vec<String>,
}

impl Default for ComposedHandler {
    fn default() -> Self {
        Self {
            steps: vec![HandlerStep::PreventDefault],
            events: Vec::new(),
        }
    }
}

impl ComposedHandler {
    /// `true` when no action contributed a step beyond the base one.
    pub fn is_inert(&self) -> bool {
        self.steps
            .iter()
            .all(|step| matches!(step, HandlerStep::PreventDefault))
    }

    pub fn refresh_step(&self) -> Option<&HandlerStep> {
        self.steps
            .iter()
            .find(|step| matches!(step, HandlerStep::Refresh { .. }))
    }
}

/// Composes a field's declarative action bindings into a [`ComposedHandler`].
///
/// The resolver never touches form state; it only decides which steps run and in
/// which order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionResolver;

impl ActionResolver {
    /// Builds the handler for `field`.
    ///
    /// Supported actions are appended in declaration order after the base
    /// `PreventDefault` step, with two de-duplication rules:
    ///
    /// * Only the first `postValue` or `refresh` contributes a refresh step.
    /// * When the field declares both `refresh` and `setValue`, no separate `SetValue`
    ///   step is emitted; every pair is threaded into the refresh step instead, so the
    ///   outgoing payload carries the values without relying on prior state updates.
    ///
    /// Bindings missing a required parameter are skipped with a warning.
    pub fn resolve(field: &Field) -> ComposedHandler {
        let bound: Vec<(&Action, &[_])> = field
            .control
            .action_sets
            .iter()
            .flat_map(|set| set.actions.iter().map(move |action| (action, set.events.as_slice())))
            .filter(|(action, _)| {
                let supported = action.action.is_supported();
                if !supported {
                    debug!(
                        "Ignoring unsupported action '{}' on '{}'",
                        action.action, field.reference
                    );
                }
                supported
            })
            .collect();

        let has_refresh = bound
            .iter()
            .any(|(action, _)| action.action == ActionKind::Refresh);
        let threaded: Vec<SetValuePair> = bound
            .iter()
            .filter(|(action, _)| action.action == ActionKind::SetValue)
            .flat_map(|(action, _)| action.action_process.set_value_pairs.iter().cloned())
            .collect();
        let thread_into_refresh = has_refresh && !threaded.is_empty();

        let mut handler = ComposedHandler::default();
        let mut has_refresh_step = false;

        for (action, events) in bound {
            let step = match action.action {
                ActionKind::SetValue if thread_into_refresh => None,
                ActionKind::PostValue | ActionKind::Refresh if has_refresh_step => None,
                ActionKind::PostValue | ActionKind::Refresh => {
                    has_refresh_step = true;
                    Some(Ok(HandlerStep::Refresh {
                        set_values: if thread_into_refresh {
                            threaded.clone()
                        } else {
                            Vec::new()
                        },
                    }))
                }
                _ => Some(Self::compose_step(action)),
            };

            match step {
                Some(Ok(step)) => handler.steps.push(step),
                Some(Err(e)) => warn!("Skipping action on '{}': {}", field.reference, e),
                None => {}
            }

            for binding in events {
                if !handler.events.contains(&binding.event) {
                    handler.events.push(binding.event.clone());
                }
            }
        }

        handler
    }

    /// Translates one standalone action into its step.
    pub fn compose_step(action: &Action) -> Result<HandlerStep, ActionError> {
        let process = &action.action_process;
        let missing = |parameter: &str| ActionError::MissingParameter {
            action: action.action.to_string(),
            parameter: parameter.to_string(),
        };

        match &action.action {
            ActionKind::SetValue => Ok(HandlerStep::SetValue {
                pairs: process.set_value_pairs.clone(),
            }),
            ActionKind::PostValue | ActionKind::Refresh => Ok(HandlerStep::Refresh {
                set_values: Vec::new(),
            }),
            ActionKind::PerformAction => process
                .action_name
                .clone()
                .filter(|name| !name.is_empty())
                .map(|action_name| HandlerStep::PerformAction { action_name })
                .ok_or_else(|| missing("actionName")),
            ActionKind::RunScript => process
                .function_name
                .clone()
                .filter(|name| !name.is_empty())
                .map(|function_name| HandlerStep::RunScript {
                    function_name,
                    parameters: process
                        .function_parameters
                        .iter()
                        .map(|param| param.value.clone())
                        .collect(),
                })
                .ok_or_else(|| missing("functionName")),
            ActionKind::OpenUrl => process
                .url_base
                .clone()
                .filter(|url| !url.is_null())
                .map(|url_base| HandlerStep::OpenUrl {
                    url_base,
                    window_name: process.window_name.clone().unwrap_or_default(),
                    window_options: process.window_options.clone().unwrap_or_default(),
                })
                .ok_or_else(|| missing("urlBase")),
            ActionKind::Other(kind) => Err(ActionError::MissingParameter {
                action: kind.clone(),
                parameter: "action".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn action(json: Value) -> Action {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_perform_action_requires_a_name() {
        let err = ActionResolver::compose_step(&action(json!({"action": "takeAction"})));
        assert!(matches!(err, Err(ActionError::MissingParameter { .. })));
    }

    #[test]
    fn test_open_url_defaults_window_fields() {
        let step = ActionResolver::compose_step(&action(json!({
            "action": "openUrlInWindow",
            "actionProcess": {"urlBase": "\"example.com\""}
        })))
        .unwrap();
        assert_eq!(
            step,
            HandlerStep::OpenUrl {
                url_base: json!("\"example.com\""),
                window_name: String::new(),
                window_options: String::new(),
            }
        );
    }
}
