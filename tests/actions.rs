//! Tests for composing field action bindings into handlers.
use serde_json::{Value, json};
use yoshiki::model::SetValuePair;
use yoshiki::prelude::*;

fn field_with_actions(action_sets: Value) -> Field {
    serde_json::from_value(json!({
        "reference": "Customer.Country",
        "value": "",
        "control": {"type": "pxDropdown", "actionSets": action_sets}
    }))
    .expect("fixture field should parse")
}

fn pair(name: &str, value: &str) -> SetValuePair {
    SetValuePair {
        name: name.to_string(),
        value: json!(value),
    }
}

#[test]
fn test_field_without_actions_is_inert() {
    let handler = ActionResolver::resolve(&field_with_actions(json!([])));
    assert!(handler.is_inert());
    assert_eq!(handler.steps, vec![HandlerStep::PreventDefault]);
}

#[test]
fn test_set_value_is_threaded_into_refresh() {
    let field = field_with_actions(json!([{
        "actions": [
            {"action": "setValue", "actionProcess": {"setValuePairs": [
                {"name": ".Customer.Region", "value": "\"EU\""}
            ]}},
            {"action": "refresh"}
        ],
        "events": [{"event": "change"}]
    }]));

    let handler = ActionResolver::resolve(&field);
    assert_eq!(
        handler.steps,
        vec![
            HandlerStep::PreventDefault,
            HandlerStep::Refresh {
                set_values: vec![pair(".Customer.Region", "\"EU\"")]
            },
        ]
    );
    assert_eq!(handler.events, vec!["change".to_string()]);
}

#[test]
fn test_post_value_and_refresh_send_one_request() {
    let field = field_with_actions(json!([
        {"actions": [{"action": "postValue"}], "events": [{"event": "change"}]},
        {"actions": [
            {"action": "setValue", "actionProcess": {"setValuePairs": [
                {"name": ".A", "value": "\"1\""}
            ]}},
            {"action": "refresh"}
        ], "events": [{"event": "blur"}, {"event": "change"}]}
    ]));

    let handler = ActionResolver::resolve(&field);
    let refreshes: Vec<_> = handler
        .steps
        .iter()
        .filter(|step| step.is_network())
        .collect();
    assert_eq!(refreshes.len(), 1);
    assert_eq!(
        handler.refresh_step(),
        Some(&HandlerStep::Refresh {
            set_values: vec![pair(".A", "\"1\"")]
        })
    );
    assert_eq!(handler.events, vec!["change".to_string(), "blur".to_string()]);
}

#[test]
fn test_set_value_without_refresh_runs_locally() {
    let field = field_with_actions(json!([{
        "actions": [{"action": "setValue", "actionProcess": {"setValuePairs": [
            {"name": ".B", "value": ".Customer.Country"}
        ]}}],
        "events": [{"event": "change"}]
    }]));

    let handler = ActionResolver::resolve(&field);
    assert_eq!(
        handler.steps,
        vec![
            HandlerStep::PreventDefault,
            HandlerStep::SetValue {
                pairs: vec![pair(".B", ".Customer.Country")]
            },
        ]
    );
}

#[test]
fn test_steps_keep_declaration_order() {
    let field = field_with_actions(json!([{
        "actions": [
            {"action": "runScript", "actionProcess": {"functionName": "track"}},
            {"action": "takeAction", "actionProcess": {"actionName": "Review"}},
            {"action": "openUrlInWindow", "actionProcess": {"urlBase": "\"example.com\""}}
        ],
        "events": [{"event": "click"}]
    }]));

    let handler = ActionResolver::resolve(&field);
    assert_eq!(handler.steps.len(), 4);
    assert!(matches!(handler.steps[1], HandlerStep::RunScript { ref function_name, .. } if function_name == "track"));
    assert!(matches!(handler.steps[2], HandlerStep::PerformAction { ref action_name } if action_name == "Review"));
    assert!(matches!(handler.steps[3], HandlerStep::OpenUrl { .. }));
}

#[test]
fn test_unsupported_and_incomplete_actions_are_skipped() {
    let field = field_with_actions(json!([{
        "actions": [
            {"action": "localAction"},
            {"action": "performAction"},
            {"action": "runScript", "actionProcess": {"functionName": "ok"}}
        ],
        "events": [{"event": "click"}]
    }]));

    let handler = ActionResolver::resolve(&field);
    assert_eq!(handler.steps.len(), 2);
    assert!(matches!(handler.steps[1], HandlerStep::RunScript { .. }));
}

#[test]
fn test_property_resolution() {
    let mut values = EditState::new();
    values.insert("Customer.Name".to_string(), json!("Ada"));

    use yoshiki::actions::resolve_property;
    assert_eq!(resolve_property(&json!("\"literal\""), &values), json!("literal"));
    assert_eq!(resolve_property(&json!(".Customer.Name"), &values), json!("Ada"));
    assert_eq!(resolve_property(&json!(".Customer.Age"), &values), Value::Null);
    assert_eq!(resolve_property(&json!(true), &values), json!(true));
    assert_eq!(resolve_property(&json!("Plain"), &values), json!("Plain"));
}
