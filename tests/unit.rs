//! Unit tests for configuration and layout model decoding.
mod common;
use common::*;
use serde_json::json;
use yoshiki::error::ModelError;
use yoshiki::model::{ActionKind, ControlKind, GroupFormat, ListSource, ValidationPayload};
use yoshiki::prelude::*;

#[test]
fn test_config_defaults() {
    let config = FormConfig::default();
    assert_eq!(config.root_page, "pyWorkPage");
    assert_eq!(config.default_url_scheme, "http://");
    assert_eq!(config.date_format, "%Y%m%d");
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = FormConfig::from_json(r#"{"rootPage": "pyPortal"}"#).unwrap();
    assert_eq!(config.root_page, "pyPortal");
    assert_eq!(config.display_date_format, "%m/%d/%Y");
    assert!(matches!(
        FormConfig::from_json("not json"),
        Err(ModelError::Json(_))
    ));
}

#[test]
fn test_group_may_hold_only_one_element() {
    let two = r#"{"name": "V", "groups": [
        {"caption": {"value": "a"}, "paragraph": {"value": "b"}}
    ]}"#;
    assert!(View::from_json(two).is_err());
}

#[test]
fn test_unknown_group_kinds_do_not_reject_the_view() {
    let view = View::from_json(
        r#"{"name": "V", "visible": true, "groups": [
            {"chart": {"series": [1, 2, 3]}},
            {},
            {"field": {"reference": "Name", "value": "Ada", "control": {"type": "pxTextInput"}}}
        ]}"#,
    )
    .unwrap();
    assert_eq!(view.groups[0], Group::Unsupported);
    assert_eq!(view.groups[1], Group::Unsupported);
    assert_eq!(extract_initial_values(&view).len(), 1);

    let tree = LayoutInterpreter::default()
        .render(
            &view,
            &RenderContext::new(
                &extract_initial_values(&view),
                &ValidationErrors::new(),
                &Default::default(),
            ),
        )
        .unwrap();
    assert_eq!(tree.children().len(), 1);
}

#[test]
fn test_null_strings_decode_as_empty() {
    let field: Field = serde_json::from_value(json!({
        "reference": "Notes", "label": null, "validationMessages": null,
        "name": null, "type": null, "control": {"type": "pxTextArea"}
    }))
    .unwrap();
    assert_eq!(field.label, "");
    assert_eq!(field.validation_messages, "");
    assert_eq!(field.data_type, "");

    let view = View::from_json(
        r#"{"name": null, "visible": true, "groups": [
            {"paragraph": {"value": null}},
            {"field": {"reference": null, "value": "x", "control": {"type": "pxTextInput"}}}
        ]}"#,
    )
    .unwrap();
    assert_eq!(view.name, "");
    assert!(extract_initial_values(&view).is_empty());
}

#[test]
fn test_unknown_tags_decode_to_fallbacks() {
    assert_eq!(
        ControlKind::from("pxRichTextEditor"),
        ControlKind::Unsupported("pxRichTextEditor".to_string())
    );
    assert_eq!(
        GroupFormat::from("Carousel"),
        GroupFormat::Unrecognized("Carousel".to_string())
    );
    assert_eq!(ListSource::from("datapage"), ListSource::DataPage);
    assert!(!ActionKind::from("localAction").is_supported());
}

#[test]
fn test_action_aliases() {
    assert_eq!(ActionKind::from("takeAction"), ActionKind::PerformAction);
    assert_eq!(ActionKind::from("performAction"), ActionKind::PerformAction);
    assert_eq!(ActionKind::PerformAction.as_str(), "takeAction");
}

#[test]
fn test_tags_serialize_back_to_wire_form() {
    let field: Field = serde_json::from_value(json!({
        "reference": "A", "control": {"type": "pxTextArea"}
    }))
    .unwrap();
    let encoded = serde_json::to_value(&field).unwrap();
    assert_eq!(encoded["control"]["type"], json!("pxTextArea"));
}

#[test]
fn test_field_defaults() {
    let field: Field = serde_json::from_value(json!({"control": {"type": "pxButton"}})).unwrap();
    assert!(field.visible);
    assert!(!field.is_bound());
    assert!(field.mode().is_none());
}

#[test]
fn test_pages_are_recognised() {
    let page = View::from_json(r#"{"name": "Confirm", "pageID": "Confirm", "visible": false}"#)
        .unwrap();
    assert!(page.is_page());
    assert!(page.contributes_values());
    assert!(customer_view().contributes_values());
}

#[test]
fn test_validation_payload_decodes_pascal_case() {
    let payload: ValidationPayload = serde_json::from_value(json!({
        "ValidationMessages": [
            {"Path": ".Customer.Email", "ValidationMessage": "Invalid email"},
            {"Path": "", "ValidationMessage": "General failure"}
        ]
    }))
    .unwrap();
    let errors = ValidationErrors::from_payload(&payload);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("Customer.Email"), Some("Invalid email"));
}

#[test]
fn test_session_end_is_permanent() {
    let mut session = session();
    assert_eq!(session.token(), Ok("token-1"));
    session.end();
    assert!(!session.is_active());
    assert_eq!(session.token(), Err(TransportError::Unauthenticated));
}
