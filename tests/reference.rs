//! Tests for the flat-to-nested reference translation and repeat container helpers.
mod common;
use common::*;
use serde_json::{Value, json};
use yoshiki::error::ReferenceError;
use yoshiki::model::RepeatKind;
use yoshiki::prelude::*;
use yoshiki::reference::{
    blank_row_template, insert_blank_entry, page_group_key_from_row, pop_row, push_blank_row,
};

fn state(entries: &[(&str, Value)]) -> EditState {
    entries
        .iter()
        .map(|(reference, value)| (reference.to_string(), value.clone()))
        .collect()
}

#[test]
fn test_page_group_entry_nests_under_its_key() {
    let values = state(&[("Accounts(Primary).Balance", json!(100))]);
    let document = ReferenceTranslator::default()
        .to_nested_document(&values)
        .unwrap();
    assert_eq!(document, json!({"Accounts": {"Primary": {"Balance": 100}}}));
}

#[test]
fn test_page_list_entries_become_an_ordered_array() {
    let values = state(&[
        ("Addresses(2).Street", json!("High St")),
        ("Addresses(1).Street", json!("Main St")),
        ("Addresses(1).Zip", json!("N1")),
    ]);
    let document = ReferenceTranslator::default()
        .to_nested_document(&values)
        .unwrap();
    assert_eq!(
        document,
        json!({"Addresses": [
            {"Street": "Main St", "Zip": "N1"},
            {"Street": "High St"}
        ]})
    );
}

#[test]
fn test_missing_list_positions_are_padded_with_empty_pages() {
    let values = state(&[("Addresses(3).Street", json!("Side St"))]);
    let document = ReferenceTranslator::default()
        .to_nested_document(&values)
        .unwrap();
    assert_eq!(document, json!({"Addresses": [{}, {}, {"Street": "Side St"}]}));
}

#[test]
fn test_root_page_marker_never_reaches_the_document() {
    let values = state(&[
        ("pyWorkPage.Customer.Name", json!("Ada")),
        ("Customer.Age", json!(36)),
    ]);
    let document = ReferenceTranslator::default()
        .to_nested_document(&values)
        .unwrap();
    assert_eq!(document, json!({"Customer": {"Name": "Ada", "Age": 36}}));
}

#[test]
fn test_custom_root_page_marker() {
    let config = FormConfig {
        root_page: "pyPortal".to_string(),
        ..FormConfig::default()
    };
    let translator = ReferenceTranslator::from_config(&config);
    let values = state(&[("pyPortal.Theme", json!("dark"))]);
    assert_eq!(
        translator.to_nested_document(&values).unwrap(),
        json!({"Theme": "dark"})
    );
}

#[test]
fn test_container_wins_over_scalar_regardless_of_order() {
    let values = state(&[
        ("Address", json!("flat")),
        ("Address.City", json!("London")),
    ]);
    let document = ReferenceTranslator::default()
        .to_nested_document(&values)
        .unwrap();
    assert_eq!(document, json!({"Address": {"City": "London"}}));
}

#[test]
fn test_list_and_group_shapes_conflict() {
    let values = state(&[
        ("Items(1).Name", json!("a")),
        ("Items(Main).Name", json!("b")),
    ]);
    let result = ReferenceTranslator::default().to_nested_document(&values);
    assert!(matches!(result, Err(ReferenceError::ShapeConflict { .. })));
}

#[test]
fn test_malformed_references_are_rejected() {
    let translator = ReferenceTranslator::default();
    for reference in ["Address(1.City", "Address..City", "Items(0).Name", "Items().Name"] {
        let values = state(&[(reference, json!("x"))]);
        let result = translator.to_nested_document(&values);
        assert!(
            matches!(
                result,
                Err(ReferenceError::MalformedReference { .. } | ReferenceError::InvalidIndex { .. })
            ),
            "expected '{}' to be rejected, got {:?}",
            reference,
            result
        );
    }
}

#[test]
fn test_flatten_round_trips_lists_and_pages() {
    let values = state(&[
        ("Customer.Name", json!("Ada")),
        ("Addresses(1).Street", json!("Main St")),
        ("Addresses(2).Street", json!("High St")),
    ]);
    let translator = ReferenceTranslator::default();
    let document = translator.to_nested_document(&values).unwrap();
    assert_eq!(flatten_document(&document), values);
}

#[test]
fn test_scalar_list_entries_are_assigned() {
    let values = state(&[
        ("Colors(1)", json!("red")),
        ("Colors(3)", json!("green")),
    ]);
    let document = ReferenceTranslator::default()
        .to_nested_document(&values)
        .unwrap();
    assert_eq!(document, json!({"Colors": ["red", null, "green"]}));
}

#[test]
fn test_scalar_list_survives_flatten_and_nest() {
    let document = json!({"Colors": ["red", "blue"], "Owner": {"Name": "Ada"}});
    let translator = ReferenceTranslator::default();
    let flat = flatten_document(&document);
    assert_eq!(flat.get("Colors(2)"), Some(&json!("blue")));
    assert_eq!(translator.to_nested_document(&flat).unwrap(), document);
}

#[test]
fn test_scalar_lands_in_padding_left_by_a_deeper_reference() {
    let translator = ReferenceTranslator::default();
    let mut document = json!({});
    translator
        .add_entry(&mut document, "Items(2).Name", json!("b"))
        .unwrap();
    translator
        .add_entry(&mut document, "Items(1)", json!("a"))
        .unwrap();
    assert_eq!(document, json!({"Items": ["a", {"Name": "b"}]}));

    // A populated row still wins over a scalar.
    translator
        .add_entry(&mut document, "Items(2)", json!("flat"))
        .unwrap();
    assert_eq!(document, json!({"Items": ["a", {"Name": "b"}]}));
}

#[test]
fn test_oversized_list_positions_allocate_nothing() {
    let config = FormConfig {
        max_list_index: 100,
        ..FormConfig::default()
    };
    let translator = ReferenceTranslator::from_config(&config);
    let mut document = json!({});
    for reference in ["A(5000000).B", "A(4294967296).B", "Tags(101)"] {
        let result = translator.add_entry(&mut document, reference, json!("x"));
        assert!(
            matches!(result, Err(ReferenceError::InvalidIndex { .. })),
            "expected '{}' to be rejected, got {:?}",
            reference,
            result
        );
    }
    assert_eq!(document, json!({}));

    let values = state(&[("A(100).B", json!("last"))]);
    let nested = translator.to_nested_document(&values).unwrap();
    assert_eq!(nested["A"].as_array().map(Vec::len), Some(100));
}

#[test]
fn test_resolve_repeat_container_creates_and_reuses() {
    let translator = ReferenceTranslator::default();
    let mut document = json!({});

    let list = translator
        .resolve_repeat_container("Orders.Lines", RepeatKind::List, &mut document)
        .unwrap();
    assert_eq!(*list, json!([]));
    if let Value::Array(rows) = list {
        rows.push(json!({"Sku": "A-1"}));
    }

    let again = translator
        .resolve_repeat_container("Orders.Lines", RepeatKind::List, &mut document)
        .unwrap();
    assert_eq!(*again, json!([{"Sku": "A-1"}]));
    assert_eq!(document, json!({"Orders": {"Lines": [{"Sku": "A-1"}]}}));
}

#[test]
fn test_resolve_repeat_container_rejects_wrong_shape() {
    let translator = ReferenceTranslator::default();
    let mut document = json!({"Accounts": {"Primary": {}}});
    let result = translator.resolve_repeat_container("Accounts", RepeatKind::List, &mut document);
    assert!(matches!(result, Err(ReferenceError::ShapeConflict { .. })));
}

#[test]
fn test_resolve_repeat_container_requires_a_plain_leaf() {
    let translator = ReferenceTranslator::default();
    let mut document = json!({});
    let result =
        translator.resolve_repeat_container("Accounts(Primary)", RepeatKind::Group, &mut document);
    assert!(matches!(
        result,
        Err(ReferenceError::MalformedReference { .. })
    ));
}

#[test]
fn test_blank_row_keeps_nested_shape() {
    let container = json!([
        {"a": "x", "b": [{"c": "y"}, {"c": "z"}]},
        {"a": "w", "b": []}
    ]);
    assert_eq!(
        blank_row_template(&container),
        json!({"a": "", "b": [{"c": ""}]})
    );
    assert_eq!(blank_row_template(&json!([])), json!({}));
    assert_eq!(blank_row_template(&json!({})), json!({}));
}

#[test]
fn test_page_list_never_loses_its_last_row() {
    let mut rows = vec![json!({"Street": "Main St"})];
    assert!(!pop_row(&mut rows));
    assert_eq!(rows.len(), 1);

    push_blank_row(&mut rows);
    assert_eq!(rows[1], json!({"Street": ""}));
    assert!(pop_row(&mut rows));
    assert_eq!(rows, vec![json!({"Street": "Main St"})]);
}

#[test]
fn test_group_entries_are_never_overwritten() {
    let mut document = json!({"Primary": {"Balance": 100}});
    let Value::Object(entries) = &mut document else {
        unreachable!();
    };
    assert!(!insert_blank_entry(entries, "Primary"));
    assert!(insert_blank_entry(entries, "Savings"));
    assert_eq!(
        document,
        json!({"Primary": {"Balance": 100}, "Savings": {"Balance": ""}})
    );
}

#[test]
fn test_initial_values_come_from_visible_bound_fields() {
    let values = extract_initial_values(&customer_view());
    assert_eq!(values.get("FirstName"), Some(&json!("Ada")));
    assert_eq!(values.get("Addresses(2).Street"), Some(&json!("High St")));
    assert_eq!(values.get("Accounts(Primary).Balance"), Some(&json!(100)));
    // Header labels are unbound and contribute nothing.
    assert!(!values.contains_key(""));
    assert_eq!(values.len(), 7);
}

#[test]
fn test_initial_values_nest_into_the_submission_shape() {
    let values = extract_initial_values(&customer_view());
    let document = ReferenceTranslator::default()
        .to_nested_document(&values)
        .unwrap();
    assert_eq!(document.pointer("/Address/City"), Some(&json!("London")));
    assert_eq!(document.pointer("/Addresses/1/Street"), Some(&json!("High St")));
    assert_eq!(document.pointer("/Accounts/Primary/Balance"), Some(&json!(100)));
}

#[test]
fn test_page_group_key_is_read_from_the_row() {
    let view = customer_view();
    let Group::Layout(layout) = &view.groups[2] else {
        panic!("expected the accounts grid");
    };
    let rows = layout.rows.as_ref().unwrap();
    assert_eq!(page_group_key_from_row(&rows[0]), Some("Primary"));
}
