use serde_json::json;

use quire::model::find_node;
use quire::{Document, FieldType, ValidationCode};

use crate::common::{init_tracing, CONTRACT};

#[test]
fn test_fields_in_declaration_order() {
    init_tracing();
    let doc = Document::from_source(CONTRACT).unwrap();

    let fields = doc.fields();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name, "data.user.age");
    assert_eq!(fields[0].field_type, FieldType::Number);
    assert_eq!(fields[0].label.as_deref(), Some("Age"));
    assert!(fields[0].is_required);
    assert_eq!(fields[0].extra.absolute_order, Some(0));

    assert_eq!(fields[1].name, "data.user.name");
    assert_eq!(fields[1].field_type, FieldType::String);
    assert!(!fields[1].is_required);
    assert_eq!(fields[1].extra.absolute_order, Some(1));
}

#[test]
fn test_model_shape() {
    init_tracing();
    let doc = Document::from_source(CONTRACT).unwrap();

    let model = doc.model();
    assert_eq!(model.len(), 1);
    let user = find_node(model, "data.user").unwrap();
    assert_eq!(user.field_type, FieldType::Object);
    assert!(!user.is_required);

    let names: Vec<&str> = user.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["age", "name"]);
    assert_eq!(user.children[0].extra.field_name, "data.user.age");
    assert!(user.children[0].is_required);
}

#[test]
fn test_empty_data_yields_single_required_error() {
    init_tracing();
    let doc = Document::from_source(CONTRACT).unwrap();

    let errors = doc.validate(&json!({})).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ValidationCode::Required);
    assert_eq!(errors[0].field_name, "data.user.age");
    assert_eq!(
        errors[0].message,
        "Field 'data.user.age' is required (undefined is passed)"
    );
}

#[test]
fn test_zero_counts_as_present() {
    let doc = Document::from_source(CONTRACT).unwrap();
    let errors = doc
        .validate(&json!({ "data": { "user": { "age": 0 } } }))
        .unwrap();
    assert!(errors.is_empty());

    let errors = doc
        .validate(&json!({ "data": { "user": { "age": "" } } }))
        .unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "Field 'data.user.age' is required ('' is passed)"
    );
}

#[test]
fn test_instance_data_and_overrides() {
    init_tracing();
    let mut doc = Document::from_source(CONTRACT).unwrap();
    assert!(!doc.is_valid().unwrap());

    doc.set_data(json!({ "data": { "user": { "age": 41, "name": "Ada" } } }));
    assert!(doc.is_valid().unwrap());

    // The override replaces the whole `data` subtree.
    let errors = doc
        .validate_with(&json!({ "data": { "user": { "name": "Grace" } } }))
        .unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field_name, "data.user.age");

    assert!(doc.is_valid_with(&json!({ "meta": 1 })).unwrap());
    assert_eq!(doc.data()["data"]["user"]["name"], "Ada");
}

#[test]
fn test_render_with_put_helper() {
    init_tracing();
    let mut doc = Document::from_source(CONTRACT).unwrap();
    doc.set_data(json!({ "data": { "user": { "age": 41, "name": "Ada & Co" } } }));

    let html = doc.html().unwrap();
    assert!(html.contains(r#"<p><span class="text-blue-500">Ada &amp; Co</span>, 41</p>"#));
    assert!(!html.contains("@field"));

    let html = doc
        .render(&json!({ "data": { "user": { "age": 7, "name": null } } }))
        .unwrap();
    assert!(html.contains(r#"<span class="text-blue-500">Unnamed</span>, 7"#));
}

#[test]
fn test_model_serializes_for_form_ui() {
    let doc = Document::from_source(CONTRACT).unwrap();
    let json = serde_json::to_value(doc.model()).unwrap();

    let age = &json[0]["$"][0]["$"][0];
    assert_eq!(age["name"], "age");
    assert_eq!(age["type"], "number");
    assert_eq!(age["isRequired"], true);
    assert_eq!(age["extra"]["fieldName"], "data.user.age");

    let fields = serde_json::to_value(doc.fields()).unwrap();
    assert_eq!(fields[1]["extra"]["absoluteOrder"], 1);
    assert_eq!(fields[1]["extra"]["macroName"], "field");
}
