use serde_json::json;

use quire::model::find_node;
use quire::{Document, DocumentError};

use crate::common::{init_tracing, CONTRACT, INVOICE};

#[test]
fn test_contract_settings_and_heading_title() {
    init_tracing();
    let doc = Document::from_source(CONTRACT).unwrap();
    let settings = doc.settings();

    assert_eq!(settings.version.as_deref(), Some("1.0.0"));
    assert_eq!(settings.lang.as_deref(), Some("en-US"));
    assert_eq!(settings.title.as_deref(), Some("Service Contract 2024"));
    assert_eq!(settings.time_zone, None);
    assert_eq!(settings.line_height, None);
    assert_eq!(settings.modules, vec!["put"]);
}

#[test]
fn test_invoice_settings() {
    let doc = Document::from_source(INVOICE).unwrap();
    let settings = doc.settings();

    assert_eq!(settings.title.as_deref(), Some("Invoice"));
    assert_eq!(settings.time_zone.as_deref(), Some("Europe/Madrid"));
    assert_eq!(settings.line_height, Some(1.4));
    assert_eq!(settings.modules, vec!["put", "cond"]);
    assert_eq!(doc.modules(), ["put", "cond"]);
}

#[test]
fn test_invalid_line_height_rejects_template() {
    let err = Document::from_source(r#"{# @lineHeight "wide" #}"#).unwrap_err();
    assert!(matches!(err, DocumentError::InvalidSetting { .. }));
}

#[test]
fn test_options_attach_to_fields_and_model() {
    let doc = Document::from_source(INVOICE).unwrap();
    assert_eq!(doc.options().len(), 2);

    let kind = doc
        .fields()
        .iter()
        .find(|f| f.name == "data.client.kind")
        .unwrap();
    let names: Vec<&str> = kind
        .options
        .as_ref()
        .unwrap()
        .iter()
        .map(|o| o.name.as_str())
        .collect();
    assert_eq!(names, vec!["company", "person"]);

    let node = find_node(doc.model(), "data.client.kind").unwrap();
    assert_eq!(node.options.as_ref().map(Vec::len), Some(2));
}

#[test]
fn test_invoice_validation() {
    init_tracing();
    let doc = Document::from_source(INVOICE).unwrap();

    let errors = doc.validate(&json!({})).unwrap();
    let failing: Vec<&str> = errors.iter().map(|e| e.field_name.as_str()).collect();
    assert_eq!(failing, vec!["data.client", "data.total"]);

    let valid = json!({
        "data": {
            "client": { "name": "Acme", "kind": "company" },
            "issued": "2024-05-01",
            "lines": [],
            "total": 1200
        }
    });
    assert!(doc.validate(&valid).unwrap().is_empty());

    let invalid = json!({
        "data": {
            "client": { "name": "A" },
            "issued": "2019-12-31",
            "total": 200000
        }
    });
    let errors = doc.validate(&invalid).unwrap();
    let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "'data.client.name' field value is shorter than the range ('A' is passed, the minimum is 2)",
            "'data.issued' field value is less than the range ('2019-12-31' is passed, the minimum is '2020-01-01')",
            "'data.total' field value is greater than the range (200000 is passed, the maximum is 100000)",
        ]
    );
}

#[test]
fn test_invoice_render_uses_both_modules() {
    let doc = Document::from_source(INVOICE).unwrap();
    let html = doc
        .render(&json!({
            "data": {
                "client": { "name": "Acme", "kind": "LegalEntity" },
                "issued": "2024-05-01",
                "lines": [
                    { "description": "Hosting", "amount": 100 },
                    { "description": "Support", "amount": 50 }
                ],
                "total": 150
            }
        }))
        .unwrap();

    assert!(html.contains(r#"<p class="LegalEntity">Acme</p>"#));
    assert!(!html.contains("Large order"));
    assert!(html.contains("<p>Hosting: 100</p>"));
    assert!(html.contains("<p>Support: 50</p>"));
    assert!(html.contains("<p>150</p>"));
}
