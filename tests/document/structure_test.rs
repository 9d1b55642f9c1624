use quire::model::LoopStage;
use quire::{Document, DocumentConfig, DocumentError, ModelError};

use crate::common::{init_tracing, CONTRACT, INVOICE};

fn config(max_depth: usize, strict: bool) -> DocumentConfig {
    DocumentConfig {
        max_depth,
        strict_directives: strict,
        ..Default::default()
    }
}

#[test]
fn test_depth_bound_rejects_template() {
    init_tracing();
    let err = Document::new(config(1, true), CONTRACT).unwrap_err();
    assert!(err.is_structural_limit());
    assert!(matches!(
        err,
        DocumentError::Model(ModelError::PotentialLoop {
            stage: LoopStage::Trie,
            max_depth: 1
        })
    ));

    assert!(Document::new(config(2, true), CONTRACT).is_err());
    assert!(Document::new(config(3, true), CONTRACT).is_ok());
}

#[test]
fn test_loop_locals_are_not_data_paths() {
    let doc = Document::from_source(INVOICE).unwrap();
    assert!(doc.paths().iter().any(|p| p == "data.lines"));
    assert!(!doc.paths().iter().any(|p| p.starts_with("line")));
    assert!(doc.trie().find("line").is_none());
}

#[test]
fn test_subscripts_and_reserved_paths() {
    let source = "{{ data.items[0].title }}{% set local = 1 %}{{ local }}{{ loop_free }}";
    let doc = Document::from_source(source).unwrap();
    assert_eq!(doc.paths(), ["data.items.title", "loop_free"]);
}

#[test]
fn test_dotted_indexes_share_a_node() {
    let doc = Document::from_source("{{ data.rows.0.x }}{{ data.rows[1].x }}").unwrap();
    assert_eq!(doc.paths(), ["data.rows.x"]);
    assert_eq!(doc.model().len(), 1);
}

#[test]
fn test_directives_at_template_start() {
    let source = "{# @field \"data.a\" required #}\n{# @field \"data.b\" #}\n{{ data.a }}{{ data.b }}";
    let doc = Document::from_source(source).unwrap();
    let names: Vec<&str> = doc.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["data.a", "data.b"]);

    let errors = doc.validate(&serde_json::json!({})).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field_name, "data.a");

    assert!(Document::from_source("{# @field #}<p></p>").is_err());
}

#[test]
fn test_strict_and_lenient_directives() {
    let source = r#"{# @field #}{# @field "data.ok" label="Ok" #}{{ data.ok }}"#;

    let err = Document::new(config(10, true), source).unwrap_err();
    assert!(matches!(
        err,
        DocumentError::Model(ModelError::MalformedDirective { .. })
    ));

    let doc = Document::new(config(10, false), source).unwrap();
    assert_eq!(doc.fields().len(), 1);
    assert_eq!(doc.fields()[0].name, "data.ok");
}

#[test]
fn test_plain_comments_are_ignored() {
    let source = "{# reviewer note: keep this short #}{{ data.note }}";
    let doc = Document::from_source(source).unwrap();
    assert!(doc.directives().is_empty());
    assert_eq!(doc.model().len(), 1);
}

#[test]
fn test_reload_discards_previous_model() {
    init_tracing();
    let mut doc = Document::from_source(INVOICE).unwrap();
    assert_eq!(doc.options().len(), 2);

    doc.set_template(CONTRACT).unwrap();
    assert_eq!(doc.fields().len(), 2);
    assert!(doc.options().is_empty());
    assert_eq!(doc.settings().title.as_deref(), Some("Service Contract 2024"));
    assert_eq!(doc.modules(), ["put"]);
    assert!(doc.trie().find("data.client").is_none());

    // A failed reload leaves the contract model in place.
    assert!(doc.set_template("{% if %}").is_err());
    assert_eq!(doc.fields()[0].name, "data.user.age");
}

#[test]
fn test_duplicate_field_last_declaration_wins() {
    let source = r#"{# @field "data.x" label="First" #}{# @field "data.x" label="Second" required #}{{ data.x }}"#;
    let doc = Document::from_source(source).unwrap();
    assert_eq!(doc.fields().len(), 2);

    let node = &doc.model()[0].children[0];
    assert_eq!(node.label.as_deref(), Some("Second"));
    assert!(node.is_required);
}
