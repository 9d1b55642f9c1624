use quire::model::find_node;
use quire::Document;

use crate::common::{init_tracing, ORDERING};

fn child_names(doc: &Document, path: &str) -> Vec<String> {
    find_node(doc.model(), path)
        .unwrap()
        .children
        .iter()
        .map(|c| c.name.clone())
        .collect()
}

#[test]
fn test_explicit_order_then_declaration_order() {
    init_tracing();
    let doc = Document::from_source(ORDERING).unwrap();
    assert_eq!(child_names(&doc, "data"), vec!["b", "c", "a", "d"]);
}

#[test]
fn test_fields_keep_declaration_order() {
    let doc = Document::from_source(ORDERING).unwrap();
    let names: Vec<&str> = doc.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["data.a", "data.b", "data.c", "data.d"]);
    assert_eq!(doc.fields()[0].order, Some(2));
    assert_eq!(doc.fields()[3].order, None);
}

#[test]
fn test_undeclared_paths_sort_last() {
    let source = r#"{# @field "data.b" order="5" #}{{ data.z }}{{ data.a }}{{ data.b }}"#;
    let doc = Document::from_source(source).unwrap();
    assert_eq!(child_names(&doc, "data"), vec!["b", "z", "a"]);
}

#[test]
fn test_top_level_nodes_are_sorted() {
    let source = r#"{# @field "first" order="2" #}{# @field "second" order="1" #}{{ first }}{{ second }}"#;
    let doc = Document::from_source(source).unwrap();
    let names: Vec<&str> = doc.model().iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["second", "first"]);
}
