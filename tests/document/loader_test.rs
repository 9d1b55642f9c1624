use std::fs;

use quire::sdk::template_engine::TEMPLATE_FILENAME;
use quire::{load_template, Document, DocumentError};

use crate::common::{fixture_path, init_tracing, ORDERING};

#[test]
fn test_load_fixture_file() {
    init_tracing();
    let doc = load_template(&fixture_path("contract.html.tera")).unwrap();
    assert_eq!(doc.fields().len(), 2);
    assert_eq!(doc.config().max_depth, 10);
}

#[test]
fn test_load_dir_with_lenient_config() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let source = format!("{{# @field #}}\n{ORDERING}");
    fs::write(dir.path().join(TEMPLATE_FILENAME), source).unwrap();
    fs::write(
        dir.path().join("quire.toml"),
        "max-depth = 4\nstrict-directives = false\ndefault-modules = [\"cond\"]\n",
    )
    .unwrap();

    let doc = Document::load_dir(dir.path()).unwrap();
    assert_eq!(doc.config().max_depth, 4);
    assert_eq!(doc.fields().len(), 4);
    assert_eq!(doc.modules(), ["cond"]);
}

#[test]
fn test_load_dir_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(TEMPLATE_FILENAME), ORDERING).unwrap();
    fs::write(dir.path().join("quire.toml"), "max-depth = 0\n").unwrap();

    let err = Document::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, DocumentError::ConfigInvalid(_)));
}

#[test]
fn test_load_dir_without_template() {
    let dir = tempfile::tempdir().unwrap();
    let err = Document::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, DocumentError::Io { path, .. } if path.ends_with(TEMPLATE_FILENAME)));
}
