//! Load document templates from disk.

use std::path::Path;

use super::engine::Document;
use crate::config::DocumentConfig;
use crate::error::{DocumentError, DocumentResult};

/// File name of the template inside a template directory.
pub const TEMPLATE_FILENAME: &str = "template.html.tera";

fn read_source(path: &Path) -> DocumentResult<String> {
    std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a single template file with the default config.
pub fn load_template(path: &Path) -> DocumentResult<Document> {
    let source = read_source(path)?;
    tracing::debug!(?path, "Loading template");
    Document::from_source(&source)
}

impl Document {
    /// Load `template.html.tera` from a directory, configured by an optional
    /// `quire.toml` next to it.
    pub fn load_dir(dir: &Path) -> DocumentResult<Self> {
        let config = DocumentConfig::load_or_default(dir)?;
        let path = dir.join(TEMPLATE_FILENAME);
        let source = read_source(&path)?;
        tracing::debug!(?path, max_depth = config.max_depth, "Loading template directory");
        Self::new(config, &source)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_load_template_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.html.tera");
        fs::write(&path, r#"{# @field "data.total" type="number" required #}{{ data.total }}"#)
            .unwrap();

        let doc = load_template(&path).unwrap();
        assert_eq!(doc.fields().len(), 1);
        assert_eq!(doc.fields()[0].name, "data.total");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_template(&dir.path().join("missing.tera")).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }

    #[test]
    fn test_load_dir_with_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(TEMPLATE_FILENAME), "{{ a.b.c }}").unwrap();
        fs::write(dir.path().join("quire.toml"), "max-depth = 2\n").unwrap();

        let err = Document::load_dir(dir.path()).unwrap_err();
        assert!(err.is_structural_limit());
    }

    #[test]
    fn test_load_dir_without_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(TEMPLATE_FILENAME), "{{ a.b.c }}").unwrap();

        let doc = Document::load_dir(dir.path()).unwrap();
        assert_eq!(doc.config().max_depth, 10);
        assert!(doc.trie().find("a.b.c").is_some());
    }
}
