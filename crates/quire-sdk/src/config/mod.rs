//! Document configuration.
//!
//! Controls how templates are analyzed: the recursion bound handed to every
//! model walk, strictness of directive parsing, and default helper modules.

pub(crate) mod loader;

use serde::Deserialize;
use validator::Validate;

use quire_model::DEFAULT_MODEL_DEPTH;

use crate::error::{DocumentError, DocumentResult};

fn default_max_depth() -> usize {
    DEFAULT_MODEL_DEPTH
}

fn default_true() -> bool {
    true
}

/// Per-document analysis settings, usually read from `quire.toml`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct DocumentConfig {
    /// Recursion bound for trie, metadata and validation walks. Default: 10.
    #[serde(default = "default_max_depth")]
    #[validate(range(min = 1, max = 64))]
    pub max_depth: usize,

    /// Abort template load on malformed directives. Default: true.
    #[serde(default = "default_true")]
    pub strict_directives: bool,

    /// Helper modules enabled before any `@use` directive.
    #[serde(default)]
    pub default_modules: Vec<String>,

    /// Take the title from the first `<h1>` when no `@title` is set. Default: true.
    #[serde(default = "default_true")]
    pub title_from_heading: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            strict_directives: true,
            default_modules: Vec::new(),
            title_from_heading: true,
        }
    }
}

impl DocumentConfig {
    /// Parse and validate a TOML config.
    pub fn from_toml_str(contents: &str) -> DocumentResult<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|source| DocumentError::ConfigParse { source })?;
        config.validate()?;
        Ok(config)
    }
}
