//! # Document Error Types
//!
//! Unified error handling for document loading, configuration and rendering.

use std::path::PathBuf;

use quire_model::ModelError;
use thiserror::Error;

/// Document operation result type
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors raised by the document facade
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("render error: {source}")]
    Render {
        #[source]
        source: tera::Error,
    },

    #[error("unknown helper module: '{name}'")]
    UnknownModule { name: String },

    #[error("invalid value for @{directive}: '{value}'")]
    InvalidSetting { directive: String, value: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {source}")]
    ConfigParse {
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    ConfigInvalid(#[from] validator::ValidationErrors),
}

impl DocumentError {
    /// Create a render error
    pub fn render(source: tera::Error) -> Self {
        Self::Render { source }
    }

    /// Create an invalid setting error
    pub fn invalid_setting(directive: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidSetting {
            directive: directive.into(),
            value: value.into(),
        }
    }

    /// Whether the template's depth exceeded the configured bound
    #[must_use]
    pub fn is_structural_limit(&self) -> bool {
        matches!(self, DocumentError::Model(e) if e.is_structural_limit())
    }
}
