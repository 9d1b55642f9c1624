//! # Model Error Types
//!
//! Failures raised while turning a template into a metadata model. Data
//! validation failures are not errors; see [`crate::validation`].

use std::fmt;

use thiserror::Error;

/// Model construction result type
pub type ModelResult<T> = Result<T, ModelError>;

/// Recursive stage that exhausted its depth bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStage {
    Trie,
    Metadata,
    Validation,
}

impl fmt::Display for LoopStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            LoopStage::Trie => "trie",
            LoopStage::Metadata => "metadata",
            LoopStage::Validation => "validation",
        };
        f.write_str(stage)
    }
}

/// Errors raised by extraction, field compilation and depth-bounded walks.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to parse template: {source}")]
    Template {
        #[source]
        source: tera::Error,
    },

    #[error("malformed directive: '{directive}'")]
    MalformedDirective { directive: String },

    #[error("bad directive token '{token}' in '{directive}'")]
    BadToken { token: String, directive: String },

    #[error("unable to compile field: the name param is not set in '{directive}'")]
    MissingFieldName { directive: String },

    #[error("unable to compile field option: the name param is not set")]
    MissingOptionName,

    #[error("unable to compile field option '{option}': the 'for' param is not set")]
    MissingOptionTarget { option: String },

    #[error("potential loop while building {stage}: the model is deeper than {max_depth} levels")]
    PotentialLoop { stage: LoopStage, max_depth: usize },
}

impl ModelError {
    /// Create a potential-loop error for the given stage
    pub fn potential_loop(stage: LoopStage, max_depth: usize) -> Self {
        Self::PotentialLoop { stage, max_depth }
    }

    /// Whether this error means the configured depth bound was exhausted.
    ///
    /// These are configuration problems: raise the bound instead of retrying.
    #[must_use]
    pub fn is_structural_limit(&self) -> bool {
        matches!(self, ModelError::PotentialLoop { .. })
    }

    /// Whether this error came from malformed directive text.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            ModelError::MalformedDirective { .. }
                | ModelError::BadToken { .. }
                | ModelError::MissingFieldName { .. }
                | ModelError::MissingOptionName
                | ModelError::MissingOptionTarget { .. }
        )
    }
}
