//! Config file discovery and loading for `quire.toml`.

use std::path::Path;

use super::DocumentConfig;
use crate::error::{DocumentError, DocumentResult};

pub(crate) const CONFIG_FILENAME: &str = "quire.toml";

impl DocumentConfig {
    /// Load `quire.toml` from a template directory.
    pub fn load(dir: &Path) -> DocumentResult<Self> {
        let path = dir.join(CONFIG_FILENAME);
        let contents = std::fs::read_to_string(&path).map_err(|source| DocumentError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(?path, max_depth = config.max_depth, "Loaded document config");
        Ok(config)
    }

    /// Load `quire.toml` when present, otherwise return defaults.
    ///
    /// A config file that exists but is unreadable or invalid is an error.
    pub fn load_or_default(dir: &Path) -> DocumentResult<Self> {
        if dir.join(CONFIG_FILENAME).is_file() {
            Self::load(dir)
        } else {
            tracing::debug!(?dir, "No document config found, using defaults");
            Ok(Self::default())
        }
    }
}
