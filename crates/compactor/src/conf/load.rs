//! Load — group registry loading from TOML.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::model::GroupRegistry;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot read group registry {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("group registry is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GroupRegistry {
    /// Parse a registry from TOML text.
    pub fn from_toml(input: &str) -> Result<Self, RegistryError> {
        Ok(toml::from_str(input)?)
    }

    /// Load a registry from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let registry = Self::from_toml(&contents)?;
        tracing::info!(
            path = %path.display(),
            groups = registry.len(),
            "loaded group registry"
        );
        Ok(registry)
    }
}
