//! Codec configuration.
//!
//! ```toml
//! naming = "camel_case"
//! pretty = true
//! allow_empty_relations = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HalError, Result};
use crate::naming::NamingPolicy;

/// Settings shared by the encoder and decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HalConfig {
    /// Naming convention applied to keys on encode.
    pub naming: NamingPolicy,
    /// Indent the encoded output.
    pub pretty: bool,
    /// Accept `[]` as a relation value when decoding.
    pub allow_empty_relations: bool,
}

impl Default for HalConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HalConfig {
    /// Identity naming, compact output, empty relation arrays accepted.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            naming: NamingPolicy::Identity,
            pretty: false,
            allow_empty_relations: true,
        }
    }

    /// camelCase keys, compact output. Matches what most web APIs expect.
    #[must_use]
    pub fn web() -> Self {
        Self {
            naming: NamingPolicy::CamelCase,
            ..Self::default()
        }
    }

    /// Parse a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Config`] if the TOML is invalid or has unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| HalError::Config(e.to_string()))
    }

    /// Load a config from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Io`] if the file cannot be read and
    /// [`HalError::Config`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), ?config, "loaded codec config");
        Ok(config)
    }
}
