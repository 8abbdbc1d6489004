//! Resolver configuration

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How many issues per field end up in the error map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriteriaMode {
    /// Keep only the first issue reported for each path
    #[default]
    FirstError,
    /// Keep the first message, and also record every issue under `types`
    All,
}

/// Resolver configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub criteria_mode: CriteriaMode,
    /// Return the caller's input values on success instead of the schema's
    /// parsed output
    pub raw: bool,
}

impl ResolverConfig {
    #[must_use]
    pub fn criteria_mode(mut self, mode: CriteriaMode) -> Self {
        self.criteria_mode = mode;
        self
    }

    #[must_use]
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Parse a YAML configuration document
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the document does not parse.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(format!("YAML parse error: {e}")))
    }
}
