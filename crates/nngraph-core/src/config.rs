//! Graph configuration.
//!
//! Values are layered, later sources overriding earlier ones:
//!
//! 1. built-in defaults,
//! 2. an optional TOML file,
//! 3. environment variables prefixed with `NNGRAPH_` (e.g. `NNGRAPH_MAX_DEGREE=16`).
//!
//! ```toml
//! name = "metagenomes"
//! max_degree = 16
//! ```

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::validate_graph_name;

/// Prefix of environment variables read by [`GraphConfig::load`].
pub const ENV_PREFIX: &str = "NNGRAPH_";

/// Default maximum out-degree.
pub const DEFAULT_MAX_DEGREE: usize = 10;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("Failed to load configuration: {0}")]
    Extraction(#[from] Box<figment::Error>),

    /// The configuration could not be rendered as TOML.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Extraction(Box::new(err))
    }
}

/// Settings fixed for the lifetime of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Display name written on the first line of the text form.
    pub name: String,
    /// Maximum out-degree (k).
    pub max_degree: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            name: "nngraph".to_string(),
            max_degree: DEFAULT_MAX_DEGREE,
        }
    }
}

impl GraphConfig {
    /// Loads defaults, then `path` if given and present, then `NNGRAPH_*` variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source is malformed or the result is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        let config: Self = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the document is malformed or the result is invalid.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Serialize` if a value has no TOML form.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Checks that the configuration describes a usable graph.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a zero degree bound or a name that
    /// cannot be persisted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_degree == 0 {
            return Err(ConfigError::Invalid(
                "max_degree must be at least 1".to_string(),
            ));
        }
        validate_graph_name(&self.name).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
