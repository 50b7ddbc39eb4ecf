use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error")]
    TomlParse(#[source] Box<toml::de::Error>),
}

/// Saga-wide settings.
///
/// Format:
/// ```toml
/// name = "checkout"
///
/// [report]
/// indent = 2
/// show-steps = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SagaConfig {
    /// Name attached to the tracing span of every run.
    pub name: String,
    pub report: ReportConfig,
}

impl Default for SagaConfig {
    fn default() -> Self {
        Self {
            name: String::from("saga"),
            report: ReportConfig::default(),
        }
    }
}

impl SagaConfig {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a config from TOML. Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid TOML or a key has the
    /// wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::TomlParse(Box::new(err)))
    }
}

/// Rendering options for [`crate::SagaReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReportConfig {
    /// Spaces before each trace line.
    pub indent: usize,
    /// Whether the report lists every step's call signature.
    pub show_steps: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            indent: 4,
            show_steps: true,
        }
    }
}
