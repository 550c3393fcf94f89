//! Scheduling configuration, loaded from TOML.
//!
//! ```toml
//! validation = "strict"
//! default_duration_hours = 1.0
//! anchor = "session"
//! ```

use crate::calculations::hours_to_duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const CONFIG_ENV_VAR: &str = "NEXFLOW_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How malformed task input is handled when the graph is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Missing or non-positive durations fall back to the default duration and
    /// dangling dependencies become implicit nodes.
    #[default]
    Lenient,
    /// Both cases are rejected as task validation errors.
    Strict,
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(ValidationMode::Lenient),
            "strict" => Ok(ValidationMode::Strict),
            other => Err(format!(
                "invalid validation mode: {other} (expected \"lenient\" or \"strict\")"
            )),
        }
    }
}

/// Which instant root tasks start at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorMode {
    /// Roots start at the time captured for the pass.
    #[default]
    Pass,
    /// Roots start when the session was opened; tasks run late as time passes.
    Session,
}

impl FromStr for AnchorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pass" => Ok(AnchorMode::Pass),
            "session" => Ok(AnchorMode::Session),
            other => Err(format!(
                "invalid anchor mode: {other} (expected \"pass\" or \"session\")"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    pub validation: ValidationMode,
    pub default_duration_hours: f64,
    pub anchor: AnchorMode,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            validation: ValidationMode::Lenient,
            default_duration_hours: 1.0,
            anchor: AnchorMode::Pass,
        }
    }
}

impl ScheduleConfig {
    pub fn strict() -> Self {
        Self {
            validation: ValidationMode::Strict,
            ..Self::default()
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ScheduleConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load from `path`, else from `$NEXFLOW_CONFIG`, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(env_path) if !env_path.is_empty() => Self::load(PathBuf::from(env_path)),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_duration_hours.is_finite() || self.default_duration_hours <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_duration_hours must be a positive number (got {})",
                self.default_duration_hours
            )));
        }
        if hours_to_duration(self.default_duration_hours).is_none() {
            return Err(ConfigError::Invalid(format!(
                "default_duration_hours is too large (got {})",
                self.default_duration_hours
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = ScheduleConfig::from_toml_str("").unwrap();
        assert_eq!(config, ScheduleConfig::default());
    }

    #[test]
    fn parses_all_fields() {
        let config = ScheduleConfig::from_toml_str(
            "validation = \"strict\"\ndefault_duration_hours = 2.5\nanchor = \"session\"\n",
        )
        .unwrap();
        assert_eq!(config.validation, ValidationMode::Strict);
        assert_eq!(config.default_duration_hours, 2.5);
        assert_eq!(config.anchor, AnchorMode::Session);
    }

    #[test]
    fn rejects_non_positive_default_duration() {
        let err = ScheduleConfig::from_toml_str("default_duration_hours = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_oversized_default_duration() {
        let err = ScheduleConfig::from_toml_str("default_duration_hours = 1e300").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = ScheduleConfig::from_toml_str("validaton = \"strict\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn modes_parse_from_str() {
        assert_eq!("Strict".parse::<ValidationMode>(), Ok(ValidationMode::Strict));
        assert_eq!(" session ".parse::<AnchorMode>(), Ok(AnchorMode::Session));
        assert!("sometimes".parse::<ValidationMode>().is_err());
    }
}
