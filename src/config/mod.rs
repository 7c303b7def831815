//! Configuration management for shellcomp
//!
//! Configuration is read from a TOML file, by default
//! `<config dir>/shellcomp/config.toml`. Every field has a default, so the
//! file may be partial or absent.
//!
//! Precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. `SHELLCOMP_LOG` for the log filter
//! 3. Configuration file
//! 4. Default values
//!
//! ```toml
//! [completion]
//! complete_var = "_SHELLCOMP_COMPLETE"
//! case_insensitive = true
//!
//! [logging]
//! level = "debug"
//! timestamps = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::completion::{CaseInsensitivePrefix, Completer};
use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Completion behaviour
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Completion behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Name of the variable carrying the completion instruction
    ///
    /// Defaults to `_<PROG>_COMPLETE` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete_var: Option<String>,

    /// Match candidates ignoring case
    #[serde(default = "default_case_insensitive")]
    pub case_insensitive: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn default_case_insensitive() -> bool {
    false
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            complete_var: None,
            case_insensitive: default_case_insensitive(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// With `None` the default location is used, and a missing file there
    /// yields the defaults. An explicitly given file must exist.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    tracing::debug!("no configuration file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `Option<PathBuf>` - `None` when the platform has no config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shellcomp").join("config.toml"))
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if let Some(var) = &self.completion.complete_var {
            if !is_env_var_name(var) {
                return Err(ConfigError::InvalidValue {
                    field: "completion.complete_var".to_string(),
                    value: var.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Build the completer matching the completion settings
    pub fn completer(&self) -> Completer {
        if self.completion.case_insensitive {
            Completer::new().with_matcher(CaseInsensitivePrefix)
        } else {
            Completer::new()
        }
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Letters, digits and `_`, not starting with a digit
fn is_env_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellcompError;
    use crate::tree::CommandNode;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.completion.complete_var, None);
        assert!(!config.completion.case_insensitive);
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = Config::from_toml("[logging]\nlevel = \"trace\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Trace);
        assert!(!config.logging.timestamps);
        assert_eq!(config.completion, CompletionConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[logging\nlevel = 1").unwrap_err();
        assert!(matches!(err, ShellcompError::Config(ConfigError::InvalidFormat(_))));

        let err = Config::from_toml("[logging]\nlevel = \"loud\"").unwrap_err();
        assert!(matches!(err, ShellcompError::Config(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_validate_complete_var() {
        let mut config = Config::default();
        config.completion.complete_var = Some("_MY_TOOL_COMPLETE".to_string());
        assert!(config.validate().is_ok());

        config.completion.complete_var = Some("1BAD-NAME".to_string());
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid value '1BAD-NAME' for field 'completion.complete_var'"
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.completion.case_insensitive = true;
        config.logging.level = LogLevel::Debug;

        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::load_from_file(Some(Path::new("/nonexistent/shellcomp.toml"))).unwrap_err();
        assert!(matches!(err, ShellcompError::Config(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn test_completer_follows_case_setting() {
        let root = CommandNode::group("x").subcommand(CommandNode::new("Build"));

        let config = Config::default();
        assert_eq!(config.completer().get_choices(&root, "x", &[], "b").count(), 0);

        let mut config = Config::default();
        config.completion.case_insensitive = true;
        assert_eq!(config.completer().get_choices(&root, "x", &[], "b").count(), 1);
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Debug.to_tracing_level(), tracing::Level::DEBUG);
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
    }
}
