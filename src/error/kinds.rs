use std::{fmt, io};

/// Crate-wide `Result` type using [`ShellcompError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, ShellcompError>;

/// Top-level error type for shellcomp operations.
#[derive(Debug)]
pub enum ShellcompError {
    /// Configuration errors.
    Config(ConfigError),

    /// Completion environment errors.
    Environment(EnvironmentError),

    /// Parameter value errors.
    Parameter(ParameterError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    ReadFailed { path: String, reason: String },

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Errors in the environment handed over by the calling shell.
#[derive(Debug)]
pub enum EnvironmentError {
    /// A variable is present but holds a value that cannot be used.
    InvalidValue { variable: String, value: String },
}

/// Errors raised while validating a parameter value.
#[derive(Debug)]
pub enum ParameterError {
    /// The value is not one of the accepted choices.
    InvalidChoice { value: String, choices: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ShellcompError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellcompError::Config(e) => write!(f, "Configuration error: {e}"),
            ShellcompError::Environment(e) => write!(f, "Environment error: {e}"),
            ShellcompError::Parameter(e) => write!(f, "Invalid value: {e}"),
            ShellcompError::Io(e) => write!(f, "I/O error: {e}"),
            ShellcompError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadFailed { path, reason } => {
                write!(f, "Failed to read config file {path}: {reason}")
            }
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for EnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentError::InvalidValue { variable, value } => {
                write!(f, "Invalid value '{value}' in {variable}")
            }
        }
    }
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::InvalidChoice { value, choices } => {
                write!(f, "invalid choice: {value}. {choices}")
            }
        }
    }
}

impl std::error::Error for ShellcompError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for EnvironmentError {}
impl std::error::Error for ParameterError {}

/* ========================= Conversions to ShellcompError ========================= */

impl From<io::Error> for ShellcompError {
    fn from(err: io::Error) -> Self {
        ShellcompError::Io(err)
    }
}

impl From<ConfigError> for ShellcompError {
    fn from(err: ConfigError) -> Self {
        ShellcompError::Config(err)
    }
}

impl From<EnvironmentError> for ShellcompError {
    fn from(err: EnvironmentError) -> Self {
        ShellcompError::Environment(err)
    }
}

impl From<ParameterError> for ShellcompError {
    fn from(err: ParameterError) -> Self {
        ShellcompError::Parameter(err)
    }
}

impl From<toml::de::Error> for ShellcompError {
    fn from(err: toml::de::Error) -> Self {
        ShellcompError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<String> for ShellcompError {
    fn from(msg: String) -> Self {
        ShellcompError::Generic(msg)
    }
}

impl From<&str> for ShellcompError {
    fn from(msg: &str) -> Self {
        ShellcompError::Generic(msg.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_error_display() {
        let err = ParameterError::InvalidChoice {
            value: "zip".to_string(),
            choices: "Choose from\n  tar".to_string(),
        };
        assert_eq!(err.to_string(), "invalid choice: zip. Choose from\n  tar");
    }

    #[test]
    fn test_wrapped_display() {
        let err: ShellcompError = EnvironmentError::InvalidValue {
            variable: "COMP_CWORD".to_string(),
            value: "x".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Environment error: Invalid value 'x' in COMP_CWORD"
        );
    }

    #[test]
    fn test_from_str() {
        let err: ShellcompError = "boom".into();
        assert!(matches!(err, ShellcompError::Generic(ref m) if m == "boom"));
    }
}
