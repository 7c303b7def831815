//! Error handling for shellcomp.
//!
//! Completion itself never fails on malformed input: lexical errors and
//! unresolvable command lines degrade to "no candidates". The types here cover
//! the remaining failures: reading configuration, a broken completion
//! environment, invalid parameter values and I/O while writing output.

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, EnvironmentError, ParameterError, Result, ShellcompError};
