//! Options and positional arguments

use std::fmt;

use super::types::{Text, ValueType};

/// Shape of a parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// A named option
    Option {
        /// Primary spellings, e.g. `--verbose`, `-v`
        opts: Vec<String>,
        /// Secondary spellings, e.g. the negating `--no-verbose`
        secondary_opts: Vec<String>,
        /// The option is a switch and takes no value
        is_flag: bool,
    },
    /// A positional argument
    Argument {
        /// Accepts every remaining positional value
        variadic: bool,
    },
}

/// A declared parameter of a command
pub struct Param {
    name: String,
    kind: ParamKind,
    help: Option<String>,
    value_type: Box<dyn ValueType>,
}

impl Param {
    /// Create an option that takes a value
    pub fn option<I, S>(name: impl Into<String>, opts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::named(name, opts, false)
    }

    /// Create an option that is a switch
    pub fn flag<I, S>(name: impl Into<String>, opts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::named(name, opts, true)
    }

    /// Create a positional argument
    pub fn argument(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Argument { variadic: false },
            help: None,
            value_type: Box::new(Text),
        }
    }

    fn named<I, S>(name: impl Into<String>, opts: I, is_flag: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: ParamKind::Option {
                opts: opts.into_iter().map(Into::into).collect(),
                secondary_opts: Vec::new(),
                is_flag,
            },
            help: None,
            value_type: Box::new(Text),
        }
    }

    /// Add secondary spellings to an option (ignored for arguments)
    pub fn secondary_opts<I, S>(mut self, spellings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let ParamKind::Option { secondary_opts, .. } = &mut self.kind {
            secondary_opts.extend(spellings.into_iter().map(Into::into));
        }
        self
    }

    /// Make a positional argument consume every remaining value (ignored for options)
    pub fn variadic(mut self) -> Self {
        if let ParamKind::Argument { variadic } = &mut self.kind {
            *variadic = true;
        }
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    /// Set the value type that validates and completes this parameter's values
    pub fn value_type(mut self, value_type: impl ValueType + 'static) -> Self {
        self.value_type = Box::new(value_type);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ParamKind {
        &self.kind
    }

    pub fn get_help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn get_value_type(&self) -> &dyn ValueType {
        self.value_type.as_ref()
    }

    pub fn is_option(&self) -> bool {
        matches!(self.kind, ParamKind::Option { .. })
    }

    pub fn is_argument(&self) -> bool {
        matches!(self.kind, ParamKind::Argument { .. })
    }

    pub fn is_flag(&self) -> bool {
        matches!(self.kind, ParamKind::Option { is_flag: true, .. })
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self.kind, ParamKind::Argument { variadic: true })
    }

    /// Check whether this is an option that expects a value
    pub fn takes_value(&self) -> bool {
        matches!(self.kind, ParamKind::Option { is_flag: false, .. })
    }

    /// Primary spellings (empty for arguments)
    pub fn get_opts(&self) -> &[String] {
        match &self.kind {
            ParamKind::Option { opts, .. } => opts,
            ParamKind::Argument { .. } => &[],
        }
    }

    /// Secondary spellings (empty for arguments)
    pub fn get_secondary_opts(&self) -> &[String] {
        match &self.kind {
            ParamKind::Option { secondary_opts, .. } => secondary_opts,
            ParamKind::Argument { .. } => &[],
        }
    }

    /// Check whether `token` is one of the primary spellings
    pub fn is_primary_spelling(&self, token: &str) -> bool {
        self.get_opts().iter().any(|o| o == token)
    }

    /// Check whether `token` is one of the primary or secondary spellings
    pub fn is_spelling(&self, token: &str) -> bool {
        self.is_primary_spelling(token) || self.get_secondary_opts().iter().any(|o| o == token)
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("help", &self.help)
            .field("value_type", &self.value_type.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Choice;

    #[test]
    fn test_option_spellings() {
        let p = Param::flag("verbose", ["--verbose", "-v"]).secondary_opts(["--no-verbose"]);

        assert!(p.is_option());
        assert!(p.is_flag());
        assert!(!p.takes_value());
        assert!(p.is_primary_spelling("-v"));
        assert!(!p.is_primary_spelling("--no-verbose"));
        assert!(p.is_spelling("--no-verbose"));
        assert!(!p.is_spelling("--quiet"));
    }

    #[test]
    fn test_argument_has_no_spellings() {
        let p = Param::argument("src").variadic().secondary_opts(["--x"]);

        assert!(p.is_argument());
        assert!(p.is_variadic());
        assert!(p.get_opts().is_empty());
        assert!(p.get_secondary_opts().is_empty());
        assert!(!p.takes_value());
    }

    #[test]
    fn test_value_type_defaults_to_text() {
        let p = Param::option("mode", ["--mode"]);
        assert_eq!(p.get_value_type().name(), "text");

        let p = p.value_type(Choice::new(["fast", "slow"]));
        assert_eq!(p.get_value_type().name(), "choice");
        assert!(p.takes_value());
    }
}
