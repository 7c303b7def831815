//! Completion candidates

use std::fmt;

/// A value offered for the token under the cursor, with optional help
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Text inserted on the command line
    pub value: String,
    /// Description shown next to the value by shells that support it
    pub help: Option<String>,
}

impl Candidate {
    pub fn new(value: impl Into<String>, help: Option<String>) -> Self {
        Self {
            value: value.into(),
            help,
        }
    }

    /// Help text, treating an empty string like no help at all
    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref().filter(|h| !h.is_empty())
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<&str> for Candidate {
    fn from(value: &str) -> Self {
        Self::new(value, None)
    }
}

impl From<String> for Candidate {
    fn from(value: String) -> Self {
        Self::new(value, None)
    }
}

impl From<(&str, &str)> for Candidate {
    fn from((value, help): (&str, &str)) -> Self {
        Self::new(value, Some(help.to_string()))
    }
}

impl From<(String, String)> for Candidate {
    fn from((value, help): (String, String)) -> Self {
        Self::new(value, Some(help))
    }
}

impl From<(String, Option<String>)> for Candidate {
    fn from((value, help): (String, Option<String>)) -> Self {
        Self::new(value, help)
    }
}

impl From<(&str, Option<&str>)> for Candidate {
    fn from((value, help): (&str, Option<&str>)) -> Self {
        Self::new(value, help.map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Candidate::from("a"), Candidate::new("a", None));
        assert_eq!(Candidate::from(("a", "b")).help.as_deref(), Some("b"));
        assert_eq!(Candidate::from(("a", None::<&str>)).help, None);
        assert_eq!(Candidate::from("a".to_string()).to_string(), "a");
    }

    #[test]
    fn test_empty_help_is_no_help() {
        assert_eq!(Candidate::from(("a", "")).help_text(), None);
        assert_eq!(Candidate::from(("a", "x")).help_text(), Some("x"));
    }
}
