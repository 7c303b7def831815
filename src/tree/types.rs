//! Value types: validation and completion of parameter values
//!
//! Completion is part of the [`ValueType`] contract rather than an add-on:
//! every type states explicitly what it offers for a partially typed value,
//! even if that is nothing.

use std::marker::PhantomData;

use super::context::Context;
use crate::completion::Candidate;
use crate::error::ParameterError;

/// Type of a parameter's values
pub trait ValueType: Send + Sync {
    /// Short name of the type, used in diagnostics
    fn name(&self) -> &str;

    /// Offer values for a partially typed `incomplete` token
    fn complete(&self, ctx: &Context<'_>, incomplete: &str) -> Vec<Candidate>;

    /// Validate a value, returning the canonical form
    fn convert(&self, value: &str, _ctx: Option<&Context<'_>>) -> Result<String, ParameterError> {
        Ok(value.to_string())
    }

    /// Placeholder shown for the value in usage lines
    fn metavar(&self) -> Option<String> {
        None
    }
}

/// Free-form text; offers no completions
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

impl ValueType for Text {
    fn name(&self) -> &str {
        "text"
    }

    fn complete(&self, _ctx: &Context<'_>, _incomplete: &str) -> Vec<Candidate> {
        Vec::new()
    }
}

/// One of a fixed set of values
#[derive(Debug, Clone)]
pub struct Choice {
    choices: Vec<String>,
}

impl Choice {
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

impl ValueType for Choice {
    fn name(&self) -> &str {
        "choice"
    }

    fn complete(&self, ctx: &Context<'_>, incomplete: &str) -> Vec<Candidate> {
        self.choices
            .iter()
            .filter(|c| ctx.matches(c, incomplete))
            .map(|c| Candidate::from(c.as_str()))
            .collect()
    }

    fn convert(&self, value: &str, ctx: Option<&Context<'_>>) -> Result<String, ParameterError> {
        if let Some(found) = match_choice(self.choices.iter(), value, ctx) {
            return Ok(found.to_string());
        }
        Err(ParameterError::InvalidChoice {
            value: value.to_string(),
            choices: format!("(choose from {})", self.choices.join(", ")),
        })
    }

    fn metavar(&self) -> Option<String> {
        Some(format!("[{}]", self.choices.join("|")))
    }
}

/// One of a fixed set of values, each with its own help text
///
/// The help text is shown next to each value when completing, and listed in
/// the error raised for an invalid value.
#[derive(Debug, Clone)]
pub struct DocumentedChoice {
    /// Values and their help, in declaration order
    choices: Vec<(String, String)>,
}

impl DocumentedChoice {
    /// Create from `(value, help)` pairs
    ///
    /// A value declared twice keeps its first position and its last help.
    pub fn new<I, K, H>(choices: I) -> Self
    where
        I: IntoIterator<Item = (K, H)>,
        K: Into<String>,
        H: Into<String>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (value, help) in choices {
            let (value, help) = (value.into(), help.into());
            match entries.iter_mut().find(|(v, _)| *v == value) {
                Some(entry) => entry.1 = help,
                None => entries.push((value, help)),
            }
        }
        Self { choices: entries }
    }

    /// Help text of a value, if the value exists
    pub fn help_for(&self, value: &str) -> Option<&str> {
        self.choices
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, h)| h.as_str())
    }

    /// The listing shown when a value is rejected, sorted by value
    pub fn missing_message(&self) -> String {
        let mut sorted: Vec<&(String, String)> = self.choices.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let lines: Vec<String> = sorted
            .into_iter()
            .map(|(value, help)| format!("{value:<12} {help}"))
            .collect();
        format!("Choose from\n  {}", lines.join("\n  "))
    }
}

impl ValueType for DocumentedChoice {
    fn name(&self) -> &str {
        "choice"
    }

    fn complete(&self, ctx: &Context<'_>, incomplete: &str) -> Vec<Candidate> {
        self.choices
            .iter()
            .filter(|(value, _)| ctx.matches(value, incomplete))
            .map(|(value, help)| {
                let help = (!help.is_empty()).then(|| help.clone());
                Candidate::new(value.clone(), help)
            })
            .collect()
    }

    fn convert(&self, value: &str, ctx: Option<&Context<'_>>) -> Result<String, ParameterError> {
        if let Some(found) = match_choice(self.choices.iter().map(|(v, _)| v), value, ctx) {
            return Ok(found.to_string());
        }
        Err(ParameterError::InvalidChoice {
            value: value.to_string(),
            choices: self.missing_message(),
        })
    }

    fn metavar(&self) -> Option<String> {
        let values: Vec<&str> = self.choices.iter().map(|(v, _)| v.as_str()).collect();
        Some(format!("[{}]", values.join("|")))
    }
}

/// Find `value` among `choices`: exact match first, then through the
/// context's token normalization
fn match_choice<'c>(
    choices: impl Iterator<Item = &'c String> + Clone,
    value: &str,
    ctx: Option<&Context<'_>>,
) -> Option<&'c String> {
    if let Some(found) = choices.clone().find(|c| *c == value) {
        return Some(found);
    }

    let normalize = ctx.and_then(|c| c.token_normalize())?;
    let wanted = normalize(value);
    choices.into_iter().find(|c| normalize(c) == wanted)
}

/// Value type whose completions come from a callback
///
/// The callback may return anything that converts into a [`Candidate`]:
/// bare strings become candidates without help, `(value, help)` pairs keep
/// their help.
///
/// ```
/// use shellcomp::tree::{FnCompletion, Param};
///
/// let branch = Param::argument("branch")
///     .value_type(FnCompletion::new("branch", |_ctx, _incomplete| vec!["main", "develop"]));
/// assert_eq!(branch.get_value_type().name(), "branch");
/// ```
pub struct FnCompletion<F, I, C> {
    name: String,
    complete: F,
    _marker: PhantomData<fn() -> (I, C)>,
}

impl<F, I, C> FnCompletion<F, I, C>
where
    F: Fn(&Context<'_>, &str) -> I + Send + Sync,
    I: IntoIterator<Item = C>,
    C: Into<Candidate>,
{
    pub fn new(name: impl Into<String>, complete: F) -> Self {
        Self {
            name: name.into(),
            complete,
            _marker: PhantomData,
        }
    }
}

impl<F, I, C> ValueType for FnCompletion<F, I, C>
where
    F: Fn(&Context<'_>, &str) -> I + Send + Sync,
    I: IntoIterator<Item = C>,
    C: Into<Candidate>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn complete(&self, ctx: &Context<'_>, incomplete: &str) -> Vec<Candidate> {
        (self.complete)(ctx, incomplete)
            .into_iter()
            .map(Into::into)
            .collect()
    }
}
