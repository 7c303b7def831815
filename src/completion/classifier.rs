//! Candidate classification
//!
//! The cursor sits in exactly one of four regimes, checked in order:
//!
//! 1. [`Regime::OptionValue`]: the previous argument is an option that takes a value
//! 2. [`Regime::OptionName`]: the incomplete token starts with a non-alphanumeric character
//! 3. [`Regime::SubcommandName`]: the command is a group
//! 4. [`Regime::PositionalValue`]: anything else

use super::candidate::Candidate;
use crate::tree::{Context, Param};

/// What the token under the cursor is expected to be
#[derive(Debug, Clone, Copy)]
pub enum Regime<'a> {
    /// A value for this option
    OptionValue(&'a Param),
    /// An option spelling
    OptionName,
    /// A subcommand name
    SubcommandName,
    /// A value for one of the positional arguments
    PositionalValue,
}

/// Pick the regime for `incomplete` after `args` in the resolved `ctx`
pub fn classify<'a>(ctx: &Context<'a>, args: &[String], incomplete: &str) -> Regime<'a> {
    let command = ctx.command();

    if let Some(last) = args.last() {
        // Last declared wins when spellings overlap
        let target = command
            .params()
            .filter(|p| p.takes_value() && p.is_spelling(last))
            .last();
        if let Some(param) = target {
            return Regime::OptionValue(param);
        }
    }

    let starts_like_option = incomplete
        .chars()
        .next()
        .is_some_and(|c| !c.is_alphanumeric());
    if starts_like_option {
        return Regime::OptionName;
    }

    if command.is_group() {
        return Regime::SubcommandName;
    }

    Regime::PositionalValue
}

/// Gather the candidates of `regime`, in declaration order
pub fn gather(ctx: &Context<'_>, regime: Regime<'_>, incomplete: &str) -> Vec<Candidate> {
    let command = ctx.command();

    match regime {
        Regime::OptionValue(param) => param.get_value_type().complete(ctx, incomplete),
        Regime::OptionName => {
            let mut out = Vec::new();
            for param in command.params().filter(|p| p.is_option()) {
                for opt in param.get_opts() {
                    if ctx.matches(opt, incomplete) {
                        out.push(Candidate::new(opt.clone(), param.get_help().map(str::to_string)));
                    }
                }
                // No help on negations so shells don't merge them with the primary
                for opt in param.get_secondary_opts() {
                    if ctx.matches(opt, incomplete) {
                        out.push(Candidate::new(opt.clone(), None));
                    }
                }
            }
            out
        }
        Regime::SubcommandName => command
            .subcommands()
            .iter()
            .filter(|c| ctx.matches(c.name(), incomplete))
            .map(|c| Candidate::new(c.name(), c.get_short_help().map(str::to_string)))
            .collect(),
        Regime::PositionalValue => command
            .params()
            .filter(|p| p.is_argument())
            .flat_map(|p| p.get_value_type().complete(ctx, incomplete))
            .collect(),
    }
}
