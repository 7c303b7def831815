//! Completion resolution engine
//!
//! Given a command tree, the arguments typed so far and the incomplete token
//! under the cursor, work out which candidates to offer:
//!
//! - **Resolver**: re-parses the arguments in resilient mode and walks down to
//!   the deepest active command
//! - **Classifier**: decides whether an option value, an option name, a
//!   subcommand name or a positional value is being completed
//! - **Matcher**: the prefix predicate that filters every candidate list
//!
//! # Examples
//!
//! ```
//! use shellcomp::completion::Completer;
//! use shellcomp::tree::{CommandNode, Param};
//!
//! let root = CommandNode::group("tool")
//!     .subcommand(CommandNode::new("add").short_help("Add a file"))
//!     .subcommand(CommandNode::new("remove"));
//!
//! let completer = Completer::new();
//! let values: Vec<String> = completer
//!     .get_choices(&root, "tool", &[], "a")
//!     .map(|c| c.value)
//!     .collect();
//! assert_eq!(values, vec!["add"]);
//! ```

mod candidate;
mod classifier;
mod matcher;
mod resolver;


use std::fmt;
use std::vec;

pub use candidate::Candidate;
pub use classifier::{Regime, classify, gather};
pub use matcher::{CaseInsensitivePrefix, MatchFn, Prefix, PrefixMatcher};
pub use resolver::{resolve_ctx, resolve_ctx_with};

use crate::tree::{CommandNode, Context};

/// Candidates for one completion request, in the order they should be offered
#[derive(Debug)]
pub struct Candidates(vec::IntoIter<Candidate>);

impl Candidates {
    fn empty() -> Self {
        Self(Vec::new().into_iter())
    }
}

impl Iterator for Candidates {
    type Item = Candidate;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Candidates {}

/// Completion engine holding the prefix matcher in effect
pub struct Completer {
    matcher: Box<dyn PrefixMatcher>,
}

impl Completer {
    /// Create a completer using case-sensitive prefix matching
    pub fn new() -> Self {
        Self {
            matcher: Box::new(Prefix),
        }
    }

    /// Replace the prefix matcher
    pub fn with_matcher(mut self, matcher: impl PrefixMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// The predicate candidates are filtered with
    pub fn matcher(&self) -> &dyn PrefixMatcher {
        self.matcher.as_ref()
    }

    /// Resolve the context being completed
    pub fn resolve<'a>(
        &'a self,
        root: &'a CommandNode,
        prog: &str,
        args: &[String],
    ) -> Option<Context<'a>> {
        resolve_ctx_with(root, prog, args, self.matcher())
    }

    /// Candidates for `incomplete` after `args`
    ///
    /// # Arguments
    /// * `root` - Root of the command tree
    /// * `prog` - Program name, used as the root's info name
    /// * `args` - Complete arguments typed so far, program name excluded
    /// * `incomplete` - Token under the cursor, possibly empty
    pub fn get_choices(
        &self,
        root: &CommandNode,
        prog: &str,
        args: &[String],
        incomplete: &str,
    ) -> Candidates {
        let Some(ctx) = self.resolve(root, prog, args) else {
            return Candidates::empty();
        };

        let regime = classify(&ctx, args, incomplete);
        let candidates = gather(&ctx, regime, incomplete);
        tracing::trace!(
            command = %ctx.command_path(),
            ?regime,
            incomplete,
            count = candidates.len(),
            "gathered candidates"
        );
        Candidates(candidates.into_iter())
    }
}

impl Default for Completer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Completer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer").finish_non_exhaustive()
    }
}

/// Candidates for `incomplete` after `args`, with case-sensitive prefix matching
pub fn get_choices(root: &CommandNode, prog: &str, args: &[String], incomplete: &str) -> Candidates {
    Completer::new().get_choices(root, prog, args, incomplete)
}
