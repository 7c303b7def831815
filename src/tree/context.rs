//! Resilient parse context
//!
//! A [`Context`] records what a command saw on the command line: values picked
//! up for its parameters and the residual arguments it did not consume. It is
//! built in resilient mode only: unknown options are skipped, options missing
//! their value are ignored, extra positionals are kept as residual arguments.
//! Nothing here ever fails.

use std::collections::{HashMap, VecDeque};

use super::command::{CommandNode, TokenNormalizer};
use super::param::Param;
use crate::completion::{Prefix, PrefixMatcher};

static DEFAULT_MATCHER: Prefix = Prefix;

/// Parse state of one command along the resolved path
pub struct Context<'a> {
    /// Command this context belongs to
    command: &'a CommandNode,
    /// Name the command was invoked as
    info_name: String,
    /// Context of the enclosing group
    parent: Option<Box<Context<'a>>>,
    /// Residual positional arguments
    args: Vec<String>,
    /// For groups: the token naming the subcommand
    protected_args: Vec<String>,
    /// Values picked up per parameter name
    values: HashMap<String, Vec<String>>,
    /// Predicate used to filter completion candidates
    matcher: &'a dyn PrefixMatcher,
    /// Token normalization, inherited from the parent when the command has none
    token_normalize: Option<TokenNormalizer>,
}

impl<'a> Context<'a> {
    /// Create an empty root context
    pub fn new(command: &'a CommandNode, info_name: impl Into<String>) -> Self {
        Self {
            command,
            info_name: info_name.into(),
            parent: None,
            args: Vec::new(),
            protected_args: Vec::new(),
            values: HashMap::new(),
            matcher: &DEFAULT_MATCHER,
            token_normalize: command.get_token_normalize(),
        }
    }

    /// Use `matcher` for candidate filtering in this context and its children
    pub fn with_matcher(mut self, matcher: &'a dyn PrefixMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Create an empty context for a subcommand, parented to this one
    pub fn child(self, command: &'a CommandNode, info_name: impl Into<String>) -> Context<'a> {
        Context {
            command,
            info_name: info_name.into(),
            matcher: self.matcher,
            token_normalize: command.get_token_normalize().or(self.token_normalize),
            parent: Some(Box::new(self)),
            args: Vec::new(),
            protected_args: Vec::new(),
            values: HashMap::new(),
        }
    }

    pub fn command(&self) -> &'a CommandNode {
        self.command
    }

    pub fn info_name(&self) -> &str {
        &self.info_name
    }

    pub fn parent(&self) -> Option<&Context<'a>> {
        self.parent.as_deref()
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn protected_args(&self) -> &[String] {
        &self.protected_args
    }

    /// Protected arguments followed by the other residual arguments
    pub fn residual_args(&self) -> Vec<String> {
        self.protected_args
            .iter()
            .chain(self.args.iter())
            .cloned()
            .collect()
    }

    /// Values picked up for the parameter called `name`
    ///
    /// Flags record `"true"` for a primary spelling and `"false"` for a
    /// secondary one.
    pub fn value(&self, name: &str) -> Option<&[String]> {
        self.values.get(name).map(Vec::as_slice)
    }

    /// Invocation path from the root, e.g. `prog remote add`
    pub fn command_path(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{} {}", parent.command_path(), self.info_name),
            None => self.info_name.clone(),
        }
    }

    pub fn matcher(&self) -> &dyn PrefixMatcher {
        self.matcher
    }

    /// Check `candidate` against the partially typed `incomplete` token
    pub fn matches(&self, candidate: &str, incomplete: &str) -> bool {
        self.matcher.matches(candidate, incomplete)
    }

    pub fn token_normalize(&self) -> Option<TokenNormalizer> {
        self.token_normalize
    }

    /// Parse `args` against this context's command
    ///
    /// A group stops at the first positional token: it becomes the single
    /// protected argument and everything after it stays in `args` for the
    /// subcommand. A leaf hands positionals to its arguments in declaration
    /// order and keeps the rest as residual arguments.
    pub fn parse_args(&mut self, args: Vec<String>) {
        let command = self.command;
        let mut rargs: VecDeque<String> = args.into();
        let mut positionals = Vec::new();

        while let Some(arg) = rargs.pop_front() {
            if arg == "--" {
                break;
            }
            if arg.starts_with('-') && arg.len() > 1 {
                self.process_option(&arg, &mut rargs);
                continue;
            }
            if command.is_group() {
                rargs.push_front(arg);
                break;
            }
            positionals.push(arg);
        }
        positionals.extend(rargs);

        if command.is_group() {
            let mut rest = positionals.into_iter();
            self.protected_args = rest.next().into_iter().collect();
            self.args = rest.collect();
        } else {
            self.args = self.assign_positionals(positionals);
        }

        tracing::trace!(
            command = %self.command_path(),
            protected = ?self.protected_args,
            residual = ?self.args,
            "parsed context"
        );
    }

    /// Handle one token that looks like an option
    fn process_option(&mut self, arg: &str, rargs: &mut VecDeque<String>) {
        if arg.starts_with("--") {
            if let Some((name, value)) = arg.split_once('=') {
                match self.find_option(name) {
                    Some(param) if param.takes_value() => self.record(param, value.to_string()),
                    Some(param) => self.record_flag(param, name),
                    None => tracing::trace!(option = %name, "skipping unknown option"),
                }
                return;
            }
        }

        if let Some(param) = self.find_option(arg) {
            self.consume(param, arg, None, rargs);
            return;
        }

        if !arg.starts_with("--") {
            self.process_short_cluster(arg, rargs);
            return;
        }

        tracing::trace!(option = %arg, "skipping unknown option");
    }

    /// Expand `-abc` into `-a -b -c`; a value-taking short option swallows the
    /// rest of the cluster as its value
    fn process_short_cluster(&mut self, arg: &str, rargs: &mut VecDeque<String>) {
        let chars: Vec<char> = arg.chars().skip(1).collect();

        for (i, ch) in chars.iter().enumerate() {
            let spelling = format!("-{ch}");
            let Some(param) = self.find_option(&spelling) else {
                tracing::trace!(option = %spelling, "skipping unknown short option");
                continue;
            };
            if param.takes_value() {
                let attached: String = chars[i + 1..].iter().collect();
                let attached = (!attached.is_empty()).then_some(attached);
                self.consume(param, &spelling, attached, rargs);
                return;
            }
            self.record_flag(param, &spelling);
        }
    }

    /// Record an option, taking its value from `attached` or the next token
    fn consume(
        &mut self,
        param: &'a Param,
        spelling: &str,
        attached: Option<String>,
        rargs: &mut VecDeque<String>,
    ) {
        if !param.takes_value() {
            self.record_flag(param, spelling);
            return;
        }
        match attached.or_else(|| rargs.pop_front()) {
            Some(value) => self.record(param, value),
            None => tracing::trace!(option = %spelling, "option is missing its value"),
        }
    }

    fn find_option(&self, spelling: &str) -> Option<&'a Param> {
        self.command
            .params()
            .find(|p| p.is_option() && p.is_spelling(spelling))
    }

    fn record(&mut self, param: &Param, value: String) {
        self.values
            .entry(param.name().to_string())
            .or_default()
            .push(value);
    }

    fn record_flag(&mut self, param: &Param, spelling: &str) {
        let value = if param.is_primary_spelling(spelling) {
            "true"
        } else {
            "false"
        };
        self.record(param, value.to_string());
    }

    /// Hand positionals to the command's arguments, returning the leftovers
    fn assign_positionals(&mut self, positionals: Vec<String>) -> Vec<String> {
        let command = self.command;
        let mut rest: VecDeque<String> = positionals.into();

        for param in command.params().filter(|p| p.is_argument()) {
            if param.is_variadic() {
                let values: Vec<String> = rest.drain(..).collect();
                if !values.is_empty() {
                    self.values
                        .entry(param.name().to_string())
                        .or_default()
                        .extend(values);
                }
            } else if let Some(value) = rest.pop_front() {
                self.record(param, value);
            }
        }

        rest.into()
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("command", &self.command.name())
            .field("info_name", &self.info_name)
            .field("args", &self.args)
            .field("protected_args", &self.protected_args)
            .field("values", &self.values)
            .finish()
    }
}
