//! Command and command-group nodes

use super::context::Context;
use super::param::Param;

/// Function applied to tokens before they are compared against fixed choices
pub type TokenNormalizer = fn(&str) -> String;

/// A command in the tree: either a leaf or a group of subcommands
#[derive(Debug)]
pub struct CommandNode {
    /// Name used to invoke this command from its parent
    name: String,
    /// One-line description shown next to the name when completing
    short_help: Option<String>,
    /// Full description
    help: Option<String>,
    /// Declared parameters, in declaration order
    params: Vec<Param>,
    /// Automatic `--help` flag
    help_option: Option<Param>,
    /// Children in declaration order; `Some` marks a group
    subcommands: Option<Vec<CommandNode>>,
    /// Normalization applied when matching choice values
    token_normalize: Option<TokenNormalizer>,
}

impl CommandNode {
    /// Create a leaf command
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_help: None,
            help: None,
            params: Vec::new(),
            help_option: Some(
                Param::flag("help", ["--help"]).help("Show this message and exit."),
            ),
            subcommands: None,
            token_normalize: None,
        }
    }

    /// Create a command group with no subcommands yet
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            subcommands: Some(Vec::new()),
            ..Self::new(name)
        }
    }

    /// Set the one-line help
    pub fn short_help(mut self, text: impl Into<String>) -> Self {
        self.short_help = Some(text.into());
        self
    }

    /// Set the full help
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    /// Declare a parameter
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Add a child command, turning this node into a group if it was a leaf
    pub fn subcommand(mut self, child: CommandNode) -> Self {
        self.subcommands.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Drop the automatic `--help` flag
    pub fn without_help_option(mut self) -> Self {
        self.help_option = None;
        self
    }

    /// Normalize tokens (for example case-folding) before matching choices
    pub fn token_normalize(mut self, normalize: TokenNormalizer) -> Self {
        self.token_normalize = Some(normalize);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_short_help(&self) -> Option<&str> {
        self.short_help.as_deref()
    }

    pub fn get_help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn get_token_normalize(&self) -> Option<TokenNormalizer> {
        self.token_normalize
    }

    /// Check whether this node dispatches to subcommands
    pub fn is_group(&self) -> bool {
        self.subcommands.is_some()
    }

    /// All parameters, declared ones first, then `--help`
    pub fn params(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().chain(self.help_option.iter())
    }

    /// Child commands in declaration order (empty for a leaf)
    pub fn subcommands(&self) -> &[CommandNode] {
        self.subcommands.as_deref().unwrap_or_default()
    }

    /// Names of the child commands in declaration order
    pub fn list_commands(&self) -> impl Iterator<Item = &str> {
        self.subcommands().iter().map(|c| c.name())
    }

    /// Look up a child command by name
    pub fn get_command(&self, name: &str) -> Option<&CommandNode> {
        self.subcommands().iter().find(|c| c.name == name)
    }

    /// Short help of a child command, if the child exists and has one
    pub fn get_command_short_help(&self, name: &str) -> Option<&str> {
        self.get_command(name).and_then(|c| c.get_short_help())
    }

    /// Parse `args` against this node in resilient mode
    ///
    /// # Arguments
    /// * `info_name` - Name the command was invoked as (the program name for the root)
    /// * `args` - Arguments following the command name
    pub fn make_context(&self, info_name: impl Into<String>, args: Vec<String>) -> Context<'_> {
        let mut ctx = Context::new(self, info_name);
        ctx.parse_args(args);
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_has_help_option() {
        let cmd = CommandNode::new("add");
        assert!(!cmd.is_group());
        let names: Vec<_> = cmd.params().map(|p| p.name()).collect();
        assert_eq!(names, vec!["help"]);
    }

    #[test]
    fn test_without_help_option() {
        let cmd = CommandNode::new("add").without_help_option();
        assert_eq!(cmd.params().count(), 0);
    }

    #[test]
    fn test_group_lookup_keeps_declaration_order() {
        let cmd = CommandNode::group("root")
            .subcommand(CommandNode::new("zeta").short_help("last letter"))
            .subcommand(CommandNode::new("alpha"));

        assert!(cmd.is_group());
        assert_eq!(cmd.list_commands().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(cmd.get_command_short_help("zeta"), Some("last letter"));
        assert_eq!(cmd.get_command_short_help("alpha"), None);
        assert!(cmd.get_command("missing").is_none());
    }

    #[test]
    fn test_subcommand_turns_leaf_into_group() {
        let cmd = CommandNode::new("root").subcommand(CommandNode::new("child"));
        assert!(cmd.is_group());
        assert_eq!(cmd.subcommands().len(), 1);
    }

    #[test]
    fn test_params_declared_before_help() {
        let cmd = CommandNode::new("add").param(Param::argument("src"));
        let names: Vec<_> = cmd.params().map(|p| p.name()).collect();
        assert_eq!(names, vec!["src", "help"]);
    }
}
