//! Build a command tree from a `clap::Command`
//!
//! This lets programs that already declare their interface with clap get
//! dynamic completion without describing it twice:
//!
//! - positional args become arguments, variadic when they accept several values
//! - named args become options spelled `--long`, `-s` and visible long aliases
//! - args whose action takes no value become flags
//! - possible values (except hidden ones) become a [`DocumentedChoice`]
//! - subcommands recurse
//!
//! The command is built first, so global args show up on every subcommand
//! and clap's generated `--version` and `help` subcommand are included.

use clap::{Arg, Command};

use super::command::CommandNode;
use super::param::Param;
use super::types::DocumentedChoice;

impl From<&Command> for CommandNode {
    fn from(cmd: &Command) -> Self {
        CommandNode::from(cmd.clone())
    }
}

impl From<Command> for CommandNode {
    fn from(mut cmd: Command) -> Self {
        // Propagates global args and adds --version and the help subcommand
        cmd.build();
        node_from_built(&cmd)
    }
}

fn node_from_built(cmd: &Command) -> CommandNode {
    let mut node = if cmd.has_subcommands() {
        CommandNode::group(cmd.get_name())
    } else {
        CommandNode::new(cmd.get_name())
    };

    if let Some(about) = cmd.get_about() {
        node = node.short_help(about.to_string());
    }
    if let Some(long_about) = cmd.get_long_about() {
        node = node.help(long_about.to_string());
    }

    for arg in cmd.get_arguments() {
        // The node brings its own --help
        if arg.get_id() == "help" {
            continue;
        }
        node = node.param(param_from_arg(arg));
    }

    for sub in cmd.get_subcommands() {
        node = node.subcommand(node_from_built(sub));
    }

    node
}

fn param_from_arg(arg: &Arg) -> Param {
    let name = arg.get_id().as_str().to_string();

    let mut param = if arg.is_positional() {
        let variadic = arg
            .get_num_args()
            .is_some_and(|range| range.max_values() > 1);
        let param = Param::argument(name);
        if variadic { param.variadic() } else { param }
    } else {
        let mut opts: Vec<String> = Vec::new();
        if let Some(long) = arg.get_long() {
            opts.push(format!("--{long}"));
        }
        if let Some(short) = arg.get_short() {
            opts.push(format!("-{short}"));
        }
        if let Some(aliases) = arg.get_visible_aliases() {
            opts.extend(aliases.into_iter().map(|a| format!("--{a}")));
        }

        if arg.get_action().takes_values() {
            Param::option(name, opts)
        } else {
            Param::flag(name, opts)
        }
    };

    if let Some(help) = arg.get_help() {
        param = param.help(help.to_string());
    }

    if arg.is_positional() || arg.get_action().takes_values() {
        let values: Vec<(String, String)> = arg
            .get_possible_values()
            .into_iter()
            .filter(|v| !v.is_hide_set())
            .map(|v| {
                let help = v.get_help().map(|h| h.to_string()).unwrap_or_default();
                (v.get_name().to_string(), help)
            })
            .collect();
        if !values.is_empty() {
            param = param.value_type(DocumentedChoice::new(values));
        }
    }

    param
}
