//! Command tree consumed by the completion engine
//!
//! A program describes its command line as a tree of [`CommandNode`]s: leaf
//! commands that take [`Param`]s, and groups that dispatch to named children.
//! Every parameter carries a [`ValueType`] which knows how to complete its own
//! values. [`Context`] is the result of parsing a slice of the command line
//! against one node without ever failing.
//!
//! Programs that already describe their interface with clap can convert it:
//! `CommandNode::from(&clap_command)`.
//!
//! # Examples
//!
//! ```
//! use shellcomp::tree::{CommandNode, DocumentedChoice, Param};
//!
//! let cli = CommandNode::group("repo")
//!     .subcommand(
//!         CommandNode::new("add").param(
//!             Param::option("file", ["--file", "-f"])
//!                 .help("File to add")
//!                 .value_type(DocumentedChoice::new([("x.txt", "help x"), ("y.txt", "help y")])),
//!         ),
//!     )
//!     .subcommand(CommandNode::new("remove"));
//!
//! assert!(cli.is_group());
//! assert_eq!(cli.list_commands().collect::<Vec<_>>(), vec!["add", "remove"]);
//! ```

mod command;
mod context;
mod from_clap;
mod param;
mod types;

pub use command::{CommandNode, TokenNormalizer};
pub use context::Context;
pub use param::{Param, ParamKind};
pub use types::{Choice, DocumentedChoice, FnCompletion, Text, ValueType};
