//! Dynamic shell completion for command-line programs
//!
//! This library lets a program offer tab completion in bash, fish, zsh and
//! PowerShell without hand-written shell script. The shell is taught, through
//! a small integration script, to call the program back with the command line
//! in the environment; the program answers with candidates computed from its
//! own command tree.
//!
//! # Modules
//!
//! - `tree`: Command tree, parameters, value types and the resilient parse context
//! - `completion`: Context resolution and candidate classification
//! - `tokenizer`: Tolerant shell-word splitting
//! - `quoting`: Shell-safe quoting of candidates
//! - `shell`: Per-shell scripts, input extraction and output formatting
//! - `dispatch`: Completion instruction handling at program start
//! - `config`: Configuration management
//! - `cli`: The `shellcomp` command-line interface
//! - `error`: Error types and handling
//!
//! # Example
//!
//! ```no_run
//! use shellcomp::dispatch::shell_complete;
//! use shellcomp::tree::{CommandNode, DocumentedChoice, Param};
//!
//! let root = CommandNode::group("tool")
//!     .param(Param::flag("verbose", ["--verbose", "-v"]).help("Talk more"))
//!     .subcommand(
//!         CommandNode::new("pack")
//!             .short_help("Pack files")
//!             .param(
//!                 Param::option("format", ["--format"]).value_type(DocumentedChoice::new([
//!                     ("tar", "Tape archive"),
//!                     ("zip", "Zip archive"),
//!                 ])),
//!             ),
//!     );
//!
//! // Prints a script or candidates and exits when `_TOOL_COMPLETE` is set
//! shell_complete(&root, "tool", None);
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod quoting;
pub mod shell;
pub mod tokenizer;
pub mod tree;

// Re-export commonly used types
pub use completion::{Candidate, Completer, get_choices, resolve_ctx};
pub use config::Config;
pub use dispatch::{CompletionEnv, Dispatched, Instruction, complete_var_name, dispatch, shell_complete};
pub use error::{Result, ShellcompError};
pub use quoting::{double_quote, single_quote};
pub use shell::Shell;
pub use tokenizer::{decode_args, split_args};
pub use tree::{CommandNode, DocumentedChoice, Param};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
