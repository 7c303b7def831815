//! Shell adapters
//!
//! Each supported shell gets an adapter that knows two things:
//!
//! - the integration script the user sources once (`source_script`)
//! - how to read the command line from the environment at keystroke time and
//!   how to format candidates for that shell (`complete`)

mod bash;
mod fish;
mod powershell;
mod zsh;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use clap::ValueEnum;

pub use bash::BashShell;
pub use fish::FishShell;
pub use powershell::PowerShellShell;
pub use zsh::ZshShell;

use crate::completion::Completer;
use crate::dispatch::CompletionEnv;
use crate::error::{Result, ShellcompError};
use crate::tokenizer::{is_blank, split_args};
use crate::tree::CommandNode;

/// Supported shells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Shell {
    Bash,
    Fish,
    Zsh,
    #[value(name = "powershell")]
    PowerShell,
}

impl Shell {
    pub const ALL: [Shell; 4] = [Shell::Bash, Shell::Fish, Shell::Zsh, Shell::PowerShell];

    pub fn name(self) -> &'static str {
        self.adapter().name()
    }

    /// The adapter implementing this shell
    pub fn adapter(self) -> &'static dyn ShellAdapter {
        match self {
            Shell::Bash => &BashShell,
            Shell::Fish => &FishShell,
            Shell::Zsh => &ZshShell,
            Shell::PowerShell => &PowerShellShell,
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shell {
    type Err = ShellcompError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "bash" => Ok(Shell::Bash),
            "fish" => Ok(Shell::Fish),
            "zsh" => Ok(Shell::Zsh),
            "powershell" | "pwsh" => Ok(Shell::PowerShell),
            _ => Err(ShellcompError::Generic(format!(
                "Unsupported shell: {s}. Supported shells: bash, fish, zsh, powershell"
            ))),
        }
    }
}

/// Script emission and runtime completion for one shell
pub trait ShellAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// The integration script that makes the shell call back into `prog`
    ///
    /// # Arguments
    /// * `prog` - Program name as typed by the user
    /// * `complete_var` - Environment variable carrying the completion instruction
    fn source_script(&self, prog: &str, complete_var: &str) -> String;

    /// Read the command line from `env`, compute candidates and write them
    /// to `out` in this shell's format
    fn complete(
        &self,
        completer: &Completer,
        root: &CommandNode,
        prog: &str,
        env: &CompletionEnv,
        out: &mut dyn Write,
    ) -> Result<()>;
}

/// Arguments and incomplete token derived from a raw command line
///
/// Used by the shells that hand over the whole line (fish, zsh, PowerShell).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Complete arguments, program name excluded
    pub args: Vec<String>,
    /// Token under the cursor; empty when the line ends in whitespace
    pub incomplete: String,
}

impl CommandLine {
    pub fn parse(line: &str) -> Self {
        let mut args: Vec<String> = split_args(line).into_iter().skip(1).collect();
        let incomplete = if !line.ends_with(is_blank) {
            args.pop().unwrap_or_default()
        } else {
            String::new()
        };
        Self { args, incomplete }
    }
}

/// Identifier usable as a shell function name: `-` becomes `_`, anything
/// else outside `[A-Za-z0-9_]` is dropped
fn function_ident(prog: &str) -> String {
    prog.replace('-', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Trim surrounding whitespace and terminate with `;`
fn finish_script(script: &str) -> String {
    format!("{};", script.trim())
}
