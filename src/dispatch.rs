//! Completion dispatch
//!
//! A program supporting completion calls [`shell_complete`] at startup,
//! before parsing its own arguments. When the completion variable is set the
//! call prints a script or candidates and exits; otherwise it returns and the
//! program runs normally.
//!
//! ```no_run
//! use shellcomp::dispatch::shell_complete;
//! use shellcomp::tree::CommandNode;
//!
//! let root = CommandNode::group("tool").subcommand(CommandNode::new("build"));
//! shell_complete(&root, "tool", None);
//! // ... regular argument parsing
//! ```

use std::env;
use std::fmt;
use std::io::{self, Write};
use std::process;

use crate::completion::Completer;
use crate::error::{EnvironmentError, Result};
use crate::shell::Shell;
use crate::tree::CommandNode;

/// What the completion variable asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Print the integration script for the shell
    Source(Shell),
    /// Print candidates for the command line found in the environment
    Complete(Shell),
}

impl Instruction {
    /// Parse the value of the completion variable
    ///
    /// Bare `source` and `complete` mean bash.
    pub fn parse(value: &str) -> Option<Self> {
        let instruction = match value {
            "source" => Instruction::Source(Shell::Bash),
            "complete" => Instruction::Complete(Shell::Bash),
            "source-fish" => Instruction::Source(Shell::Fish),
            "complete-fish" => Instruction::Complete(Shell::Fish),
            "source-zsh" => Instruction::Source(Shell::Zsh),
            "complete-zsh" => Instruction::Complete(Shell::Zsh),
            "source-powershell" => Instruction::Source(Shell::PowerShell),
            "complete-powershell" => Instruction::Complete(Shell::PowerShell),
            _ => return None,
        };
        Some(instruction)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Instruction::Source(Shell::Bash) => "source",
            Instruction::Complete(Shell::Bash) => "complete",
            Instruction::Source(Shell::Fish) => "source-fish",
            Instruction::Complete(Shell::Fish) => "complete-fish",
            Instruction::Source(Shell::Zsh) => "source-zsh",
            Instruction::Complete(Shell::Zsh) => "complete-zsh",
            Instruction::Source(Shell::PowerShell) => "source-powershell",
            Instruction::Complete(Shell::PowerShell) => "complete-powershell",
        }
    }

    pub fn shell(self) -> Shell {
        match self {
            Instruction::Source(shell) | Instruction::Complete(shell) => shell,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default completion variable for `prog`: `_<PROG>_COMPLETE`
///
/// ```
/// assert_eq!(shellcomp::dispatch::complete_var_name("my-tool"), "_MY_TOOL_COMPLETE");
/// ```
pub fn complete_var_name(prog: &str) -> String {
    format!("_{}_COMPLETE", prog.replace('-', "_").to_uppercase())
}

/// Completion-related environment, read once per process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionEnv {
    /// Name of the variable carrying the instruction
    complete_var: String,
    /// Value of that variable
    instruction: Option<String>,
    /// Bash: the words of the command line
    comp_words: Option<String>,
    /// Bash: index of the word under the cursor
    comp_cword: Option<String>,
    /// Fish, zsh, PowerShell: the command line up to the cursor
    commandline: Option<String>,
}

impl CompletionEnv {
    /// Create an empty environment for `complete_var`
    pub fn new(complete_var: impl Into<String>) -> Self {
        Self {
            complete_var: complete_var.into(),
            ..Self::default()
        }
    }

    /// Read the process environment
    pub fn from_env(complete_var: impl Into<String>) -> Self {
        Self::from_lookup(complete_var, |name| env::var(name).ok())
    }

    /// Read variables through `lookup`
    pub fn from_lookup<F>(complete_var: impl Into<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let complete_var = complete_var.into();
        Self {
            instruction: lookup(&complete_var),
            comp_words: lookup("COMP_WORDS"),
            comp_cword: lookup("COMP_CWORD"),
            commandline: lookup("COMMANDLINE"),
            complete_var,
        }
    }

    pub fn with_instruction(mut self, value: impl Into<String>) -> Self {
        self.instruction = Some(value.into());
        self
    }

    pub fn with_comp_words(mut self, value: impl Into<String>) -> Self {
        self.comp_words = Some(value.into());
        self
    }

    pub fn with_comp_cword(mut self, value: impl Into<String>) -> Self {
        self.comp_cword = Some(value.into());
        self
    }

    pub fn with_commandline(mut self, value: impl Into<String>) -> Self {
        self.commandline = Some(value.into());
        self
    }

    pub fn complete_var(&self) -> &str {
        &self.complete_var
    }

    /// Raw value of the completion variable
    pub fn raw_instruction(&self) -> Option<&str> {
        self.instruction.as_deref()
    }

    /// The instruction, if the variable holds a recognized one
    pub fn instruction(&self) -> Option<Instruction> {
        self.raw_instruction().and_then(Instruction::parse)
    }

    pub fn comp_words(&self) -> Option<&str> {
        self.comp_words.as_deref()
    }

    pub fn comp_cword(&self) -> Option<&str> {
        self.comp_cword.as_deref()
    }

    /// Index of the word under the cursor, `None` when `COMP_CWORD` is unset
    pub fn cword_index(&self) -> std::result::Result<Option<usize>, EnvironmentError> {
        self.comp_cword()
            .map(|raw| {
                raw.trim().parse::<usize>().map_err(|_| EnvironmentError::InvalidValue {
                    variable: "COMP_CWORD".to_string(),
                    value: raw.to_string(),
                })
            })
            .transpose()
    }

    pub fn commandline(&self) -> Option<&str> {
        self.commandline.as_deref()
    }
}

/// Outcome of [`dispatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// No completion was requested, the program should run normally
    NotRequested,
    /// A script or candidates were written
    Handled,
}

/// Act on the completion instruction found in `env`
///
/// # Arguments
/// * `root` - Root of the command tree
/// * `prog` - Program name
/// * `env` - Completion environment
/// * `completer` - Engine used to compute candidates
/// * `out` - Destination of the script or candidates
pub fn dispatch(
    root: &CommandNode,
    prog: &str,
    env: &CompletionEnv,
    completer: &Completer,
    out: &mut dyn Write,
) -> Result<Dispatched> {
    let Some(raw) = env.raw_instruction().filter(|v| !v.is_empty()) else {
        return Ok(Dispatched::NotRequested);
    };
    let Some(instruction) = Instruction::parse(raw) else {
        tracing::debug!(
            variable = env.complete_var(),
            value = raw,
            "unrecognized completion instruction"
        );
        return Ok(Dispatched::NotRequested);
    };

    tracing::debug!(%instruction, prog, "handling completion request");
    let adapter = instruction.shell().adapter();
    match instruction {
        Instruction::Source(_) => {
            writeln!(out, "{}", adapter.source_script(prog, env.complete_var()))?;
        }
        Instruction::Complete(_) => {
            adapter.complete(completer, root, prog, env, out)?;
        }
    }
    out.flush()?;
    Ok(Dispatched::Handled)
}

/// Handle a completion request from the real environment, exiting if one was made
///
/// The variable defaults to [`complete_var_name`] of `prog`. Exits with 0
/// after a handled request and 1 if it failed; returns when no completion
/// was requested.
pub fn shell_complete(root: &CommandNode, prog: &str, complete_var: Option<&str>) {
    shell_complete_with(root, prog, complete_var, &Completer::new());
}

/// Same as [`shell_complete`] with a custom completer
pub fn shell_complete_with(
    root: &CommandNode,
    prog: &str,
    complete_var: Option<&str>,
    completer: &Completer,
) {
    let complete_var = complete_var.map_or_else(|| complete_var_name(prog), str::to_string);
    let env = CompletionEnv::from_env(complete_var);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match dispatch(root, prog, &env, completer, &mut out) {
        Ok(Dispatched::NotRequested) => {}
        Ok(Dispatched::Handled) => process::exit(0),
        Err(e) => {
            tracing::error!(error = %e, "completion failed");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CaseInsensitivePrefix;
    use crate::tree::Param;

    fn tree() -> CommandNode {
        CommandNode::group("my-tool")
            .param(Param::flag("verbose", ["--verbose"]).help("Talk more"))
            .subcommand(CommandNode::new("build").short_help("Build it"))
            .subcommand(CommandNode::new("bench"))
    }

    fn run(env: &CompletionEnv) -> (Dispatched, String) {
        run_with(env, &Completer::new())
    }

    fn run_with(env: &CompletionEnv, completer: &Completer) -> (Dispatched, String) {
        let mut out = Vec::new();
        let outcome = dispatch(&tree(), "my-tool", env, completer, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_complete_var_name() {
        assert_eq!(complete_var_name("prog"), "_PROG_COMPLETE");
        assert_eq!(complete_var_name("my-tool"), "_MY_TOOL_COMPLETE");
    }

    #[test]
    fn test_instruction_round_trip() {
        for shell in Shell::ALL {
            for instruction in [Instruction::Source(shell), Instruction::Complete(shell)] {
                assert_eq!(Instruction::parse(instruction.as_str()), Some(instruction));
            }
        }
        assert_eq!(Instruction::parse("source-tcsh"), None);
    }

    #[test]
    fn test_not_requested() {
        let unset = CompletionEnv::new("_MY_TOOL_COMPLETE");
        assert_eq!(run(&unset), (Dispatched::NotRequested, String::new()));

        let empty = unset.clone().with_instruction("");
        assert_eq!(run(&empty), (Dispatched::NotRequested, String::new()));

        let unknown = unset.with_instruction("source-tcsh");
        assert_eq!(run(&unknown), (Dispatched::NotRequested, String::new()));
    }

    #[test]
    fn test_source_writes_script_with_newline() {
        let env = CompletionEnv::new("_MY_TOOL_COMPLETE").with_instruction("source-fish");
        let (outcome, out) = run(&env);

        assert_eq!(outcome, Dispatched::Handled);
        assert_eq!(
            out,
            "complete --command my-tool --arguments \"(env _MY_TOOL_COMPLETE=complete-fish COMMANDLINE=(commandline -cp) my-tool)\" -f;\n"
        );
    }

    #[test]
    fn test_bash_complete() {
        let env = CompletionEnv::new("_MY_TOOL_COMPLETE")
            .with_instruction("complete")
            .with_comp_words("my-tool b")
            .with_comp_cword("1");
        assert_eq!(run(&env), (Dispatched::Handled, "build\tbench".to_string()));
    }

    #[test]
    fn test_fish_complete() {
        let env = CompletionEnv::new("_MY_TOOL_COMPLETE")
            .with_instruction("complete-fish")
            .with_commandline("my-tool bu");
        assert_eq!(run(&env), (Dispatched::Handled, "build\tBuild it\n".to_string()));
    }

    #[test]
    fn test_zsh_complete() {
        let env = CompletionEnv::new("_MY_TOOL_COMPLETE")
            .with_instruction("complete-zsh")
            .with_commandline("my-tool --v");
        assert_eq!(
            run(&env),
            (
                Dispatched::Handled,
                "_arguments '*: :((\"--verbose\"\\:\"Talk more\"))'\n".to_string()
            )
        );
    }

    #[test]
    fn test_powershell_complete() {
        let env = CompletionEnv::new("_MY_TOOL_COMPLETE")
            .with_instruction("complete-powershell")
            .with_commandline("my-tool ");
        assert_eq!(run(&env), (Dispatched::Handled, "build\nbench\n".to_string()));
    }

    #[test]
    fn test_completer_matcher_is_used() {
        let env = CompletionEnv::new("_MY_TOOL_COMPLETE")
            .with_instruction("complete-fish")
            .with_commandline("my-tool BE");
        let completer = Completer::new().with_matcher(CaseInsensitivePrefix);
        assert_eq!(run_with(&env, &completer), (Dispatched::Handled, "bench\n".to_string()));
    }

    #[test]
    fn test_invalid_cword_gives_empty_reply() {
        let env = CompletionEnv::new("_MY_TOOL_COMPLETE")
            .with_instruction("complete")
            .with_comp_words("my-tool ")
            .with_comp_cword("x");
        assert_eq!(run(&env), (Dispatched::Handled, String::new()));
    }

    #[test]
    fn test_cword_index() {
        let env = CompletionEnv::new("_X_COMPLETE");
        assert_eq!(env.cword_index().unwrap(), None);
        assert_eq!(env.clone().with_comp_cword(" 2 ").cword_index().unwrap(), Some(2));

        let err = env.with_comp_cword("one").cword_index().unwrap_err();
        assert_eq!(err.to_string(), "Invalid value 'one' in COMP_CWORD");
    }

    #[test]
    fn test_from_lookup() {
        let env = CompletionEnv::from_lookup("_X_COMPLETE", |name| match name {
            "_X_COMPLETE" => Some("complete-zsh".to_string()),
            "COMMANDLINE" => Some("x a".to_string()),
            _ => None,
        });

        assert_eq!(env.instruction(), Some(Instruction::Complete(Shell::Zsh)));
        assert_eq!(env.commandline(), Some("x a"));
        assert_eq!(env.comp_words(), None);
    }
}
