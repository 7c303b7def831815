//! Command-line interface for shellcomp
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - The `script`, `config` and `version` subcommands
//! - The command tree used for completing shellcomp itself

use clap::{CommandFactory, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::config::{Config, LogLevel};
use crate::dispatch::complete_var_name;
use crate::error::Result;
use crate::shell::Shell;
use crate::tree::CommandNode;

/// Name of the binary, also the default program name for `script`
pub const PROG_NAME: &str = "shellcomp";

/// shellcomp - dynamic shell completion for command-line programs
#[derive(Parser, Debug)]
#[command(
    name = "shellcomp",
    version,
    about = "Shell completion scripts and candidates for command-line programs",
    long_about = "Prints the integration scripts that make bash, fish, zsh and PowerShell
call back into a program for completion candidates. shellcomp completes itself the same way."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for shellcomp
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the shell integration script for a program
    Script {
        /// Target shell
        #[arg(value_enum, value_name = "SHELL")]
        shell: Shell,

        /// Program the script completes
        #[arg(long, value_name = "NAME", default_value = PROG_NAME)]
        prog_name: String,

        /// Variable carrying the completion instruction
        #[arg(long, value_name = "VAR")]
        complete_var: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Show version information
    Version,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {e}");
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_logging_args(&mut config, args);
        Ok(config)
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else {
            config.logging.level
        };
    }

    /// Command tree of shellcomp itself, used for self-completion
    pub fn command_tree() -> CommandNode {
        CommandNode::from(&CliArgs::command())
    }

    /// Variable that carries completion instructions for shellcomp itself
    pub fn complete_var(&self) -> String {
        self.config
            .completion
            .complete_var
            .clone()
            .unwrap_or_else(|| complete_var_name(PROG_NAME))
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if a subcommand was handled, false if none was given
    pub fn handle_subcommand(&self, out: &mut dyn Write) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Script {
                shell,
                prog_name,
                complete_var,
            }) => {
                self.print_script(out, *shell, prog_name, complete_var.as_deref())?;
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(out, *show, *validate)?;
                Ok(true)
            }
            Some(Commands::Version) => {
                self.show_version(out)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Print the integration script for `prog_name`
    fn print_script(
        &self,
        out: &mut dyn Write,
        shell: Shell,
        prog_name: &str,
        complete_var: Option<&str>,
    ) -> Result<()> {
        let complete_var = match complete_var {
            Some(var) => var.to_string(),
            None if prog_name == PROG_NAME => self.complete_var(),
            None => complete_var_name(prog_name),
        };
        tracing::debug!(%shell, prog_name, complete_var = %complete_var, "printing integration script");
        writeln!(out, "{}", shell.adapter().source_script(prog_name, &complete_var))?;
        Ok(())
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    fn handle_config_command(&self, out: &mut dyn Write, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file(out)?;
        }
        if show {
            self.show_config(out)?;
        }
        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self, out: &mut dyn Write) -> Result<()> {
        let Some(path) = self.config_path() else {
            writeln!(out, "No configuration directory on this platform")?;
            return Ok(());
        };
        writeln!(out, "Validating configuration file: {}", path.display())?;

        if !path.exists() {
            writeln!(out, "❌ Configuration file does not exist")?;
            return Ok(());
        }

        match Config::load_from_file(Some(&path)) {
            Ok(config) => match config.validate() {
                Ok(()) => writeln!(out, "✅ Configuration is valid")?,
                Err(e) => writeln!(out, "❌ Configuration validation failed: {e}")?,
            },
            Err(e) => writeln!(out, "❌ Failed to load configuration: {e}")?,
        }
        Ok(())
    }

    /// Show effective configuration
    fn show_config(&self, out: &mut dyn Write) -> Result<()> {
        if let Some(path) = self.config_path() {
            writeln!(out, "Configuration file: {}", path.display())?;
            writeln!(out)?;
        }
        writeln!(out, "=== Effective Configuration ===")?;
        writeln!(out)?;
        writeln!(out, "{}", self.config.to_toml()?)?;
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn config_path(&self) -> Option<PathBuf> {
        self.args.config_file.clone().or_else(Config::default_path)
    }

    /// Show version information
    fn show_version(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "shellcomp version {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "Rust version: {}", env!("CARGO_PKG_RUST_VERSION"))?;
        Ok(())
    }
}
