//! shellcomp - dynamic shell completion
//!
//! Prints the integration scripts that make a shell ask a program for
//! completion candidates, and completes its own command line the same way.
//!
//! # Usage
//!
//! ```bash
//! # Enable completion for shellcomp in bash
//! eval "$(shellcomp script bash)"
//!
//! # Script for another program built on the library
//! shellcomp script fish --prog-name my-tool > ~/.config/fish/completions/my-tool.fish
//! ```

use std::io;

use clap::CommandFactory;
use tracing_subscriber::EnvFilter;

use shellcomp::cli::{CliArgs, CliInterface, PROG_NAME};
use shellcomp::dispatch::shell_complete_with;
use shellcomp::error::Result;

/// Environment variable overriding the log filter
const LOG_ENV: &str = "SHELLCOMP_LOG";

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Answer a completion request if one is pending (exits)
/// 4. Handle subcommands
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    let tree = CliInterface::command_tree();
    let complete_var = cli.complete_var();
    shell_complete_with(&tree, PROG_NAME, Some(&complete_var), &cli.config().completer());

    let stdout = io::stdout();
    if !cli.handle_subcommand(&mut stdout.lock())? {
        CliArgs::command().print_help()?;
    }
    Ok(())
}

/// Initialize logging to stderr
///
/// `SHELLCOMP_LOG` takes precedence, then `-v`/`--vv`, then the
/// configured level.
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);

    // Configure timestamps
    if cli.config().logging.timestamps {
        let _ = subscriber.try_init();
    } else {
        let _ = subscriber.without_time().try_init();
    }
}
