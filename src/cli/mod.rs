//! CLI module for the verdict test harness
//!
//! ## Commands
//!
//! - `run` - Discover, execute and report every test in the catalog (default)
//! - `list` - Print the discovered test cases without running them
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::io;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::catalog::Catalog;
use crate::demo;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (empty when the report already said everything)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Discover and run marked test methods
#[derive(Parser, Debug)]
#[command(name = "verdict")]
#[command(version = VERSION)]
#[command(about = "Discover and run marked test methods", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every discovered test and report one line per test
    Run(RunArgs),

    /// List discovered tests without running them
    List {
        /// Always prefix test names with their class
        #[arg(long)]
        qualified: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,
    /// Always prefix test names with their class
    #[arg(long)]
    pub qualified: bool,
    /// Print failure details under failed tests
    #[arg(short, long)]
    pub verbose: bool,
    /// Print a pass/fail summary line after the report
    #[arg(long)]
    pub summary: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point, running the built-in demo catalog.
pub fn run() {
    run_with_catalog(&demo::catalog());
}

/// CLI entry point for a caller-supplied catalog.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run_with_catalog(catalog: &Catalog) {
    let cli = Cli::parse();

    match execute(cli, catalog) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli, catalog: &Catalog) -> CliResult<ExitCode> {
    let stdout = io::stdout();
    match cli.command {
        Some(Command::Run(args)) => commands::run_tests(catalog, &args, stdout.lock()),
        Some(Command::List { qualified }) => commands::list_tests(catalog, qualified, stdout.lock()),
        None => commands::run_tests(catalog, &RunArgs::default(), stdout.lock()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_defaults_to_no_command() {
        let cli = Cli::try_parse_from(["verdict"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::try_parse_from(["verdict", "run", "--format", "json", "-v", "--summary"]).unwrap();
        if let Some(Command::Run(args)) = cli.command {
            assert_eq!(args.format, OutputFormat::Json);
            assert!(args.verbose);
            assert!(args.summary);
            assert!(!args.qualified);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_run_defaults() {
        let cli = Cli::try_parse_from(["verdict", "run"]).unwrap();
        if let Some(Command::Run(args)) = cli.command {
            assert_eq!(args.format, OutputFormat::Console);
            assert!(!args.verbose);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_list() {
        let cli = Cli::try_parse_from(["verdict", "list", "--qualified"]).unwrap();
        assert!(matches!(cli.command, Some(Command::List { qualified: true })));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["verdict", "run", "--format", "xml"]).is_err());
    }
}
