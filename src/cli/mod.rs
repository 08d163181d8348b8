//! CLI module for peephole
//!
//! ## Commands
//!
//! - `expand <file>` - Rewrite a Rust file, adding the name constants its `#[peep_in]` markers ask for
//! - `check <file>` - Report the diagnostics an expansion would produce, without writing anything
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
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use peephole_core::{FlagUsage, PeepConfig};

use crate::version::PEEPHOLE_VERSION;

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
    /// User-facing error message (already formatted for display)
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

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Synthesize string constants holding the names of struct fields
#[derive(Parser, Debug)]
#[command(name = "peephole")]
#[command(version = PEEPHOLE_VERSION)]
#[command(about = "Synthesize string constants holding the names of struct fields", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// How to report each use of the marker attribute
    #[arg(long = "flag-usage", value_enum, default_value_t = FlagUsageArg::Allow, global = true)]
    pub flag_usage: FlagUsageArg,

    /// Name of the marker attribute
    #[arg(long, value_name = "NAME", default_value = peephole_core::MARKER, global = true)]
    pub attribute: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rewrite a Rust file with the synthesized constants
    Expand {
        /// Source file to rewrite
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Write the result here instead of stdout
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Report diagnostics without writing anything
    Check {
        /// Source file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,
    },
}

/// `--flag-usage` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlagUsageArg {
    Allow,
    Warning,
    Error,
}

impl From<FlagUsageArg> for FlagUsage {
    fn from(arg: FlagUsageArg) -> Self {
        match arg {
            FlagUsageArg::Allow => FlagUsage::Allow,
            FlagUsageArg::Warning => FlagUsage::Warning,
            FlagUsageArg::Error => FlagUsage::Error,
        }
    }
}

impl Cli {
    /// Engine configuration selected by the global flags.
    pub fn config(&self) -> PeepConfig {
        PeepConfig::new()
            .with_flag_usage(self.flag_usage.into())
            .with_attribute(self.attribute.clone())
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
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
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.config();
    match cli.command {
        Command::Expand { file, output } => commands::expand_file(&file, output.as_deref(), &config),
        Command::Check { file, json } => commands::check_file(&file, json, &config),
    }
}

// ============================================================================
// Tests
// ============================================================================
