//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap, including
//! all commands, arguments, and options.
//!
//! # Commands
//!
//! - `compare`: Compare two module directories and report breaking changes
//! - `init`: Create an example configuration file
//! - `validate`: Validate a configuration file
//!
//! # Example Usage
//!
//! ```bash
//! # Compare the last release of a module with the working tree
//! tfbreak compare ./release ./module
//!
//! # Text report including non-breaking changes
//! tfbreak compare ./release ./module --format text --all
//!
//! # Write a JSON report and never fail the build
//! tfbreak compare ./release ./module --output report.json --no-fail
//! ```

use crate::types::ReportFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// tfbreak - breaking-change detector for Terraform/OpenTofu modules.
#[derive(Parser, Debug)]
#[command(
    name = "tfbreak",
    author,
    version,
    about = "Detect breaking changes between two versions of a Terraform module",
    long_about = "tfbreak parses two snapshots of a Terraform/OpenTofu module, diffs their \
                  variables and outputs, and reports the changes that would break existing \
                  callers: new required variables, removed variables or outputs, and changed \
                  types, defaults, nullability, values, or sensitivity."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "TFBREAK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two module directories
    #[command(visible_alias = "c")]
    Compare(CompareArgs),

    /// Create an example configuration file
    Init,

    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Arguments for the compare command.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Directory holding the previous version of the module
    #[arg(value_name = "OLD_DIR")]
    pub old: PathBuf,

    /// Directory holding the new version of the module
    #[arg(value_name = "NEW_DIR")]
    pub new: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report every change, not only breaking ones
    #[arg(short, long)]
    pub all: bool,

    /// Treat variables that stop being sensitive as breaking
    #[arg(long)]
    pub variable_sensitivity_breaking: bool,

    /// File names to ignore (glob patterns)
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude_patterns: Vec<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Exit with 0 even when breaking changes are found
    #[arg(long)]
    pub no_fail: bool,
}

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "FILE", default_value = "tfbreak.yaml")]
    pub file: PathBuf,
}
