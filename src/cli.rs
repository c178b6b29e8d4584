// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! `gorun` owns no flags of its own. Everything after the binary name is
//! forwarded verbatim to the supervised program, so help/version handling is
//! disabled and hyphenated values are accepted as plain arguments.

use clap::Parser;

/// Command-line arguments for `gorun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gorun",
    about = "Restart a program whenever its source files change.",
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Arguments passed through to the child after the profile's fixed prefix.
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 0..
    )]
    pub passthrough: Vec<String>,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
