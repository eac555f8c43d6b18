//! CLI command definitions for regwatch
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use crate::config::{LoadOptions, RenderFormat};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for the resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// YAML document (default)
    #[default]
    Yaml,
    /// Pretty-printed JSON
    Json,
    /// REGWATCH_* variable assignments
    Env,
}

impl From<Format> for RenderFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Yaml => RenderFormat::Yaml,
            Format::Json => RenderFormat::Json,
            Format::Env => RenderFormat::Env,
        }
    }
}

/// regwatch configuration tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Resolve for a notification test run (no provider required)
    #[arg(long, global = true)]
    pub test_notif: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    /// Output format for the resolved configuration
    #[arg(short, long, value_enum, default_value_t = Format::Yaml, global = true)]
    pub format: Format,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Resolver inputs taken from the command line.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_file: self.config.clone(),
            test_notif: self.test_notif,
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the resolved configuration (default if no subcommand given)
    Print,

    /// Resolve and validate, then print a one-line summary
    Check,
}
