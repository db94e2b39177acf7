//! CLI argument definitions for the SMS pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sms-pipeline",
    version,
    about = "Turn structured SMS reports into data records",
    long_about = "Parse structured SMS reports against the registered forms, resolve the \
                  reporting facility, and print the storage request for the resulting \
                  data record."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow message text and phone numbers in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Form definitions file (default: <standards>/forms.toml).
    #[arg(long = "forms", value_name = "PATH", global = true)]
    pub forms: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the registered forms.
    Forms,

    /// Process one gateway message and print the storage request.
    Process(ProcessArgs),
}

#[derive(Parser)]
pub struct ProcessArgs {
    /// Gateway payload: JSON (`.json`) or a form-urlencoded body.
    #[arg(value_name = "MESSAGE")]
    pub message: PathBuf,

    /// JSON fixture with facilities and stored records.
    #[arg(long = "lookup", value_name = "FIXTURE")]
    pub lookup: Option<PathBuf>,

    /// Pipeline options (TOML).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also print a table of the record's errors and tasks to stderr.
    #[arg(long = "summary")]
    pub summary: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
