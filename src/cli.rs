//! CLI argument parsing for launchtime

use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "launchtime")]
#[command(version)]
#[command(about = "Measure application launch time from its log milestones", long_about = None)]
#[command(after_help = "Typical usage:
  launchtime run -- my_application [arguments ...]
  launchtime run -- sailjail -p my_profile /usr/bin/my_application
  journalctl -f -o short-iso-precise --since now | launchtime parse

For journal parsing, set up the variables from 'env' and the rules from
'rules' first. Only the short-iso-precise journal format is supported.")]
pub struct Cli {
    /// Print debug tracing to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a command and measure its launch time
    ///
    /// Timing records go to stderr unless --output is given; output lines
    /// that are not milestones are diverted to stdout (to stderr with --output).
    Run(RunArgs),

    /// Print environment variables for manual measurement
    Env(EnvArgs),

    /// Print Qt logging rules for manual measurement
    Rules(RulesArgs),

    /// Parse journal logs from a file or stdin
    ///
    /// Journal timestamps crossing midnight, leap seconds or daylight saving
    /// changes produce unreliable differences.
    Parse(ParseArgs),
}

/// Options shared by the measuring subcommands
#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    /// File to write records to (overwritten)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Recognizer table (TOML) replacing the built-in one
    #[arg(long = "recognizers", value_name = "FILE")]
    pub recognizers: Option<PathBuf>,

    /// Record format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Record a milestone when the process has ended
    #[arg(long = "with-end-time")]
    pub with_end_time: bool,

    /// Do not record the process starting milestone
    #[arg(long = "without-start-time")]
    pub without_start_time: bool,

    #[command(flatten)]
    pub record: RecordArgs,

    /// Program to run, with its arguments (everything after --)
    #[arg(last = true, required = true, value_name = "PROGRAM")]
    pub command: Vec<String>,
}

#[derive(Args, Debug)]
pub struct EnvArgs {
    /// Include QT_LOGGING_RULES
    #[arg(long = "with-logging-rules")]
    pub with_logging_rules: bool,

    /// Include QT_LOGGING_TO_CONSOLE, forcing logging to the console
    #[arg(long = "with-logging-to-console")]
    pub with_logging_to_console: bool,
}

#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Print a [Rules] line first, for writing a qtlogging.ini
    #[arg(long = "with-title")]
    pub with_title: bool,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// File to read; stdin when omitted
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Ignore journal timestamps and time lines as they are read
    #[arg(long = "without-journal-timestamps")]
    pub without_journal_timestamps: bool,

    #[command(flatten)]
    pub record: RecordArgs,
}
