//! Error types for the measurement pipeline

use std::io;
use thiserror::Error;

/// Failures that abort a measurement run
///
/// Unparsable lines, unknown identifiers and suppressed duplicates are
/// not errors; they are routed as unmatched output instead.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Command array is empty")]
    EmptyCommand,

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Child process {program} has no stderr pipe")]
    MissingPipe { program: String },

    #[error("Invalid pattern for recognizer '{label}': {source}")]
    Pattern {
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("Duplicate identifier '{0}' in recognizer table")]
    DuplicateIdentifier(String),

    #[error("Recognizer #{0} lists no identifiers")]
    NoIdentifiers(usize),

    #[error("Fallback recognizer #{0} must declare a name")]
    UnnamedFallback(usize),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, LaunchError>;
