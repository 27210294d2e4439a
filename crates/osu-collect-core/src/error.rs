//! Error types for osu-collect-core

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for collection assembly operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("no client credentials available (set OSU_CLIENT_ID and OSU_CLIENT_SECRET)")]
    MissingCredentials,

    #[error("osu! API rejected the client credentials: {0}")]
    AuthRejected(String),

    #[error("line {line}: unrecognized identifier: {content}")]
    MalformedLine { line: usize, content: String },

    #[error("unexpected API response: {0}")]
    InvalidResponse(String),

    #[error("failed to write {}: {message}", path.display())]
    OutputWrite { path: PathBuf, message: String },

    #[error("run aborted by user")]
    Aborted,

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether retrying the failed request can reasonably succeed:
    /// transport-level failures plus HTTP 408/429/5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Http(_) => true,
            Error::Api { status, .. } => *status == 408 || *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias for collection assembly operations
pub type Result<T> = std::result::Result<T, Error>;

/// A non-fatal, per-item problem recorded during a run.
///
/// Warnings accumulate alongside the result instead of aborting the run,
/// so the caller can report skipped items in its summary.
#[derive(Debug, Clone)]
pub struct Warning {
    /// What the warning is about (an input line, a beatmap ID, the listing)
    pub subject: String,
    /// Why the item was skipped
    pub message: String,
}

impl Warning {
    /// Create a new warning
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}
