//! Centralized error handling for the cleaning pipeline.
//!
//! Malformed cells are never errors: the type coercer turns them into nulls
//! and the null dropper purges them. What remains are structural problems
//! (a required column is absent, the two inputs disagree on their columns)
//! and I/O failures, all of which abort the run.
//!
//! ```no_run
//! use inflight_clean::error::{CleanError, Result, ResultExt as _};
//!
//! fn read_raw(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).context("Failed to read raw extract")
//! }
//!
//! match read_raw("missing.csv") {
//!     Err(CleanError::MissingColumn { column, .. }) => eprintln!("no {column}"),
//!     Err(e) => eprintln!("{e}"),
//!     Ok(_) => {}
//! }
//! ```

use std::fmt;

/// Main error type for cleaning operations.
#[derive(Debug)]
pub enum CleanError {
    /// I/O errors (reading extracts, writing artifacts)
    Io(std::io::Error),

    /// Data processing errors raised by Polars
    DataProcessing(String),

    /// Configuration errors
    Config(String),

    /// A column declared `required` in the schema is absent
    MissingColumn { column: String, dataset: String },

    /// The two cleaned datasets cannot be concatenated
    SchemaMismatch(String),

    /// Unsupported or unusable path
    InvalidPath(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for CleanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::MissingColumn { column, dataset } => {
                write!(f, "Required column '{column}' is missing from {dataset}")
            }
            Self::SchemaMismatch(msg) => write!(f, "Schema mismatch: {msg}"),
            Self::InvalidPath(msg) => write!(f, "Invalid path: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CleanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CleanError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for CleanError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for CleanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for CleanError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<tempfile::PersistError> for CleanError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleanError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped with `msg`.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped with the closure's message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<CleanError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap(msg.into(), e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(f(), e.into()))
    }
}

// Structural and I/O kinds survive wrapping so callers can still match on them.
fn wrap(msg: String, err: CleanError) -> CleanError {
    match err {
        CleanError::Io(e) => CleanError::Io(std::io::Error::new(e.kind(), format!("{msg}: {e}"))),
        CleanError::MissingColumn { .. } | CleanError::SchemaMismatch(_) => err,
        other => CleanError::Other(format!("{msg}: {other}")),
    }
}
