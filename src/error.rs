//! Typed error types for the spot engine.
//!
//! Callers at the crate boundary can match on specific variants instead of
//! relying on opaque `anyhow` strings. Malformed rows are never errors: they
//! are skipped and logged where they are read. A missing spot is not an
//! error either; lookups return `Option`/`bool`.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of one of the OS collaborators the engine queries
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The machine name could not be read.
    #[error("hostname unavailable: {0}")]
    Hostname(#[source] std::io::Error),

    /// The screen under the cursor could not be determined.
    #[error("active screen unavailable: {0}")]
    ScreenUnavailable(String),

    /// The active screen's resolution could not be determined.
    #[error("screen resolution unavailable: {0}")]
    ResolutionUnavailable(String),
}

/// Top-level error type for spot operations.
#[derive(Debug, Error)]
pub enum SpotError {
    /// No usable (host, screen, resolution) context; the operation cannot proceed.
    #[error("profile unavailable: {0}")]
    ProfileUnavailable(#[from] PlatformError),

    /// A spot file or the spots directory could not be read or written.
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// File or directory that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer failed for the whole file (e.g. unreadable header).
    #[error("CSV error in {path:?}: {source}")]
    Csv {
        /// File that failed.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// The header row lacks required columns.
    #[error("{path:?} is missing required column(s): {}", .missing.join(", "))]
    MissingColumns {
        /// File that failed.
        path: PathBuf,
        /// Names of the absent columns.
        missing: Vec<&'static str>,
    },

    /// A pattern choice arrived while no window spot save was pending.
    #[error("no window spot save is pending")]
    NoPendingSelection,

    /// A numbered pattern choice was out of range.
    #[error("invalid choice {choice}: expected 0..={available}")]
    InvalidChoice {
        /// The number the user picked.
        choice: usize,
        /// Number of suggestions on offer.
        available: usize,
    },
}

impl SpotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SpotError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SpotError>;
