//! Typed error variants for the screen-spots-config crate.
//!
//! `Config::load` and `Config::save` return `anyhow::Result` for the binary;
//! the values inside are `ConfigError`s, so callers that care can use
//! `downcast_ref::<ConfigError>()` to match on the failure mode.
//!
//! # Example
//!
//! ```rust,no_run
//! use screen_spots_config::ConfigError;
//!
//! fn check_load_err(e: &anyhow::Error) {
//!     if let Some(cfg_err) = e.downcast_ref::<ConfigError>() {
//!         match cfg_err {
//!             ConfigError::Io { path, .. } => eprintln!("cannot read {path:?}"),
//!             ConfigError::Parse { path, .. } => eprintln!("bad YAML in {path:?}"),
//!             ConfigError::Validation(msg) => eprintln!("validation: {msg}"),
//!         }
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading, saving or validating the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written.
    #[error("I/O error on config file {path:?}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file contained YAML that could not be parsed.
    #[error("YAML parse error in config {path:?}: {source}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parser error.
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// A field value failed semantic validation.
    ///
    /// The inner string names the field and why it is invalid.
    #[error("Config validation error: {0}")]
    Validation(String),
}
