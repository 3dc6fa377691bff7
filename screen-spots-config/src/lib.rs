//! Configuration system for screen-spots.
//!
//! This crate provides configuration loading, saving, and default values
//! for the spot engine. It includes:
//!
//! - The `Config` settings struct and its YAML persistence
//! - Default values for every setting
//! - Typed configuration errors
//! - Path helpers for the config and spots directories

pub mod config;
pub mod defaults;
pub mod error;
mod types;

pub use config::Config;
pub use error::ConfigError;
pub use types::LogLevel;
