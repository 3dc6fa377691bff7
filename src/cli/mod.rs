//! Command-line interface for screen-spots.
//!
//! The binary runs one command per invocation. Screen, window and cursor
//! context come from flags (or `SCREEN_SPOTS_*` environment variables), so a
//! voice-control or hotkey tool can call it with whatever it knows about
//! the desktop. Command implementations live in [`commands`]; the pattern
//! prompt for `save-window` lives in [`prompt`].

pub mod commands;
pub mod prompt;

use crate::profile::parse_resolution;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use screen_spots_config::Config;
use std::path::PathBuf;

/// screen-spots - Save and reuse named screen positions per machine, screen and window
#[derive(Parser, Debug)]
#[command(name = "screen-spots")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the spot files (overrides config)
    #[arg(long, global = true, value_name = "DIR", env = "SCREEN_SPOTS_DIR")]
    pub spots_dir: Option<PathBuf>,

    /// Machine name to use instead of the OS hostname
    #[arg(long, global = true, value_name = "NAME", env = "SCREEN_SPOTS_HOSTNAME")]
    pub hostname: Option<String>,

    /// Index of the screen under the cursor
    #[arg(long, global = true, value_name = "INDEX", env = "SCREEN_SPOTS_SCREEN")]
    pub screen: Option<u32>,

    /// Resolution of that screen
    #[arg(
        long,
        global = true,
        value_name = "WxH",
        env = "SCREEN_SPOTS_RESOLUTION",
        value_parser = parse_resolution_arg
    )]
    pub resolution: Option<(u32, u32)>,

    /// Current cursor position
    #[arg(
        long,
        global = true,
        value_name = "X,Y",
        env = "SCREEN_SPOTS_CURSOR",
        value_parser = parse_point_arg,
        allow_hyphen_values = true
    )]
    pub cursor: Option<(i32, i32)>,

    /// Title of the focused window
    #[arg(long, global = true, value_name = "TITLE", env = "SCREEN_SPOTS_WINDOW_TITLE")]
    pub window_title: Option<String>,

    /// Name of the focused application
    #[arg(long, global = true, value_name = "NAME", env = "SCREEN_SPOTS_APP")]
    pub app: Option<String>,

    /// Set debug log level (overrides config and RUST_LOG)
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save a global spot at the cursor position
    Save { name: String },

    /// Save a spot that only applies to the focused window
    SaveWindow {
        name: String,

        /// Answer the pattern prompt up front (number, `global`, or `custom <text>`)
        #[arg(long, value_name = "ANSWER")]
        choice: Option<String>,
    },

    /// Move the cursor to a spot
    Move {
        name: String,

        /// Only use spots tied to the focused window
        #[arg(long)]
        window_only: bool,
    },

    /// Click a spot and return the cursor
    Click {
        name: String,

        /// Only use spots tied to the focused window
        #[arg(long)]
        window_only: bool,
    },

    /// Press at the cursor and move to a spot, keeping the button held
    Drag {
        name: String,

        /// Only use spots tied to the focused window
        #[arg(long)]
        window_only: bool,
    },

    /// Drag to a spot and release
    Swipe {
        name: String,

        /// Only use spots tied to the focused window
        #[arg(long)]
        window_only: bool,
    },

    /// Delete one spot
    Clear { name: String },

    /// Delete every spot in the current profile
    ClearAll,

    /// Delete the window spots matching the focused window
    ClearWindow,

    /// List the current profile's spots
    List {
        /// Wrap lines at this width
        #[arg(long, default_value_t = 80)]
        width: usize,
    },

    /// Print the heatmap dots for the focused window
    Heatmap,

    /// Rescan the spots directory
    Reload,

    /// Show every known profile
    Profiles,

    /// Open the current profile's spot file in the default editor
    Edit,

    /// Print the current profile's spot file path
    Path,

    /// Reload whenever a spot file changes on disk
    Watch {
        /// Exit after the specified number of seconds
        #[arg(long, value_name = "SECONDS")]
        exit_after: Option<f64>,
    },
}

/// Parse `WIDTHxHEIGHT`
fn parse_resolution_arg(value: &str) -> std::result::Result<(u32, u32), String> {
    parse_resolution(value).ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))
}

/// Parse `X,Y`
fn parse_point_arg(value: &str) -> std::result::Result<(i32, i32), String> {
    let err = || format!("expected X,Y, got {value:?}");
    let (x, y) = value.split_once(',').ok_or_else(err)?;
    let x = x.trim().parse::<i32>().map_err(|_| err())?;
    let y = y.trim().parse::<i32>().map_err(|_| err())?;
    Ok((x, y))
}

impl Cli {
    /// Load the config named by `--config` (or the default file) and apply
    /// flag overrides
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::load().context("Failed to load config")?,
        };
        if let Some(dir) = &self.spots_dir {
            config.spots_dir = Some(dir.clone());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point_arg() {
        assert_eq!(parse_point_arg("10,20"), Ok((10, 20)));
        assert_eq!(parse_point_arg("-5, 7"), Ok((-5, 7)));
        assert!(parse_point_arg("10").is_err());
        assert!(parse_point_arg("a,b").is_err());
    }

    #[test]
    fn test_parse_cli() {
        let cli = Cli::try_parse_from([
            "screen-spots",
            "click",
            "compose",
            "--window-only",
            "--screen",
            "1",
            "--resolution",
            "2560x1440",
            "--cursor",
            "-10,20",
            "--window-title",
            "Inbox - Gmail",
        ])
        .unwrap();
        assert_eq!(cli.screen, Some(1));
        assert_eq!(cli.resolution, Some((2560, 1440)));
        assert_eq!(cli.cursor, Some((-10, 20)));
        assert!(matches!(
            cli.command,
            Commands::Click { ref name, window_only: true } if name == "compose"
        ));
    }

    #[test]
    fn test_bad_resolution_rejected() {
        assert!(Cli::try_parse_from(["screen-spots", "list", "--resolution", "big"]).is_err());
    }

    #[test]
    fn test_clap_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
