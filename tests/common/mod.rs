//! Shared integration test helpers for screen-spots.
//!
//! Include with `mod common;` at the top of a test file. The
//! `#[allow(dead_code)]` suppresses warnings when a file only uses some of
//! the helpers.

#![allow(dead_code)]

use screen_spots::platform::fake::{FakeScreen, FakeWindow, RecordingCursor};
use screen_spots::{Config, SpotEngine};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An engine over fakes and a scratch spots directory.
///
/// Keep the struct alive for the whole test; dropping it removes the
/// directory.
pub struct TestContext {
    pub temp_dir: TempDir,
    pub engine: SpotEngine,
    pub screen: FakeScreen,
    pub window: FakeWindow,
    pub cursor: RecordingCursor,
}

impl TestContext {
    /// Host `Host`, screen 0 at 1920x1080, no window information
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self::in_dir(temp_dir)
    }

    /// Same as [`TestContext::new`] but over an existing directory, e.g.
    /// one pre-populated with spot files
    pub fn in_dir(temp_dir: TempDir) -> Self {
        let screen = FakeScreen::new("Host", 0, (1920, 1080));
        let window = FakeWindow::default();
        let cursor = RecordingCursor::at(0, 0);
        let engine = SpotEngine::new(
            config_for(temp_dir.path()),
            Box::new(screen.clone()),
            Box::new(window.clone()),
            Box::new(cursor.clone()),
        );
        Self {
            temp_dir,
            engine,
            screen,
            window,
            cursor,
        }
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.file(name)).expect("Failed to read spot file")
    }
}

/// Config pointing the spots directory at `dir`, with no swipe delay
pub fn config_for(dir: &Path) -> Config {
    Config {
        spots_dir: Some(dir.to_path_buf()),
        drag_release_delay_ms: 0,
        ..Config::default()
    }
}

pub const HOST_0_FILE: &str = "screen-spots-Host-0-1920x1080.csv";
pub const HOST_1_FILE: &str = "screen-spots-Host-1-2560x1440.csv";
