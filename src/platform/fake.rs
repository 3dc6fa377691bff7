//! In-memory collaborators for tests.
//!
//! Each fake is a cheap handle over shared state, so a test can keep a clone
//! and change the screen or window title after handing the other clone to
//! the engine.

use super::{CursorControl, ScreenInfo, WindowInfo};
use crate::error::PlatformError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
struct ScreenState {
    hostname: String,
    screen: Option<u32>,
    resolution: (u32, u32),
}

/// Screen query with a settable active screen
#[derive(Debug, Clone)]
pub struct FakeScreen {
    state: Arc<Mutex<ScreenState>>,
}

impl FakeScreen {
    pub fn new(hostname: impl Into<String>, screen: u32, resolution: (u32, u32)) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScreenState {
                hostname: hostname.into(),
                screen: Some(screen),
                resolution,
            })),
        }
    }

    /// Move the "cursor" to another screen
    pub fn set_screen(&self, screen: u32, resolution: (u32, u32)) {
        let mut state = self.state.lock();
        state.screen = Some(screen);
        state.resolution = resolution;
    }

    /// Make the screen query fail
    pub fn disconnect(&self) {
        self.state.lock().screen = None;
    }
}

impl ScreenInfo for FakeScreen {
    fn hostname(&self) -> Result<String, PlatformError> {
        Ok(self.state.lock().hostname.clone())
    }

    fn active_screen_index(&self) -> Result<u32, PlatformError> {
        self.state
            .lock()
            .screen
            .ok_or_else(|| PlatformError::ScreenUnavailable("no screen attached".to_string()))
    }

    fn active_screen_resolution(&self) -> Result<(u32, u32), PlatformError> {
        let state = self.state.lock();
        match state.screen {
            Some(_) => Ok(state.resolution),
            None => Err(PlatformError::ResolutionUnavailable(
                "no screen attached".to_string(),
            )),
        }
    }
}

#[derive(Debug, Default)]
struct WindowState {
    title: Option<String>,
    app: Option<String>,
}

/// Window query with a settable title and app name
#[derive(Debug, Clone, Default)]
pub struct FakeWindow {
    state: Arc<Mutex<WindowState>>,
}

impl FakeWindow {
    pub fn new(title: impl Into<String>, app: impl Into<String>) -> Self {
        let window = Self::default();
        window.set(title, app);
        window
    }

    pub fn set(&self, title: impl Into<String>, app: impl Into<String>) {
        let mut state = self.state.lock();
        state.title = Some(title.into());
        state.app = Some(app.into());
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.state.lock().title = Some(title.into());
    }

    /// Make both queries fail
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.title = None;
        state.app = None;
    }
}

impl WindowInfo for FakeWindow {
    fn current_window_title(&self) -> Option<String> {
        self.state.lock().title.clone()
    }

    fn current_app_name(&self) -> Option<String> {
        self.state.lock().app.clone()
    }
}

/// A cursor action as seen by [`RecordingCursor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorEvent {
    Move(i32, i32),
    Click,
    Press,
    Release,
}

#[derive(Debug, Default)]
struct CursorState {
    position: (i32, i32),
    events: Vec<CursorEvent>,
}

/// Cursor that records every action instead of performing it
#[derive(Debug, Clone, Default)]
pub struct RecordingCursor {
    state: Arc<Mutex<CursorState>>,
}

impl RecordingCursor {
    pub fn at(x: i32, y: i32) -> Self {
        let cursor = Self::default();
        cursor.state.lock().position = (x, y);
        cursor
    }

    /// Place the cursor without recording a move
    pub fn warp(&self, x: i32, y: i32) {
        self.state.lock().position = (x, y);
    }

    pub fn events(&self) -> Vec<CursorEvent> {
        self.state.lock().events.clone()
    }

    pub fn take_events(&self) -> Vec<CursorEvent> {
        std::mem::take(&mut self.state.lock().events)
    }
}

impl CursorControl for RecordingCursor {
    fn position(&self) -> (i32, i32) {
        self.state.lock().position
    }

    fn move_cursor(&mut self, x: i32, y: i32) {
        let mut state = self.state.lock();
        state.position = (x, y);
        state.events.push(CursorEvent::Move(x, y));
    }

    fn click(&mut self, _hold: Duration) {
        self.state.lock().events.push(CursorEvent::Click);
    }

    fn press(&mut self) {
        self.state.lock().events.push(CursorEvent::Press);
    }

    fn release(&mut self) {
        self.state.lock().events.push(CursorEvent::Release);
    }
}
