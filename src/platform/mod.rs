//! OS collaborators consumed by the spot engine.
//!
//! The engine never talks to the OS directly: screen/host queries, window
//! information and cursor control all come in through these traits.
//! [`headless`] holds the implementations the CLI uses; [`fake`] holds
//! in-memory implementations for tests.

pub mod fake;
pub mod headless;

use crate::error::PlatformError;
use std::time::Duration;

/// Host and screen queries used to derive the active profile
pub trait ScreenInfo {
    /// Machine name
    fn hostname(&self) -> Result<String, PlatformError>;

    /// Index of the screen under the mouse cursor
    fn active_screen_index(&self) -> Result<u32, PlatformError>;

    /// Pixel resolution of that screen as `(width, height)`
    fn active_screen_resolution(&self) -> Result<(u32, u32), PlatformError>;
}

/// Focused window information.
///
/// `None` means the value could not be read; window-specific matching then
/// degrades to "no match".
pub trait WindowInfo {
    fn current_window_title(&self) -> Option<String>;

    fn current_app_name(&self) -> Option<String>;
}

/// Low-level cursor primitives
pub trait CursorControl {
    /// Current cursor position
    fn position(&self) -> (i32, i32);

    fn move_cursor(&mut self, x: i32, y: i32);

    /// Press and release the primary button, holding it for `hold`
    fn click(&mut self, hold: Duration);

    /// Press the primary button without releasing it
    fn press(&mut self);

    fn release(&mut self);
}

impl<C: CursorControl + ?Sized> CursorControl for Box<C> {
    fn position(&self) -> (i32, i32) {
        (**self).position()
    }

    fn move_cursor(&mut self, x: i32, y: i32) {
        (**self).move_cursor(x, y)
    }

    fn click(&mut self, hold: Duration) {
        (**self).click(hold)
    }

    fn press(&mut self) {
        (**self).press()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Machine name from the OS
pub fn system_hostname() -> Result<String, PlatformError> {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .map_err(PlatformError::Hostname)
}
