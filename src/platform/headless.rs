//! Collaborators for the command-line front end.
//!
//! The CLI runs without a display connection: the screen, window and cursor
//! position are handed in as flags, and cursor actions are written as text
//! lines (`move X Y`, `click`, `press`, `release`) for an OS automation tool
//! to replay.

use super::{CursorControl, ScreenInfo, WindowInfo, system_hostname};
use crate::error::PlatformError;
use std::io::Write;
use std::time::Duration;

/// Screen context supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct StaticScreen {
    /// Overrides the OS hostname when set
    pub hostname: Option<String>,
    pub screen: Option<u32>,
    pub resolution: Option<(u32, u32)>,
}

impl ScreenInfo for StaticScreen {
    fn hostname(&self) -> Result<String, PlatformError> {
        match &self.hostname {
            Some(name) => Ok(name.clone()),
            None => system_hostname(),
        }
    }

    fn active_screen_index(&self) -> Result<u32, PlatformError> {
        self.screen.ok_or_else(|| {
            PlatformError::ScreenUnavailable(
                "pass --screen or set SCREEN_SPOTS_SCREEN".to_string(),
            )
        })
    }

    fn active_screen_resolution(&self) -> Result<(u32, u32), PlatformError> {
        self.resolution.ok_or_else(|| {
            PlatformError::ResolutionUnavailable(
                "pass --resolution WxH or set SCREEN_SPOTS_RESOLUTION".to_string(),
            )
        })
    }
}

/// Window context supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct StaticWindow {
    pub title: Option<String>,
    pub app: Option<String>,
}

impl WindowInfo for StaticWindow {
    fn current_window_title(&self) -> Option<String> {
        self.title.clone()
    }

    fn current_app_name(&self) -> Option<String> {
        self.app.clone()
    }
}

/// Cursor that prints each action as a line
pub struct PrintingCursor<W: Write> {
    position: (i32, i32),
    out: W,
}

impl<W: Write> PrintingCursor<W> {
    pub fn new(position: (i32, i32), out: W) -> Self {
        Self { position, out }
    }

    fn emit(&mut self, line: std::fmt::Arguments) {
        if let Err(e) = writeln!(self.out, "{line}") {
            log::error!("Failed to write cursor action: {}", e);
        }
    }
}

impl<W: Write> std::fmt::Debug for PrintingCursor<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrintingCursor")
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl<W: Write> CursorControl for PrintingCursor<W> {
    fn position(&self) -> (i32, i32) {
        self.position
    }

    fn move_cursor(&mut self, x: i32, y: i32) {
        self.position = (x, y);
        self.emit(format_args!("move {x} {y}"));
    }

    fn click(&mut self, hold: Duration) {
        self.emit(format_args!("click {}", hold.as_micros()));
    }

    fn press(&mut self) {
        self.emit(format_args!("press"));
    }

    fn release(&mut self) {
        self.emit(format_args!("release"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printing_cursor_output() {
        let mut buf = Vec::new();
        {
            let mut cursor = PrintingCursor::new((5, 6), &mut buf);
            cursor.move_cursor(10, 20);
            cursor.click(Duration::from_micros(16_000));
            cursor.press();
            cursor.release();
            assert_eq!(cursor.position(), (10, 20));
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "move 10 20\nclick 16000\npress\nrelease\n");
    }

    #[test]
    fn test_static_screen_requires_context() {
        let screen = StaticScreen {
            hostname: Some("box".to_string()),
            ..StaticScreen::default()
        };
        assert_eq!(screen.hostname().unwrap(), "box");
        assert!(matches!(
            screen.active_screen_index(),
            Err(PlatformError::ScreenUnavailable(_))
        ));
        assert!(matches!(
            screen.active_screen_resolution(),
            Err(PlatformError::ResolutionUnavailable(_))
        ));
    }
}
