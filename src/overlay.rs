//! Data behind the spot list and heatmap displays.
//!
//! Rendering is left to the front end; this module only decides what each
//! row says and where each dot goes.

use crate::spots::Spot;
use crate::window::{WindowContext, WindowPattern};
use std::fmt;

/// How a spot relates to the focused window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpotLabel {
    Global,
    /// Title pattern that matches the focused window
    ThisWindow(String),
    Window(String),
    /// App pattern that matches the focused app
    ThisApp(String),
    App(String),
}

impl SpotLabel {
    pub fn for_spot(spot: &Spot, context: &WindowContext) -> Self {
        let active = spot.is_active_in(context);
        match spot.pattern() {
            WindowPattern::Global => SpotLabel::Global,
            WindowPattern::App(app) if active => SpotLabel::ThisApp(app.to_string()),
            WindowPattern::App(app) => SpotLabel::App(app.to_string()),
            WindowPattern::Combined(_) | WindowPattern::Title(_) => {
                let pattern = spot.window_pattern.clone().unwrap_or_default();
                if active {
                    SpotLabel::ThisWindow(pattern)
                } else {
                    SpotLabel::Window(pattern)
                }
            }
        }
    }
}

impl fmt::Display for SpotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotLabel::Global => write!(f, "global"),
            SpotLabel::ThisWindow(p) => write!(f, "this window: {p}"),
            SpotLabel::Window(p) => write!(f, "window: {p}"),
            SpotLabel::ThisApp(a) => write!(f, "this app: {a}"),
            SpotLabel::App(a) => write!(f, "app: {a}"),
        }
    }
}

/// One line of the spot list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub label: SpotLabel,
}

impl ListRow {
    pub fn new(spot: &Spot, context: &WindowContext) -> Self {
        Self {
            name: spot.name.clone(),
            x: spot.x,
            y: spot.y,
            label: SpotLabel::for_spot(spot, context),
        }
    }
}

impl fmt::Display for ListRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {}) [{}]", self.name, self.x, self.y, self.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapPoint {
    pub x: i32,
    pub y: i32,
}

/// Dots for every spot active in the focused window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heatmap {
    /// `AARRGGBB` or `RRGGBB` hex
    pub color: String,
    /// Dot radius in pixels
    pub size: u32,
    pub points: Vec<HeatmapPoint>,
}

/// Greedy word wrap to `width` columns. Continuation lines are prefixed with
/// `indent`; a word longer than the line is split.
pub fn wrap_text(text: &str, width: usize, indent: &str) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let prefix_len = if lines.is_empty() { 0 } else { indent.chars().count() };
            let available = width.saturating_sub(prefix_len).max(1);
            let sep = usize::from(line_len > 0);

            if line_len + sep + word.len() <= available {
                if sep == 1 {
                    line.push(' ');
                }
                line.extend(word.iter());
                line_len += sep + word.len();
                break;
            }
            if line_len > 0 {
                lines.push(finish_line(&lines, indent, &line));
                line.clear();
                line_len = 0;
                continue;
            }
            let rest = word.split_off(available);
            line.extend(word.iter());
            lines.push(finish_line(&lines, indent, &line));
            line.clear();
            word = rest;
            if word.is_empty() {
                break;
            }
        }
    }
    if line_len > 0 {
        lines.push(finish_line(&lines, indent, &line));
    }
    lines
}

fn finish_line(lines: &[String], indent: &str, line: &str) -> String {
    if lines.is_empty() {
        line.to_string()
    } else {
        format!("{indent}{line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(title: &str, app: &str) -> WindowContext {
        WindowContext::new(Some(title.to_string()), Some(app.to_string()))
    }

    #[test]
    fn test_labels() {
        let ctx = ctx("Inbox - Gmail", "Chrome");
        let label = |pattern: Option<&str>| {
            SpotLabel::for_spot(&Spot::new("s", 0, 0, pattern.map(str::to_string)), &ctx).to_string()
        };
        assert_eq!(label(None), "global");
        assert_eq!(label(Some("Gmail")), "this window: Gmail");
        assert_eq!(label(Some("Outlook")), "window: Outlook");
        assert_eq!(label(Some("app:Chrome")), "this app: Chrome");
        assert_eq!(label(Some("app:Slack")), "app: Slack");
    }

    #[test]
    fn test_list_row_display() {
        let row = ListRow::new(&Spot::new("send", 10, -4, None), &WindowContext::default());
        assert_eq!(row.to_string(), "send (10, -4) [global]");
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10, "  "),
            vec!["the quick", "  brown", "  fox", "  jumps"]
        );
        assert_eq!(wrap_text("short", 40, ""), vec!["short"]);
        assert!(wrap_text("   ", 10, "").is_empty());
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefgh", 3, ""), vec!["abc", "def", "gh"]);
    }
}
