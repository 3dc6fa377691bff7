//! The spot record

use crate::window::{WindowContext, WindowPattern};
use serde::Serialize;

/// A named screen coordinate with an optional window condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spot {
    /// Display name as last saved; lookups ignore case
    pub name: String,
    pub x: i32,
    pub y: i32,
    /// `None` for a global spot
    pub window_pattern: Option<String>,
}

impl Spot {
    /// Create a spot, normalising a blank pattern to `None`
    pub fn new(name: impl Into<String>, x: i32, y: i32, window_pattern: Option<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            x,
            y,
            window_pattern: window_pattern
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        }
    }

    /// Case-insensitive lookup key
    pub fn key(&self) -> String {
        spot_key(&self.name)
    }

    pub fn coords(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn pattern(&self) -> WindowPattern<'_> {
        WindowPattern::parse(self.window_pattern.as_deref())
    }

    pub fn is_global(&self) -> bool {
        self.window_pattern.is_none()
    }

    /// Global spots are always active; window spots when their pattern matches
    pub fn is_active_in(&self, context: &WindowContext) -> bool {
        self.pattern().matches(context)
    }
}

/// One data row as written to disk, in column order
#[derive(Debug, Serialize)]
pub(crate) struct SpotRow<'a> {
    #[serde(rename = "Name")]
    pub name: &'a str,
    #[serde(rename = "X")]
    pub x: i32,
    #[serde(rename = "Y")]
    pub y: i32,
    /// Written as an empty field for global spots
    #[serde(rename = "WindowPattern")]
    pub window_pattern: Option<&'a str>,
}

impl<'a> From<&'a Spot> for SpotRow<'a> {
    fn from(spot: &'a Spot) -> Self {
        Self {
            name: &spot.name,
            x: spot.x,
            y: spot.y,
            window_pattern: spot.window_pattern.as_deref(),
        }
    }
}

/// Normalise a spot name for case-insensitive lookup
pub fn spot_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_pattern_is_global() {
        assert!(Spot::new("one", 1, 2, None).is_global());
        assert!(Spot::new("one", 1, 2, Some("   ".to_string())).is_global());
        let spot = Spot::new(" compose ", 1, 2, Some(" Gmail ".to_string()));
        assert_eq!(spot.name, "compose");
        assert_eq!(spot.window_pattern.as_deref(), Some("Gmail"));
    }

    #[test]
    fn test_key_ignores_case() {
        assert_eq!(Spot::new("Compose", 0, 0, None).key(), spot_key("compose"));
    }

    #[test]
    fn test_is_active_in() {
        let ctx = WindowContext::new(Some("Inbox - Gmail".into()), Some("Chrome".into()));
        assert!(Spot::new("a", 0, 0, None).is_active_in(&ctx));
        assert!(Spot::new("b", 0, 0, Some("gmail".into())).is_active_in(&ctx));
        assert!(!Spot::new("c", 0, 0, Some("Outlook".into())).is_active_in(&ctx));
    }
}
