//! Window matching.
//!
//! A spot with an empty pattern is global. Otherwise the stored pattern is
//! compared against the focused window: plain text is a case-insensitive
//! substring test on the title, `app:<Name>` tests the application name, and
//! a combined `(?=.*A)(?=.*B)` pattern requires every fragment to appear in
//! the title.

pub mod title_parser;

pub use title_parser::{Suggestion, SuggestionKind, suggest_patterns, title_segments};

/// Prefix marking an application-name pattern
pub const APP_PREFIX: &str = "app:";

const COMBINED_GROUP_OPEN: &str = "(?=.*";

/// Core matching rule: an empty pattern always matches, otherwise the
/// pattern must be a case-insensitive substring of `window_title`.
pub fn matches(pattern: &str, window_title: &str) -> bool {
    pattern.is_empty() || window_title.to_lowercase().contains(&pattern.to_lowercase())
}

/// Snapshot of the focused window, taken once per operation.
///
/// Either field is `None` when the OS query failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowContext {
    pub title: Option<String>,
    pub app: Option<String>,
}

impl WindowContext {
    pub fn new(title: Option<String>, app: Option<String>) -> Self {
        Self { title, app }
    }

    /// Read the context from a window collaborator
    pub fn capture(window: &dyn crate::platform::WindowInfo) -> Self {
        let context = Self::new(window.current_window_title(), window.current_app_name());
        if context.title.is_none() {
            log::debug!("Window title unavailable; window spots will not match");
        }
        context
    }
}

/// A stored window pattern, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowPattern<'a> {
    /// No pattern; active everywhere
    Global,
    /// `app:<Name>`
    App(&'a str),
    /// Every fragment must appear in the title
    Combined(Vec<String>),
    /// Plain substring of the title
    Title(&'a str),
}

impl<'a> WindowPattern<'a> {
    pub fn parse(raw: Option<&'a str>) -> Self {
        let Some(raw) = raw.filter(|p| !p.is_empty()) else {
            return WindowPattern::Global;
        };
        if let Some(app) = raw.strip_prefix(APP_PREFIX) {
            return WindowPattern::App(app);
        }
        if raw.starts_with(COMBINED_GROUP_OPEN) {
            match decode_combined(raw) {
                Some(fragments) => return WindowPattern::Combined(fragments),
                None => log::debug!(
                    "Combined pattern {:?} could not be decoded; using substring match",
                    raw
                ),
            }
        }
        WindowPattern::Title(raw)
    }

    pub fn is_global(&self) -> bool {
        matches!(self, WindowPattern::Global)
    }

    /// Whether the pattern is active for the given window.
    /// Unavailable window information never matches a non-global pattern.
    pub fn matches(&self, context: &WindowContext) -> bool {
        match self {
            WindowPattern::Global => true,
            WindowPattern::App(app) => context
                .app
                .as_deref()
                .is_some_and(|current| matches(app, current)),
            WindowPattern::Combined(fragments) => {
                context.title.as_deref().is_some_and(|title| {
                    fragments.iter().all(|fragment| matches(fragment, title))
                })
            }
            WindowPattern::Title(pattern) => context
                .title
                .as_deref()
                .is_some_and(|title| matches(pattern, title)),
        }
    }
}

/// Build a combined pattern from title segments
pub fn encode_combined<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| format!("{COMBINED_GROUP_OPEN}{})", regex::escape(s.as_ref())))
        .collect()
}

/// Split `(?=.*A)(?=.*B)` back into `["A", "B"]`, undoing regex escapes.
fn decode_combined(raw: &str) -> Option<Vec<String>> {
    let mut fragments = Vec::new();
    let mut rest = raw;
    while !rest.is_empty() {
        rest = rest.strip_prefix(COMBINED_GROUP_OPEN)?;
        let mut fragment = String::new();
        let mut chars = rest.char_indices();
        let mut end = None;
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => fragment.push(chars.next()?.1),
                ')' => {
                    end = Some(i);
                    break;
                }
                c => fragment.push(c),
            }
        }
        let end = end?;
        if fragment.is_empty() {
            return None;
        }
        fragments.push(fragment);
        rest = &rest[end + 1..];
    }
    if fragments.is_empty() {
        None
    } else {
        Some(fragments)
    }
}
