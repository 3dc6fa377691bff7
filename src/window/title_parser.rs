//! Window title segmentation for the save-window-spot flow.
//!
//! Titles usually carry a stable part (application, site) and a volatile
//! part (document name, unread count). Splitting on the common separators
//! lets the user pick the stable part as the spot's pattern.
//!
//! Separators are ` - `, ` | `, ` — `, ` – `, ` : ` and `: `. Dots and
//! slashes are never separators so file names and domains survive intact.
//! URLs are reduced to their domain before splitting.

use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Segments shorter than this (in characters) are dropped
const MIN_SEGMENT_LEN: usize = 3;

const FILE_EXTENSIONS: &[&str] = &[
    ".md", ".py", ".js", ".ts", ".rs", ".txt", ".json", ".csv", ".html", ".css", ".xml", ".yml",
    ".yaml", ".toml", ".sh", ".bat", ".exe", ".app", ".pdf", ".doc", ".docx", ".xls", ".xlsx",
    ".png", ".jpg", ".jpeg", ".gif", ".svg",
];

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[^\s]+").expect("URL_RE is a valid static regex pattern")
});

static DELIMITER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+[|—–]\s+|\s+-\s+|\s+:\s+|:\s+")
        .expect("DELIMITER_RE is a valid static regex pattern")
});

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][-a-zA-Z0-9]*(\.[a-zA-Z0-9][-a-zA-Z0-9]*)+$")
        .expect("DOMAIN_RE is a valid static regex pattern")
});

/// What a suggestion was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    /// The focused application (`app:<Name>`)
    App,
    Segment,
    /// A segment that looks like a domain name
    Domain,
    /// All segments at once
    Combined,
    /// The whole, unsplit title
    FullTitle,
}

impl SuggestionKind {
    /// Short label shown next to the choice; plain segments have none
    pub fn label(&self) -> Option<&'static str> {
        match self {
            SuggestionKind::App => Some("app"),
            SuggestionKind::Segment => None,
            SuggestionKind::Domain => Some("domain"),
            SuggestionKind::Combined => Some("combined"),
            SuggestionKind::FullTitle => Some("full"),
        }
    }
}

/// One numbered choice offered when saving a window spot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Value stored in the `WindowPattern` column if chosen
    pub pattern: String,
    pub description: String,
    pub kind: SuggestionKind,
}

impl Suggestion {
    fn new(pattern: impl Into<String>, description: impl Into<String>, kind: SuggestionKind) -> Self {
        Self {
            pattern: pattern.into(),
            description: description.into(),
            kind,
        }
    }
}

/// Split a title into unique, meaningful segments (URLs reduced to domains).
pub fn title_segments(title: &str) -> Vec<String> {
    let title = title.trim();
    if title.is_empty() {
        return Vec::new();
    }

    let processed = URL_RE.replace_all(title, |caps: &Captures| url_to_domain(&caps[0]));

    let mut seen = HashSet::new();
    DELIMITER_RE
        .split(&processed)
        .map(str::trim)
        .filter(|seg| seg.chars().count() >= MIN_SEGMENT_LEN)
        .filter(|seg| seen.insert(seg.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Build the ordered suggestion list for a window.
///
/// Order: app (when known), segments, combined (when 2+ segments), then the
/// full title unless it already appeared. Returns an empty list when there is
/// neither a title nor an app name.
pub fn suggest_patterns(title: &str, app: Option<&str>) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if let Some(app) = app.map(str::trim).filter(|a| !a.is_empty()) {
        suggestions.push(Suggestion::new(
            format!("{}{app}", super::APP_PREFIX),
            format!("Any {app} window"),
            SuggestionKind::App,
        ));
    }

    let segments = title_segments(title);
    for segment in &segments {
        let kind = if is_domain(segment) {
            SuggestionKind::Domain
        } else {
            SuggestionKind::Segment
        };
        let description = match kind {
            SuggestionKind::Domain => "Domain",
            _ => "Title segment",
        };
        suggestions.push(Suggestion::new(segment.clone(), description, kind));
    }

    if segments.len() > 1 {
        suggestions.push(Suggestion::new(
            super::encode_combined(&segments),
            "Combined (all segments)",
            SuggestionKind::Combined,
        ));
    }

    let full = title.trim();
    if !full.is_empty()
        && !suggestions
            .iter()
            .any(|s| s.pattern.to_lowercase() == full.to_lowercase())
    {
        suggestions.push(Suggestion::new(full, "Full title", SuggestionKind::FullTitle));
    }

    suggestions
}

/// Whether text looks like a domain name rather than a file name
pub fn is_domain(text: &str) -> bool {
    if !text.contains('.') {
        return false;
    }
    let lower = text.to_lowercase();
    if FILE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return false;
    }
    DOMAIN_RE.is_match(text)
}

fn url_to_domain(url: &str) -> String {
    let no_protocol = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let domain = no_protocol.split('/').next().unwrap_or(no_protocol);
    domain.strip_prefix("www.").unwrap_or(domain).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_segments(title: &str, present: &[&str], absent: &[&str]) {
        let segments = title_segments(title);
        for want in present {
            assert!(
                segments.iter().any(|s| s == want),
                "{title:?}: missing {want:?} in {segments:?}"
            );
        }
        for unwanted in absent {
            assert!(
                !segments.iter().any(|s| s == unwanted),
                "{title:?}: unexpected {unwanted:?} in {segments:?}"
            );
        }
    }

    #[test]
    fn test_splits_on_common_separators() {
        assert_segments(
            "GitHub - screen-spots-improved - Cursor",
            &["GitHub", "screen-spots-improved", "Cursor"],
            &[" - "],
        );
        assert_segments("Gmail | Inbox | Google Chrome", &["Gmail", "Inbox", "Google Chrome"], &["|"]);
        assert_segments(
            "Project: README.md - Visual Studio Code",
            &["Project", "README.md", "Visual Studio Code"],
            &["README", "md"],
        );
        assert_segments("Document — Microsoft Word", &["Document", "Microsoft Word"], &["—"]);
        assert_segments("Page – Firefox", &["Page", "Firefox"], &["–"]);
    }

    #[test]
    fn test_urls_reduced_to_domain() {
        assert_segments(
            "https://github.com/user/repo - GitHub - Brave",
            &["github.com", "GitHub", "Brave"],
            &["https://github.com/user/repo", "user/repo"],
        );
        assert_segments(
            "https://www.google.com/search - Google - Chrome",
            &["google.com", "Google", "Chrome"],
            &["www.google.com"],
        );
        assert_segments(
            "Compare: https://site1.com vs https://site2.org - Browser",
            &["Compare", "site1.com vs site2.org", "Browser"],
            &[],
        );
    }

    #[test]
    fn test_short_and_duplicate_segments_dropped() {
        assert_eq!(
            title_segments("H | Long Segment Here | X | Another Good One"),
            vec!["Long Segment Here", "Another Good One"]
        );
        assert_eq!(title_segments("GitHub - github - Brave"), vec!["GitHub", "Brave"]);
    }

    #[test]
    fn test_empty_title_has_no_segments() {
        assert!(title_segments("").is_empty());
        assert!(title_segments("   ").is_empty());
        assert_eq!(title_segments("Terminal"), vec!["Terminal"]);
    }

    #[test]
    fn test_is_domain() {
        assert!(is_domain("github.com"));
        assert!(is_domain("example.org"));
        assert!(!is_domain("docs.rs"));
        assert!(!is_domain("README.md"));
        assert!(!is_domain("screen-spots.py"));
        assert!(!is_domain("GitHub"));
        assert!(!is_domain("site1.com vs site2.org"));
    }

    #[test]
    fn test_suggestions_order_and_kinds() {
        let suggestions = suggest_patterns("Inbox - Gmail", Some("Chrome"));
        let kinds: Vec<_> = suggestions.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SuggestionKind::App,
                SuggestionKind::Segment,
                SuggestionKind::Segment,
                SuggestionKind::Combined,
                SuggestionKind::FullTitle,
            ]
        );
        assert_eq!(suggestions[0].pattern, "app:Chrome");
        assert_eq!(suggestions[1].pattern, "Inbox");
        assert_eq!(suggestions[2].pattern, "Gmail");
        assert_eq!(suggestions[4].pattern, "Inbox - Gmail");
    }

    #[test]
    fn test_full_title_not_repeated() {
        let suggestions = suggest_patterns("Terminal", None);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Segment);
    }

    #[test]
    fn test_full_title_kept_when_all_segments_short() {
        let suggestions = suggest_patterns("ab", None);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::FullTitle);
        assert_eq!(suggestions[0].pattern, "ab");
    }

    #[test]
    fn test_no_title_no_app_gives_nothing() {
        assert!(suggest_patterns("", None).is_empty());
        assert!(suggest_patterns("  ", Some("  ")).is_empty());
        assert_eq!(suggest_patterns("", Some("Finder")).len(), 1);
    }
}
