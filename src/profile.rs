//! Profile resolution.
//!
//! A profile is the `(hostname, screen index, resolution)` triple that picks
//! which spot file is authoritative right now. The key-to-filename mapping is
//! a pure function so sanitisation and collisions can be tested without
//! touching the disk; [`ProfileKey::from_file_name`] is its inverse and is
//! what the reload scan uses to recognise profile files.

use crate::error::PlatformError;
use crate::platform::ScreenInfo;
use std::fmt;

/// Prefix shared by every spot file
pub const FILE_PREFIX: &str = "screen-spots";
/// Extension of every spot file
pub const FILE_EXTENSION: &str = "csv";
/// Single-file layout that predates profiles
pub const LEGACY_FILE_NAME: &str = "screen-spots.csv";
/// Name the legacy file is renamed to once migrated
pub const LEGACY_BACKUP_FILE_NAME: &str = "screen-spots-migrated-backup.csv";

/// Identifies one (machine, screen, resolution) context
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfileKey {
    /// Sanitised machine name
    pub hostname: String,
    pub screen_index: u32,
    pub width: u32,
    pub height: u32,
}

impl ProfileKey {
    /// Build a key, sanitising the hostname for use in a file name
    pub fn new(hostname: &str, screen_index: u32, width: u32, height: u32) -> Self {
        Self {
            hostname: sanitize_component(hostname),
            screen_index,
            width,
            height,
        }
    }

    /// File name backing this profile,
    /// `screen-spots-<hostname>-<screen>-<width>x<height>.csv`
    pub fn file_name(&self) -> String {
        format!(
            "{FILE_PREFIX}-{}-{}-{}x{}.{FILE_EXTENSION}",
            self.hostname, self.screen_index, self.width, self.height
        )
    }

    /// Recover a key from a profile file name.
    ///
    /// Returns `None` for anything that does not follow the naming
    /// convention, including the legacy file and its backup and any
    /// non-canonical spelling of a key (`1920X1080`, `00`). Hostnames may
    /// contain `-`, so the name is split from the right.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name == LEGACY_FILE_NAME || name == LEGACY_BACKUP_FILE_NAME {
            return None;
        }
        let stem = name
            .strip_prefix(FILE_PREFIX)?
            .strip_prefix('-')?
            .strip_suffix(FILE_EXTENSION)?
            .strip_suffix('.')?;

        let mut parts = stem.rsplitn(3, '-');
        let resolution = parts.next()?;
        let screen_index = parts.next()?.parse::<u32>().ok()?;
        let hostname = parts.next()?;
        if hostname.is_empty() {
            return None;
        }

        let (width, height) = parse_resolution(resolution)?;
        let key = Self {
            hostname: sanitize_component(hostname),
            screen_index,
            width,
            height,
        };
        // Only the canonical spelling maps to a key, so one key has one file
        (key.file_name() == name).then_some(key)
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}x{}",
            self.hostname, self.screen_index, self.width, self.height
        )
    }
}

/// Query the collaborators and build the active profile key.
///
/// Any query failure is returned as-is; no spot operation can proceed
/// without a profile.
pub fn resolve_profile(screen: &dyn ScreenInfo) -> Result<ProfileKey, PlatformError> {
    let hostname = screen.hostname()?;
    let index = screen.active_screen_index()?;
    let (width, height) = screen.active_screen_resolution()?;
    let key = ProfileKey::new(&hostname, index, width, height);
    crate::debug_log!("PROFILE", "Resolved profile {}", key);
    Ok(key)
}

/// Parse `WIDTHxHEIGHT` (also accepts `X`)
pub fn parse_resolution(text: &str) -> Option<(u32, u32)> {
    let (w, h) = text.split_once(['x', 'X'])?;
    let width = w.trim().parse::<u32>().ok()?;
    let height = h.trim().parse::<u32>().ok()?;
    Some((width, height))
}

/// Replace characters that are unsafe in file names (and whitespace) with `_`.
/// An empty result becomes `unknown`.
fn sanitize_component(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake::FakeScreen;

    #[test]
    fn test_file_name_format() {
        let key = ProfileKey::new("Host", 0, 1920, 1080);
        assert_eq!(key.file_name(), "screen-spots-Host-0-1920x1080.csv");
        assert_eq!(key.to_string(), "Host-0-1920x1080");
    }

    #[test]
    fn test_file_name_is_deterministic() {
        let a = ProfileKey::new("work-laptop", 1, 2560, 1440);
        let b = ProfileKey::new("work-laptop", 1, 2560, 1440);
        assert_eq!(a.file_name(), b.file_name());
    }

    #[test]
    fn test_hostname_sanitized() {
        let key = ProfileKey::new("My Mac Book/Pro:1", 2, 1280, 800);
        assert_eq!(key.hostname, "My_Mac_Book_Pro_1");
        assert_eq!(key.file_name(), "screen-spots-My_Mac_Book_Pro_1-2-1280x800.csv");

        let key = ProfileKey::new("host.local", 0, 800, 600);
        assert_eq!(key.hostname, "host.local");

        let key = ProfileKey::new("   ", 0, 800, 600);
        assert_eq!(key.hostname, "unknown");
    }

    #[test]
    fn test_from_file_name_inverts_file_name() {
        for key in [
            ProfileKey::new("Host", 0, 1920, 1080),
            ProfileKey::new("dev-box-02", 3, 3840, 2160),
            ProfileKey::new("a b", 1, 1, 1),
        ] {
            assert_eq!(ProfileKey::from_file_name(&key.file_name()), Some(key));
        }
    }

    #[test]
    fn test_from_file_name_rejects_other_files() {
        for name in [
            LEGACY_FILE_NAME,
            LEGACY_BACKUP_FILE_NAME,
            "screen-spots-Host-0-1920x1080.csv.tmp",
            "screen-spots-Host-x-1920x1080.csv",
            "screen-spots-Host-0-1920.csv",
            "screen-spots-0-1920x1080.csv",
            "notes.csv",
            "screen-spots-Host-0-1920x1080.txt",
            "screen-spots-Host-0-1920X1080.csv",
            "screen-spots-Host-+0-1920x1080.csv",
            "screen-spots-Host-00-1920x1080.csv",
            "screen-spots-Host-0-1920x 1080.csv",
            "screen-spots-Host-0- 1920x1080.csv",
            "screen-spots-Host-0-01920x1080.csv",
            "screen-spots-My Host-0-1920x1080.csv",
        ] {
            assert_eq!(ProfileKey::from_file_name(name), None, "{name}");
        }
    }

    #[test]
    fn test_resolve_profile() {
        let screen = FakeScreen::new("Host", 1, (2560, 1440));
        let key = resolve_profile(&screen).unwrap();
        assert_eq!(key, ProfileKey::new("Host", 1, 2560, 1440));

        screen.disconnect();
        assert!(resolve_profile(&screen).is_err());
    }

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("1920x1080"), Some((1920, 1080)));
        assert_eq!(parse_resolution("800X600"), Some((800, 600)));
        assert_eq!(parse_resolution("1920"), None);
        assert_eq!(parse_resolution("ax1"), None);
    }
}
