// Library exports for the binary, integration tests and embedding front ends.
//
// The engine is synchronous and single-threaded. The only shared state is in
// the test fakes and the directory watcher, which use `parking_lot::Mutex`.

/// Application version (root crate version)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod cli;
pub mod engine;
pub mod error;
pub mod migration;
pub mod overlay;
pub mod platform;
pub mod profile;
pub mod selection;
pub mod slow_mover;
pub mod spots;
pub mod watcher;
pub mod window;

pub use engine::{ProfileSummary, SaveWindowOutcome, SpotEngine};
pub use error::{PlatformError, Result, SpotError};
pub use profile::{ProfileKey, resolve_profile};
pub use screen_spots_config::{Config, ConfigError, LogLevel};
pub use selection::{Choice, PatternSelection, PendingSave};
pub use spots::{ReloadReport, Spot, SpotRegistry, SpotStore};
pub use window::{WindowContext, WindowPattern, matches};
