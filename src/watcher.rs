//! Spots directory watcher.
//!
//! Watches the directory holding the profile CSV files so that edits made by
//! hand, by a sync tool, or on another machine trigger a reload. Only files
//! following the profile naming convention are reported; the legacy file,
//! its backup and our own `.csv.tmp` write files are ignored.
//!
//! Debouncing is per file: an editor that writes the same file several times
//! in quick succession produces one event.

use crate::profile::ProfileKey;
use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

/// A profile file was created, modified or removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotsChangedEvent {
    pub path: PathBuf,
}

impl SpotsChangedEvent {
    /// Profile the changed file belongs to
    pub fn profile(&self) -> Option<ProfileKey> {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(ProfileKey::from_file_name)
    }
}

pub struct SpotsWatcher {
    /// Kept alive to maintain watching
    _watcher: Box<dyn Watcher + Send>,
    event_receiver: Receiver<SpotsChangedEvent>,
    dir: PathBuf,
}

impl std::fmt::Debug for SpotsWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotsWatcher")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

fn is_profile_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(ProfileKey::from_file_name)
        .is_some()
}

/// Shared handler for both watcher backends
fn make_event_handler(
    debounce_delay: Duration,
    tx: Sender<SpotsChangedEvent>,
    last_event_times: Arc<Mutex<HashMap<PathBuf, Instant>>>,
) -> impl Fn(std::result::Result<Event, notify::Error>) + Send + 'static {
    move |result: std::result::Result<Event, notify::Error>| {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Spots watcher error: {}", e);
                return;
            }
        };

        // Create covers editors that save via rename; Remove covers deleted profiles
        if !matches!(
            event.kind,
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
        ) {
            return;
        }

        for path in event.paths.iter().filter(|p| is_profile_file(p)) {
            let should_send = {
                let now = Instant::now();
                let mut last = last_event_times.lock();
                match last.get(path) {
                    Some(previous) if now.duration_since(*previous) < debounce_delay => {
                        log::trace!("Debouncing spots event for {}", path.display());
                        false
                    }
                    _ => {
                        last.insert(path.clone(), now);
                        true
                    }
                }
            };

            if should_send {
                log::info!("Spot file changed: {}", path.display());
                if let Err(e) = tx.send(SpotsChangedEvent { path: path.clone() }) {
                    log::error!("Failed to send spots changed event: {}", e);
                }
            }
        }
    }
}

impl SpotsWatcher {
    /// Watch `dir` (non-recursively), creating it if needed.
    ///
    /// Uses the native backend when available and falls back to a
    /// `PollWatcher` checking every 500 ms otherwise.
    pub fn new(dir: &Path, debounce_delay_ms: u64) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create spots directory: {}", dir.display()))?;
        let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());

        let (tx, rx) = channel::<SpotsChangedEvent>();
        let debounce_delay = Duration::from_millis(debounce_delay_ms);
        let last_event_times = Arc::new(Mutex::new(HashMap::new()));

        let mut watcher = Self::create_watcher(debounce_delay, tx, last_event_times)?;
        watcher
            .watch(&canonical, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch spots directory: {}", canonical.display()))?;

        log::info!("Watching {} for spot file changes", canonical.display());

        Ok(Self {
            _watcher: watcher,
            event_receiver: rx,
            dir: canonical,
        })
    }

    fn create_watcher(
        debounce_delay: Duration,
        tx: Sender<SpotsChangedEvent>,
        last_event_times: Arc<Mutex<HashMap<PathBuf, Instant>>>,
    ) -> Result<Box<dyn Watcher + Send>> {
        let handler = make_event_handler(debounce_delay, tx.clone(), Arc::clone(&last_event_times));

        match notify::recommended_watcher(handler) {
            Ok(w) => {
                log::debug!("Spots watcher: using native (RecommendedWatcher) backend");
                Ok(Box::new(w))
            }
            Err(e) => {
                log::warn!(
                    "Spots watcher: native backend unavailable ({}); falling back to PollWatcher",
                    e
                );
                let poll_watcher = PollWatcher::new(
                    make_event_handler(debounce_delay, tx, last_event_times),
                    NotifyConfig::default().with_poll_interval(Duration::from_millis(500)),
                )
                .context("Failed to create fallback PollWatcher")?;
                Ok(Box::new(poll_watcher))
            }
        }
    }

    /// Directory being watched (canonicalised)
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Next pending event, without blocking
    pub fn try_recv(&self) -> Option<SpotsChangedEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Wait up to `timeout` for the next event
    pub fn recv_timeout(&self, timeout: Duration) -> Option<SpotsChangedEvent> {
        self.event_receiver.recv_timeout(timeout).ok()
    }

    /// Drain every pending event
    pub fn drain(&self) -> Vec<SpotsChangedEvent> {
        self.event_receiver.try_iter().collect()
    }
}
