//! Every resident profile store.
//!
//! The spots directory can hold files for many profiles (other machines,
//! other screens, other resolutions). [`SpotRegistry::reload`] scans it and
//! brings the resident set in line with disk; [`SpotRegistry::active`] hands
//! out the store for one profile, creating its file on first use.

use super::store::SpotStore;
use crate::error::{Result, SpotError};
use crate::profile::ProfileKey;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// What a reload scan did, per profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// Newly loaded or re-read because the file changed
    pub loaded: Vec<ProfileKey>,
    pub unchanged: Vec<ProfileKey>,
    /// File gone; store removed
    pub dropped: Vec<ProfileKey>,
    /// File could not be parsed; previous state kept (if any)
    pub failed: Vec<ProfileKey>,
}

impl ReloadReport {
    /// Whether the scan changed anything in memory
    pub fn changed(&self) -> bool {
        !self.loaded.is_empty() || !self.dropped.is_empty()
    }
}

/// Resident stores keyed by profile
#[derive(Debug)]
pub struct SpotRegistry {
    dir: PathBuf,
    stores: BTreeMap<ProfileKey, SpotStore>,
}

impl SpotRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            stores: BTreeMap::new(),
        }
    }

    /// Directory holding the spot files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &ProfileKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Profile files present in the directory, sorted by key.
    /// A missing directory yields an empty list.
    pub fn profile_files(&self) -> Result<Vec<(ProfileKey, PathBuf)>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SpotError::io(&self.dir, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SpotError::io(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(key) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(ProfileKey::from_file_name)
            else {
                continue;
            };
            files.push((key, path));
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files)
    }

    /// Rescan the directory.
    ///
    /// Changed files are re-read and replace their store wholesale; a file
    /// that fails to parse keeps the previous store and is reported as
    /// failed. Stores whose file disappeared are dropped. Running it twice
    /// without intervening edits loads nothing the second time.
    pub fn reload(&mut self) -> Result<ReloadReport> {
        let files = self.profile_files()?;
        let mut report = ReloadReport::default();

        let present: Vec<&ProfileKey> = files.iter().map(|(key, _)| key).collect();
        let gone: Vec<ProfileKey> = self
            .stores
            .keys()
            .filter(|key| !present.contains(key))
            .cloned()
            .collect();
        for key in gone {
            log::info!("Spot file for profile {} is gone; dropping it", key);
            self.stores.remove(&key);
            report.dropped.push(key);
        }

        for (key, path) in files {
            if self.stores.get(&key).is_some_and(|store| !store.is_stale()) {
                report.unchanged.push(key);
                continue;
            }
            match SpotStore::load(&path) {
                Ok(store) => {
                    crate::debug_info!("SPOTS", "Loaded profile {} ({} spots)", key, store.len());
                    self.stores.insert(key.clone(), store);
                    report.loaded.push(key);
                }
                Err(e) => {
                    log::warn!("Keeping previous spots for profile {}: {}", key, e);
                    report.failed.push(key);
                }
            }
        }

        log::info!(
            "Reloaded spots: {} loaded, {} unchanged, {} dropped, {} failed",
            report.loaded.len(),
            report.unchanged.len(),
            report.dropped.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Store for `key`, up to date with its file.
    ///
    /// A missing file is created with just the header. An externally edited
    /// file is re-read; if that fails the resident copy stays in use.
    pub fn active(&mut self, key: &ProfileKey) -> Result<&mut SpotStore> {
        let path = self.path_for(key);

        let needs_load = match self.stores.get(key) {
            None => true,
            Some(store) => store.is_stale(),
        };
        if needs_load {
            if !path.exists() {
                self.stores.insert(key.clone(), SpotStore::open_or_create(&path)?);
            } else {
                match SpotStore::load(&path) {
                    Ok(store) => {
                        self.stores.insert(key.clone(), store);
                    }
                    Err(e) if self.stores.contains_key(key) => {
                        log::warn!("Keeping previous spots for profile {}: {}", key, e);
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        match self.stores.get_mut(key) {
            Some(store) => Ok(store),
            None => Err(SpotError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "spot store not resident"),
            )),
        }
    }

    /// Resident store for `key`, without touching disk
    pub fn get(&self, key: &ProfileKey) -> Option<&SpotStore> {
        self.stores.get(key)
    }

    /// Resident stores in key order
    pub fn stores(&self) -> impl Iterator<Item = (&ProfileKey, &SpotStore)> {
        self.stores.iter()
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}
