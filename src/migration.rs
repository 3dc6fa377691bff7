//! One-time migration of the single-file layout.
//!
//! Before profiles existed every spot lived in `screen-spots.csv`. On startup
//! that file is copied into the active profile's file and renamed to
//! `screen-spots-migrated-backup.csv`, so it is never imported twice.

use crate::error::{Result, SpotError};
use crate::profile::{LEGACY_BACKUP_FILE_NAME, LEGACY_FILE_NAME, ProfileKey};
use crate::spots::SpotStore;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// No legacy file in the directory
    NoLegacyFile,
    /// The profile already has its own file; the legacy file was left alone
    Skipped,
    Migrated {
        spots: usize,
        /// Where the legacy file now lives
        backup: PathBuf,
    },
}

/// Import `dir/screen-spots.csv` into the file for `key`.
///
/// Runs only when the legacy file exists and the profile file does not. A
/// legacy file that cannot be parsed is left untouched and the error returned.
pub fn migrate_legacy(dir: &Path, key: &ProfileKey) -> Result<MigrationOutcome> {
    let legacy = dir.join(LEGACY_FILE_NAME);
    if !legacy.is_file() {
        return Ok(MigrationOutcome::NoLegacyFile);
    }

    let target = dir.join(key.file_name());
    if target.exists() {
        crate::debug_info!(
            "MIGRATION",
            "{:?} already exists; leaving {:?} in place",
            target,
            legacy
        );
        return Ok(MigrationOutcome::Skipped);
    }

    let store = SpotStore::load(&legacy)?;
    store.save_as(&target)?;

    let backup = dir.join(LEGACY_BACKUP_FILE_NAME);
    fs::rename(&legacy, &backup).map_err(|e| SpotError::io(&legacy, e))?;

    log::info!(
        "Migrated {} spots from {:?} to profile {}",
        store.len(),
        legacy,
        key
    );
    Ok(MigrationOutcome::Migrated {
        spots: store.len(),
        backup,
    })
}
