//! The spot engine: one entry point per user command.
//!
//! Every operation re-resolves the profile first, so moving the cursor to
//! another screen (or changing resolution) switches spot files without any
//! explicit step. Spot lookups that find nothing are not errors; they return
//! `false`/`None` and log a notice.

use crate::error::Result;
use crate::migration::{self, MigrationOutcome};
use crate::overlay::{Heatmap, HeatmapPoint, ListRow};
use crate::platform::{CursorControl, ScreenInfo, WindowInfo};
use crate::profile::{ProfileKey, resolve_profile};
use crate::selection::{Choice, PatternSelection, PendingSave};
use crate::slow_mover::SlowCursor;
use crate::spots::{ReloadReport, Spot, SpotRegistry, SpotStore};
use crate::window::{WindowContext, suggest_patterns};
use screen_spots_config::Config;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Result of starting a window spot save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveWindowOutcome {
    /// Nothing to suggest (no title, no app); saved as a global spot
    Saved(Spot),
    /// Waiting for [`SpotEngine::confirm_pattern`] or [`SpotEngine::cancel_pattern`]
    AwaitingChoice(PendingSave),
}

/// One line of the profile overview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub key: ProfileKey,
    pub path: PathBuf,
    pub spot_count: usize,
    pub active: bool,
}

/// Which spots a cursor action may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Global spots and matching window spots
    Any,
    /// Matching window spots only
    WindowOnly,
}

pub struct SpotEngine {
    config: Config,
    registry: SpotRegistry,
    screen: Box<dyn ScreenInfo>,
    window: Box<dyn WindowInfo>,
    cursor: Box<dyn CursorControl>,
    selection: PatternSelection,
    heatmap_visible: bool,
}

impl std::fmt::Debug for SpotEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotEngine")
            .field("spots_dir", &self.registry.dir())
            .field("selection", &self.selection)
            .field("heatmap_visible", &self.heatmap_visible)
            .finish_non_exhaustive()
    }
}

impl SpotEngine {
    /// Build an engine. When `slow_move_enabled` is set the cursor is
    /// wrapped so every move is stepped.
    pub fn new(
        config: Config,
        screen: Box<dyn ScreenInfo>,
        window: Box<dyn WindowInfo>,
        cursor: Box<dyn CursorControl>,
    ) -> Self {
        let cursor: Box<dyn CursorControl> = if config.slow_move_enabled {
            Box::new(SlowCursor::new(
                cursor,
                config.slow_move_distance,
                Duration::from_millis(config.slow_move_tick_ms),
            ))
        } else {
            cursor
        };
        let registry = SpotRegistry::new(config.spots_dir());

        Self {
            config,
            registry,
            screen,
            window,
            cursor,
            selection: PatternSelection::default(),
            heatmap_visible: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &SpotRegistry {
        &self.registry
    }

    /// Migrate the legacy file for the current profile, then load every
    /// profile file. A missing profile only skips the migration.
    pub fn startup(&mut self) -> Result<ReloadReport> {
        match resolve_profile(self.screen.as_ref()) {
            Ok(key) => match migration::migrate_legacy(self.registry.dir(), &key) {
                Ok(MigrationOutcome::Migrated { spots, backup }) => {
                    log::info!("Migrated {} legacy spots; backup at {:?}", spots, backup);
                }
                Ok(_) => {}
                Err(e) => log::warn!("Legacy spot migration failed: {}", e),
            },
            Err(e) => log::warn!("Skipping legacy migration, no profile: {}", e),
        }
        self.registry.reload()
    }

    /// Current profile key
    pub fn active_profile(&self) -> Result<ProfileKey> {
        Ok(resolve_profile(self.screen.as_ref())?)
    }

    /// Store for the current profile
    pub fn active_store(&mut self) -> Result<&mut SpotStore> {
        let key = self.active_profile()?;
        self.registry.active(&key)
    }

    pub fn window_context(&self) -> WindowContext {
        WindowContext::capture(self.window.as_ref())
    }

    // ========================================================================
    // Saving
    // ========================================================================

    /// Save a global spot at the current cursor position
    pub fn save_spot(&mut self, name: &str) -> Result<Spot> {
        let (x, y) = self.cursor.position();
        self.save_spot_at(name, x, y, None)
    }

    /// Save (or overwrite) a spot in the current profile
    pub fn save_spot_at(&mut self, name: &str, x: i32, y: i32, pattern: Option<&str>) -> Result<Spot> {
        let key = self.active_profile()?;
        self.save_in_profile(&key, Spot::new(name, x, y, pattern.map(str::to_string)))
    }

    fn save_in_profile(&mut self, key: &ProfileKey, spot: Spot) -> Result<Spot> {
        self.registry.active(key)?.save_spot(spot.clone())?;
        match &spot.window_pattern {
            Some(pattern) => log::info!(
                "Saved spot {:?} at ({}, {}) for windows matching {:?} in {}",
                spot.name,
                spot.x,
                spot.y,
                pattern,
                key
            ),
            None => log::info!(
                "Saved global spot {:?} at ({}, {}) in {}",
                spot.name,
                spot.x,
                spot.y,
                key
            ),
        }
        Ok(spot)
    }

    /// Capture the cursor position and window, and offer pattern suggestions.
    ///
    /// The profile is fixed now; confirming later saves into it even if the
    /// cursor has since moved to another screen.
    pub fn begin_save_window(&mut self, name: &str) -> Result<SaveWindowOutcome> {
        let key = self.active_profile()?;
        let (x, y) = self.cursor.position();
        let context = self.window_context();
        let suggestions = suggest_patterns(
            context.title.as_deref().unwrap_or(""),
            context.app.as_deref(),
        );

        if suggestions.is_empty() {
            log::info!("No window information; saving {:?} as a global spot", name);
            let spot = self.save_in_profile(&key, Spot::new(name, x, y, None))?;
            return Ok(SaveWindowOutcome::Saved(spot));
        }

        let pending = PendingSave {
            name: name.trim().to_string(),
            x,
            y,
            profile: key,
            suggestions,
        };
        self.selection.begin(pending.clone());
        Ok(SaveWindowOutcome::AwaitingChoice(pending))
    }

    pub fn pending_selection(&self) -> Option<&PendingSave> {
        self.selection.pending()
    }

    /// Finish the pending window spot save.
    ///
    /// If the spot cannot be written the save stays pending, so the same
    /// choice can be confirmed again.
    pub fn confirm_pattern(&mut self, choice: Choice) -> Result<Spot> {
        let pending = self.selection.pending().cloned();
        let resolved = self.selection.confirm(choice)?;
        let result = self.save_in_profile(
            &resolved.profile,
            Spot::new(resolved.name, resolved.x, resolved.y, resolved.pattern),
        );
        if let (Err(e), Some(pending)) = (&result, pending) {
            log::warn!("Saving {:?} failed, still awaiting a pattern: {}", pending.name, e);
            self.selection.begin(pending);
        }
        result
    }

    /// Abandon the pending save. Returns whether one was pending.
    pub fn cancel_pattern(&mut self) -> bool {
        match self.selection.cancel() {
            Some(pending) => {
                log::info!("Cancelled saving {:?}", pending.name);
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Cursor actions
    // ========================================================================

    fn usable_spot(&mut self, name: &str, scope: Scope) -> Result<Option<Spot>> {
        let context = self.window_context();
        let store = self.active_store()?;
        let Some(spot) = store.get(name).cloned() else {
            log::info!("Spot {:?} not found in {:?}", name, store.path());
            return Ok(None);
        };
        if scope == Scope::WindowOnly && spot.is_global() {
            log::info!("Spot {:?} is global; ignored by window-only command", spot.name);
            return Ok(None);
        }
        if !spot.is_active_in(&context) {
            log::info!(
                "Spot {:?} does not apply to window {:?}",
                spot.name,
                context.title.as_deref().unwrap_or("<unknown>")
            );
            return Ok(None);
        }
        Ok(Some(spot))
    }

    pub fn move_to_spot(&mut self, name: &str) -> Result<bool> {
        self.move_in_scope(name, Scope::Any)
    }

    pub fn move_to_spot_window(&mut self, name: &str) -> Result<bool> {
        self.move_in_scope(name, Scope::WindowOnly)
    }

    fn move_in_scope(&mut self, name: &str, scope: Scope) -> Result<bool> {
        let Some(spot) = self.usable_spot(name, scope)? else {
            return Ok(false);
        };
        self.cursor.move_cursor(spot.x, spot.y);
        Ok(true)
    }

    /// Click the spot and put the cursor back where it was
    pub fn click_spot(&mut self, name: &str) -> Result<bool> {
        self.click_in_scope(name, Scope::Any)
    }

    pub fn click_spot_window(&mut self, name: &str) -> Result<bool> {
        self.click_in_scope(name, Scope::WindowOnly)
    }

    fn click_in_scope(&mut self, name: &str, scope: Scope) -> Result<bool> {
        let Some(spot) = self.usable_spot(name, scope)? else {
            return Ok(false);
        };
        let (origin_x, origin_y) = self.cursor.position();
        self.cursor.move_cursor(spot.x, spot.y);
        self.cursor
            .click(Duration::from_micros(self.config.click_hold_us));
        self.cursor.move_cursor(origin_x, origin_y);
        crate::debug_log!("CURSOR", "Clicked {:?} at ({}, {})", spot.name, spot.x, spot.y);
        Ok(true)
    }

    /// Press at the current position and move to the spot, leaving the button down
    pub fn drag_spot(&mut self, name: &str) -> Result<bool> {
        self.drag_in_scope(name, Scope::Any)
    }

    pub fn drag_spot_window(&mut self, name: &str) -> Result<bool> {
        self.drag_in_scope(name, Scope::WindowOnly)
    }

    fn drag_in_scope(&mut self, name: &str, scope: Scope) -> Result<bool> {
        let Some(spot) = self.usable_spot(name, scope)? else {
            return Ok(false);
        };
        self.cursor.press();
        self.cursor.move_cursor(spot.x, spot.y);
        Ok(true)
    }

    /// Drag to the spot, wait `drag_release_delay_ms`, then release
    pub fn swipe_spot(&mut self, name: &str) -> Result<bool> {
        self.swipe_in_scope(name, Scope::Any)
    }

    pub fn swipe_spot_window(&mut self, name: &str) -> Result<bool> {
        self.swipe_in_scope(name, Scope::WindowOnly)
    }

    fn swipe_in_scope(&mut self, name: &str, scope: Scope) -> Result<bool> {
        if !self.drag_in_scope(name, scope)? {
            return Ok(false);
        }
        let delay = Duration::from_millis(self.config.drag_release_delay_ms);
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        self.cursor.release();
        Ok(true)
    }

    // ========================================================================
    // Clearing
    // ========================================================================

    pub fn clear_spot(&mut self, name: &str) -> Result<bool> {
        let removed = self.active_store()?.delete(name)?;
        if removed {
            log::info!("Cleared spot {:?}", name);
        } else {
            log::info!("Spot {:?} not found; nothing cleared", name);
        }
        Ok(removed)
    }

    /// Remove every spot in the current profile only
    pub fn clear_all(&mut self) -> Result<usize> {
        let key = self.active_profile()?;
        let removed = self.registry.active(&key)?.clear_all()?;
        log::info!("Cleared {} spots from profile {}", removed, key);
        Ok(removed)
    }

    /// Remove the window spots that apply to the focused window
    pub fn clear_window_spots(&mut self) -> Result<usize> {
        let context = self.window_context();
        let removed = self.active_store()?.delete_matching_window(&context)?;
        log::info!("Cleared {} window spots", removed);
        Ok(removed)
    }

    // ========================================================================
    // Overlays
    // ========================================================================

    /// Every spot in the current profile, labelled for the focused window
    pub fn list_rows(&mut self) -> Result<Vec<ListRow>> {
        let context = self.window_context();
        let store = self.active_store()?;
        Ok(store.iter().map(|spot| ListRow::new(spot, &context)).collect())
    }

    /// Dots for the spots active in the focused window
    pub fn heatmap_points(&mut self) -> Result<Heatmap> {
        let context = self.window_context();
        let points = self
            .active_store()?
            .iter()
            .filter(|spot| spot.is_active_in(&context))
            .map(|spot| HeatmapPoint {
                x: spot.x,
                y: spot.y,
            })
            .collect();
        Ok(Heatmap {
            color: self.config.heatmap_color.clone(),
            size: self.config.heatmap_size,
            points,
        })
    }

    /// Flip heatmap visibility and return the new state
    pub fn toggle_heatmap(&mut self) -> bool {
        self.heatmap_visible = !self.heatmap_visible;
        self.heatmap_visible
    }

    pub fn heatmap_visible(&self) -> bool {
        self.heatmap_visible
    }

    // ========================================================================
    // Files and profiles
    // ========================================================================

    pub fn reload(&mut self) -> Result<ReloadReport> {
        self.registry.reload()
    }

    /// Resident profiles, with the current one loaded first if possible
    pub fn profiles(&mut self) -> Result<Vec<ProfileSummary>> {
        let active = match self.active_profile() {
            Ok(key) => {
                self.registry.active(&key)?;
                Some(key)
            }
            Err(e) => {
                log::warn!("Active profile unknown: {}", e);
                None
            }
        };

        Ok(self
            .registry
            .stores()
            .map(|(key, store)| ProfileSummary {
                key: key.clone(),
                path: store.path().to_path_buf(),
                spot_count: store.len(),
                active: active.as_ref() == Some(key),
            })
            .collect())
    }

    /// Path of the current profile's file, created header-only if absent
    pub fn spots_file(&mut self) -> Result<PathBuf> {
        Ok(self.active_store()?.path().to_path_buf())
    }
}
