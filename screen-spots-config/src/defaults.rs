//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! `Config` fields so that partial files keep working across upgrades.

// ── Primitive helpers ──────────────────────────────────────────────────────

pub fn bool_false() -> bool {
    false
}

// ── Heatmap overlay ────────────────────────────────────────────────────────

pub fn heatmap_color() -> String {
    "ff0F9D58".to_string()
}

pub fn heatmap_size() -> u32 {
    5
}

// ── Cursor movement ────────────────────────────────────────────────────────

/// Maximum pixels per axis per tick when slow movement is on.
pub fn slow_move_distance() -> u32 {
    200
}

pub fn slow_move_tick_ms() -> u64 {
    16
}

/// How long a click holds the button down, in microseconds.
pub fn click_hold_us() -> u64 {
    16_000
}

pub fn drag_release_delay_ms() -> u64 {
    50
}

// ── File watching ──────────────────────────────────────────────────────────

pub fn watch_debounce_ms() -> u64 {
    250
}
