//! Shared numeric constants for the editor crate.

// ── Reference resolution ────────────────────────────────────────

/// Width of the reference viewport; the render scale is derived from it.
pub const GAME_WIDTH: f64 = 320.0;

/// Height of the reference viewport.
pub const GAME_HEIGHT: f64 = 180.0;

// ── Grid ────────────────────────────────────────────────────────

/// Edge length of one map tile in scene units.
pub const TILE_SIZE: u32 = 16;

// ── Scale steps below 1× ────────────────────────────────────────

pub const SCALE_THREE_QUARTERS: f64 = 0.75;
pub const SCALE_HALF: f64 = 0.5;
pub const SCALE_QUARTER: f64 = 0.25;

// ── Rendering ───────────────────────────────────────────────────

/// Opacity used for the element currently being dragged.
pub const HIGHLIGHT_ALPHA: f64 = 0.5;

// ── Autosave ────────────────────────────────────────────────────

/// Default autosave cadence in seconds.
pub const AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Storage key holding the backed-up element records.
pub const BACKUP_ELEMENTS_KEY: &str = "elements";

/// Storage key holding the backed-up map width.
pub const BACKUP_WIDTH_KEY: &str = "mapWidth";

/// Storage key holding the backed-up map height.
pub const BACKUP_HEIGHT_KEY: &str = "mapHeight";
