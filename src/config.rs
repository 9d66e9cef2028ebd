//! Editor settings loaded from environment variables.
//!
//! Every knob has a default, so an empty environment gives the stock editor:
//! a 320x180 map, 16px tiles, snapping off, a backup every 30 seconds.
//! Unparseable values fall back to the default with a warning.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use editor::consts::{AUTOSAVE_INTERVAL_SECS, GAME_HEIGHT, GAME_WIDTH, TILE_SIZE};
use editor::engine::Grid;
use tracing::warn;

pub(crate) const DEFAULT_BACKUP_DIR: &str = ".leveledit";
const DEFAULT_SCALE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EditorConfig {
    /// Grid cell size in scene pixels.
    pub(crate) tile_size: u32,
    /// Snap drops and drag releases to the grid.
    pub(crate) snap: bool,
    pub(crate) autosave_secs: u64,
    /// Directory holding the file-backed backup store.
    pub(crate) backup_dir: PathBuf,
    /// Dimensions of a blank map.
    pub(crate) map_width: u32,
    pub(crate) map_height: u32,
    /// Device-to-scene scale for scripted pointer coordinates.
    pub(crate) scale: f64,
}

impl Default for EditorConfig {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            snap: false,
            autosave_secs: AUTOSAVE_INTERVAL_SECS,
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            map_width: GAME_WIDTH as u32,
            map_height: GAME_HEIGHT as u32,
            scale: DEFAULT_SCALE,
        }
    }
}

impl EditorConfig {
    pub(crate) fn from_env() -> Self {
        let defaults = Self::default();
        let scale = env_parse("LEVELEDIT_SCALE", defaults.scale);
        Self {
            tile_size: env_parse("LEVELEDIT_TILE_SIZE", defaults.tile_size),
            snap: env_flag("LEVELEDIT_SNAP", defaults.snap),
            autosave_secs: env_parse("LEVELEDIT_AUTOSAVE_SECS", defaults.autosave_secs),
            backup_dir: std::env::var_os("LEVELEDIT_BACKUP_DIR").map_or(defaults.backup_dir, PathBuf::from),
            map_width: env_parse("LEVELEDIT_MAP_WIDTH", defaults.map_width),
            map_height: env_parse("LEVELEDIT_MAP_HEIGHT", defaults.map_height),
            scale: if scale.is_finite() && scale > 0.0 { scale } else { defaults.scale },
        }
    }

    pub(crate) fn grid(&self) -> Grid {
        Grid { snap: self.snap, tile_size: self.tile_size }
    }

    pub(crate) fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_secs)
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable setting");
            default
        }
    }
}

/// Boolean settings accept `1/0`, `true/false`, `yes/no` and `on/off`.
fn env_flag(key: &str, default: bool) -> bool {
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!(key, value = %raw, "ignoring unparseable flag");
            default
        }
    }
}
