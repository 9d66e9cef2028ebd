//! Autosave: periodic backup of the placed elements to a key-value side channel.
//!
//! DESIGN
//! ======
//! The backup holds the element records only (not the full document) under
//! one key, with the map dimensions under two more. A backup counts as present
//! only when all three keys exist. The host decides whether to offer a resume;
//! this module just writes, detects, restores and clears.
//!
//! Ticks are driven by the host's clock as elapsed time since the session
//! started, so the same code serves a frame loop and a scripted replay.

#[cfg(test)]
#[path = "autosave_test.rs"]
mod autosave_test;

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::catalog::SpriteCatalog;
use crate::consts::{AUTOSAVE_INTERVAL_SECS, BACKUP_ELEMENTS_KEY, BACKUP_HEIGHT_KEY, BACKUP_WIDTH_KEY};
use crate::doc::{LoadReport, SceneError, coerce_i64};
use crate::scene::Scene;

/// Error from a key-value store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Error raised while writing a backup.
#[derive(Debug, thiserror::Error)]
pub enum AutosaveError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode backup: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String key-value storage, shaped like browser `localStorage`.
pub trait KeyValueStore {
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-process store, for wasm hosts without persistence and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Fixed-cadence backup writer.
#[derive(Debug, Clone)]
pub struct Autosave {
    interval: Duration,
    last: Duration,
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new(Duration::from_secs(AUTOSAVE_INTERVAL_SECS))
    }
}

impl Autosave {
    /// Create a writer whose first backup falls one interval after time zero.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: Duration::ZERO }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Write a backup if at least one interval has passed since the last one.
    ///
    /// `now` is elapsed time since the session started. Returns whether a
    /// backup was written.
    ///
    /// # Errors
    ///
    /// Returns [`AutosaveError`] if encoding or the store write fails; the
    /// cadence still advances so a failing store is not hammered every frame.
    pub fn tick(&mut self, now: Duration, scene: &Scene, store: &mut impl KeyValueStore) -> Result<bool, AutosaveError> {
        if now.saturating_sub(self.last) < self.interval {
            return Ok(false);
        }
        self.last = now;
        save(scene, store)?;
        Ok(true)
    }
}

/// Write a backup of `scene` immediately.
///
/// # Errors
///
/// Returns [`AutosaveError`] if encoding or the store write fails.
pub fn save(scene: &Scene, store: &mut impl KeyValueStore) -> Result<(), AutosaveError> {
    let elements = serde_json::to_string(&scene.records())?;
    store.set(BACKUP_WIDTH_KEY, &scene.width().to_string())?;
    store.set(BACKUP_HEIGHT_KEY, &scene.height().to_string())?;
    store.set(BACKUP_ELEMENTS_KEY, &elements)?;
    info!(elements = scene.len(), "backup written");
    Ok(())
}

/// A backup found in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Backup {
    pub width: u32,
    pub height: u32,
    /// JSON array of element records.
    pub elements: String,
}

impl Backup {
    /// Rebuild the backed-up scene, skipping bad records like an import does.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Parse`] if the stored elements are not a JSON array.
    pub fn restore(&self, catalog: &impl SpriteCatalog) -> Result<(Scene, LoadReport), SceneError> {
        Scene::restore(self.width, self.height, &self.elements, catalog)
    }
}

/// Look for a complete backup.
///
/// Dimensions are read the way they were written, as decimal strings; a
/// backup whose dimensions do not parse is treated as absent.
///
/// # Errors
///
/// Returns [`StoreError`] if the store cannot be read.
pub fn pending_backup(store: &impl KeyValueStore) -> Result<Option<Backup>, StoreError> {
    let (Some(width), Some(height), Some(elements)) = (
        store.get(BACKUP_WIDTH_KEY)?,
        store.get(BACKUP_HEIGHT_KEY)?,
        store.get(BACKUP_ELEMENTS_KEY)?,
    ) else {
        return Ok(None);
    };
    match (parse_dimension(&width), parse_dimension(&height)) {
        (Some(width), Some(height)) => Ok(Some(Backup { width, height, elements })),
        _ => {
            warn!(%width, %height, "ignoring backup with unreadable map dimensions");
            Ok(None)
        }
    }
}

/// Drop the backup, e.g. after the map has been exported.
///
/// # Errors
///
/// Returns [`StoreError`] if the store cannot be written.
pub fn clear(store: &mut impl KeyValueStore) -> Result<(), StoreError> {
    store.remove(BACKUP_ELEMENTS_KEY)?;
    store.remove(BACKUP_WIDTH_KEY)?;
    store.remove(BACKUP_HEIGHT_KEY)?;
    Ok(())
}

fn parse_dimension(raw: &str) -> Option<u32> {
    match coerce_i64(&Value::String(raw.to_owned())).map(u32::try_from) {
        Some(Ok(v)) if v > 0 => Some(v),
        _ => None,
    }
}
