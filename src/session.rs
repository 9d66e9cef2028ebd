//! Headless editing session driven by a JSONL input script.
//!
//! Each script line is one input event plus the millisecond timestamp it
//! happened at, e.g.
//!
//! ```text
//! {"at_ms": 0, "event": "palette_drag_start", "category": "wall", "index": 3}
//! {"at_ms": 120, "event": "canvas_drop", "x": 40, "y": 24}
//! ```
//!
//! Events go through the engine exactly as a browser shell would forward
//! them. The autosave is ticked after every event with the event's timestamp,
//! so a long script leaves the same backups a real session would.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::io::BufRead;
use std::time::Duration;

use editor::autosave::{self, Autosave, KeyValueStore};
use editor::catalog::SpriteCatalog;
use editor::doc::LoadReport;
use editor::engine::{Action, EngineCore, Grid};
use editor::input::InputEvent;
use editor::scene::Scene;
use editor::viewport::Viewport;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::AppError;
use crate::config::EditorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub(crate) struct ScriptLine {
    pub(crate) at_ms: u64,
    #[serde(flatten)]
    pub(crate) event: InputEvent,
}

/// Where the session's starting scene comes from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Origin<'a> {
    Blank,
    Map(&'a str),
    /// A pending backup if one exists, otherwise `fallback`.
    Resume { fallback: Option<&'a str> },
}

/// Counters reported when a script finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) events: usize,
    pub(crate) spawned: usize,
    pub(crate) moved: usize,
    pub(crate) deleted: usize,
    pub(crate) backups: usize,
}

pub(crate) struct Session<C, S> {
    pub(crate) core: EngineCore<C>,
    store: S,
    autosave: Autosave,
    grid: Grid,
    summary: Summary,
}

impl<C: SpriteCatalog, S: KeyValueStore> Session<C, S> {
    pub(crate) fn start(
        catalog: C,
        store: S,
        config: &EditorConfig,
        origin: Origin<'_>,
    ) -> Result<(Self, LoadReport), AppError> {
        let mut core = EngineCore::new(Scene::new(config.map_width, config.map_height), catalog);
        core.viewport = Viewport::new(config.scale);

        let report = match origin {
            Origin::Blank => LoadReport::default(),
            Origin::Map(json) => core.import(json)?,
            Origin::Resume { fallback } => match autosave::pending_backup(&store)? {
                Some(backup) => {
                    let (scene, report) = backup.restore(&core.catalog)?;
                    info!(elements = scene.len(), "resuming from backup");
                    core.scene = scene;
                    report
                }
                None => {
                    warn!("no backup to resume from");
                    match fallback {
                        Some(json) => core.import(json)?,
                        None => LoadReport::default(),
                    }
                }
            },
        };

        let session = Self {
            core,
            store,
            autosave: Autosave::new(config.autosave_interval()),
            grid: config.grid(),
            summary: Summary::default(),
        };
        Ok((session, report))
    }

    /// Apply one event, then give the autosave a chance to run.
    pub(crate) fn apply(&mut self, line: ScriptLine) -> Result<Vec<Action>, AppError> {
        let actions = self.core.handle(line.event, self.grid)?;
        self.summary.events += 1;
        for action in &actions {
            match action {
                Action::ElementSpawned { .. } => self.summary.spawned += 1,
                Action::DragEnded { .. } => self.summary.moved += 1,
                Action::ElementDeleted { .. } => self.summary.deleted += 1,
                _ => {}
            }
        }
        debug!(at_ms = line.at_ms, actions = actions.len(), "event applied");

        if self.autosave.tick(Duration::from_millis(line.at_ms), &self.core.scene, &mut self.store)? {
            self.summary.backups += 1;
        }
        Ok(actions)
    }

    /// Feed every non-blank line of `script` through [`Session::apply`].
    pub(crate) fn run(&mut self, script: impl BufRead) -> Result<Summary, AppError> {
        for (n, line) in script.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let parsed: ScriptLine =
                serde_json::from_str(&line).map_err(|source| AppError::Script { line: n + 1, source })?;
            self.apply(parsed)?;
        }
        Ok(self.summary)
    }

    /// Export the map and drop the backup.
    pub(crate) fn finish(mut self) -> Result<String, AppError> {
        let json = self.core.export()?;
        autosave::clear(&mut self.store)?;
        info!(elements = self.core.scene.len(), "session exported, backup cleared");
        Ok(json)
    }
}
