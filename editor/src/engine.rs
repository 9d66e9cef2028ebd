use tracing::{debug, info};

use crate::catalog::{CatalogLookupError, SpriteCatalog};
use crate::doc::{Category, ElementId, LoadReport, SceneError};
use crate::input::{InputEvent, PaletteSource};
use crate::scene::Scene;
use crate::viewport::{Point, Viewport, determine_scale, snap_point};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementSpawned { id: ElementId, category: Category, index: usize },
    DragStarted { id: ElementId },
    ElementMoved { id: ElementId, x: f64, y: f64 },
    DragEnded { id: ElementId, x: f64, y: f64 },
    ElementDeleted { id: ElementId },
    /// The host must suppress the platform's default handling (context menu).
    PreventDefault,
    RenderNeeded,
}

/// Grid settings read from the host's snap checkbox at event time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub snap: bool,
    pub tile_size: u32,
}

impl Default for Grid {
    fn default() -> Self {
        Self { snap: false, tile_size: crate::consts::TILE_SIZE }
    }
}

/// Input controller: turns device-space pointer and drop events into scene
/// operations.
///
/// Holds no state beyond the current scale and the palette entry being
/// dragged in. All coordinates go through [`Viewport::device_to_scene`]; a
/// scale change applies from the next event on and never moves elements
/// already placed.
pub struct EngineCore<C> {
    pub scene: Scene,
    pub viewport: Viewport,
    pub catalog: C,
    palette: Option<PaletteSource>,
}

impl<C: SpriteCatalog> EngineCore<C> {
    #[must_use]
    pub fn new(scene: Scene, catalog: C) -> Self {
        Self { scene, viewport: Viewport::default(), catalog, palette: None }
    }

    // --- Palette drag-and-drop ---

    /// Remember which catalog entry the palette is dragging.
    pub fn on_palette_drag_start(&mut self, source: PaletteSource) {
        debug!(category = %source.category, index = source.index, "palette drag started");
        self.palette = Some(source);
    }

    /// The palette entry awaiting a drop, if any.
    #[must_use]
    pub fn palette_source(&self) -> Option<PaletteSource> {
        self.palette
    }

    /// Spawn the remembered palette entry at the drop point.
    ///
    /// Returns no actions if no palette drag was recorded.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogLookupError`] if the palette referenced a sprite the
    /// catalog no longer has.
    pub fn on_canvas_drop(&mut self, device: Point, grid: Grid) -> Result<Vec<Action>, CatalogLookupError> {
        let Some(source) = self.palette.take() else {
            debug!("drop ignored: no palette drag in progress");
            return Ok(Vec::new());
        };
        let anchor = Point::new(device.x - source.grab_offset.x, device.y - source.grab_offset.y);
        let mut pos = self.viewport.device_to_scene(anchor);
        if grid.snap {
            pos = snap_point(pos, grid.tile_size);
        }
        let element = self.scene.spawn(&self.catalog, source.category, source.index, pos.x, pos.y)?;
        Ok(vec![
            Action::ElementSpawned { id: element.id, category: element.category, index: element.catalog_index },
            Action::RenderNeeded,
        ])
    }

    // --- Pointer ---

    pub fn on_pointer_down(&mut self, device: Point) -> Vec<Action> {
        let pt = self.viewport.device_to_scene(device);
        if !self.scene.begin_drag(pt) {
            return Vec::new();
        }
        match self.scene.dragged_id() {
            Some(id) => vec![Action::DragStarted { id }, Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    pub fn on_pointer_move(&mut self, device: Point) -> Vec<Action> {
        let pt = self.viewport.device_to_scene(device);
        if !self.scene.update_drag(pt) {
            return Vec::new();
        }
        let Some(el) = self.scene.dragged_id().and_then(|id| self.scene.get(&id)) else {
            return Vec::new();
        };
        vec![Action::ElementMoved { id: el.id, x: el.position.x, y: el.position.y }, Action::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, device: Point, grid: Grid) -> Vec<Action> {
        let pt = self.viewport.device_to_scene(device);
        let Some(id) = self.scene.end_drag(pt, grid.snap, grid.tile_size) else {
            return Vec::new();
        };
        let Some(el) = self.scene.get(&id) else {
            return Vec::new();
        };
        vec![Action::DragEnded { id, x: el.position.x, y: el.position.y }, Action::RenderNeeded]
    }

    /// Delete the topmost element under the pointer. Always asks the host to
    /// suppress the context menu, hit or miss.
    pub fn on_secondary_click(&mut self, device: Point) -> Vec<Action> {
        let pt = self.viewport.device_to_scene(device);
        match self.scene.remove_at(pt) {
            Some(removed) => {
                vec![Action::PreventDefault, Action::ElementDeleted { id: removed.id }, Action::RenderNeeded]
            }
            None => vec![Action::PreventDefault],
        }
    }

    // --- Viewport ---

    /// Recompute the render scale for a resized container.
    pub fn on_resize(&mut self, container_w: f64, container_h: f64) -> Vec<Action> {
        let scale = determine_scale(container_w, container_h);
        if (scale - self.viewport.scale).abs() < f64::EPSILON {
            return Vec::new();
        }
        debug!(scale, "render scale changed");
        self.viewport.scale = scale;
        vec![Action::RenderNeeded]
    }

    /// Route a scripted event to its handler.
    ///
    /// # Errors
    ///
    /// Propagates [`CatalogLookupError`] from a drop.
    pub fn handle(&mut self, event: InputEvent, grid: Grid) -> Result<Vec<Action>, CatalogLookupError> {
        let actions = match event {
            InputEvent::PaletteDragStart { source } => {
                self.on_palette_drag_start(source);
                Vec::new()
            }
            InputEvent::CanvasDrop { x, y } => self.on_canvas_drop(Point::new(x, y), grid)?,
            InputEvent::PointerDown { x, y } => self.on_pointer_down(Point::new(x, y)),
            InputEvent::PointerMove { x, y } => self.on_pointer_move(Point::new(x, y)),
            InputEvent::PointerUp { x, y } => self.on_pointer_up(Point::new(x, y), grid),
            InputEvent::SecondaryClick { x, y } => self.on_secondary_click(Point::new(x, y)),
            InputEvent::Resize { width, height } => self.on_resize(width, height),
        };
        Ok(actions)
    }

    // --- Import / export ---

    /// Replace the scene with a parsed document. On error the current scene,
    /// including any drag in progress, is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Parse`] for a document that does not parse.
    pub fn import(&mut self, json: &str) -> Result<LoadReport, SceneError> {
        let (scene, report) = Scene::deserialize(json, &self.catalog)?;
        info!(loaded = report.loaded, skipped = report.skipped.len(), "map imported");
        self.scene = scene;
        self.palette = None;
        Ok(report)
    }

    /// Serialize the current scene for download.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Serialize`] if the document cannot be written.
    pub fn export(&self) -> Result<String, SceneError> {
        let json = self.scene.to_json()?;
        info!(elements = self.scene.len(), bytes = json.len(), "map exported");
        Ok(json)
    }
}
