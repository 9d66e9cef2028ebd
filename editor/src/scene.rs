//! The scene: the authoritative, ordered list of placed elements.
//!
//! Sequence order is paint order: later elements draw on top. Every query
//! that picks an element (hit-test, drag, delete) therefore scans from the end
//! backwards and takes the first match.
//!
//! At most one element is dragged at a time. The drag refers to its element
//! by [`ElementId`], and deleting that element clears the drag before the
//! sequence changes, so a drag can never outlive its element.
//!
//! Loading builds a complete new scene before anything is replaced: a
//! document that fails to parse leaves the caller's scene untouched, while
//! individual bad records are skipped with a warning.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::{CatalogLookupError, SpriteCatalog};
use crate::doc::{
    Category, ElementId, ElementRecord, LoadReport, MapDocument, RawDocument, SceneElement, SceneError, SkipReason,
    SkippedRecord,
};
use crate::hit;
use crate::input::DragState;
use crate::viewport::{Point, snap_point};

/// Placed elements plus the map dimensions they are saved against.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    width: u32,
    height: u32,
    elements: Vec<SceneElement>,
    drag: Option<DragState>,
}

impl Scene {
    /// Create an empty scene. Map dimensions are fixed for its lifetime.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, elements: Vec::new(), drag: None }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Elements in paint order (bottom first).
    #[must_use]
    pub fn elements(&self) -> &[SceneElement] {
        &self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Look up an element by runtime id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&SceneElement> {
        self.elements.iter().find(|el| el.id == *id)
    }

    /// The active drag, if any.
    #[must_use]
    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    /// Id of the element being dragged, if any.
    #[must_use]
    pub fn dragged_id(&self) -> Option<ElementId> {
        self.drag.map(|d| d.element)
    }

    // --- Placement ---

    /// Resolve a sprite and append a new element at `(x, y)` sized to it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogLookupError`] if `index` is out of range for `category`;
    /// the scene is unchanged.
    pub fn spawn(
        &mut self,
        catalog: &impl SpriteCatalog,
        category: Category,
        index: usize,
        x: f64,
        y: f64,
    ) -> Result<&SceneElement, CatalogLookupError> {
        let sprite = catalog.lookup(category, index)?;
        let element =
            SceneElement::new(Point::new(x, y), sprite.width, sprite.height, sprite.name, category, index, sprite.image);
        debug!(id = %element.id, %category, index, x, y, "element spawned");
        self.elements.push(element);
        Ok(&self.elements[self.elements.len() - 1])
    }

    // --- Queries ---

    /// Topmost element whose bounding box contains `pt` (edges inclusive).
    #[must_use]
    pub fn hit_test(&self, pt: Point) -> Option<&SceneElement> {
        hit::topmost(&self.elements, pt)
    }

    // --- Drag ---

    /// Pick up the topmost element under `pt`.
    ///
    /// Returns `false` with no state change if nothing is under the pointer or
    /// a drag is already in progress.
    pub fn begin_drag(&mut self, pt: Point) -> bool {
        if self.drag.is_some() {
            debug!("begin_drag ignored: drag already in progress");
            return false;
        }
        let Some(index) = hit::topmost_index(&self.elements, pt) else {
            return false;
        };
        let element = &mut self.elements[index];
        element.highlighted = true;
        self.drag = Some(DragState {
            element: element.id,
            grab_offset: Point::new(element.position.x - pt.x, element.position.y - pt.y),
        });
        debug!(id = %element.id, "drag started");
        true
    }

    /// Move the dragged element so it keeps its grab offset from `pt`.
    ///
    /// Returns `false` if no drag is in progress.
    pub fn update_drag(&mut self, pt: Point) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let Some(element) = self.elements.iter_mut().find(|el| el.id == drag.element) else {
            self.drag = None;
            return false;
        };
        element.position = drag.anchor_for(pt);
        true
    }

    /// Drop the dragged element at `pt`, snapping to the grid if requested,
    /// and clear the drag.
    ///
    /// Returns the dropped element's id, or `None` if no drag was in progress.
    pub fn end_drag(&mut self, pt: Point, snap_to_grid: bool, tile_size: u32) -> Option<ElementId> {
        let drag = self.drag.take()?;
        let element = self.elements.iter_mut().find(|el| el.id == drag.element)?;
        let anchor = drag.anchor_for(pt);
        element.position = if snap_to_grid { snap_point(anchor, tile_size) } else { anchor };
        element.highlighted = false;
        debug!(id = %element.id, x = element.position.x, y = element.position.y, "drag ended");
        Some(element.id)
    }

    // --- Removal ---

    /// Remove the topmost element under `pt`.
    ///
    /// If it is the dragged element the drag is cleared first. Returns `false`
    /// if nothing was under the pointer.
    pub fn delete_at(&mut self, pt: Point) -> bool {
        self.remove_at(pt).is_some()
    }

    /// Like [`Scene::delete_at`], returning the removed element.
    pub fn remove_at(&mut self, pt: Point) -> Option<SceneElement> {
        let index = hit::topmost_index(&self.elements, pt)?;
        if self.dragged_id() == Some(self.elements[index].id) {
            self.drag = None;
        }
        let removed = self.elements.remove(index);
        debug!(id = %removed.id, category = %removed.category, "element deleted");
        Some(removed)
    }

    // --- Persistence ---

    /// The export document, elements in sequence order.
    #[must_use]
    pub fn serialize(&self) -> MapDocument {
        MapDocument { width: self.width, height: self.height, elements: self.records() }
    }

    /// Element records only, as written to the autosave backup.
    #[must_use]
    pub fn records(&self) -> Vec<ElementRecord> {
        self.elements.iter().map(SceneElement::to_record).collect()
    }

    /// The export document as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Serialize`] if the document cannot be written.
    pub fn to_json(&self) -> Result<String, SceneError> {
        serde_json::to_string(&self.serialize()).map_err(SceneError::Serialize)
    }

    /// Build a scene from an exported document.
    ///
    /// Every record's image is re-resolved through `catalog`; size and id come
    /// from the record. Records with an unknown type, an unresolvable sprite,
    /// or fields that cannot be coerced are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Parse`] if the text is not a map document.
    pub fn deserialize(json: &str, catalog: &impl SpriteCatalog) -> Result<(Scene, LoadReport), SceneError> {
        let raw: RawDocument = serde_json::from_str(json).map_err(SceneError::Parse)?;
        let mut scene = Scene::new(raw.width, raw.height);
        let report = scene.extend_from_values(&raw.elements, catalog);
        Ok((scene, report))
    }

    /// Build a scene from a bare array of element records, as kept by the
    /// autosave backup, with the given map dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Parse`] if the text is not a JSON array.
    pub fn restore(
        width: u32,
        height: u32,
        elements_json: &str,
        catalog: &impl SpriteCatalog,
    ) -> Result<(Scene, LoadReport), SceneError> {
        let values: Vec<Value> = serde_json::from_str(elements_json).map_err(SceneError::Parse)?;
        let mut scene = Scene::new(width, height);
        let report = scene.extend_from_values(&values, catalog);
        Ok((scene, report))
    }

    fn extend_from_values(&mut self, values: &[Value], catalog: &impl SpriteCatalog) -> LoadReport {
        let mut report = LoadReport::default();
        for (position, value) in values.iter().enumerate() {
            match element_from_value(value, catalog) {
                Ok(element) => {
                    self.elements.push(element);
                    report.loaded += 1;
                }
                Err(reason) => {
                    warn!(position, %reason, "skipping element record");
                    report.skipped.push(SkippedRecord { position, reason });
                }
            }
        }
        report
    }
}

fn element_from_value(value: &Value, catalog: &impl SpriteCatalog) -> Result<SceneElement, SkipReason> {
    let record = ElementRecord::deserialize(value).map_err(|e| SkipReason::Malformed(e.to_string()))?;
    let Some(category) = Category::from_tag(&record.kind) else {
        return Err(SkipReason::UnknownType(record.kind));
    };
    let sprite = catalog.lookup(category, record.index).map_err(SkipReason::Catalog)?;
    Ok(SceneElement::new(
        Point::new(record.x, record.y),
        record.width,
        record.height,
        record.id,
        category,
        record.index,
        sprite.image,
    ))
}
