//! Input model: the drag gesture, the palette drag source, and scripted events.
//!
//! `DragState` is the one gesture the scene tracks between pointer-down and
//! pointer-up. `PaletteSource` remembers which catalog entry is being dragged
//! in from the palette until it is dropped on the canvas. `InputEvent` is the
//! serializable form of every event the controller accepts, so a session can
//! be recorded and replayed by a headless host.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::doc::{Category, ElementId};
use crate::viewport::Point;

/// An in-progress drag of a placed element.
///
/// Element and grab offset are one value so they are always set and cleared
/// together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Element being dragged. Resolved by id, never by position in the sequence.
    pub element: ElementId,
    /// Element anchor minus pointer at grab time, in scene units.
    pub grab_offset: Point,
}

impl DragState {
    /// Anchor position for the element when the pointer is at `pt`.
    #[must_use]
    pub fn anchor_for(&self, pt: Point) -> Point {
        Point::new(pt.x + self.grab_offset.x, pt.y + self.grab_offset.y)
    }
}

/// Catalog entry being dragged from the palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaletteSource {
    pub category: Category,
    pub index: usize,
    /// Pointer offset inside the palette tile at drag start, in device pixels.
    /// Subtracted from the drop point so the sprite lands under its ghost image.
    #[serde(default)]
    pub grab_offset: Point,
}

impl PaletteSource {
    #[must_use]
    pub fn new(category: Category, index: usize) -> Self {
        Self { category, index, grab_offset: Point::default() }
    }
}

/// Every event the input controller accepts, in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    PaletteDragStart {
        #[serde(flatten)]
        source: PaletteSource,
    },
    CanvasDrop {
        x: f64,
        y: f64,
    },
    PointerDown {
        x: f64,
        y: f64,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
    },
    SecondaryClick {
        x: f64,
        y: f64,
    },
    /// The canvas container changed size.
    Resize {
        width: f64,
        height: f64,
    },
}
