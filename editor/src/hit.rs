#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::SceneElement;
use crate::viewport::Point;

/// Whether `pt` lies inside the element's bounding box. All four edges are inclusive.
#[must_use]
pub fn contains(element: &SceneElement, pt: Point) -> bool {
    let x = element.position.x;
    let y = element.position.y;
    pt.x >= x && pt.x <= x + element.width() && pt.y >= y && pt.y <= y + element.height()
}

/// Index of the topmost element under `pt`.
///
/// Later elements paint over earlier ones, so the scan runs from the end of
/// the sequence backwards and stops at the first match.
#[must_use]
pub fn topmost_index(elements: &[SceneElement], pt: Point) -> Option<usize> {
    elements.iter().rposition(|el| contains(el, pt))
}

/// The topmost element under `pt`, if any.
#[must_use]
pub fn topmost(elements: &[SceneElement], pt: Point) -> Option<&SceneElement> {
    topmost_index(elements, pt).map(|i| &elements[i])
}
