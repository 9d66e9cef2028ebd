#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{GAME_HEIGHT, GAME_WIDTH, SCALE_HALF, SCALE_QUARTER, SCALE_THREE_QUARTERS};

/// A point in either device or scene space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Render scale between device pixels and scene units.
///
/// Scene coordinates are always `device / scale`. There is no pan: the map
/// origin sits at the canvas origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl Viewport {
    #[must_use]
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    /// Viewport sized for a container, using [`determine_scale`].
    #[must_use]
    pub fn for_container(container_w: f64, container_h: f64) -> Self {
        Self { scale: determine_scale(container_w, container_h) }
    }

    /// Convert a device-space point (canvas pixels) to scene coordinates.
    #[must_use]
    pub fn device_to_scene(&self, device: Point) -> Point {
        Point { x: device.x / self.scale, y: device.y / self.scale }
    }

    /// Convert a scene-space point to device pixels.
    #[must_use]
    pub fn scene_to_device(&self, scene: Point) -> Point {
        Point { x: scene.x * self.scale, y: scene.y * self.scale }
    }
}

/// Pick the integer (or quantized fractional) render scale that fits the
/// reference resolution into a container.
///
/// At or above 1× the scale is floored, then stepped down once if the
/// reference height would overflow. Below 1× it snaps to 0.75, 0.5 or 0.25.
#[must_use]
pub fn determine_scale(container_w: f64, container_h: f64) -> f64 {
    let mut scale = container_w / GAME_WIDTH;

    if scale >= 1.0 {
        scale = scale.floor();
        if GAME_WIDTH * scale > container_w || GAME_HEIGHT * scale > container_h {
            scale -= 1.0;
        }
    }

    if scale < 1.0 && scale >= SCALE_THREE_QUARTERS {
        SCALE_THREE_QUARTERS
    } else if scale < SCALE_THREE_QUARTERS && scale >= SCALE_HALF {
        SCALE_HALF
    } else if scale < SCALE_HALF {
        SCALE_QUARTER
    } else {
        scale
    }
}

/// Round half towards positive infinity, the way browsers' `Math.round` does.
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Snap a scene coordinate to the nearest multiple of `tile_size`.
///
/// A zero tile size leaves the value untouched.
#[must_use]
pub fn snap(value: f64, tile_size: u32) -> f64 {
    if tile_size == 0 {
        return value;
    }
    let tile = f64::from(tile_size);
    round_half_up(value / tile) * tile
}

/// Snap both coordinates of a point.
#[must_use]
pub fn snap_point(pt: Point, tile_size: u32) -> Point {
    Point { x: snap(pt.x, tile_size), y: snap(pt.y, tile_size) }
}
