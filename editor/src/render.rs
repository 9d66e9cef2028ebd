//! Rendering: one read-only pass over the scene per frame.
//!
//! The host supplies a [`Surface`] (a 2D canvas context, an image buffer, a
//! test recorder) and calls [`draw`] once per animation frame. This module
//! never mutates the scene; it only decides what is drawn and in what order.
//!
//! Surface calls are fallible and propagate through `Result<(), S::Error>`.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::catalog::ImageHandle;
use crate::consts::HIGHLIGHT_ALPHA;
use crate::scene::Scene;

/// A drawing target in scene units. The host applies the render scale.
pub trait Surface {
    type Error;

    /// Fill the whole map area with the background color.
    ///
    /// # Errors
    ///
    /// Returns the surface's error if the fill fails.
    fn fill_background(&mut self, width: f64, height: f64) -> Result<(), Self::Error>;

    /// Overlay the tile grid across the map area.
    ///
    /// # Errors
    ///
    /// Returns the surface's error if the overlay fails.
    fn draw_grid(&mut self, width: f64, height: f64, tile_size: u32) -> Result<(), Self::Error>;

    /// Draw a sprite stretched to the given rectangle at the given opacity.
    ///
    /// # Errors
    ///
    /// Returns the surface's error if the draw fails.
    fn draw_image(
        &mut self,
        image: ImageHandle,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        alpha: f64,
    ) -> Result<(), Self::Error>;
}

/// Draw the full frame: background, grid, then elements bottom to top.
///
/// The element being dragged is drawn at half opacity.
///
/// # Errors
///
/// Returns the first error reported by the surface; the rest of the frame is skipped.
pub fn draw<S: Surface>(surface: &mut S, scene: &Scene, tile_size: u32) -> Result<(), S::Error> {
    let width = f64::from(scene.width());
    let height = f64::from(scene.height());

    surface.fill_background(width, height)?;
    surface.draw_grid(width, height, tile_size)?;

    for el in scene.elements() {
        let alpha = if el.highlighted { HIGHLIGHT_ALPHA } else { 1.0 };
        surface.draw_image(el.image, el.position.x, el.position.y, el.width(), el.height(), alpha)?;
    }
    Ok(())
}
