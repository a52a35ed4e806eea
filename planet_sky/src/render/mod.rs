//! Drawing backends and the single dispatch over scene shapes.

mod display_list;
mod sprites;

use bevy::color::Srgba;
use bevy::math::Vec2;

use crate::scene::{Disc, Scene, Shape, Stroke};

pub use display_list::{DisplayList, DrawCommand};
pub use sprites::{ridge_strip, SceneLayer, SpriteCanvas};

/// Spline samples per ridge segment.
pub const RIDGE_SAMPLES: usize = 8;

/// A surface that can draw the five primitive operations a scene needs.
/// Coordinates are canvas pixels with y growing downward.
pub trait SceneBackend {
    fn clear(&mut self, color: Srgba);
    /// One row of a gradient band, `x_from..=x_to`.
    fn hline(&mut self, y: f32, x_from: f32, x_to: f32, color: Srgba);
    fn fill_disc(&mut self, disc: &Disc);
    fn stroke_line(&mut self, stroke: &Stroke);
    /// Ridge outline: a top edge running left to right, then the two base
    /// corners that close it.
    fn fill_polygon(&mut self, points: &[Vec2], color: Srgba);
}

impl Scene {
    /// Clears to the backdrop, then paints every layer in compositing order.
    pub fn draw(&self, backend: &mut impl SceneBackend) {
        backend.clear(self.backdrop);
        let right = self.canvas.width;
        for shape in self.layers() {
            match shape {
                Shape::Band(band) => {
                    for (y, color) in band.rows() {
                        backend.hline(y, 0.0, right, color);
                    }
                }
                Shape::Disc(disc) => backend.fill_disc(disc),
                Shape::Ring(ring) => {
                    for stroke in ring.strokes() {
                        backend.stroke_line(&stroke);
                    }
                }
                Shape::Ridge(ridge) => {
                    backend.fill_polygon(&ridge.outline(RIDGE_SAMPLES), ridge.color)
                }
            }
        }
    }
}
