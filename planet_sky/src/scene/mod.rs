//! The composed scene and its layers.

mod composer;
pub mod shapes;

use bevy::color::Srgba;

use crate::error::RenderError;
use crate::palette::Palette;

pub use composer::SceneComposer;
pub use shapes::{Disc, GradientBand, RidgeTerrain, RingLine, Stroke};

/// Pixel dimensions of the target canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(RenderError::InvalidCanvas {
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(500.0, 500.0)
    }
}

/// A moon and whether the sun's disc swallowed it.
#[derive(Clone, Debug, PartialEq)]
pub struct Moon {
    pub disc: Disc,
    pub eclipsed: bool,
}

/// Rings anchored between two endpoints, one per valued transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct RingGroup {
    pub start: bevy::math::Vec2,
    pub end: bevy::math::Vec2,
    pub spread: f32,
    pub rings: Vec<RingLine>,
}

/// Borrowed view of one drawable, in compositing order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape<'a> {
    Band(&'a GradientBand),
    Disc(&'a Disc),
    Ring(&'a RingLine),
    Ridge(&'a RidgeTerrain),
}

/// One rendered sky. Built fresh per render, never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub canvas: CanvasSize,
    pub seed: u64,
    /// Palette after the per-render shuffle.
    pub palette: Palette,
    /// Fill laid down before any layer.
    pub backdrop: Srgba,
    pub sky: GradientBand,
    pub sun: Disc,
    pub moons: Vec<Moon>,
    pub rings: RingGroup,
    pub mountain: RidgeTerrain,
    pub mountain_slope: f32,
    pub ground: GradientBand,
}

impl Scene {
    /// Sky, sun, moons, rings, mountain, ground. Ground paints last so it
    /// covers ring and ridge overdraw at the bottom edge.
    pub fn layers(&self) -> Vec<Shape<'_>> {
        let mut layers = Vec::with_capacity(4 + self.moons.len() + self.rings.rings.len());
        layers.push(Shape::Band(&self.sky));
        layers.push(Shape::Disc(&self.sun));
        layers.extend(self.moons.iter().map(|moon| Shape::Disc(&moon.disc)));
        layers.extend(self.rings.rings.iter().map(Shape::Ring));
        layers.push(Shape::Ridge(&self.mountain));
        layers.push(Shape::Band(&self.ground));
        layers
    }

    pub fn eclipsed_moons(&self) -> usize {
        self.moons.iter().filter(|moon| moon.eclipsed).count()
    }
}
