//! Recording backend: keeps every draw call as data.

use bevy::color::Srgba;
use bevy::math::Vec2;

use crate::render::SceneBackend;
use crate::scene::{Disc, Stroke};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Srgba),
    HLine {
        y: f32,
        x_from: f32,
        x_to: f32,
        color: Srgba,
    },
    Disc(Disc),
    Stroke(Stroke),
    Polygon { points: Vec<Vec2>, color: Srgba },
}

/// Draw calls in the order they were issued.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn discs(&self) -> impl Iterator<Item = &Disc> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Disc(disc) => Some(disc),
            _ => None,
        })
    }

    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Stroke(stroke) => Some(stroke),
            _ => None,
        })
    }

    /// Index of the first command matching `pred`.
    pub fn position(&self, pred: impl Fn(&DrawCommand) -> bool) -> Option<usize> {
        self.commands.iter().position(pred)
    }
}

impl SceneBackend for DisplayList {
    fn clear(&mut self, color: Srgba) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn hline(&mut self, y: f32, x_from: f32, x_to: f32, color: Srgba) {
        self.commands.push(DrawCommand::HLine {
            y,
            x_from,
            x_to,
            color,
        });
    }

    fn fill_disc(&mut self, disc: &Disc) {
        self.commands.push(DrawCommand::Disc(disc.clone()));
    }

    fn stroke_line(&mut self, stroke: &Stroke) {
        self.commands.push(DrawCommand::Stroke(*stroke));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Srgba) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }
}
