//! Bevy 2D backend: one entity per draw call.

use bevy::color::Srgba;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;

use crate::render::SceneBackend;
use crate::scene::{CanvasSize, Disc, Stroke};

/// Depth of the first draw call; later calls stack toward the camera.
const Z_BASE: f32 = -500.0;
const Z_STEP: f32 = 0.001;

/// Marker on every entity a scene spawns, so the next block can clear them.
#[derive(Component, Default)]
pub struct SceneLayer;

/// Spawns sprites and 2D meshes centered on the world origin.
pub struct SpriteCanvas<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a mut Assets<Mesh>,
    materials: &'a mut Assets<ColorMaterial>,
    size: CanvasSize,
    issued: u32,
}

impl<'a, 'w, 's> SpriteCanvas<'a, 'w, 's> {
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        meshes: &'a mut Assets<Mesh>,
        materials: &'a mut Assets<ColorMaterial>,
        size: CanvasSize,
    ) -> Self {
        Self {
            commands,
            meshes,
            materials,
            size,
            issued: 0,
        }
    }

    /// Canvas pixel (y down, origin top-left) to world space (y up, origin centered).
    fn world(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x - self.size.width / 2.0, self.size.height / 2.0 - p.y)
    }

    fn next_z(&mut self) -> f32 {
        let z = Z_BASE + self.issued as f32 * Z_STEP;
        self.issued += 1;
        z
    }

    fn spawn_sprite(&mut self, color: Srgba, size: Vec2, center: Vec2, angle: f32) {
        let z = self.next_z();
        self.commands.spawn((
            Sprite::from_color(Color::from(color), size),
            Transform::from_translation(center.extend(z)).with_rotation(Quat::from_rotation_z(angle)),
            SceneLayer,
        ));
    }

    fn spawn_mesh(&mut self, mesh: Mesh, color: Srgba, at: Vec2) {
        let z = self.next_z();
        let mesh = self.meshes.add(mesh);
        let material = self.materials.add(ColorMaterial::from(Color::from(color)));
        self.commands.spawn((
            Mesh2d(mesh),
            MeshMaterial2d(material),
            Transform::from_translation(at.extend(z)),
            SceneLayer,
        ));
    }
}

impl SceneBackend for SpriteCanvas<'_, '_, '_> {
    fn clear(&mut self, color: Srgba) {
        let size = Vec2::new(self.size.width, self.size.height);
        self.spawn_sprite(color, size, Vec2::ZERO, 0.0);
    }

    fn hline(&mut self, y: f32, x_from: f32, x_to: f32, color: Srgba) {
        let from = self.world(Vec2::new(x_from, y));
        let to = self.world(Vec2::new(x_to, y + 1.0));
        let size = (to - from).abs();
        self.spawn_sprite(color, size, (from + to) / 2.0, 0.0);
    }

    fn fill_disc(&mut self, disc: &Disc) {
        let at = self.world(disc.center);
        self.spawn_mesh(Mesh::from(Circle::new(disc.radius())), disc.color, at);
    }

    fn stroke_line(&mut self, stroke: &Stroke) {
        let from = self.world(stroke.from);
        let to = self.world(stroke.to);
        let delta = to - from;
        let length = delta.length();
        if length == 0.0 {
            return;
        }
        let angle = delta.y.atan2(delta.x);
        self.spawn_sprite(stroke.color, Vec2::new(length, 1.0), (from + to) / 2.0, angle);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Srgba) {
        let strip = ridge_strip(points);
        if strip.len() < 4 {
            return;
        }
        let positions: Vec<[f32; 3]> = strip
            .iter()
            .map(|p| self.world(*p).extend(0.0).to_array())
            .collect();
        let mesh = Mesh::new(PrimitiveTopology::TriangleStrip, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        self.spawn_mesh(mesh, color, Vec2::ZERO);
    }
}

/// Triangle strip for a ridge outline: the top edge left to right, then the
/// two base corners. Each top point is paired with the point straight below
/// it on the base.
pub fn ridge_strip(outline: &[Vec2]) -> Vec<Vec2> {
    let Some((corners, top)) = outline
        .len()
        .checked_sub(2)
        .map(|n| (&outline[n..], &outline[..n]))
    else {
        return Vec::new();
    };
    let base = corners[0].y;
    top.iter()
        .flat_map(|p| [*p, Vec2::new(p.x, base)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RidgeTerrain;

    #[test]
    fn strip_pairs_each_ridge_point_with_the_base() {
        let ridge = RidgeTerrain {
            origin: Vec2::new(-10.0, 300.0),
            vertices: vec![Vec2::new(0.0, 5.0), Vec2::new(10.0, 20.0), Vec2::new(20.0, 0.0)],
            tightness: 0.1,
            depth: 500.0,
            color: Srgba::BLACK,
        };
        let outline = ridge.outline(4);
        let strip = ridge_strip(&outline);

        assert_eq!(strip.len(), 2 * (outline.len() - 2));
        assert_eq!(strip[0], Vec2::new(-10.0, 305.0));
        assert_eq!(strip[1], Vec2::new(-10.0, 800.0));
        for pair in strip.chunks(2) {
            assert_eq!(pair[0].x, pair[1].x);
            assert_eq!(pair[1].y, 800.0);
        }
        assert_eq!(strip[strip.len() - 2], Vec2::new(10.0, 300.0));
    }

    #[test]
    fn too_short_outline_gives_empty_strip() {
        assert!(ridge_strip(&[]).is_empty());
        assert!(ridge_strip(&[Vec2::ZERO, Vec2::X]).is_empty());
    }
}
