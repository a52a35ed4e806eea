//! Backend-agnostic shape values: geometry plus resolved colors.

use bevy::color::{Alpha, Mix, Srgba};
use bevy::math::Vec2;

use crate::data::RingKind;

/// Alpha of the two faint strokes on each side of a ring.
pub const GLOW_ALPHA: f32 = 0.1;

/// Vertical two-stop gradient swept one row at a time.
///
/// Rows above `top_color_y` are solid `top_color`, rows below
/// `bottom_color_y` solid `bottom_color`.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientBand {
    pub top_y: f32,
    pub bottom_y: f32,
    pub top_color: Srgba,
    pub bottom_color: Srgba,
    pub top_color_y: f32,
    pub bottom_color_y: f32,
}

impl GradientBand {
    /// RGB interpolation between the stops, clamped outside them.
    /// Coincident stops mean a solid `top_color` fill.
    pub fn color_at(&self, y: f32) -> Srgba {
        let span = self.bottom_color_y - self.top_color_y;
        if span == 0.0 {
            return self.top_color;
        }
        let t = ((y - self.top_color_y) / span).clamp(0.0, 1.0);
        if t <= 0.0 {
            self.top_color
        } else if t >= 1.0 {
            self.bottom_color
        } else {
            self.top_color.mix(&self.bottom_color, t)
        }
    }

    /// One `(y, color)` per whole row from `top_y` through `bottom_y`.
    pub fn rows(&self) -> impl Iterator<Item = (f32, Srgba)> + '_ {
        (0u32..)
            .map(move |i| self.top_y + i as f32)
            .take_while(move |y| *y <= self.bottom_y)
            .map(move |y| (y, self.color_at(y)))
    }
}

/// Filled circle: the sun and each moon.
#[derive(Clone, Debug, PartialEq)]
pub struct Disc {
    pub center: Vec2,
    pub diameter: f32,
    pub color: Srgba,
}

impl Disc {
    pub fn radius(&self) -> f32 {
        self.diameter / 2.0
    }

    /// Strict overlap: center distance below the sum of the radii.
    pub fn overlaps(&self, other: &Disc) -> bool {
        self.center.distance(other.center) < self.radius() + other.radius()
    }
}

/// A single straight stroke with its final color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub from: Vec2,
    pub to: Vec2,
    pub color: Srgba,
}

/// One transaction's ring: `width` parallel one-pixel strokes plus glow.
#[derive(Clone, Debug, PartialEq)]
pub struct RingLine {
    pub start: Vec2,
    pub end: Vec2,
    pub width: u32,
    pub color: Srgba,
    pub kind: RingKind,
}

impl RingLine {
    /// Derived glow color; the ring's own color is left untouched.
    pub fn glow_color(&self) -> Srgba {
        self.color.with_alpha(GLOW_ALPHA)
    }

    fn offset(&self, dx: f32, color: Srgba) -> Stroke {
        let shift = Vec2::new(dx, 0.0);
        Stroke {
            from: self.start + shift,
            to: self.end + shift,
            color,
        }
    }

    /// Glow strokes at -2, -1, `width` and `width + 1`, then the solid body.
    pub fn strokes(&self) -> Vec<Stroke> {
        let glow = self.glow_color();
        let w = self.width as f32;
        let mut strokes = vec![
            self.offset(-2.0, glow),
            self.offset(-1.0, glow),
            self.offset(w, glow),
            self.offset(w + 1.0, glow),
        ];
        strokes.extend((0..self.width).map(|dx| self.offset(dx as f32, self.color)));
        strokes
    }
}

/// Noise-driven ridge silhouette, closed down past the canvas bottom.
#[derive(Clone, Debug, PartialEq)]
pub struct RidgeTerrain {
    /// Translation applied to every vertex.
    pub origin: Vec2,
    /// Ridge vertices, left to right, relative to `origin`.
    pub vertices: Vec<Vec2>,
    /// Cardinal spline tightness; 0 is Catmull-Rom.
    pub tightness: f32,
    /// How far below the last vertex the closing edge runs.
    pub depth: f32,
    pub color: Srgba,
}

impl RidgeTerrain {
    /// Ridge vertices in canvas coordinates.
    pub fn canvas_vertices(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.vertices.iter().map(move |v| *v + self.origin)
    }

    /// Closed polygon in canvas coordinates: the spline-smoothed ridge with
    /// `samples` points per segment, then the two base corners.
    pub fn outline(&self, samples: usize) -> Vec<Vec2> {
        let points: Vec<Vec2> = self.canvas_vertices().collect();
        let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
            return Vec::new();
        };

        let samples = samples.max(1);
        let scale = (1.0 - self.tightness) / 2.0;
        let mut outline = Vec::with_capacity(points.len() * samples + 2);

        for i in 0..points.len().saturating_sub(1) {
            let p0 = points[i.saturating_sub(1)];
            let p1 = points[i];
            let p2 = points[i + 1];
            let p3 = points[(i + 2).min(points.len() - 1)];
            let m1 = (p2 - p0) * scale;
            let m2 = (p3 - p1) * scale;
            for k in 0..samples {
                let t = k as f32 / samples as f32;
                outline.push(hermite(p1, m1, p2, m2, t));
            }
        }
        outline.push(last);

        let base = last.y + self.depth;
        outline.push(Vec2::new(last.x, base));
        outline.push(Vec2::new(first.x, base));
        outline
    }
}

fn hermite(p1: Vec2, m1: Vec2, p2: Vec2, m2: Vec2, t: f32) -> Vec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    p1 * h00 + m1 * h10 + p2 * h01 + m2 * h11
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band() -> GradientBand {
        GradientBand {
            top_y: 0.0,
            bottom_y: 100.0,
            top_color: Srgba::rgb(0.1, 0.2, 0.3),
            bottom_color: Srgba::rgb(0.9, 0.6, 0.3),
            top_color_y: 20.0,
            bottom_color_y: 80.0,
        }
    }

    #[test]
    fn gradient_endpoints_are_exact() {
        let band = band();
        assert_eq!(band.color_at(20.0), band.top_color);
        assert_eq!(band.color_at(80.0), band.bottom_color);
        assert_eq!(band.color_at(0.0), band.top_color);
        assert_eq!(band.color_at(100.0), band.bottom_color);
    }

    #[test]
    fn gradient_midpoint_is_a_blend() {
        let mid = band().color_at(50.0);
        assert!((mid.red - 0.5).abs() < 1e-5);
        assert!((mid.green - 0.4).abs() < 1e-5);
        assert!((mid.blue - 0.3).abs() < 1e-5);
    }

    #[test]
    fn coincident_stops_fill_with_top_color() {
        let band = GradientBand {
            top_color_y: 40.0,
            bottom_color_y: 40.0,
            ..band()
        };
        assert!(band.rows().all(|(_, c)| c == band.top_color));
    }

    #[test]
    fn rows_cover_band_inclusively() {
        let rows: Vec<f32> = band().rows().map(|(y, _)| y).collect();
        assert_eq!(rows.len(), 101);
        assert_eq!(rows.first(), Some(&0.0));
        assert_eq!(rows.last(), Some(&100.0));
    }

    #[test]
    fn discs_overlap_strictly() {
        let a = Disc {
            center: Vec2::ZERO,
            diameter: 10.0,
            color: Srgba::WHITE,
        };
        let touching = Disc {
            center: Vec2::new(10.0, 0.0),
            ..a.clone()
        };
        let inside = Disc {
            center: Vec2::new(9.0, 0.0),
            ..a.clone()
        };
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn ring_strokes_glow_then_body() {
        let ring = RingLine {
            start: Vec2::new(10.0, 110.0),
            end: Vec2::new(50.0, -10.0),
            width: 3,
            color: Srgba::new(1.0, 0.5, 0.5, 0.4),
            kind: RingKind::Transfer,
        };
        let strokes = ring.strokes();

        assert_eq!(strokes.len(), 7);
        let glow_x: Vec<f32> = strokes[..4].iter().map(|s| s.from.x).collect();
        assert_eq!(glow_x, vec![8.0, 9.0, 13.0, 14.0]);
        assert!(strokes[..4].iter().all(|s| s.color.alpha == GLOW_ALPHA));
        assert!(strokes[4..].iter().all(|s| s.color == ring.color));
        assert_eq!(ring.color.alpha, 0.4);
    }

    #[test]
    fn ridge_outline_passes_through_vertices_and_closes() {
        let ridge = RidgeTerrain {
            origin: Vec2::new(-10.0, 300.0),
            vertices: vec![
                Vec2::new(0.0, 5.0),
                Vec2::new(10.0, 20.0),
                Vec2::new(20.0, 0.0),
            ],
            tightness: 0.1,
            depth: 500.0,
            color: Srgba::BLACK,
        };
        let outline = ridge.outline(4);

        assert_eq!(outline.len(), 2 * 4 + 1 + 2);
        assert_eq!(outline[0], Vec2::new(-10.0, 305.0));
        assert_eq!(outline[4], Vec2::new(0.0, 320.0));
        assert_eq!(outline[8], Vec2::new(10.0, 300.0));
        assert_eq!(outline[9], Vec2::new(10.0, 800.0));
        assert_eq!(outline[10], Vec2::new(-10.0, 800.0));
    }
}
