//! Scene composer: turns block features, modifiers and the entropy stream
//! into concrete layers.
//!
//! Layers are derived in a fixed order: palette shuffle, ground, sun, sky,
//! moons, rings, mountain. Each step draws from the same stream and some read
//! values produced by an earlier step, so the order is part of the output.
//! Draw counts after each step (burn included):
//!
//! | step     | draws taken              |
//! |----------|--------------------------|
//! | palette  | 4                        |
//! | ground   | 0                        |
//! | sun      | 2                        |
//! | sky      | 0                        |
//! | moons    | 64, whatever the count   |
//! | rings    | 3 + 3 per ring           |
//! | mountain | 4                        |

use bevy::color::{Hsla, Srgba};
use bevy::math::Vec2;
use tracing::debug;

use crate::config::{Modifiers, MAX_MOONS};
use crate::data::{Block, BlockFeatures};
use crate::entropy::{CoherentNoise, EntropySource};
use crate::error::RenderError;
use crate::palette::{Palette, PaletteCatalog};
use crate::scene::shapes::{Disc, GradientBand, RidgeTerrain, RingLine};
use crate::scene::{CanvasSize, Moon, RingGroup, Scene};

/// Fraction of the canvas height covered by ground.
pub const GROUND_HEIGHT: f64 = 0.15;
/// Saturation of the ground and mountain colors.
pub const HORIZON_SATURATION: f32 = 0.20;
pub const SUN_SATURATION_FLOOR: f32 = 0.85;
pub const SUN_LIGHTNESS: f32 = 0.85;
/// Lightness of a moon that overlaps the sun.
pub const ECLIPSED_MOON_LIGHTNESS: f32 = 0.18;
const MOON_SATURATION_CEILING: f32 = 0.50;
const MOON_POOL: usize = MAX_MOONS * 4;
const MOUNTAIN_TIGHTNESS: f32 = 0.1;
const MOUNTAIN_NOISE_OFFSET: f64 = 0.0;

struct Sun {
    disc: Disc,
    hsl: Hsla,
}

/// Values drawn for one candidate moon.
#[derive(Clone, Copy)]
struct MoonDraw {
    lightness: f64,
    diameter: f64,
    x: f64,
    y: f64,
}

/// Owns the per-render stream; consumed by [`SceneComposer::compose`].
pub struct SceneComposer<'a> {
    modifiers: &'a Modifiers,
    features: BlockFeatures,
    canvas: CanvasSize,
    entropy: EntropySource,
    noise: CoherentNoise,
}

impl<'a> SceneComposer<'a> {
    /// Validates every input before the stream is seeded.
    pub fn new(
        block: &Block,
        modifiers: &'a Modifiers,
        canvas: CanvasSize,
    ) -> Result<Self, RenderError> {
        canvas.validate()?;
        modifiers.validate()?;
        let features = BlockFeatures::extract(block)?;
        let entropy = EntropySource::from_block_hash(&block.hash)?;
        let noise = CoherentNoise::new(entropy.seed());
        Ok(Self {
            modifiers,
            features,
            canvas,
            entropy,
            noise,
        })
    }

    pub fn features(&self) -> &BlockFeatures {
        &self.features
    }

    /// Draws taken so far.
    pub fn draws(&self) -> u64 {
        self.entropy.draws()
    }

    pub fn compose(mut self) -> Scene {
        let palette = self.palette();
        let ground = self.ground(&palette);
        let sun = self.sun(&palette, ground.top_y);
        let sky = self.sky(&palette, &sun, ground.top_y);
        let moons = self.moons(&palette, &sun.disc, ground.top_y);
        let rings = self.rings(&palette);
        let (mountain, mountain_slope) = self.mountain(&palette, &sky, ground.top_y);

        Scene {
            canvas: self.canvas,
            seed: self.entropy.seed(),
            backdrop: palette.sky(),
            palette,
            sky,
            sun: sun.disc,
            moons,
            rings,
            mountain,
            mountain_slope,
            ground,
        }
    }

    fn width(&self) -> f64 {
        self.canvas.width as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height as f64
    }

    fn palette(&mut self) -> Palette {
        let index = self.modifiers.palette_index();
        let palette = PaletteCatalog::select(index).shuffled(&mut self.entropy);
        debug!(index, name = palette.name(), "palette");
        palette
    }

    /// Horizon-saturated ground color, a flat two-stop band below the horizon.
    fn ground(&self, palette: &Palette) -> GradientBand {
        let top_y = (self.height() * (1.0 - GROUND_HEIGHT)) as f32;
        let hsl = Hsla::from(palette.ground());
        let color = Srgba::from(Hsla::hsl(hsl.hue, HORIZON_SATURATION, hsl.lightness));
        GradientBand {
            top_y,
            bottom_y: self.canvas.height,
            top_color: color,
            bottom_color: color,
            top_color_y: top_y + 10.0,
            bottom_color_y: self.canvas.height - 20.0,
        }
    }

    /// Diameter follows the gas ratio; the disc sits just above the horizon.
    fn sun(&mut self, palette: &Palette, horizon: f32) -> Sun {
        let width = self.width();
        let diameter = lerp(width * 0.5, width, self.features.gas_ratio);
        let horizon = horizon as f64;
        let y = self.entropy.next_range(horizon - diameter * 0.4, horizon);
        let x = self.entropy.next_range(0.0, width);

        let palette_hsl = Hsla::from(palette.sun());
        let hsl = Hsla::hsl(
            palette_hsl.hue,
            palette_hsl.saturation.max(SUN_SATURATION_FLOOR),
            SUN_LIGHTNESS,
        );
        debug!(x, y, diameter, "sun");
        Sun {
            disc: Disc {
                center: Vec2::new(x as f32, y as f32),
                diameter: diameter as f32,
                color: Srgba::from(hsl),
            },
            hsl,
        }
    }

    /// Palette sky at the top fading into a dimmed sun hue at the sun's height.
    fn sky(&self, palette: &Palette, sun: &Sun, horizon: f32) -> GradientBand {
        let bottom = Hsla::hsl(sun.hsl.hue, 1.0, sun.hsl.lightness - 0.05);
        GradientBand {
            top_y: 0.0,
            bottom_y: horizon - 1.0,
            top_color: palette.sky(),
            bottom_color: Srgba::from(bottom),
            top_color_y: 0.0,
            bottom_color_y: sun.disc.center.y,
        }
    }

    /// Draws the whole pool first so later layers see the same stream
    /// position for any moon count, then takes moons off the end.
    fn moons(&mut self, palette: &Palette, sun: &Disc, horizon: f32) -> Vec<Moon> {
        let width = self.width();
        let moon_hsl = Hsla::from(palette.moon());

        let mut pool: Vec<MoonDraw> = (0..MOON_POOL)
            .map(|_| MoonDraw {
                lightness: self.entropy.next_range(0.70, moon_hsl.lightness as f64),
                diameter: self.entropy.next_range(width * 0.02, width * 0.20),
                x: self.entropy.next_range(0.0, width),
                y: self.entropy.next_range(0.0, horizon as f64),
            })
            .collect();

        let count = self.modifiers.moon_count();
        let moons: Vec<Moon> = (0..count)
            .filter_map(|_| pool.pop())
            .map(|draw| moon_from_draw(draw, moon_hsl, sun))
            .collect();
        debug!(count, eclipsed = moons.iter().filter(|m| m.eclipsed).count(), "moons");
        moons
    }

    fn rings(&mut self, palette: &Palette) -> RingGroup {
        let width = self.width();
        let height = self.height();
        let sun_hsl = Hsla::from(palette.sun());
        let sky_hsl = Hsla::from(palette.sky());
        let base = Hsla::hsl(sun_hsl.hue, sky_hsl.saturation, sun_hsl.lightness);

        // Bottom-left to top-right, both ends past the canvas edges.
        let x1 = self.entropy.next_range(-width * 0.1, width).floor();
        let y1 = (height * 1.1).floor();
        let mut x2 = self.entropy.next_range(0.0, width * 1.1).floor();
        let y2 = (-height * 0.1).floor();

        // Pull the far end back across so the line crosses the visible width.
        let adjustment = self.entropy.next_range(width, width * 1.5);
        while x1 < 0.0 && x2 < 0.0 {
            x2 += adjustment;
        }
        while x1 > width && x2 > width {
            x2 -= adjustment;
        }

        let spread = self.modifiers.ring_spread(width);
        let max_value = self.features.max_value;
        let rings: Vec<RingLine> = self
            .features
            .rings
            .iter()
            .map(|descriptor| {
                let ring_width = ring_width(descriptor.value, max_value, width);
                let lightness = self.entropy.next_range(0.50, 1.0);
                let alpha = self.entropy.next_range(0.2, 0.5);
                let x_off = self.entropy.next_gaussian(0.0, spread).floor();
                RingLine {
                    start: Vec2::new((x1 + x_off) as f32, y1 as f32),
                    end: Vec2::new((x2 + x_off) as f32, y2 as f32),
                    width: ring_width,
                    color: Srgba::from(Hsla::new(
                        base.hue,
                        base.saturation,
                        lightness as f32,
                        alpha as f32,
                    )),
                    kind: descriptor.kind(),
                }
            })
            .collect();

        debug!(x1, x2, spread, count = rings.len(), "rings");
        RingGroup {
            start: Vec2::new(x1 as f32, y1 as f32),
            end: Vec2::new(x2 as f32, y2 as f32),
            spread: spread as f32,
            rings,
        }
    }

    /// Ridge vertices sampled from noise plus an accumulating slope, never
    /// dipping below the horizon.
    fn mountain(
        &mut self,
        palette: &Palette,
        sky: &GradientBand,
        horizon: f32,
    ) -> (RidgeTerrain, f32) {
        let hsl = Hsla::from(palette.mountain());
        let color = Srgba::from(Hsla::hsl(hsl.hue, HORIZON_SATURATION, hsl.lightness));

        let params = RidgeParams {
            x_res: self.entropy.next_range(10.0, 30.0),
            amplitude: self.entropy.next_range(50.0, 100.0),
            noise_scale: self.entropy.next_range(0.01, 0.03),
            slope: self.entropy.next_range(-3.0, 3.0),
        };
        let (origin, vertices) = ridge_geometry(
            &params,
            &self.noise,
            self.width(),
            self.height(),
            sky.bottom_y as f64,
            horizon as f64,
        );

        debug!(
            x_res = params.x_res,
            amplitude = params.amplitude,
            noise_scale = params.noise_scale,
            slope = params.slope,
            vertices = vertices.len(),
            "mountain"
        );
        let ridge = RidgeTerrain {
            origin,
            vertices,
            tightness: MOUNTAIN_TIGHTNESS,
            depth: self.canvas.height,
            color,
        };
        (ridge, params.slope as f32)
    }
}

/// The four values drawn for the mountain, in draw order.
#[derive(Clone, Copy, Debug)]
struct RidgeParams {
    x_res: f64,
    amplitude: f64,
    noise_scale: f64,
    slope: f64,
}

/// Ridge origin and vertices (relative to the origin). The anchor sits above
/// the sky's bottom edge by an amount that grows with the slope; vertices are
/// capped at the horizon.
fn ridge_geometry(
    params: &RidgeParams,
    noise: &CoherentNoise,
    width: f64,
    height: f64,
    sky_bottom: f64,
    horizon: f64,
) -> (Vec2, Vec<Vec2>) {
    let RidgeParams {
        x_res,
        amplitude,
        noise_scale,
        slope,
    } = *params;

    let mut y_pos = sky_bottom - height * (0.01 * slope * slope + 0.10);
    let x_pos = -x_res;
    let floor = horizon - y_pos;

    let mut vertices = Vec::new();
    let mut y = 0.0;
    let mut x = x_pos;
    let mut i = 0u32;
    while x < width + 2.0 * x_res {
        let sample = noise.sample(MOUNTAIN_NOISE_OFFSET * width + x * noise_scale);
        y = (sample * amplitude + i as f64 * slope).min(floor);
        vertices.push(Vec2::new(x as f32, y as f32));
        i += 1;
        x += x_res;
    }

    // Built left to right: a rising ridge would otherwise start too low.
    if slope < 0.0 {
        y_pos -= y;
    }

    (Vec2::new(x_pos as f32, y_pos as f32), vertices)
}

fn moon_from_draw(draw: MoonDraw, moon_hsl: Hsla, sun: &Disc) -> Moon {
    let mut disc = Disc {
        center: Vec2::new(draw.x as f32, draw.y as f32),
        diameter: draw.diameter as f32,
        color: Srgba::NONE,
    };
    let eclipsed = disc.overlaps(sun);
    let lightness = if eclipsed {
        ECLIPSED_MOON_LIGHTNESS
    } else {
        draw.lightness as f32
    };
    disc.color = Srgba::from(Hsla::hsl(
        moon_hsl.hue,
        moon_hsl.saturation.min(MOON_SATURATION_CEILING),
        lightness,
    ));
    Moon { disc, eclipsed }
}

/// Maps a value into `[1, 10% of width]` against the block maximum.
/// A zero maximum gives the minimum width.
fn ring_width(value: u128, max_value: u128, canvas_width: f64) -> u32 {
    let t = if max_value > 1 {
        ((value.saturating_sub(1)) as f64 / (max_value - 1) as f64).clamp(0.0, 1.0)
    } else if max_value == 1 && value >= 1 {
        1.0
    } else {
        0.0
    };
    let widest = (canvas_width * 0.1).max(1.0);
    (lerp(1.0, widest, t).floor() as u32).max(1)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
