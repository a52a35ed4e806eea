//! Palette catalog: seven named five-color palettes.
//!
//! A render picks one palette with the `mod2` modifier, then shuffles its
//! colors once. The position after the shuffle decides each color's role.

use bevy::color::Srgba;

use crate::entropy::EntropySource;

const CATALOG: [(&str, [u32; 5]); 7] = [
    ("Genesis", [0x96bcc7, 0x2a4e57, 0xf1a287, 0x763621, 0x7a6174]),
    ("Neon Quadratic", [0x256dfa, 0x8753fc, 0xb333f2, 0xcb16d9, 0xd716b5]),
    (
        "Blue to Orange Segmented",
        [0x06008a, 0x6e1374, 0xa2305b, 0xcf4e3e, 0xfa6d01],
    ),
    (
        "Dusty Dusk Quadratic",
        [0xaa6173, 0x827561, 0x6f7973, 0x627a86, 0x866d99],
    ),
    (
        "Orange is the New Black",
        [0x0f0907, 0x6a574f, 0xb6816a, 0xe98658, 0xf65a03],
    ),
    (
        "Greens of Blue and Yellow Polygon",
        [0x025450, 0x03250b, 0x697049, 0xc3e2bc, 0x8ecfc5],
    ),
    ("Pastel Segment", [0xfcc2d1, 0xefcfaa, 0xb5debd, 0x9adef0, 0xd5cffa]),
];

/// `0xRRGGBB` → opaque sRGB.
pub fn rgb_hex(rgb: u32) -> Srgba {
    Srgba::rgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// A named palette; role accessors read the current color order.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    name: &'static str,
    colors: [Srgba; 5],
}

impl Palette {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn colors(&self) -> &[Srgba; 5] {
        &self.colors
    }

    pub fn sky(&self) -> Srgba {
        self.colors[0]
    }

    pub fn ground(&self) -> Srgba {
        self.colors[1]
    }

    pub fn sun(&self) -> Srgba {
        self.colors[2]
    }

    pub fn mountain(&self) -> Srgba {
        self.colors[3]
    }

    pub fn moon(&self) -> Srgba {
        self.colors[4]
    }

    /// Returns a reordered copy; takes four draws.
    pub fn shuffled(&self, entropy: &mut EntropySource) -> Self {
        let mut colors = self.colors;
        entropy.shuffle(&mut colors);
        Self {
            name: self.name,
            colors,
        }
    }
}

/// The fixed, build-time palette table.
pub struct PaletteCatalog;

impl PaletteCatalog {
    pub fn count() -> usize {
        CATALOG.len()
    }

    pub fn all() -> Vec<Palette> {
        (0..Self::count()).map(Self::select).collect()
    }

    /// Palette at `index`, clamped to the last entry.
    pub fn select(index: usize) -> Palette {
        let (name, hexes) = CATALOG[index.min(CATALOG.len() - 1)];
        Palette {
            name,
            colors: hexes.map(rgb_hex),
        }
    }

    /// `floor(mod2 * count)`, clamped to `[0, count - 1]`.
    pub fn index_for(mod2: f64) -> usize {
        let raw = (mod2.clamp(0.0, 1.0) * Self::count() as f64).floor() as usize;
        raw.min(Self::count() - 1)
    }
}
