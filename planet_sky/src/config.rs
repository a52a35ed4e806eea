//! Preset modifiers, env parsing, and constants.

use std::path::PathBuf;

use alloy_chains::{Chain, NamedChain};
use bevy::color::Srgba;
use tracing::warn;
use url::Url;

use crate::data::FetcherConfig;
use crate::error::RenderError;
use crate::palette::PaletteCatalog;
use crate::scene::CanvasSize;

/// Upper bound on moons; `mod3 = 1` yields exactly this many.
pub const MAX_MOONS: usize = 4;

const PRESET_MOD1: f64 = 0.025;
const PRESET_MOD2: f64 = 0.1;
const PRESET_MOD3: f64 = 0.8;

const CHAIN_ENV_VARS: &[(NamedChain, &str)] = &[
    (NamedChain::Mainnet, "MAINNET_RPC_URL"),
    (NamedChain::Base, "BASE_RPC_URL"),
    (NamedChain::Optimism, "OPTIMISM_RPC_URL"),
    (NamedChain::Arbitrum, "ARBITRUM_RPC_URL"),
];

const DEFAULT_RPC: &str = "http://127.0.0.1:8545";

/// User tuning knobs. Finite values outside `[0, 1]` are clamped where used.
#[derive(Clone, Debug, PartialEq)]
pub struct Modifiers {
    /// Ring spread as a fraction of canvas width.
    pub mod1: f64,
    /// Palette selector.
    pub mod2: f64,
    /// Moon count selector.
    pub mod3: f64,
    /// Reserved creator color; not read by the composer.
    pub color1: Srgba,
    /// Canvas root color, owned by the host surface.
    pub background: Srgba,
}

impl Modifiers {
    /// The published defaults. Changing these changes every preset render.
    pub fn preset() -> Self {
        Self {
            mod1: PRESET_MOD1,
            mod2: PRESET_MOD2,
            mod3: PRESET_MOD3,
            color1: Srgba::rgb_u8(0x50, 0x37, 0x52),
            background: Srgba::rgb_u8(0x00, 0x00, 0x00),
        }
    }

    /// Rejects NaN and infinite modifiers; everything else is clamped later.
    pub fn validate(&self) -> Result<(), RenderError> {
        for (name, value) in [("mod1", self.mod1), ("mod2", self.mod2), ("mod3", self.mod3)] {
            if !value.is_finite() {
                return Err(RenderError::InvalidModifier {
                    name,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn ring_spread(&self, canvas_width: f64) -> f64 {
        canvas_width * self.mod1.clamp(0.0, 1.0)
    }

    pub fn palette_index(&self) -> usize {
        PaletteCatalog::index_for(self.mod2)
    }

    /// `floor(mod3 * 4)` clamped to `[0, 4]`.
    pub fn moon_count(&self) -> usize {
        let raw = (self.mod3.clamp(0.0, 1.0) * MAX_MOONS as f64).floor() as usize;
        raw.min(MAX_MOONS)
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::preset()
    }
}

/// Parses `#rrggbb` (or `rrggbb`, `#rgb`, `#rrggbbaa`).
pub fn parse_color(name: &'static str, hex: &str) -> Result<Srgba, RenderError> {
    Srgba::hex(hex).map_err(|err| RenderError::InvalidModifier {
        name,
        value: format!("{hex:?} ({err})"),
    })
}

/// Where the viewer gets its blocks.
#[derive(Debug)]
pub enum BlockSource {
    Fixture(PathBuf),
    Rpc(FetcherConfig),
}

/// Everything the viewer reads from the environment.
#[derive(Debug)]
pub struct ViewerConfig {
    pub source: BlockSource,
    pub modifiers: Modifiers,
    pub canvas: CanvasSize,
}

/// Fixture path wins over RPC; modifiers and canvas fall back to the preset.
pub fn viewer_config() -> ViewerConfig {
    let source = match std::env::var("STARSETS_FIXTURE") {
        Ok(path) if !path.is_empty() => BlockSource::Fixture(PathBuf::from(path)),
        _ => BlockSource::Rpc(chain_config()),
    };
    ViewerConfig {
        source,
        modifiers: modifiers_from_env(),
        canvas: canvas_from_env(),
    }
}

/// Returns the chain and RPC URL based on which env var is set.
/// Checks chain-specific vars first, falls back to RPC_URL → mainnet.
pub fn chain_config() -> FetcherConfig {
    let start_block = env_parsed::<u64>("STARSETS_BLOCK");
    for (named, env_var) in CHAIN_ENV_VARS {
        if let Ok(raw) = std::env::var(env_var) {
            if let Ok(url) = raw.parse::<Url>() {
                return FetcherConfig {
                    chain: Chain::from_named(*named),
                    rpc_url: url,
                    start_block,
                };
            }
            warn!("invalid URL in {env_var}: {raw:?}");
        }
    }
    let url = std::env::var("RPC_URL")
        .ok()
        .and_then(|raw| match raw.parse::<Url>() {
            Ok(url) => Some(url),
            Err(err) => {
                warn!("invalid RPC_URL {raw:?}: {err}, using {DEFAULT_RPC}");
                None
            }
        })
        .unwrap_or_else(default_rpc_url);
    FetcherConfig {
        chain: Chain::mainnet(),
        rpc_url: url,
        start_block,
    }
}

fn default_rpc_url() -> Url {
    Url::parse(DEFAULT_RPC).expect("default RPC URL is valid")
}

/// Preset modifiers with any `STARSETS_MOD*` / color overrides applied.
pub fn modifiers_from_env() -> Modifiers {
    let mut modifiers = Modifiers::preset();
    for (var, slot) in [
        ("STARSETS_MOD1", &mut modifiers.mod1),
        ("STARSETS_MOD2", &mut modifiers.mod2),
        ("STARSETS_MOD3", &mut modifiers.mod3),
    ] {
        if let Some(value) = env_parsed::<f64>(var).filter(|v| v.is_finite()) {
            *slot = value;
        }
    }
    for (var, name, slot) in [
        ("STARSETS_COLOR1", "color1", &mut modifiers.color1),
        ("STARSETS_BACKGROUND", "background", &mut modifiers.background),
    ] {
        if let Ok(raw) = std::env::var(var) {
            match parse_color(name, &raw) {
                Ok(color) => *slot = color,
                Err(err) => warn!("ignoring {var}: {err}"),
            }
        }
    }
    modifiers
}

/// `STARSETS_CANVAS=WxH`, defaulting to 500x500.
pub fn canvas_from_env() -> CanvasSize {
    let Ok(raw) = std::env::var("STARSETS_CANVAS") else {
        return CanvasSize::default();
    };
    let parsed = raw
        .split_once(['x', 'X'])
        .and_then(|(w, h)| Some(CanvasSize::new(w.trim().parse().ok()?, h.trim().parse().ok()?)))
        .filter(|canvas| canvas.validate().is_ok());
    parsed.unwrap_or_else(|| {
        warn!("ignoring STARSETS_CANVAS {raw:?}, expected WxH");
        CanvasSize::default()
    })
}

fn env_parsed<T: std::str::FromStr>(var: &str) -> Option<T> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring {var}: cannot parse {raw:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    struct EnvGuard {
        snapshot: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        fn capture(keys: &[&'static str]) -> Self {
            let snapshot = keys
                .iter()
                .map(|&key| (key, std::env::var(key).ok()))
                .collect();
            for key in keys {
                std::env::remove_var(key);
            }
            Self { snapshot }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in &self.snapshot {
                match value {
                    Some(val) => std::env::set_var(key, val),
                    None => std::env::remove_var(key),
                }
            }
        }
    }

    const ENV_KEYS: [&str; 13] = [
        "MAINNET_RPC_URL",
        "BASE_RPC_URL",
        "OPTIMISM_RPC_URL",
        "ARBITRUM_RPC_URL",
        "RPC_URL",
        "STARSETS_BLOCK",
        "STARSETS_FIXTURE",
        "STARSETS_MOD1",
        "STARSETS_MOD2",
        "STARSETS_MOD3",
        "STARSETS_COLOR1",
        "STARSETS_BACKGROUND",
        "STARSETS_CANVAS",
    ];

    #[test]
    fn preset_matches_published_defaults() {
        let preset = Modifiers::preset();
        assert_eq!(preset.mod1, 0.025);
        assert_eq!(preset.mod2, 0.1);
        assert_eq!(preset.mod3, 0.8);
        assert_eq!(preset.color1, Srgba::rgb_u8(0x50, 0x37, 0x52));
        assert_eq!(preset.background, Srgba::rgb_u8(0, 0, 0));
        assert_eq!(Modifiers::default(), preset);
    }

    #[test]
    fn moon_count_clamps() {
        let with_mod3 = |mod3| Modifiers {
            mod3,
            ..Modifiers::preset()
        };
        assert_eq!(with_mod3(0.0).moon_count(), 0);
        assert_eq!(with_mod3(0.8).moon_count(), 3);
        assert_eq!(with_mod3(1.0).moon_count(), 4);
        assert_eq!(with_mod3(3.0).moon_count(), 4);
        assert_eq!(with_mod3(-2.0).moon_count(), 0);
    }

    #[test]
    fn non_finite_modifiers_are_rejected() {
        let modifiers = Modifiers {
            mod2: f64::NAN,
            ..Modifiers::preset()
        };
        let err = modifiers.validate().unwrap_err();
        assert!(matches!(err, RenderError::InvalidModifier { name: "mod2", .. }));
        assert!(Modifiers::preset().validate().is_ok());
    }

    #[test]
    fn chain_specific_env_takes_priority() {
        let _lock = lock_env();
        let _guard = EnvGuard::capture(&ENV_KEYS);

        std::env::set_var("MAINNET_RPC_URL", "http://127.0.0.1:8545");
        std::env::set_var("RPC_URL", "http://127.0.0.1:9999");
        std::env::set_var("STARSETS_BLOCK", "12965000");

        let config = chain_config();

        assert_eq!(config.chain, Chain::mainnet());
        assert_eq!(config.rpc_url.as_str(), "http://127.0.0.1:8545/");
        assert_eq!(config.start_block, Some(12_965_000));
    }

    #[test]
    fn invalid_chain_env_falls_back_to_rpc_url() {
        let _lock = lock_env();
        let _guard = EnvGuard::capture(&ENV_KEYS);

        std::env::set_var("MAINNET_RPC_URL", "not-a-url");
        std::env::set_var("RPC_URL", "http://127.0.0.1:8545");

        let config = chain_config();

        assert_eq!(config.chain, Chain::mainnet());
        assert_eq!(config.rpc_url.as_str(), "http://127.0.0.1:8545/");
        assert_eq!(config.start_block, None);
    }

    #[test]
    fn fixture_env_wins_over_rpc() {
        let _lock = lock_env();
        let _guard = EnvGuard::capture(&ENV_KEYS);

        std::env::set_var("STARSETS_FIXTURE", "fixtures/blocks.json");
        std::env::set_var("RPC_URL", "http://127.0.0.1:8545");

        let config = viewer_config();

        assert!(matches!(config.source, BlockSource::Fixture(ref p) if p.ends_with("blocks.json")));
    }

    #[test]
    fn modifier_and_canvas_overrides() {
        let _lock = lock_env();
        let _guard = EnvGuard::capture(&ENV_KEYS);

        std::env::set_var("STARSETS_MOD3", "1.0");
        std::env::set_var("STARSETS_MOD1", "not-a-number");
        std::env::set_var("STARSETS_BACKGROUND", "#102030");
        std::env::set_var("STARSETS_COLOR1", "nope");
        std::env::set_var("STARSETS_CANVAS", "800x600");

        let modifiers = modifiers_from_env();
        let canvas = canvas_from_env();

        assert_eq!(modifiers.mod3, 1.0);
        assert_eq!(modifiers.mod1, Modifiers::preset().mod1);
        assert_eq!(modifiers.background, Srgba::rgb_u8(0x10, 0x20, 0x30));
        assert_eq!(modifiers.color1, Modifiers::preset().color1);
        assert_eq!(canvas, CanvasSize::new(800.0, 600.0));
    }

    #[test]
    fn malformed_canvas_falls_back_to_default() {
        let _lock = lock_env();
        let _guard = EnvGuard::capture(&ENV_KEYS);

        std::env::set_var("STARSETS_CANVAS", "0x600");
        assert_eq!(canvas_from_env(), CanvasSize::default());

        std::env::set_var("STARSETS_CANVAS", "wide");
        assert_eq!(canvas_from_env(), CanvasSize::default());
    }
}
