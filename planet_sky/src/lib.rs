//! Planet-sky scenes ("starsets") composed from a block's hash, gas and
//! transaction values.
//!
//! Library root: the render entry point plus the data, scene, render and
//! viewer modules.

pub mod attributes;
pub mod config;
pub mod data;
pub mod entropy;
pub mod error;
pub mod palette;
pub mod render;
pub mod scene;
mod ui;

pub mod prelude;
pub mod sdk;

use tracing::info;

pub use attributes::{Attribute, AttributeSet, AttributeValue};
pub use config::Modifiers;
pub use data::evm::EvmFetcher;
pub use data::{Block, ChainFetcher, FetcherConfig, Transaction};
pub use error::RenderError;
pub use scene::{CanvasSize, Scene};

/// A composed scene and the traits describing it.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendering {
    pub scene: Scene,
    pub attributes: AttributeSet,
}

/// Composes the sky for one block. Pure: the same inputs always give the
/// same rendering, and every input is checked before the first draw.
pub fn render(
    block: &Block,
    modifiers: &Modifiers,
    canvas: CanvasSize,
) -> Result<Rendering, RenderError> {
    let composer = scene::SceneComposer::new(block, modifiers, canvas)?;
    let features = composer.features().clone();
    let scene = composer.compose();
    let attributes = AttributeSet::derive(&scene, &features);

    info!(
        number = block.number,
        seed = scene.seed,
        palette = scene.palette.name(),
        rings = scene.rings.rings.len(),
        moons = scene.moons.len(),
        "rendered block"
    );
    Ok(Rendering { scene, attributes })
}
