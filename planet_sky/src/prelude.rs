//! Minimal prelude for SDK consumers.

pub use crate::config::{chain_config, viewer_config, Modifiers};
pub use crate::data::{Block, ChainFetcher, FetcherConfig, Transaction};
pub use crate::render::{DisplayList, SceneBackend};
pub use crate::scene::CanvasSize;
pub use crate::sdk::SkyViewerBuilder;
pub use crate::{render, RenderError, Rendering};
