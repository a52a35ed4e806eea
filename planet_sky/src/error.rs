//! Classified render errors.

use thiserror::Error;

/// Everything that can stop a scene from being rendered.
///
/// A render either returns a complete scene and attribute set or fails with
/// one of these before the first entropy draw.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid block data: {0}")]
    InvalidBlockData(String),

    #[error("invalid modifier {name}: {value}")]
    InvalidModifier { name: &'static str, value: String },

    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },

    #[error("fixture error: {0}")]
    Fixture(String),
}
