//! Viewer builder: a Bevy app that repaints the sky for every incoming block.

use std::path::PathBuf;

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use tracing::warn;

use crate::config::{self, BlockSource, Modifiers};
use crate::data::{init_block_channel, init_fixture_channel, BlockChannel, FetcherConfig};
use crate::error::RenderError;
use crate::render::{SceneLayer, SpriteCanvas};
use crate::scene::CanvasSize;
use crate::ui::{hud_plugin, HudState};

/// What every render in the viewer is parameterized with.
#[derive(Resource, Clone, Debug)]
pub struct ViewerSettings {
    pub modifiers: Modifiers,
    pub canvas: CanvasSize,
}

/// Builder for constructing a viewer app with customizable plugins.
pub struct SkyViewerBuilder {
    source: Option<BlockSource>,
    modifiers: Modifiers,
    canvas: CanvasSize,
    window_title: String,
    enable_hud: bool,
}

impl Default for SkyViewerBuilder {
    fn default() -> Self {
        Self {
            source: None,
            modifiers: Modifiers::preset(),
            canvas: CanvasSize::default(),
            window_title: "Starsets".to_string(),
            enable_hud: true,
        }
    }
}

impl SkyViewerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source, modifiers and canvas from environment variables.
    pub fn from_env() -> Self {
        let viewer = config::viewer_config();
        Self {
            source: Some(viewer.source),
            modifiers: viewer.modifiers,
            canvas: viewer.canvas,
            ..Self::default()
        }
    }

    /// Fetch blocks over RPC.
    pub fn rpc(mut self, config: FetcherConfig) -> Self {
        self.source = Some(BlockSource::Rpc(config));
        self
    }

    /// Replay blocks from a JSON fixture.
    pub fn fixture(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(BlockSource::Fixture(path.into()));
        self
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn canvas(mut self, canvas: CanvasSize) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn disable_hud(mut self) -> Self {
        self.enable_hud = false;
        self
    }

    /// Build the Bevy app. Fails on invalid modifiers or canvas, or an
    /// unreadable fixture.
    pub fn build(self) -> Result<App, RenderError> {
        self.modifiers.validate()?;
        self.canvas.validate()?;
        let channel = match self.source {
            Some(BlockSource::Fixture(path)) => init_fixture_channel(&path)?,
            Some(BlockSource::Rpc(config)) => init_block_channel(config),
            None => init_block_channel(config::chain_config()),
        };

        let background = Color::from(self.modifiers.background);
        let mut app = App::new();
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: self.window_title,
                resolution: WindowResolution::new(self.canvas.width, self.canvas.height),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(background))
        .insert_resource(channel)
        .insert_resource(ViewerSettings {
            modifiers: self.modifiers,
            canvas: self.canvas,
        })
        .add_systems(Startup, setup_camera)
        .add_systems(Update, ingest_blocks);

        if self.enable_hud {
            app.add_plugins(hud_plugin);
        }

        Ok(app)
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, Tonemapping::None));
}

/// Renders the newest queued block, replacing the previous scene.
/// Older blocks queued in the same frame are skipped.
pub fn ingest_blocks(
    mut commands: Commands,
    channel: Res<BlockChannel>,
    settings: Res<ViewerSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    layers: Query<Entity, With<SceneLayer>>,
    hud: Option<ResMut<HudState>>,
) {
    let Some(block) = channel.0.try_iter().last() else {
        return;
    };

    let rendering = match crate::render(&block, &settings.modifiers, settings.canvas) {
        Ok(rendering) => rendering,
        Err(err) => {
            warn!(number = block.number, %err, "skipping block");
            return;
        }
    };

    for entity in &layers {
        commands.entity(entity).despawn();
    }
    let mut canvas = SpriteCanvas::new(&mut commands, &mut meshes, &mut materials, settings.canvas);
    rendering.scene.draw(&mut canvas);

    if let Some(mut hud) = hud {
        hud.update_from_rendering(&block, &rendering);
    }
}
