//! HUD overlay: block stats, gas fullness, the attribute list and FPS.

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin};

use crate::attributes::AttributeValue;
use crate::data::Block;
use crate::Rendering;

/// Live HUD state updated each time a block is rendered.
#[derive(Resource, Default)]
pub struct HudState {
    pub latest_block_number: Option<u64>,
    pub latest_gas_used: u64,
    pub latest_gas_limit: u64,
    pub latest_tx_count: usize,
    pub blocks_rendered: u64,
    /// `(trait, value)` pairs, already formatted.
    pub attributes: Vec<(&'static str, String)>,
}

impl HudState {
    pub fn update_from_rendering(&mut self, block: &Block, rendering: &Rendering) {
        self.latest_block_number = block.number;
        self.latest_gas_used = block.gas_used;
        self.latest_gas_limit = block.gas_limit;
        self.latest_tx_count = block.transactions.len();
        self.blocks_rendered += 1;
        self.attributes = rendering
            .attributes
            .attributes
            .iter()
            .map(|attr| (attr.trait_type, format_value(&attr.value)))
            .collect();
    }
}

pub fn hud_plugin(app: &mut App) {
    app.add_plugins(EguiPlugin)
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .init_resource::<HudState>()
        .add_systems(Update, hud_overlay_system);
}

fn hud_overlay_system(
    mut contexts: EguiContexts,
    hud: Res<HudState>,
    diagnostics: Res<DiagnosticsStore>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|d| d.smoothed())
        .unwrap_or(0.0);

    let fullness = if hud.latest_gas_limit > 0 {
        hud.latest_gas_used as f32 / hud.latest_gas_limit as f32
    } else {
        0.0
    };

    let title = match hud.latest_block_number {
        Some(number) => format!("Block #{number}"),
        None if hud.blocks_rendered == 0 => "Waiting for blocks".to_string(),
        None => "Block".to_string(),
    };

    egui::Window::new("Starsets")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .frame(
            egui::Frame::default()
                .fill(egui::Color32::from_rgba_premultiplied(15, 15, 25, 210))
                .inner_margin(egui::Margin::same(12))
                .corner_radius(egui::CornerRadius::same(6)),
        )
        .show(contexts.ctx_mut(), |ui| {
            ui.style_mut().override_text_style = Some(egui::TextStyle::Monospace);
            ui.visuals_mut().override_text_color = Some(egui::Color32::from_rgb(200, 220, 240));

            ui.label(
                egui::RichText::new(title)
                    .size(16.0)
                    .color(egui::Color32::from_rgb(100, 220, 180)),
            );
            ui.add_space(4.0);

            ui.label(format!(
                "Gas  {}/{}",
                format_gas(hud.latest_gas_used),
                format_gas(hud.latest_gas_limit)
            ));
            ui.add(
                egui::ProgressBar::new(fullness)
                    .text(format!("{:.1}%", fullness * 100.0))
                    .fill(egui::Color32::from_rgb(80, 180, 140)),
            );
            ui.label(format!("Txns {}", hud.latest_tx_count));
            ui.add_space(4.0);

            ui.separator();
            for (name, value) in &hud.attributes {
                ui.label(format!("{name:<15}{value}"));
            }

            ui.separator();
            ui.label(format!("Blocks rendered  {}", hud.blocks_rendered));
            ui.label(format!("FPS  {fps:.0}"));
        });
}

fn format_value(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Number(n) => format!("{n}"),
        AttributeValue::Text(text) => text.clone(),
    }
}

fn format_gas(gas: u64) -> String {
    if gas >= 1_000_000 {
        format!("{:.1}M", gas as f64 / 1_000_000.0)
    } else if gas >= 1_000 {
        format!("{:.1}K", gas as f64 / 1_000.0)
    } else {
        gas.to_string()
    }
}
