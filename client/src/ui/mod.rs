use crate::session::BirthdaySession;
use crate::settings::{
    self, FpsLimitSetting, GameSettings, ResolutionSetting, SettingsResource,
    ShadowQualitySetting, WindowModeSetting,
};
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

/// Seconds the controls panel stays up after launch.
pub const HELP_PANEL_SECONDS: f32 = 10.0;

const CELEBRATION_MESSAGE: &str = "Happy Birthday!";
const PROMPT_TEXT: &str = "Press E to light up the sky";

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudUiState>()
            .init_resource::<HelpPanel>()
            .add_systems(Update, tick_help_panel)
            .add_systems(EguiPrimaryContextPass, draw_hud_egui);
    }
}

/// Controls overview shown at start-up, hidden once its timer runs out.
#[derive(Resource)]
pub struct HelpPanel {
    pub timer: Timer,
}

impl Default for HelpPanel {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(HELP_PANEL_SECONDS, TimerMode::Once),
        }
    }
}

impl HelpPanel {
    pub fn visible(&self) -> bool {
        !self.timer.is_finished()
    }
}

#[derive(Resource, Default)]
struct HudUiState {
    settings_open: bool,
    draft: GameSettings,
}

pub fn tick_help_panel(time: Res<Time>, mut help: ResMut<HelpPanel>) {
    if help.visible() {
        help.timer.tick(time.delta());
    }
}

fn draw_hud_egui(
    mut contexts: EguiContexts,
    mut hud_state: ResMut<HudUiState>,
    mut settings_resource: ResMut<SettingsResource>,
    session: Res<BirthdaySession>,
    help: Res<HelpPanel>,
    mut theme_initialized: Local<bool>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    if !*theme_initialized {
        apply_modern_hud_theme(ctx);
        *theme_initialized = true;
    }

    if session.prompt_visible() {
        draw_banner(ctx, "interaction_prompt", PROMPT_TEXT, 20.0, egui::vec2(0.0, -80.0));
    }
    if session.message_visible() {
        draw_banner(
            ctx,
            "celebration_message",
            CELEBRATION_MESSAGE,
            48.0,
            egui::vec2(0.0, 80.0),
        );
    }
    if help.visible() {
        draw_help_panel(ctx, &session);
    }

    draw_bottom_bar(&mut hud_state, &settings_resource, ctx);

    if hud_state.settings_open {
        draw_settings_modal(&mut hud_state, &mut settings_resource, ctx);
    }
}

fn apply_modern_hud_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);
    style.spacing.window_margin = egui::Margin::same(14);
    style.visuals.window_corner_radius = egui::CornerRadius::same(12);
    style.visuals.menu_corner_radius = egui::CornerRadius::same(10);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(8);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(8);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(8);
    ctx.set_style(style);
}

fn draw_banner(ctx: &egui::Context, id: &str, text: &str, size: f32, offset: egui::Vec2) {
    egui::Area::new(egui::Id::new(id))
        .anchor(egui::Align2::CENTER_CENTER, offset)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_rgba_unmultiplied(0, 0, 0, 140))
                .corner_radius(egui::CornerRadius::same(12))
                .inner_margin(egui::Margin::symmetric(18, 10))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(text)
                            .size(size)
                            .color(egui::Color32::from_rgb(255, 214, 102)),
                    );
                });
        });
}

fn draw_help_panel(ctx: &egui::Context, session: &BirthdaySession) {
    egui::Window::new("Controls")
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-14.0, 14.0))
        .collapsible(false)
        .resizable(false)
        .movable(false)
        .show(ctx, |ui| {
            ui.label("W A S D  move");
            ui.label("Click  look around (Esc releases)");
            ui.label("E  interact with the cake");
            ui.label(format!("V  toggle view ({})", session.rig().mode.label()));
            ui.label("O  debug free camera");
        });
}

fn draw_bottom_bar(
    hud_state: &mut HudUiState,
    settings_resource: &SettingsResource,
    ctx: &egui::Context,
) {
    egui::TopBottomPanel::bottom("hud_bottom_bar")
        .resizable(false)
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal_centered(|ui| {
                egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(0, 0, 0, 128))
                    .corner_radius(egui::CornerRadius::same(12))
                    .inner_margin(egui::Margin::symmetric(12, 10))
                    .show(ui, |ui| {
                        if ui
                            .add_sized(egui::vec2(42.0, 42.0), egui::Button::new("Menu"))
                            .clicked()
                        {
                            hud_state.settings_open = true;
                            hud_state.draft = settings_resource.current.clone();
                        }
                    });
            });
            ui.add_space(8.0);
        });
}

fn draw_settings_modal(
    hud_state: &mut HudUiState,
    settings_resource: &mut SettingsResource,
    ctx: &egui::Context,
) {
    let mut window_open = hud_state.settings_open;
    let mut should_apply = false;
    let mut should_close = false;

    egui::Window::new("Settings")
        .open(&mut window_open)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .collapsible(false)
        .resizable(false)
        .movable(false)
        .default_width(480.0)
        .show(ctx, |ui| {
            draw_graphics_settings(ui, &mut hud_state.draft);

            ui.separator();
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                should_apply = ui.button("Apply").clicked();
                should_close = ui.button("Close").clicked();
            });
        });

    if should_apply {
        // Simulation tunables only take effect on the next launch.
        settings_resource.current.graphics = hud_state.draft.graphics.clone();
        if let Err(error) = settings_resource.save_to_disk() {
            warn!(
                "Failed to save settings file '{}': {}",
                settings::SETTINGS_FILE_PATH,
                error
            );
        }
    }

    if should_close {
        window_open = false;
    }

    if !window_open {
        hud_state.draft = settings_resource.current.clone();
    }
    hud_state.settings_open = window_open;
}

fn draw_graphics_settings(ui: &mut egui::Ui, draft: &mut GameSettings) {
    egui::ComboBox::from_label("Window mode")
        .selected_text(draft.graphics.window_mode.label())
        .show_ui(ui, |ui| {
            for option in WindowModeSetting::ALL {
                ui.selectable_value(&mut draft.graphics.window_mode, option, option.label());
            }
        });

    egui::ComboBox::from_label("Resolution")
        .selected_text(draft.graphics.resolution.label())
        .show_ui(ui, |ui| {
            for option in ResolutionSetting::presets() {
                ui.selectable_value(&mut draft.graphics.resolution, *option, option.label());
            }
        });

    egui::ComboBox::from_label("Shadows")
        .selected_text(draft.graphics.shadow_quality.label())
        .show_ui(ui, |ui| {
            for option in ShadowQualitySetting::ALL {
                ui.selectable_value(&mut draft.graphics.shadow_quality, option, option.label());
            }
        });

    egui::ComboBox::from_label("FPS limit")
        .selected_text(draft.graphics.fps_limit.label())
        .show_ui(ui, |ui| {
            for option in FpsLimitSetting::ALL {
                ui.selectable_value(&mut draft.graphics.fps_limit, option, option.label());
            }
        });

    ui.checkbox(&mut draft.graphics.vsync, "VSync");
}
