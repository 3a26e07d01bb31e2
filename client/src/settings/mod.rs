use crate::ambience::AmbienceSettings;
use crate::camera::CameraSettings;
use crate::character::CharacterSettings;
use crate::fireworks::{FireworkSettings, ShowSettings};
use crate::interaction::InteractionSettings;
use crate::scene_runtime::components::MoonLight;
use bevy::light::{DirectionalLightShadowMap, ShadowFilteringMethod};
use bevy::prelude::*;
use bevy::window::{MonitorSelection, PresentMode, PrimaryWindow, WindowMode, WindowResolution};
use bevy::winit::{UpdateMode, WinitSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const SETTINGS_FILE_PATH: &str = "./birthday_settings.yaml";

const RESOLUTION_PRESETS: [ResolutionSetting; 4] = [
    ResolutionSetting {
        width: 1280,
        height: 720,
    },
    ResolutionSetting {
        width: 1600,
        height: 900,
    },
    ResolutionSetting {
        width: 1920,
        height: 1080,
    },
    ResolutionSetting {
        width: 2560,
        height: 1440,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowModeSetting {
    Windowed,
    Fullscreen,
}

impl Default for WindowModeSetting {
    fn default() -> Self {
        Self::Windowed
    }
}

impl WindowModeSetting {
    pub const ALL: [Self; 2] = [Self::Windowed, Self::Fullscreen];

    pub fn to_bevy(self) -> WindowMode {
        match self {
            Self::Windowed => WindowMode::Windowed,
            Self::Fullscreen => WindowMode::BorderlessFullscreen(MonitorSelection::Current),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Windowed => "Windowed",
            Self::Fullscreen => "Fullscreen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowQualitySetting {
    Off,
    Low,
    Medium,
    High,
}

impl Default for ShadowQualitySetting {
    fn default() -> Self {
        Self::Low
    }
}

impl ShadowQualitySetting {
    pub const ALL: [Self; 4] = [Self::Off, Self::Low, Self::Medium, Self::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FpsLimitSetting {
    Default60,
    Monitor,
    Unlimited,
}

impl Default for FpsLimitSetting {
    fn default() -> Self {
        Self::Default60
    }
}

impl FpsLimitSetting {
    pub const ALL: [Self; 3] = [Self::Default60, Self::Monitor, Self::Unlimited];

    pub fn to_update_mode(self) -> UpdateMode {
        match self {
            Self::Default60 => UpdateMode::reactive(Duration::from_secs_f64(1.0 / 60.0)),
            Self::Monitor | Self::Unlimited => UpdateMode::Continuous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Default60 => "60 FPS",
            Self::Monitor => "Monitor",
            Self::Unlimited => "Unlimited",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionSetting {
    pub width: u32,
    pub height: u32,
}

impl Default for ResolutionSetting {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl ResolutionSetting {
    pub fn presets() -> &'static [Self] {
        &RESOLUTION_PRESETS
    }

    pub fn label(self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsSettings {
    pub window_mode: WindowModeSetting,
    pub resolution: ResolutionSetting,
    pub shadow_quality: ShadowQualitySetting,
    pub vsync: bool,
    pub fps_limit: FpsLimitSetting,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            window_mode: WindowModeSetting::Windowed,
            resolution: ResolutionSetting::default(),
            shadow_quality: ShadowQualitySetting::Low,
            vsync: true,
            fps_limit: FpsLimitSetting::Default60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource, Default)]
#[serde(default)]
pub struct GameSettings {
    pub graphics: GraphicsSettings,
    pub character: CharacterSettings,
    pub camera: CameraSettings,
    pub interaction: InteractionSettings,
    pub fireworks: FireworkSettings,
    pub show: ShowSettings,
    pub ambience: AmbienceSettings,
}

#[derive(Debug, Error)]
pub enum SettingsIoError {
    #[error("failed to read settings file: {0}")]
    Read(std::io::Error),
    #[error("failed to write settings file: {0}")]
    Write(std::io::Error),
    #[error("failed to decode YAML settings: {0}")]
    Deserialize(serde_yaml::Error),
    #[error("failed to encode YAML settings: {0}")]
    Serialize(serde_yaml::Error),
}

#[derive(Resource, Clone)]
pub struct SettingsResource {
    pub current: GameSettings,
    path: PathBuf,
}

impl SettingsResource {
    pub fn new(current: GameSettings) -> Self {
        Self {
            current,
            path: PathBuf::from(SETTINGS_FILE_PATH),
        }
    }

    pub fn save_to_disk(&self) -> Result<(), SettingsIoError> {
        write_settings_to_path(&self.current, &self.path)
    }
}

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, apply_runtime_settings);
    }
}

pub fn load_settings_or_default() -> GameSettings {
    let path = Path::new(SETTINGS_FILE_PATH);

    if !path.exists() {
        return GameSettings::default();
    }

    match load_settings_from_path(path) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!(
                "Failed to load settings from '{}': {}. Falling back to defaults.",
                SETTINGS_FILE_PATH, error
            );
            GameSettings::default()
        }
    }
}

pub fn ensure_settings_file_exists(settings: &GameSettings) -> Result<(), SettingsIoError> {
    let path = Path::new(SETTINGS_FILE_PATH);
    if path.exists() {
        return Ok(());
    }

    write_settings_to_path(settings, path)
}

pub fn present_mode_for(graphics: &GraphicsSettings) -> PresentMode {
    if matches!(graphics.fps_limit, FpsLimitSetting::Unlimited) {
        PresentMode::AutoNoVsync
    } else if graphics.vsync {
        PresentMode::AutoVsync
    } else {
        PresentMode::AutoNoVsync
    }
}

fn load_settings_from_path(path: &Path) -> Result<GameSettings, SettingsIoError> {
    let raw = fs::read_to_string(path).map_err(SettingsIoError::Read)?;
    let mut settings =
        serde_yaml::from_str::<GameSettings>(&raw).map_err(SettingsIoError::Deserialize)?;
    settings.fireworks = settings.fireworks.sanitized();
    settings.show = settings.show.sanitized();
    Ok(settings)
}

fn write_settings_to_path(settings: &GameSettings, path: &Path) -> Result<(), SettingsIoError> {
    let encoded = serde_yaml::to_string(settings).map_err(SettingsIoError::Serialize)?;
    fs::write(path, encoded).map_err(SettingsIoError::Write)
}

fn apply_runtime_settings(
    settings: Res<SettingsResource>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut winit_settings: ResMut<WinitSettings>,
    mut moon_query: Query<&mut DirectionalLight, With<MoonLight>>,
    mut shadow_map: Option<ResMut<DirectionalLightShadowMap>>,
    camera_query: Query<Entity, With<Camera3d>>,
    added_moon_query: Query<(), Added<MoonLight>>,
    mut commands: Commands,
    mut last_applied: Local<Option<GraphicsSettings>>,
) {
    let graphics = &settings.current.graphics;
    let moon_spawned = !added_moon_query.is_empty();
    if last_applied.as_ref() == Some(graphics) && !moon_spawned {
        return;
    }

    if let Ok(mut window) = windows.single_mut() {
        let target_mode = graphics.window_mode.to_bevy();
        window.mode = target_mode;

        // In borderless fullscreen, forcing a custom logical resolution can
        // produce a top-left viewport offset. Keep monitor/native size there.
        if matches!(target_mode, WindowMode::Windowed) {
            window.resolution =
                WindowResolution::new(graphics.resolution.width, graphics.resolution.height);
        }

        window.present_mode = present_mode_for(graphics);
    }

    let update_mode = graphics.fps_limit.to_update_mode();
    winit_settings.focused_mode = update_mode;
    winit_settings.unfocused_mode = update_mode;

    apply_shadow_quality(
        graphics.shadow_quality,
        &mut moon_query,
        shadow_map.as_deref_mut(),
        &camera_query,
        &mut commands,
    );

    *last_applied = Some(graphics.clone());
}

fn shadow_map_size(mode: ShadowQualitySetting) -> Option<usize> {
    match mode {
        ShadowQualitySetting::Off => None,
        ShadowQualitySetting::Low => Some(1024),
        ShadowQualitySetting::Medium => Some(2048),
        ShadowQualitySetting::High => Some(4096),
    }
}

fn apply_shadow_quality(
    mode: ShadowQualitySetting,
    moon_query: &mut Query<&mut DirectionalLight, With<MoonLight>>,
    shadow_map: Option<&mut DirectionalLightShadowMap>,
    camera_query: &Query<Entity, With<Camera3d>>,
    commands: &mut Commands,
) {
    let map_size = shadow_map_size(mode);

    for mut light in moon_query.iter_mut() {
        light.shadows_enabled = map_size.is_some();
    }

    let Some(size) = map_size else {
        return;
    };
    if let Some(map) = shadow_map {
        map.size = size;
    }

    let filtering = match mode {
        ShadowQualitySetting::Medium | ShadowQualitySetting::High => {
            ShadowFilteringMethod::Gaussian
        }
        _ => ShadowFilteringMethod::Hardware2x2,
    };
    for entity in camera_query.iter() {
        commands.entity(entity).insert(filtering);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_missing_sections_with_defaults() {
        let raw = "character:\n  move_speed: 8.0\nshow:\n  duration: 12.0\n";
        let settings: GameSettings = serde_yaml::from_str(raw).expect("decode");

        assert_eq!(settings.character.move_speed, 8.0);
        assert_eq!(settings.character.turn_speed, 3.0);
        assert_eq!(settings.show.duration, 12.0);
        assert_eq!(settings.show.initial_launches, 5);
        assert_eq!(settings.interaction, InteractionSettings::default());
        assert_eq!(settings.graphics, GraphicsSettings::default());
    }

    #[test]
    fn settings_survive_a_write_and_reload() {
        let path = std::env::temp_dir().join(format!(
            "birthday_settings_test_{}.yaml",
            std::process::id()
        ));
        let mut settings = GameSettings::default();
        settings.fireworks.stall_velocity = 1.25;
        settings.graphics.fps_limit = FpsLimitSetting::Unlimited;

        write_settings_to_path(&settings, &path).expect("write");
        let loaded = load_settings_from_path(&path).expect("load");
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, settings);
    }

    #[test]
    fn shadow_quality_round_trips_and_sizes_the_map() {
        let graphics: GraphicsSettings =
            serde_yaml::from_str("shadow_quality: high\nvsync: false\n").expect("decode");
        assert_eq!(graphics.shadow_quality, ShadowQualitySetting::High);
        assert_eq!(graphics.window_mode, WindowModeSetting::Windowed);

        assert_eq!(shadow_map_size(ShadowQualitySetting::Off), None);
        assert_eq!(shadow_map_size(ShadowQualitySetting::Low), Some(1024));
        assert_eq!(shadow_map_size(ShadowQualitySetting::High), Some(4096));
    }

    #[test]
    fn non_finite_tunables_load_as_defaults() {
        let path = std::env::temp_dir().join(format!(
            "birthday_settings_nan_{}.yaml",
            std::process::id()
        ));
        fs::write(&path, "fireworks:\n  gravity: .nan\nshow:\n  duration: .inf\n").expect("write");
        let loaded = load_settings_from_path(&path).expect("load");
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.fireworks.gravity, FireworkSettings::default().gravity);
        assert_eq!(loaded.show.duration, ShowSettings::default().duration);
    }

    #[test]
    fn malformed_file_reports_decode_error() {
        let path = std::env::temp_dir().join(format!(
            "birthday_settings_bad_{}.yaml",
            std::process::id()
        ));
        fs::write(&path, "graphics: [not, a, map]\n").expect("write");
        let result = load_settings_from_path(&path);
        let _ = fs::remove_file(&path);

        assert!(matches!(result, Err(SettingsIoError::Deserialize(_))));
    }

    #[test]
    fn unlimited_fps_disables_vsync() {
        let graphics = GraphicsSettings {
            fps_limit: FpsLimitSetting::Unlimited,
            vsync: true,
            ..GraphicsSettings::default()
        };
        assert_eq!(present_mode_for(&graphics), PresentMode::AutoNoVsync);
    }
}
