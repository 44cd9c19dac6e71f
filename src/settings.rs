//! Runtime settings.
//!
//! Settings come from an optional JSON file next to the executable's working directory. Every
//! field may be omitted; missing fields take their default values.

use std::path::Path;

use glam::Vec3;
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "lightcube.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "LearnOpenGL".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl CameraSettings {
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, -3.0],
            yaw: 90.0,
            pitch: 0.0,
            speed: crate::camera::DEFAULT_SPEED,
            sensitivity: crate::camera::DEFAULT_SENSITIVITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub object_vertex_shader: String,
    pub object_fragment_shader: String,
    pub lamp_vertex_shader: String,
    pub lamp_fragment_shader: String,
    pub diffuse_map: String,
    pub specular_map: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            object_vertex_shader: "shaders/object.vert".to_string(),
            object_fragment_shader: "shaders/object.frag".to_string(),
            lamp_vertex_shader: "shaders/lamp.vert".to_string(),
            lamp_fragment_shader: "shaders/lamp.frag".to_string(),
            diffuse_map: "textures/container_diffuse.png".to_string(),
            specular_map: "textures/container_specular.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: String,
    pub clear_color: [f32; 3],
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub assets: AssetSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            clear_color: [0.1, 0.1, 0.1],
            window: WindowSettings::default(),
            camera: CameraSettings::default(),
            assets: AssetSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_json(s: &str) -> Result<Self, String> {
        serde_json::from_str(s).map_err(|e| e.to_string())
    }

    /// Reads settings from `path`, falling back to the defaults when the file is absent or
    /// invalid.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no {} found, using default settings", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("could not read {}: {}, using default settings", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&contents) {
            Ok(settings) => {
                log::info!("loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("invalid settings in {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parsed log level; unknown names fall back to `Info`.
    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_settings_keep_other_defaults() {
        let json = r#"{
            "log_level": "debug",
            "window": { "width": 800, "fullscreen": true },
            "camera": { "position": [1.0, 2.0, 3.0], "speed": 5.0 }
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.log_level(), log::LevelFilter::Debug);
        assert_eq!(settings.window.width, 800);
        assert_eq!(settings.window.height, 720);
        assert!(settings.window.fullscreen);
        assert_eq!(settings.camera.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(settings.camera.speed, 5.0);
        assert_eq!(settings.camera.yaw, 90.0);
        assert_eq!(settings.assets, AssetSettings::default());
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(Settings::from_json("{ \"window\": ").is_err());
        assert!(Settings::from_json("{ \"window\": { \"width\": -5 } }").is_err());
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let settings = Settings {
            log_level: "chatty".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("lightcube-missing-settings.json");
        let _ = std::fs::remove_file(&path);
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let path = std::env::temp_dir().join(format!(
            "lightcube-invalid-settings-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        std::fs::remove_file(&path).unwrap();
    }
}
