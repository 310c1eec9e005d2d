use std::env;
use std::path::{Path, PathBuf};

use dotenv::dotenv;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::types::SampleField;
use crate::window::WINDOW_CAPACITY;

/// Environment variable that overrides `connection.endpoint`.
pub const ENDPOINT_ENV: &str = "MOTION_X_VIEW_ENDPOINT";

/// Application configuration, loaded from `config.toml` when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub connection: ConnectionConfig,
    pub buffer: BufferConfig,
    pub plot: PlotConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub resizable: bool,
    pub vsync: bool,
    pub hardware_acceleration: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub endpoint: String,
    pub event_channel_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub chart_height: f32,
    pub orientation_height: f32,
    pub colors: PlotColors,
}

/// RGB colours per chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotColors {
    pub roll: [u8; 3],
    pub pitch: [u8; 3],
    pub yaw: [u8; 3],
    pub acceleration_x: [u8; 3],
    pub acceleration_y: [u8; 3],
    pub acceleration_z: [u8; 3],
    pub model: [u8; 3],
}

impl PlotColors {
    pub fn for_field(&self, field: SampleField) -> [u8; 3] {
        match field {
            SampleField::Roll => self.roll,
            SampleField::Pitch => self.pitch,
            SampleField::Yaw => self.yaw,
            SampleField::UserAccelerationX => self.acceleration_x,
            SampleField::UserAccelerationY => self.acceleration_y,
            SampleField::UserAccelerationZ => self.acceleration_z,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 900.0,
            title: "Motion X View".to_string(),
            resizable: true,
            vsync: true,
            hardware_acceleration: true,
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://localhost:8080".to_string(),
            event_channel_capacity: 100,
        }
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: WINDOW_CAPACITY,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            chart_height: 100.0,
            orientation_height: 300.0,
            colors: PlotColors::default(),
        }
    }
}

impl Default for PlotColors {
    fn default() -> Self {
        Self {
            roll: [220, 50, 47],
            pitch: [38, 139, 210],
            yaw: [133, 153, 0],
            acceleration_x: [255, 0, 0],
            acceleration_y: [0, 160, 0],
            acceleration_z: [0, 0, 255],
            model: [203, 75, 22],
        }
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            return Err(ConfigError::Validation("Window dimensions must be positive".to_string()));
        }

        if self.buffer.capacity == 0 {
            return Err(ConfigError::Validation("Buffer capacity must be at least 1".to_string()));
        }

        if self.connection.endpoint.trim().is_empty() {
            return Err(ConfigError::Validation("Endpoint must not be empty".to_string()));
        }

        if self.connection.event_channel_capacity == 0 {
            return Err(ConfigError::Validation("Event channel capacity must be positive".to_string()));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = env::var(ENDPOINT_ENV) {
            if endpoint.trim().is_empty() {
                warn!("{} is set but empty, keeping {}", ENDPOINT_ENV, self.connection.endpoint);
            } else {
                info!("Endpoint overridden by {}: {}", ENDPOINT_ENV, endpoint);
                self.connection.endpoint = endpoint;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            config_path: None,
        }
    }

    /// Loads `path` if it exists, falling back to defaults on a missing or
    /// invalid file, then applies `.env` / environment overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let mut manager = if path.exists() {
            match AppConfig::load_from_file(path) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    Self {
                        config,
                        config_path: Some(path.to_path_buf()),
                    }
                }
                Err(e) => {
                    warn!("Ignoring {}: {}", path.display(), e);
                    Self::new()
                }
            }
        } else {
            Self::new()
        };

        dotenv().ok();
        manager.config.apply_env_overrides();
        manager
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn get_config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// Writes the configuration back to the file it was loaded from, if any.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.config_path {
            self.config.save_to_file(path)?;
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.connection.endpoint, "ws://localhost:8080");
        assert_eq!(config.buffer.capacity, 50);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [connection]
            endpoint = "ws://10.0.0.2:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.connection.endpoint, "ws://10.0.0.2:9000");
        assert_eq!(config.connection.event_channel_capacity, 100);
        assert_eq!(config.buffer.capacity, 50);
        assert_eq!(config.plot.chart_height, 100.0);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut config = AppConfig::default();
        config.buffer.capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn blank_endpoint_is_rejected() {
        let mut config = AppConfig::default();
        config.connection.endpoint = "   ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn saved_file_loads_back() {
        let path = env::temp_dir().join(format!("motion-x-view-{}.toml", std::process::id()));
        let mut config = AppConfig::default();
        config.connection.endpoint = "ws://192.168.1.20:8080".to_string();
        config.buffer.capacity = 120;
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.connection.endpoint, "ws://192.168.1.20:8080");
        assert_eq!(loaded.buffer.capacity, 120);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let manager = ConfigManager::load_or_default("/nonexistent/motion-x-view.toml");
        assert!(manager.config_path.is_none());
        assert_eq!(manager.get_config().buffer.capacity, 50);
    }
}
