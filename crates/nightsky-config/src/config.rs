//! Configuration structs with defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub sky: SkyConfig,
    pub motion: MotionConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    pub title: String,
}

/// What the sky contains. Every value here is fixed for the lifetime of a scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkyConfig {
    /// Global seed; the same seed always produces the same sky.
    pub seed: u64,
    pub star_count: u32,
    /// Gap kept between constellation footprints, world units.
    pub constellation_min_spacing: f32,
    /// Random placement attempts per constellation before the grid fallback.
    pub constellation_max_attempts: u32,
    pub shooting_star_count: u32,
    pub mote_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    /// Freeze all animation.
    pub reduced_motion: bool,
    /// Peak camera depth drift, world units.
    pub drift_amplitude: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log frames per second once a second.
    pub show_fps: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Night Sky".to_string(),
        }
    }
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            star_count: 5000,
            constellation_min_spacing: 2.5,
            constellation_max_attempts: 100,
            shooting_star_count: 3,
            mote_count: 25,
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            drift_amplitude: 2.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_fps: false,
        }
    }
}

const MAX_STARS: u32 = 200_000;

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE_NAME), serialized)
            .map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = std::fs::read_to_string(config_dir.join(CONFIG_FILE_NAME))
            .map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values the sky cannot be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: String| Err(ConfigError::InvalidValue { field, reason });
        let sky = &self.sky;
        if sky.star_count > MAX_STARS {
            return invalid("sky.star_count", format!("{} exceeds {MAX_STARS}", sky.star_count));
        }
        if !sky.constellation_min_spacing.is_finite() || sky.constellation_min_spacing < 0.0 {
            return invalid(
                "sky.constellation_min_spacing",
                format!("{} is not a finite non-negative distance", sky.constellation_min_spacing),
            );
        }
        if !self.motion.drift_amplitude.is_finite() || self.motion.drift_amplitude < 0.0 {
            return invalid(
                "motion.drift_amplitude",
                format!("{} is not a finite non-negative distance", self.motion.drift_amplitude),
            );
        }
        if self.window.width == 0 || self.window.height == 0 {
            return invalid(
                "window",
                format!("{}x{} has zero area", self.window.width, self.window.height),
            );
        }
        Ok(())
    }
}
