// Game tunables loaded from a RON file

use std::path::{Path, PathBuf};

use glam::Vec2;
use log::{info, warn};
use serde::Deserialize;

use crate::engine::camera::CameraRigSettings;
use crate::engine::movement::MovementSettings;
use crate::engine::sprite::FlipbookDefinition;

/// Default location of the config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "assets/config/flint.ron";

/// Config loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Everything tunable about the game
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct FlintConfig {
    pub character: CharacterSettings,
    pub level: LevelSettings,
}

/// Tunables of the playable character
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CharacterSettings {
    /// Dash speed as a multiple of the maximum walk speed
    pub dash_multiplier: f32,
    /// Seconds before dash can be used again
    pub dash_cooldown_time: f32,
    /// Maximum number of multi-jumps
    pub max_jump_count: u32,
    /// How long a held jump keeps its upward velocity
    pub max_jump_time: f32,
    pub capsule_width: f32,
    pub capsule_height: f32,
    pub movement: MovementSettings,
    pub camera: CameraRigSettings,
    /// Played while running around
    pub running_animation: FlipbookDefinition,
    /// Played while standing still
    pub idle_animation: FlipbookDefinition,
}

impl Default for CharacterSettings {
    fn default() -> Self {
        Self {
            dash_multiplier: 3.0,
            dash_cooldown_time: 1.0,
            max_jump_count: 2,
            max_jump_time: 0.2,
            capsule_width: 0.8,
            capsule_height: 1.8,
            movement: MovementSettings::default(),
            camera: CameraRigSettings::default(),
            running_animation: FlipbookDefinition {
                name: "running".to_string(),
                sheet: "sprites/flint.png".to_string(),
                frame_width: 64,
                frame_height: 64,
                columns: 8,
                row: 1,
                frame_count: 8,
                frames_per_second: 15.0,
                looping: true,
            },
            idle_animation: FlipbookDefinition {
                name: "idle".to_string(),
                sheet: "sprites/flint.png".to_string(),
                frame_width: 64,
                frame_height: 64,
                columns: 8,
                row: 0,
                frame_count: 4,
                frames_per_second: 6.0,
                looping: true,
            },
        }
    }
}

/// A static box the character can stand on
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PlatformSettings {
    /// Centre of the box
    pub position: Vec2,
    /// Full width and height
    pub size: Vec2,
}

/// Level layout
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    /// Where the character starts and respawns
    pub spawn: Vec2,
    /// Falling below this height respawns the character
    pub kill_z: f32,
    pub platforms: Vec<PlatformSettings>,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            spawn: Vec2::new(0.0, 2.0),
            kill_z: -20.0,
            platforms: vec![
                PlatformSettings {
                    position: Vec2::new(0.0, -0.5),
                    size: Vec2::new(40.0, 1.0),
                },
                PlatformSettings {
                    position: Vec2::new(8.0, 2.5),
                    size: Vec2::new(6.0, 0.5),
                },
                PlatformSettings {
                    position: Vec2::new(-9.0, 4.5),
                    size: Vec2::new(5.0, 0.5),
                },
            ],
        }
    }
}

impl FlintConfig {
    /// Load the config at `path`
    ///
    /// A missing file falls back to the built-in defaults. A file that exists
    /// but cannot be read or parsed is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Config {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = Self::parse(&text, path)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a config from RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, Path::new("<inline>"))
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let character = &self.character;

        if !(character.capsule_width > 0.0 && character.capsule_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "capsule must have positive size, got {}x{}",
                character.capsule_width, character.capsule_height
            )));
        }
        non_negative("dash_multiplier", character.dash_multiplier)?;
        non_negative("dash_cooldown_time", character.dash_cooldown_time)?;
        non_negative("max_jump_time", character.max_jump_time)?;

        let movement = &character.movement;
        non_negative("max_walk_speed", movement.max_walk_speed)?;
        non_negative("max_acceleration", movement.max_acceleration)?;
        non_negative("braking_deceleration", movement.braking_deceleration)?;
        non_negative("jump_velocity", movement.jump_velocity)?;
        non_negative("ground_probe_distance", movement.ground_probe_distance)?;
        if !(0.0..=1.0).contains(&movement.air_control) {
            return Err(ConfigError::Invalid(format!(
                "air_control must be within [0, 1], got {}",
                movement.air_control
            )));
        }
        if !movement.gravity_scale.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "gravity_scale must be finite, got {}",
                movement.gravity_scale
            )));
        }

        validate_flipbook(&character.running_animation)?;
        validate_flipbook(&character.idle_animation)?;

        if let Some(platform) = self
            .level
            .platforms
            .iter()
            .find(|p| p.size.x <= 0.0 || p.size.y <= 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "platform at {} has non-positive size {}",
                platform.position, platform.size
            )));
        }
        if self.level.kill_z >= self.level.spawn.y {
            return Err(ConfigError::Invalid(format!(
                "kill_z {} is not below the spawn point",
                self.level.kill_z
            )));
        }

        Ok(())
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be finite and non-negative, got {}",
            name, value
        )))
    }
}

/// The frame grid must be non-empty and fit on a sheet addressable in u32 pixels
fn validate_flipbook(definition: &FlipbookDefinition) -> Result<(), ConfigError> {
    let name = &definition.name;

    if definition.frame_width == 0 || definition.frame_height == 0 {
        return Err(ConfigError::Invalid(format!(
            "flipbook '{}' has empty frames ({}x{})",
            name, definition.frame_width, definition.frame_height
        )));
    }
    if definition.columns == 0 || definition.frame_count == 0 {
        return Err(ConfigError::Invalid(format!(
            "flipbook '{}' needs at least one column and one frame",
            name
        )));
    }
    non_negative("frames_per_second", definition.frames_per_second)?;

    let rows = (definition.frame_count - 1) / definition.columns + 1;
    let sheet_width = definition.columns.checked_mul(definition.frame_width);
    let sheet_height = definition
        .row
        .checked_add(rows)
        .and_then(|rows| rows.checked_mul(definition.frame_height));
    if sheet_width.is_none() || sheet_height.is_none() {
        return Err(ConfigError::Invalid(format!(
            "flipbook '{}' frame grid does not fit on a sprite sheet",
            name
        )));
    }

    Ok(())
}
