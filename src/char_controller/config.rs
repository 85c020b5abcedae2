//! Tunables for the movement core, loaded from RON.
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;

/// Contacts steeper than this are roofs. Fixed, not tunable.
pub const CEILING_ANGLE: f32 = 91.0;

/// Upper bound for [`PhysicsConfig::slope_friction`].
pub const MAX_SLOPE_FRICTION: f32 = 0.2;

/// Immutable physics tuning shared by every character using it.
///
/// Speeds are in units per second, accelerations in units per second squared and angles in degrees.
#[derive(Clone, Debug, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// How far below the collider the sticking probe reaches.
    pub ground_cast_distance: f32,
    /// Radius of the circular sticking probe.
    pub probe_radius: f32,
    /// Terminal passive sliding speed on slopes.
    pub slope_speed: f32,
    /// Blend factor toward the sliding velocity, per tick. In `[0, 0.2]`.
    pub slope_friction: f32,
    /// Contacts steeper than this are slopes.
    pub slope_angle: f32,
    /// Contacts steeper than this are walls.
    pub wall_angle: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1400.0,
            max_fall_speed: 900.0,
            ground_cast_distance: 6.0,
            probe_radius: 4.0,
            slope_speed: 250.0,
            slope_friction: 0.1,
            slope_angle: 40.0,
            wall_angle: 75.0,
        }
    }
}

impl PhysicsConfig {
    /// Checks the classification thresholds and ranges.
    ///
    /// Misconfigured angles never crash at runtime, they only misclassify contacts, so this
    /// is meant to run once when the config is loaded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (slope, wall) = (self.slope_angle, self.wall_angle);
        if !(0.0..CEILING_ANGLE).contains(&slope) || !(slope < wall && wall < CEILING_ANGLE) {
            return Err(ConfigError::Thresholds { slope, wall });
        }
        if !(0.0..=MAX_SLOPE_FRICTION).contains(&self.slope_friction) {
            return Err(ConfigError::OutOfRange {
                field: "slope_friction",
                value: self.slope_friction,
            });
        }
        for (field, value) in [
            ("gravity", self.gravity),
            ("max_fall_speed", self.max_fall_speed),
            ("ground_cast_distance", self.ground_cast_distance),
            ("probe_radius", self.probe_radius),
            ("slope_speed", self.slope_speed),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        Ok(())
    }
}

/// Jump tuning. Durations are in seconds of tick-clock time.
#[derive(Clone, Debug, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    pub max_charges: u8,
    /// Upward speed held while the jump timer runs.
    pub jump_speed: f32,
    /// Longest a jump keeps rising when the button is held.
    pub jump_duration: f32,
    /// Grace window after walking off a ledge.
    pub coyote_duration: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            max_charges: 2,
            jump_speed: 420.0,
            jump_duration: 0.25,
            coyote_duration: 0.1,
        }
    }
}

impl JumpConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_charges > 2 {
            return Err(ConfigError::OutOfRange {
                field: "max_charges",
                value: self.max_charges as f32,
            });
        }
        for (field, value) in [
            ("jump_speed", self.jump_speed),
            ("jump_duration", self.jump_duration),
            ("coyote_duration", self.coyote_duration),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        Ok(())
    }
}

/// Everything the movement plugin reads from `assets/movement/config.ron`.
#[derive(Resource, Clone, Debug, Default, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct MovementConfig {
    pub physics: PhysicsConfig,
    pub jump: JumpConfig,
}

impl MovementConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        self.jump.validate()
    }

    /// Parses and validates a RON config.
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::de::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file. A missing file is not an error and yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let Ok(source) = read_to_string(path) else {
            warn!("no movement config at {}, using defaults", path.display());
            return Ok(Self::default());
        };
        Self::from_ron(&source)
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error(
        "angle thresholds must satisfy 0 <= slope_angle < wall_angle < {ceiling}, got slope_angle={slope} wall_angle={wall}",
        ceiling = CEILING_ANGLE
    )]
    Thresholds { slope: f32, wall: f32 },
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
    #[error("could not parse movement config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
