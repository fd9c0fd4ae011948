//! Roll settings
//!
//! Everything a roll can be tuned by. Loaded from a JSON file by the native
//! runner; missing fields fall back to the defaults below.

use std::fmt;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating settings
#[derive(Debug)]
pub enum SettingsError {
    /// Settings file could not be read
    Io(std::io::Error),
    /// Settings file is not valid JSON for `RollSettings`
    Parse(serde_json::Error),
    /// A value that would make the roll meaningless
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "failed to read settings: {e}"),
            SettingsError::Parse(e) => write!(f, "failed to parse settings: {e}"),
            SettingsError::Invalid(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

/// Tunables for a single roll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollSettings {
    // === Ball ===
    /// Ball mass (only the pin/ball ratio matters)
    pub ball_weight: f32,
    /// Lateral hook amplitude (lane units)
    pub ball_spin: f32,
    /// Z distance over which the hook completes half a sine period
    pub ball_hit_at: f32,
    /// Lane X the ball is released at
    pub initial_x: f32,
    /// Per-frame displacement at release
    pub ball_velocity: Vec3,

    // === Pins ===
    /// Pin mass
    pub pin_weight: f32,
    /// Distance between neighbouring pins in a row
    pub pin_spacing: f32,
    /// Distance from the foul line to the back row of the rack
    pub pin_deck_z: f32,

    // === Presentation ===
    /// Camera follows the ball down the lane
    pub follow_ball: bool,
}

impl Default for RollSettings {
    fn default() -> Self {
        Self {
            ball_weight: 10.0,
            ball_spin: -60.0,
            ball_hit_at: -1360.0,
            initial_x: 0.0,
            ball_velocity: Vec3::new(0.0, 0.0, -10.0),

            pin_weight: 5.0,
            pin_spacing: 20.0,
            pin_deck_z: 1450.0,

            follow_ball: true,
        }
    }
}

impl RollSettings {
    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file and validate them
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot make sense of
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("ball_weight", self.ball_weight),
            ("pin_weight", self.pin_weight),
            ("pin_spacing", self.pin_spacing),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        let finite = [
            ("ball_spin", self.ball_spin),
            ("initial_x", self.initial_x),
            ("pin_deck_z", self.pin_deck_z),
            ("ball_hit_at", self.ball_hit_at),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SettingsError::Invalid(format!("{name} must be finite")));
            }
        }

        if self.ball_hit_at == 0.0 {
            return Err(SettingsError::Invalid("ball_hit_at must be non-zero".into()));
        }
        if !self.ball_velocity.is_finite() {
            return Err(SettingsError::Invalid("ball_velocity must be finite".into()));
        }

        Ok(())
    }

    /// Reach at which the ball strikes a pin
    pub fn ball_hit_distance(&self) -> f32 {
        self.pin_spacing / 2.0 + crate::consts::BALL_HIT_MARGIN
    }

    /// Reach at which a fallen pin strikes a neighbour
    pub fn pin_hit_distance(&self) -> f32 {
        self.pin_spacing + crate::consts::PIN_HIT_MARGIN
    }
}
