//! Runtime configuration
//!
//! Read from a JSON file on native and from LocalStorage in the browser.
//! Missing fields fall back to defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::TICK_RATE_HZ;
use crate::sim::Playfield;
use crate::tuning::Tuning;

/// Why a configuration couldn't be used
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "failed to read settings: {e}"),
            SettingsError::Parse(e) => write!(f, "malformed settings JSON: {e}"),
            SettingsError::Invalid(reason) => write!(f, "invalid settings: {reason}"),
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

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rate of the fixed-rate clock driving `update`
    pub tick_rate_hz: u32,
    /// Run seed; `None` picks one from the clock
    pub seed: Option<u64>,
    /// Playfield used when the environment doesn't supply one (native runner)
    pub playfield: Playfield,
    /// How long the headless runner plays before stopping
    pub run_seconds: f64,
    /// Balance constants
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate_hz: TICK_RATE_HZ,
            seed: None,
            playfield: Playfield::default(),
            run_seconds: 30.0,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "skyhop_settings";

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Seconds between clock ticks
    pub fn tick_period(&self) -> f64 {
        1.0 / self.tick_rate_hz as f64
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_rate_hz == 0 {
            return Err(SettingsError::Invalid("tick_rate_hz must be at least 1".into()));
        }
        let Playfield { width, height } = self.playfield;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "playfield must have finite positive size, got {}x{}",
                self.playfield.width, self.playfield.height
            )));
        }
        if !(self.run_seconds.is_finite() && self.run_seconds >= 0.0) {
            return Err(SettingsError::Invalid(format!(
                "run_seconds must be non-negative, got {}",
                self.run_seconds
            )));
        }
        self.tuning.validate().map_err(SettingsError::Invalid)
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.tick_rate_hz, 60);
        assert!((settings.tick_period() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_overrides_nested_fields() {
        let json = r#"{
            "seed": 99,
            "playfield": { "width": 800.0, "height": 600.0 },
            "tuning": { "scroll_speed": 250.0 }
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.seed, Some(99));
        assert_eq!(settings.playfield, Playfield::new(800.0, 600.0));
        assert_eq!(settings.tuning.scroll_speed, 250.0);
        assert_eq!(settings.tuning.gravity, Tuning::default().gravity);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().starts_with("malformed settings JSON"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_json(r#"{ "tick_rate_hz": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = Settings::from_json(r#"{ "tuning": { "obstacle_gap": -1.0 } }"#).unwrap_err();
        assert!(err.to_string().contains("obstacle_gap"));

        let err =
            Settings::from_json(r#"{ "playfield": { "width": 0.0, "height": 10.0 } }"#).unwrap_err();
        assert!(err.to_string().contains("playfield"));
    }

    #[test]
    fn test_overflowing_numbers_rejected() {
        // 1e39 overflows f32 and parses as infinity
        let err = Settings::from_json(r#"{ "playfield": { "width": 400.0, "height": 1e39 } }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert!(err.to_string().contains("playfield"));

        let err = Settings::from_json(r#"{ "tuning": { "avatar_spawn_x": 1e39 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert!(err.to_string().contains("avatar_spawn_x"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load_from_path("/definitely/not/here/skyhop.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_round_trip_through_json() {
        let settings = Settings {
            seed: Some(5),
            run_seconds: 12.5,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
