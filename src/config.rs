//! Startup configuration.
//!
//! Every knob is a constant for the lifetime of the process. Values are
//! validated once, when loaded, so the core never has to second-guess them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::picker::{PickerLayout, PickerRect};
use crate::targeting::CategoryMask;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{name} must be between 1 and {max}, got {value}", max = MAX_RESOLUTION)]
    InvalidResolution { name: &'static str, value: u32 },
    #[error("max_range must be positive and finite, got {0}")]
    InvalidRange(f32),
    #[error("{name} must be non-negative and finite, got {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
    #[error("{name} must have a positive, finite size")]
    InvalidRect { name: &'static str },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Upper bound for either gradient resolution.
pub const MAX_RESOLUTION: u32 = 4096;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rows of the hue ramp and of the output swatch.
    pub hue_resolution: u32,
    /// Side length of the saturation/value square.
    pub sv_resolution: u32,
    /// Targeting cutoff in world units.
    pub max_range: f32,
    pub paintable_categories: CategoryMask,
    pub tap_max_duration_ms: u64,
    pub tap_max_movement_px: f32,
    /// Degrees of camera rotation per pixel of drag.
    pub look_sensitivity_deg: f32,
    pub picker: PickerLayout,
    pub snapshot_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hue_resolution: 16,
            sv_resolution: 16,
            max_range: 20.0,
            paintable_categories: CategoryMask::PAINTABLE,
            tap_max_duration_ms: 200,
            tap_max_movement_px: 10.0,
            look_sensitivity_deg: 0.3,
            picker: PickerLayout {
                sv_area: PickerRect::new(40.0, 40.0, 200.0, 200.0),
                hue_strip: PickerRect::new(260.0, 40.0, 24.0, 200.0),
            },
            snapshot_dir: PathBuf::from("snapshots"),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn tap_max_duration(&self) -> Duration {
        Duration::from_millis(self.tap_max_duration_ms)
    }

    pub fn validate(&self) -> Result<()> {
        check_resolution("hue_resolution", self.hue_resolution)?;
        check_resolution("sv_resolution", self.sv_resolution)?;
        if !(self.max_range.is_finite() && self.max_range > 0.0) {
            return Err(ConfigError::InvalidRange(self.max_range));
        }
        check_threshold("tap_max_movement_px", self.tap_max_movement_px)?;
        check_threshold("look_sensitivity_deg", self.look_sensitivity_deg)?;
        if !self.picker.sv_area.is_valid() {
            return Err(ConfigError::InvalidRect {
                name: "picker.sv_area",
            });
        }
        if !self.picker.hue_strip.is_valid() {
            return Err(ConfigError::InvalidRect {
                name: "picker.hue_strip",
            });
        }
        Ok(())
    }
}

/// Resolutions are validated before any buffer is sized from them.
pub fn check_resolution(name: &'static str, value: u32) -> Result<()> {
    if (1..=MAX_RESOLUTION).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidResolution { name, value })
    }
}

fn check_threshold(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.tap_max_duration(), Duration::from_millis(200));
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: Config = serde_json::from_str(r#"{ "max_range": 35.0 }"#).unwrap();
        assert_eq!(config.max_range, 35.0);
        assert_eq!(config.hue_resolution, 16);
        assert_eq!(config.picker, Config::default().picker);
    }

    #[test]
    fn invalid_values_fail_fast() {
        let mut config = Config::default();
        config.sv_resolution = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidResolution { name: "sv_resolution", .. })
        ));

        let mut config = Config::default();
        config.sv_resolution = 70_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidResolution { name: "sv_resolution", value: 70_000 })
        ));

        let mut config = Config::default();
        config.hue_resolution = MAX_RESOLUTION;
        config.validate().unwrap();

        let mut config = Config::default();
        config.max_range = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRange(_))));

        let mut config = Config::default();
        config.tap_max_movement_px = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold { .. })
        ));

        let mut config = Config::default();
        config.picker.hue_strip = PickerRect::new(0.0, 0.0, 0.0, 10.0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRect { .. })));
    }

    #[test]
    fn load_from_file_validates() {
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "wallpaint_config_{}_{}.json",
            std::process::id(),
            nonce
        ));

        std::fs::write(&path, r#"{ "hue_resolution": 0 }"#).unwrap();
        assert!(Config::load_from_file(&path).is_err());

        std::fs::write(&path, r#"{ "hue_resolution": 32 }"#).unwrap();
        assert_eq!(Config::load_from_file(&path).unwrap().hue_resolution, 32);

        let _ = std::fs::remove_file(path);
    }
}
