//! Explorer tuning constants, loadable from TOML
//!
//! ```toml
//! [zones]
//! length_threshold = 0.18
//! height_threshold = 0.2
//!
//! [explode]
//! distance = 0.45
//! emissive_intensity = 0.65
//!
//! [fit]
//! target_size = 3.2
//!
//! [turntable]
//! sensitivity = 0.01
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default)]
    pub zones: ZoneThresholds,
    #[serde(default)]
    pub explode: ExplodeSettings,
    #[serde(default)]
    pub fit: FitSettings,
    #[serde(default)]
    pub turntable: TurntableSettings,
}

/// Fractions of the scene extent beyond which a mesh leaves the center/mid bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneThresholds {
    #[serde(default = "default_length_threshold")]
    pub length_threshold: f32,
    #[serde(default = "default_height_threshold")]
    pub height_threshold: f32,
}

impl Default for ZoneThresholds {
    fn default() -> Self {
        Self {
            length_threshold: default_length_threshold(),
            height_threshold: default_height_threshold(),
        }
    }
}

fn default_length_threshold() -> f32 {
    0.18
}

fn default_height_threshold() -> f32 {
    0.2
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplodeSettings {
    /// Distance the selected mesh moves away from the model origin, in fitted world units
    #[serde(default = "default_explode_distance")]
    pub distance: f32,
    /// Emissive intensity applied to the inverted highlight color
    #[serde(default = "default_emissive_intensity")]
    pub emissive_intensity: f32,
    /// Squared length under which the explode direction falls back to +Y
    #[serde(default = "default_degenerate_epsilon")]
    pub degenerate_epsilon: f32,
}

impl Default for ExplodeSettings {
    fn default() -> Self {
        Self {
            distance: default_explode_distance(),
            emissive_intensity: default_emissive_intensity(),
            degenerate_epsilon: default_degenerate_epsilon(),
        }
    }
}

fn default_explode_distance() -> f32 {
    0.45
}

fn default_emissive_intensity() -> f32 {
    0.65
}

fn default_degenerate_epsilon() -> f32 {
    1e-4
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitSettings {
    /// Largest model dimension after fitting
    #[serde(default = "default_target_size")]
    pub target_size: f32,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            target_size: default_target_size(),
        }
    }
}

fn default_target_size() -> f32 {
    3.2
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurntableSettings {
    /// Radians of rotation per dragged pixel
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
}

impl Default for TurntableSettings {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
        }
    }
}

fn default_sensitivity() -> f32 {
    0.01
}

impl ExplorerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ExplorerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from `path`, or fall back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let config = Self::from_file(path)?;
            tracing::info!(path = %path.display(), "Loaded explorer config");
            Ok(config)
        } else {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Reject non-finite or negative values
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("zones.length_threshold", self.zones.length_threshold)?;
        check("zones.height_threshold", self.zones.height_threshold)?;
        check("explode.distance", self.explode.distance)?;
        check("explode.emissive_intensity", self.explode.emissive_intensity)?;
        check("explode.degenerate_epsilon", self.explode.degenerate_epsilon)?;
        check("turntable.sensitivity", self.turntable.sensitivity)?;
        check("fit.target_size", self.fit.target_size)?;
        if self.fit.target_size == 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "fit.target_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn check(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("{} is not finite", value),
        });
    }
    if value < 0.0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("{} is negative", value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExplorerConfig::default();
        assert_eq!(config.zones.length_threshold, 0.18);
        assert_eq!(config.zones.height_threshold, 0.2);
        assert_eq!(config.explode.distance, 0.45);
        assert_eq!(config.explode.emissive_intensity, 0.65);
        assert_eq!(config.fit.target_size, 3.2);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ExplorerConfig::from_toml_str(
            r#"
[explode]
distance = 0.8
"#,
        )
        .unwrap();
        assert_eq!(config.explode.distance, 0.8);
        assert_eq!(config.explode.emissive_intensity, 0.65);
        assert_eq!(config.zones, ZoneThresholds::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(ExplorerConfig::from_toml_str("").unwrap(), ExplorerConfig::default());
    }

    #[test]
    fn test_rejects_negative() {
        let err = ExplorerConfig::from_toml_str("[zones]\nlength_threshold = -0.1\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "zones.length_threshold", .. }));
    }

    #[test]
    fn test_rejects_zero_fit() {
        let err = ExplorerConfig::from_toml_str("[fit]\ntarget_size = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "fit.target_size", .. }));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExplorerConfig::load_or_default(&dir.path().join("rally.toml")).unwrap();
        assert_eq!(config, ExplorerConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rally.toml");
        std::fs::write(&path, "[turntable]\nsensitivity = 0.02\n").unwrap();
        let config = ExplorerConfig::load_or_default(&path).unwrap();
        assert_eq!(config.turntable.sensitivity, 0.02);
    }
}
