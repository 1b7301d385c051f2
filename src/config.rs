//! Filter defaults loaded from a TOML file.
//!
//! Every section is optional; missing keys fall back to the defaults
//! below.
//!
//! ```toml
//! [scatter]
//! radius = 5
//!
//! [edge]
//! threshold = 50
//!
//! [green_screen]
//! tolerance = 50
//! key_color = "#00FF00"
//!
//! [blur]
//! radius = 2
//!
//! [random]
//! seed = 106
//! ```

use crate::filters::{BlurParams, EdgeParams, ScatterParams, MAX_RADIUS};
use crate::grid::{Color, GREEN};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest tolerance that still means something: the color metric never
/// exceeds 255.
pub const MAX_TOLERANCE: u32 = 255;

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// `[scatter] radius` is outside `1..=MAX_RADIUS`.
    #[error("scatter radius {0} must be between 1 and {max}", max = MAX_RADIUS)]
    InvalidScatterRadius(u32),
    /// `[blur] radius` is outside `1..=MAX_RADIUS`.
    #[error("blur radius {0} must be between 1 and {max}", max = MAX_RADIUS)]
    InvalidBlurRadius(u32),
    /// `[green_screen] tolerance` is above [`MAX_TOLERANCE`].
    #[error("green screen tolerance {0} exceeds {max}", max = MAX_TOLERANCE)]
    InvalidTolerance(u32),
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The file is not valid TOML for this format.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Green-screen defaults. Placement is always chosen per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreenScreenConfig {
    /// Largest key distance treated as transparent.
    pub tolerance: u32,
    /// Chroma-key color as `#RRGGBB`.
    pub key_color: Color,
}

impl Default for GreenScreenConfig {
    fn default() -> Self {
        Self {
            tolerance: 50,
            key_color: GREEN,
        }
    }
}

/// Random source settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    /// Fixed seed for reproducible scatter output; OS entropy if unset.
    pub seed: Option<u64>,
}

/// Full configuration file format.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// `[scatter]` section.
    #[serde(default)]
    pub scatter: ScatterParams,
    /// `[edge]` section.
    #[serde(default)]
    pub edge: EdgeParams,
    /// `[green_screen]` section.
    #[serde(default)]
    pub green_screen: GreenScreenConfig,
    /// `[blur]` section.
    #[serde(default)]
    pub blur: BlurParams,
    /// `[random]` section.
    #[serde(default)]
    pub random: RandomConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.as_ref().display(), ?config, "config loaded");
        Ok(config)
    }

    /// Parses and validates configuration text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scatter.validate().is_err() {
            return Err(ConfigError::InvalidScatterRadius(self.scatter.radius));
        }
        if self.blur.validate().is_err() {
            return Err(ConfigError::InvalidBlurRadius(self.blur.radius));
        }
        if self.green_screen.tolerance > MAX_TOLERANCE {
            return Err(ConfigError::InvalidTolerance(self.green_screen.tolerance));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scatter.radius, 5);
        assert_eq!(config.green_screen.key_color, GREEN);
        assert_eq!(config.random.seed, None);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = FileConfig::from_toml(
            r##"
            [edge]
            threshold = 12

            [green_screen]
            key_color = "#0000FF"
            "##,
        )
        .unwrap();

        assert_eq!(config.edge.threshold, 12);
        assert_eq!(config.green_screen.key_color, Color::from_packed(0x0000FF));
        assert_eq!(config.green_screen.tolerance, 50);
        assert_eq!(config.scatter, ScatterParams::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(FileConfig::from_toml("").unwrap(), FileConfig::default());
    }

    #[test]
    fn test_zero_radius_invalid() {
        assert!(matches!(
            FileConfig::from_toml("[scatter]\nradius = 0\n"),
            Err(ConfigError::InvalidScatterRadius(0))
        ));
        assert!(matches!(
            FileConfig::from_toml("[blur]\nradius = 0\n"),
            Err(ConfigError::InvalidBlurRadius(0))
        ));
    }

    #[test]
    fn test_radius_upper_bound() {
        let config = FileConfig::from_toml("[scatter]\nradius = 100\n[blur]\nradius = 100\n").unwrap();
        assert_eq!(config.scatter.radius, 100);
        assert_eq!(config.blur.radius, 100);

        let err = FileConfig::from_toml("[scatter]\nradius = 101\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScatterRadius(101)));
        assert_eq!(err.to_string(), "scatter radius 101 must be between 1 and 100");
        assert!(matches!(
            FileConfig::from_toml("[blur]\nradius = 101\n"),
            Err(ConfigError::InvalidBlurRadius(101))
        ));
    }

    #[test]
    fn test_tolerance_capped() {
        assert!(matches!(
            FileConfig::from_toml("[green_screen]\ntolerance = 300\n"),
            Err(ConfigError::InvalidTolerance(300))
        ));
    }

    #[test]
    fn test_bad_color_is_parse_error() {
        assert!(matches!(
            FileConfig::from_toml("[green_screen]\nkey_color = \"green\"\n"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_seed() {
        let config = FileConfig::from_toml("[random]\nseed = 106\n").unwrap();
        assert_eq!(config.random.seed, Some(106));
    }
}
