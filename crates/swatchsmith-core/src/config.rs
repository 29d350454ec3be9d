// ABOUTME: User configuration loaded from swatchsmith.toml
// ABOUTME: Ramp policy, default collection naming, and embedded logging settings

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use swatchsmith_logging::{LoggingConfig, debug, info};
use swatchsmith_types::{Mode, Rgb};

use crate::error::{Result, SwatchError};
use crate::ramp::OpacityPolicy;

pub const CONFIG_FILE_NAME: &str = "swatchsmith.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SwatchConfig {
    pub ramp: RampConfig,
    pub collection: CollectionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampConfig {
    pub opacity_policy: OpacityPolicy,
    /// Write gray-sentinel values for modes without keys instead of skipping them.
    pub write_fallback: bool,
    /// What translucent layers are flattened against when the parent has no solid fill.
    #[serde(with = "rgb_triple")]
    pub default_background: Rgb,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            opacity_policy: OpacityPolicy::default(),
            write_fallback: false,
            default_background: Rgb::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub default_name: String,
    pub light_mode: String,
    pub dark_mode: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            default_name: "Color Variables".to_string(),
            light_mode: "Light".to_string(),
            dark_mode: "Dark".to_string(),
        }
    }
}

impl CollectionConfig {
    /// Mode name used for the Light or Dark half of a ramp.
    pub fn mode_name(&self, mode: Mode) -> &str {
        match mode {
            Mode::Light => &self.light_mode,
            Mode::Dark => &self.dark_mode,
        }
    }
}

/// `[r, g, b]` arrays in TOML.
mod rgb_triple {
    use serde::{Deserialize, Deserializer, Serializer};
    use swatchsmith_types::Rgb;

    pub fn serialize<S: Serializer>(color: &Rgb, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq([color.r, color.g, color.b])
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgb, D::Error> {
        let [r, g, b] = <[f32; 3]>::deserialize(deserializer)?;
        Ok(Rgb::new(r, g, b))
    }
}

/// `<config_dir>/swatchsmith/swatchsmith.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("swatchsmith").join(CONFIG_FILE_NAME))
}

impl SwatchConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) if !path.exists() => {
                return Err(SwatchError::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("No config file found; using defaults");
                    return Ok(Self::default());
                }
            },
        };

        info!(config_path = %path.display(), "Loading configuration");
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|source| SwatchError::ConfigParse { path, source })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SwatchConfig::default();
        assert_eq!(config.ramp.opacity_policy, OpacityPolicy::Translucent);
        assert!(!config.ramp.write_fallback);
        assert_eq!(config.ramp.default_background, Rgb::WHITE);
        assert_eq!(config.collection.default_name, "Color Variables");
        assert_eq!(config.collection.mode_name(Mode::Dark), "Dark");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SwatchConfig::from_toml_str(
            r#"
            [ramp]
            opacity_policy = "boosted-dark"

            [collection]
            dark_mode = "Night"
            "#,
        )
        .unwrap();

        assert_eq!(config.ramp.opacity_policy, OpacityPolicy::BoostedDark);
        assert!(!config.ramp.write_fallback);
        assert_eq!(config.collection.default_name, "Color Variables");
        assert_eq!(config.collection.light_mode, "Light");
        assert_eq!(config.collection.dark_mode, "Night");
    }

    #[test]
    fn test_background_and_logging_sections() {
        let config = SwatchConfig::from_toml_str(
            r#"
            [ramp]
            write_fallback = true
            default_background = [0.0, 0.0, 0.0]

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.ramp.write_fallback);
        assert_eq!(config.ramp.default_background, Rgb::BLACK);
        assert_eq!(config.logging.level, swatchsmith_logging::LogLevel::Debug);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!(SwatchConfig::from_toml_str("[ramp]\nopacity_policy = \"neon\"").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[collection]\ndefault_name = \"Brand\"\n").unwrap();

        let config = SwatchConfig::load(Some(&path)).unwrap();
        assert_eq!(config.collection.default_name, "Brand");
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = SwatchConfig::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, SwatchError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[ramp\n").unwrap();

        match SwatchConfig::load(Some(&path)) {
            Err(SwatchError::ConfigParse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
