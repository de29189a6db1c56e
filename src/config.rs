//! Configuration management for sensor tuning parameters
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling tuning of the acquisition window, stability tolerance, and
//! factory anchor values without recompilation. Missing or invalid config
//! files fall back to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete sensor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    pub acquisition: AcquisitionConfig,
    pub filter: FilterConfig,
    pub model: ModelConfig,
}

/// Echo acquisition parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Maximum raw samples drawn per acquisition window
    pub window_samples: usize,
    /// Minimum valid samples required to set an anchor from a live reading
    pub min_anchor_samples: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            window_samples: 15,
            min_anchor_samples: 7,
        }
    }
}

/// Window filter parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// MAD threshold (microseconds) below which a window counts as stable.
    /// Confidence reaches zero at twice this value.
    pub stable_tolerance_us: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            stable_tolerance_us: 120,
        }
    }
}

/// Calibration model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Factory fresh anchor (microseconds), used until the first training
    pub default_fresh_anchor: u32,
    /// Factory spoil anchor (microseconds)
    pub default_spoil_anchor: u32,
    /// Path of the persisted calibration record
    pub storage_path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            default_fresh_anchor: 1400,
            default_spoil_anchor: 2600,
            storage_path: "freshsense_model.json".to_string(),
        }
    }
}

impl Default for SensorConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            acquisition: AcquisitionConfig::default(),
            filter: FilterConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

impl SensorConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// Loaded configuration, or the default config if the file is missing
    /// or fails to parse (a warning is logged in either case).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        Self::load_from_file("freshsense_config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SensorConfig::default();
        assert_eq!(config.acquisition.window_samples, 15);
        assert_eq!(config.acquisition.min_anchor_samples, 7);
        assert_eq!(config.filter.stable_tolerance_us, 120);
        assert_eq!(config.model.default_fresh_anchor, 1400);
        assert_eq!(config.model.default_spoil_anchor, 2600);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SensorConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: SensorConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(
            parsed.acquisition.window_samples,
            config.acquisition.window_samples
        );
        assert_eq!(
            parsed.filter.stable_tolerance_us,
            config.filter.stable_tolerance_us
        );
        assert_eq!(parsed.model.storage_path, config.model.storage_path);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = SensorConfig::load_from_file("definitely/not/a/real/path.json");
        assert_eq!(config.acquisition.window_samples, 15);
    }
}
