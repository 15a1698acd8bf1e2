/// Calibration configuration
///
/// Loaded from an optional JSON file; every field falls back to its default,
/// so `{}` is a valid configuration:
///
/// ```json
/// {
///   "retention": { "KeepMostRecent": 2 },
///   "default_unit": "Micrometer",
///   "seed_sample_profiles": true
/// }
/// ```
///
/// Calibration profiles themselves are never written back to disk.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calibration::profile::LengthUnit;
use crate::calibration::store::RetentionPolicy;
use crate::error::{CalibrationError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// How many profiles the registry keeps on `add`
    pub retention: RetentionPolicy,
    /// Unit preselected when the wizard starts
    pub default_unit: LengthUnit,
    /// Start the session with the two sample calibrations (100X, 200X)
    pub seed_sample_profiles: bool,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            retention: RetentionPolicy::default(),
            default_unit: LengthUnit::default(),
            seed_sample_profiles: true,
        }
    }
}

impl CalibrationConfig {
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|source| CalibrationError::ConfigParse {
                path: origin.to_string(),
                source,
            })?;
        if config.retention == RetentionPolicy::KeepMostRecent(0) {
            return Err(CalibrationError::InvalidConfig {
                path: origin.to_string(),
                reason: "retention must keep at least one profile".to_string(),
            });
        }
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CalibrationError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json, &path.display().to_string())?;
        log::info!("Loaded calibration config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = CalibrationConfig::from_json_str("{}", "inline").unwrap();
        assert_eq!(config, CalibrationConfig::default());
        assert_eq!(config.retention, RetentionPolicy::KeepMostRecent(2));
        assert!(config.seed_sample_profiles);
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{ "retention": "Unbounded", "default_unit": "Millimeter" }"#;
        let config = CalibrationConfig::from_json_str(json, "inline").unwrap();
        assert_eq!(config.retention, RetentionPolicy::Unbounded);
        assert_eq!(config.default_unit, LengthUnit::Millimeter);
        assert!(config.seed_sample_profiles);
    }

    #[test]
    fn test_roundtrip_through_json() {
        let config = CalibrationConfig {
            retention: RetentionPolicy::KeepMostRecent(5),
            default_unit: LengthUnit::Inch,
            seed_sample_profiles: false,
        };
        let parsed = CalibrationConfig::from_json_str(&config.to_json(), "inline").unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = CalibrationConfig::from_json_str("{ retention: ", "bad.json").unwrap_err();
        assert!(matches!(err, CalibrationError::ConfigParse { ref path, .. } if path == "bad.json"));
    }

    #[test]
    fn test_zero_retention_is_rejected() {
        let json = r#"{ "retention": { "KeepMostRecent": 0 } }"#;
        let err = CalibrationConfig::from_json_str(json, "zero.json").unwrap_err();
        assert!(matches!(err, CalibrationError::InvalidConfig { ref path, .. } if path == "zero.json"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = CalibrationConfig::from_json_file(Path::new("/nonexistent/calibration.json"))
            .unwrap_err();
        assert!(matches!(err, CalibrationError::ConfigRead { .. }));
    }
}
