/// Error types for the calibration subsystem
///
/// Absent calibrations are not errors: conversions return `None` instead.

use thiserror::Error;

use crate::calibration::profile::{Axis, CalibrationId};
use crate::calibration::wizard::WizardStep;

/// Result type alias for calibration operations
pub type Result<T> = std::result::Result<T, CalibrationError>;

#[derive(Error, Debug)]
pub enum CalibrationError {
    /// `activate`/`remove` was given an id that is not in the registry
    #[error("Calibration {0} not found")]
    NotFound(CalibrationId),

    /// A profile ratio must be finite and greater than zero
    #[error("Invalid {axis:?}-axis ratio {value}: must be finite and positive")]
    InvalidRatio { axis: Axis, value: f64 },

    /// Wizard save requested before the ratio is valid
    #[error("Calibration wizard incomplete at step {step}")]
    WizardIncomplete { step: WizardStep },

    #[error("Failed to read config {path}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {reason}")]
    InvalidConfig { path: String, reason: String },

    #[error("Failed to parse config {path}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CalibrationError {
    /// Short message suitable for the status bar
    pub fn user_message(&self) -> String {
        match self {
            CalibrationError::NotFound(id) => {
                format!("Calibration #{} no longer exists", id)
            }
            CalibrationError::InvalidRatio { .. } => {
                "Calibration ratio must be a positive number".to_string()
            }
            CalibrationError::WizardIncomplete { .. } => {
                "Enter a real length and two distinct points before saving".to_string()
            }
            CalibrationError::ConfigRead { path, .. }
            | CalibrationError::ConfigParse { path, .. }
            | CalibrationError::InvalidConfig { path, .. } => {
                format!("Could not load configuration from {}", path)
            }
        }
    }
}
