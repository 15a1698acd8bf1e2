//! # Envision calibration
//!
//! Pixel-to-physical-unit calibration for microscopy measurements:
//! - [`calibration::CalibrationStore`]: session registry with a single active profile
//! - [`calibration::CalibrationWizard`]: guided derivation of a new ratio from a reference image
//! - [`calibration::conversion`]: pixel ↔ unit conversions against the active ratio
//!
//! ```rust
//! use envision_calibration::calibration::{Axis, CalibrationStore, CalibrationWizard, PixelPoint, WizardField};
//! use std::path::PathBuf;
//!
//! let mut store = CalibrationStore::new();
//! let mut wizard = CalibrationWizard::default();
//! wizard.add_images([("stage.png".to_string(), PathBuf::from("stage.png"), None)]);
//! wizard.advance();
//! wizard.set_field(WizardField::Magnification("100".into()));
//! wizard.advance();
//! wizard.click(PixelPoint::new(10.0, 10.0));
//! wizard.click(PixelPoint::new(110.0, 10.0));
//! wizard.advance();
//! wizard.set_field(WizardField::RealLength(Some(400.0)));
//!
//! let profile = wizard.save(&mut store)?;
//! store.activate(profile.id)?;
//! assert_eq!(store.pixels_to_units(50.0, Axis::X), Some(200.0));
//! # Ok::<(), envision_calibration::CalibrationError>(())
//! ```

pub mod calibration;
pub mod config;
pub mod error;
pub mod log;

pub use error::{CalibrationError, Result};
