pub mod conversion;
pub mod profile;
pub mod store;
pub mod wizard;

pub use profile::{
    Axis, CalibrationId, CalibrationInput, CalibrationProfile, LengthUnit, PixelPoint, RatioInfo,
};
pub use store::{CalibrationEvent, CalibrationStore, RetentionPolicy, SubscriptionId};
pub use wizard::{CalibrationWizard, ReferenceImage, WizardField, WizardStep};
