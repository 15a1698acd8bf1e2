/// Guided calibration wizard
///
/// Four ordered steps derive a units-per-pixel ratio from a reference image:
/// 1. Upload reference images
/// 2. Set magnification and unit
/// 3. Pick two points on the selected image
/// 4. Enter the real length between them
///
/// Each forward move is gated by a named guard. Backward moves are always
/// allowed and keep the data already entered.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::profile::{CalibrationInput, CalibrationProfile, LengthUnit, PixelPoint};
use super::store::CalibrationStore;
use crate::error::{CalibrationError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WizardStep {
    UploadImages,
    SetMagnification,
    SelectPoints,
    EnterLength,
}

impl WizardStep {
    /// 1-based position shown in the step indicator
    pub fn number(&self) -> usize {
        match self {
            WizardStep::UploadImages => 1,
            WizardStep::SetMagnification => 2,
            WizardStep::SelectPoints => 3,
            WizardStep::EnterLength => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::UploadImages => "Upload Images",
            WizardStep::SetMagnification => "Set Magnification",
            WizardStep::SelectPoints => "Select Points",
            WizardStep::EnterLength => "Enter Length",
        }
    }

    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::UploadImages => Some(WizardStep::SetMagnification),
            WizardStep::SetMagnification => Some(WizardStep::SelectPoints),
            WizardStep::SelectPoints => Some(WizardStep::EnterLength),
            WizardStep::EnterLength => None,
        }
    }

    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::UploadImages => None,
            WizardStep::SetMagnification => Some(WizardStep::UploadImages),
            WizardStep::SelectPoints => Some(WizardStep::SetMagnification),
            WizardStep::EnterLength => Some(WizardStep::SelectPoints),
        }
    }

    pub fn all() -> &'static [WizardStep] {
        &[
            WizardStep::UploadImages,
            WizardStep::SetMagnification,
            WizardStep::SelectPoints,
            WizardStep::EnterLength,
        ]
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.number(), self.title())
    }
}

/// Handle to an uploaded reference image. Pixels are never decoded here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceImage {
    pub id: u64,
    pub name: String,
    pub path: PathBuf,
    /// Width and height in pixels, if known
    pub dimensions: Option<(u32, u32)>,
}

/// Editable wizard inputs
#[derive(Debug, Clone, PartialEq)]
pub enum WizardField {
    Magnification(String),
    Unit(LengthUnit),
    /// Real length between the two points; `None` when blank or unparsable
    RealLength(Option<f64>),
}

/// Transient state of one calibration run
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationWizard {
    step: WizardStep,
    images: Vec<ReferenceImage>,
    selected_image: Option<usize>,
    magnification: String,
    unit: LengthUnit,
    start_point: Option<PixelPoint>,
    end_point: Option<PixelPoint>,
    real_length: Option<f64>,
    default_unit: LengthUnit,
    next_image_id: u64,
}

impl Default for CalibrationWizard {
    fn default() -> Self {
        Self::new(LengthUnit::default())
    }
}

impl CalibrationWizard {
    pub fn new(default_unit: LengthUnit) -> Self {
        Self {
            step: WizardStep::UploadImages,
            images: Vec::new(),
            selected_image: None,
            magnification: String::new(),
            unit: default_unit,
            start_point: None,
            end_point: None,
            real_length: None,
            default_unit,
            next_image_id: 1,
        }
    }

    // ── Accessors ──

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn images(&self) -> &[ReferenceImage] {
        &self.images
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_image
    }

    pub fn selected_image(&self) -> Option<&ReferenceImage> {
        self.selected_image.and_then(|i| self.images.get(i))
    }

    pub fn magnification(&self) -> &str {
        &self.magnification
    }

    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    pub fn start_point(&self) -> Option<PixelPoint> {
        self.start_point
    }

    pub fn end_point(&self) -> Option<PixelPoint> {
        self.end_point
    }

    pub fn real_length(&self) -> Option<f64> {
        self.real_length
    }

    /// Distance between the two points rounded to whole pixels; 0 until both exist
    pub fn pixel_distance(&self) -> f64 {
        match (self.start_point, self.end_point) {
            (Some(start), Some(end)) => start.distance_to(&end).round(),
            _ => 0.0,
        }
    }

    /// `real_length / pixel_distance`, or 0 while either is not positive and finite
    pub fn ratio(&self) -> f64 {
        let distance = self.pixel_distance();
        match self.real_length {
            Some(length) if length.is_finite() && length > 0.0 && distance > 0.0 => {
                length / distance
            }
            _ => 0.0,
        }
    }

    /// Label stored on the saved profile, e.g. `"100"` → `"100X"`
    pub fn magnification_label(&self) -> String {
        let trimmed = self.magnification.trim();
        if trimmed.ends_with(['X', 'x']) {
            format!("{}X", &trimmed[..trimmed.len() - 1])
        } else {
            format!("{}X", trimmed)
        }
    }

    // ── Guards ──

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    pub fn has_magnification(&self) -> bool {
        !self.magnification.trim().is_empty()
    }

    pub fn has_points(&self) -> bool {
        self.start_point.is_some() && self.end_point.is_some()
    }

    pub fn has_valid_ratio(&self) -> bool {
        self.ratio() > 0.0
    }

    /// Forward guard of the current step
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::UploadImages => self.has_images(),
            WizardStep::SetMagnification => self.has_magnification(),
            WizardStep::SelectPoints => self.has_points(),
            WizardStep::EnterLength => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.step.previous().is_some()
    }

    pub fn can_save(&self) -> bool {
        self.step == WizardStep::EnterLength && self.has_valid_ratio()
    }

    // ── Navigation ──

    /// Move to the next step if the current step's guard holds
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            log::debug!("Wizard cannot leave step {} yet", self.step);
            return false;
        }
        match self.step.next() {
            Some(next) => {
                log::debug!("Wizard step {} → {}", self.step, next);
                self.step = next;
                true
            }
            None => false,
        }
    }

    pub fn back(&mut self) -> bool {
        match self.step.previous() {
            Some(prev) => {
                log::debug!("Wizard step {} → {}", self.step, prev);
                self.step = prev;
                true
            }
            None => false,
        }
    }

    // ── Inputs ──

    /// Append uploaded images; selects the first one if nothing is selected
    pub fn add_images<I>(&mut self, images: I) -> usize
    where
        I: IntoIterator<Item = (String, PathBuf, Option<(u32, u32)>)>,
    {
        let before = self.images.len();
        for (name, path, dimensions) in images {
            self.images.push(ReferenceImage {
                id: self.next_image_id,
                name,
                path,
                dimensions,
            });
            self.next_image_id += 1;
        }
        if self.selected_image.is_none() && !self.images.is_empty() {
            self.selected_image = Some(0);
        }
        self.images.len() - before
    }

    pub fn select_image(&mut self, index: usize) -> bool {
        if index >= self.images.len() {
            return false;
        }
        self.selected_image = Some(index);
        true
    }

    pub fn set_field(&mut self, field: WizardField) {
        match field {
            WizardField::Magnification(value) => self.magnification = value,
            WizardField::Unit(unit) => self.unit = unit,
            WizardField::RealLength(value) => self.real_length = value,
        }
    }

    /// Record a click on the selected image.
    ///
    /// The first click sets the start point, the second the end point;
    /// further clicks are ignored until `reset_points`.
    pub fn click(&mut self, point: PixelPoint) -> bool {
        if self.step != WizardStep::SelectPoints || self.selected_image().is_none() {
            return false;
        }
        if self.start_point.is_none() {
            self.start_point = Some(point);
        } else if self.end_point.is_none() {
            self.end_point = Some(point);
            log::debug!("Calibration points set, distance {} px", self.pixel_distance());
        } else {
            return false;
        }
        true
    }

    pub fn reset_points(&mut self) {
        self.start_point = None;
        self.end_point = None;
    }

    // ── Completion ──

    /// Candidate profile for the current state, dated `date`
    pub fn build_input(&self, date: NaiveDate) -> Result<CalibrationInput> {
        if !self.can_save() {
            return Err(CalibrationError::WizardIncomplete { step: self.step });
        }
        let ratio = self.ratio();
        Ok(CalibrationInput {
            magnification_label: self.magnification_label(),
            x_axis_ratio: ratio,
            y_axis_ratio: ratio,
            unit: self.unit.per_pixel_label(),
            created_date: date,
        })
    }

    /// Submit the calibration to `store` dated today and reset the wizard
    pub fn save(&mut self, store: &mut CalibrationStore) -> Result<CalibrationProfile> {
        self.save_dated(store, Local::now().date_naive())
    }

    pub fn save_dated(
        &mut self,
        store: &mut CalibrationStore,
        date: NaiveDate,
    ) -> Result<CalibrationProfile> {
        let input = self.build_input(date)?;
        let profile = store.add(input)?;
        self.reset();
        Ok(profile)
    }

    /// Discard everything without touching any store
    pub fn cancel(&mut self) {
        log::debug!("Calibration wizard cancelled at step {}", self.step);
        self.reset();
    }

    fn reset(&mut self) {
        *self = Self::new(self.default_unit);
    }
}
