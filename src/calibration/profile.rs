/// Calibration data types shared by the store, the wizard and conversions

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Registry-unique calibration identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CalibrationId(pub u64);

impl std::fmt::Display for CalibrationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Image axis a ratio applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Physical length units offered by the calibration wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    Micrometer,
    Millimeter,
    Centimeter,
    Inch,
}

impl LengthUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Micrometer => "µm",
            LengthUnit::Millimeter => "mm",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Inch => "in",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LengthUnit::Micrometer => "Microns (µm)",
            LengthUnit::Millimeter => "Millimeters (mm)",
            LengthUnit::Centimeter => "Centimeters (cm)",
            LengthUnit::Inch => "Inches (in)",
        }
    }

    /// Ratio unit string stored on profiles, e.g. `µm/pixel`
    pub fn per_pixel_label(&self) -> String {
        format!("{}/pixel", self.symbol())
    }

    pub fn all() -> &'static [LengthUnit] {
        &[
            LengthUnit::Micrometer,
            LengthUnit::Millimeter,
            LengthUnit::Centimeter,
            LengthUnit::Inch,
        ]
    }
}

/// A candidate profile handed to the store; id and active flag are assigned there
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationInput {
    pub magnification_label: String,
    /// Physical units per pixel along x
    pub x_axis_ratio: f64,
    /// Physical units per pixel along y
    pub y_axis_ratio: f64,
    pub unit: String,
    pub created_date: NaiveDate,
}

/// A registered calibration profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    pub id: CalibrationId,
    pub magnification_label: String,
    pub x_axis_ratio: f64,
    pub y_axis_ratio: f64,
    pub unit: String,
    pub created_date: NaiveDate,
    pub is_active: bool,
}

impl CalibrationProfile {
    pub(crate) fn from_input(id: CalibrationId, input: CalibrationInput) -> Self {
        Self {
            id,
            magnification_label: input.magnification_label,
            x_axis_ratio: input.x_axis_ratio,
            y_axis_ratio: input.y_axis_ratio,
            unit: input.unit,
            created_date: input.created_date,
            is_active: false,
        }
    }

    pub fn ratio(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x_axis_ratio,
            Axis::Y => self.y_axis_ratio,
        }
    }

    /// Physical unit without the `/pixel` suffix
    pub fn length_unit(&self) -> &str {
        self.unit.strip_suffix("/pixel").unwrap_or(&self.unit)
    }
}

/// Both ratios of the active calibration together with their unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioInfo {
    pub x: f64,
    pub y: f64,
    pub unit: String,
}

/// Pixel coordinate on a reference image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in pixels
    pub fn distance_to(&self, other: &PixelPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}
