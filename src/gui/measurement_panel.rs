/// Measurement panel — quick pixel ↔ unit converter against the active calibration

use envision_calibration::calibration::conversion::format_measurement;
use envision_calibration::calibration::{Axis, CalibrationStore};

use super::theme::ThemeColors;

#[derive(Debug, Clone, Default)]
pub struct MeasurementPanelState {
    pub pixel_input: String,
    pub unit_input: String,
}

/// Converted values for both axes
#[derive(Debug, Clone, PartialEq)]
pub struct AxisPair {
    pub x: f64,
    pub y: f64,
}

/// Parse `input` and convert it with `convert` on both axes
fn convert_both(input: &str, convert: impl Fn(f64, Axis) -> Option<f64>) -> Option<AxisPair> {
    let value = input.trim().parse::<f64>().ok()?;
    Some(AxisPair {
        x: convert(value, Axis::X)?,
        y: convert(value, Axis::Y)?,
    })
}

pub fn pixels_to_units(store: &CalibrationStore, input: &str) -> Option<AxisPair> {
    convert_both(input, |v, axis| store.pixels_to_units(v, axis))
}

pub fn units_to_pixels(store: &CalibrationStore, input: &str) -> Option<AxisPair> {
    convert_both(input, |v, axis| store.units_to_pixels(v, axis))
}

pub fn show_measurement_panel(
    ui: &mut egui::Ui,
    store: &CalibrationStore,
    state: &mut MeasurementPanelState,
    colors: &ThemeColors,
) {
    ui.vertical_centered(|ui| {
        ui.heading("📐 Measurement");
    });
    ui.separator();

    let Some(active) = store.get_active() else {
        ui.colored_label(colors.warning, "⚠ No Active Calibration");
        ui.label(
            egui::RichText::new(
                "Activate a calibration in the Existing Calibrations view to enable measurements.",
            )
            .color(colors.text_muted),
        );
        return;
    };

    ui.colored_label(
        colors.success,
        format!("✔ Active: {}", active.magnification_label),
    );
    ui.label(format!("X-axis: {} {}", active.x_axis_ratio, active.unit));
    ui.label(format!("Y-axis: {} {}", active.y_axis_ratio, active.unit));
    ui.add_space(8.0);

    let length_unit = active.length_unit().to_string();

    ui.strong("Pixels → units");
    ui.add(
        egui::TextEdit::singleline(&mut state.pixel_input)
            .hint_text("Enter pixel value")
            .desired_width(f32::INFINITY),
    );
    match pixels_to_units(store, &state.pixel_input) {
        Some(v) => {
            ui.monospace(format!("X: {}", format_measurement(v.x, &length_unit)));
            ui.monospace(format!("Y: {}", format_measurement(v.y, &length_unit)));
        }
        None => {
            ui.label(egui::RichText::new("Enter pixels to convert").color(colors.text_muted));
        }
    }

    ui.add_space(8.0);
    ui.strong(format!("{} → pixels", length_unit));
    ui.add(
        egui::TextEdit::singleline(&mut state.unit_input)
            .hint_text(format!("Enter length in {}", length_unit))
            .desired_width(f32::INFINITY),
    );
    match units_to_pixels(store, &state.unit_input) {
        Some(v) => {
            ui.monospace(format!("X: {}", format_measurement(v.x, "px")));
            ui.monospace(format!("Y: {}", format_measurement(v.y, "px")));
        }
        None => {
            ui.label(egui::RichText::new("Enter a length to convert").color(colors.text_muted));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use envision_calibration::calibration::CalibrationInput;

    fn active_store() -> CalibrationStore {
        let mut store = CalibrationStore::new();
        let p = store
            .add(CalibrationInput {
                magnification_label: "100X".into(),
                x_axis_ratio: 0.5,
                y_axis_ratio: 0.25,
                unit: "µm/pixel".into(),
                created_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            })
            .unwrap();
        store.activate(p.id).unwrap();
        store
    }

    #[test]
    fn test_converts_both_axes() {
        let store = active_store();
        assert_eq!(
            pixels_to_units(&store, "100"),
            Some(AxisPair { x: 50.0, y: 25.0 })
        );
        assert_eq!(
            units_to_pixels(&store, "50"),
            Some(AxisPair { x: 100.0, y: 200.0 })
        );
    }

    #[test]
    fn test_invalid_input_or_no_calibration() {
        let store = active_store();
        assert_eq!(pixels_to_units(&store, ""), None);
        assert_eq!(pixels_to_units(&store, "abc"), None);
        assert_eq!(pixels_to_units(&CalibrationStore::new(), "100"), None);
    }
}
