/// Existing calibrations view — active summary card and the profile table

use egui_extras::{Column, TableBuilder};

use envision_calibration::calibration::{CalibrationId, CalibrationProfile, CalibrationStore};

use super::theme::ThemeColors;

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryAction {
    None,
    Activate(CalibrationId),
    Remove(CalibrationId),
    NewCalibration,
}

pub fn show_registry_panel(
    ui: &mut egui::Ui,
    store: &CalibrationStore,
    colors: &ThemeColors,
) -> RegistryAction {
    let mut action = RegistryAction::None;

    ui.horizontal(|ui| {
        ui.heading("📏 Existing Calibrations");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("➕ New Calibration").clicked() {
                action = RegistryAction::NewCalibration;
            }
        });
    });
    ui.separator();

    match store.get_active() {
        Some(active) => show_active_card(ui, active, colors),
        None => {
            ui.colored_label(colors.warning, "⚠ No calibration is active");
        }
    }
    ui.add_space(8.0);

    if store.is_empty() {
        ui.label(
            egui::RichText::new("No calibrations yet. Create one with the wizard.")
                .color(colors.text_muted),
        );
        return action;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(false)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::remainder())
        .header(22.0, |mut header| {
            for title in ["Magnification", "X-axis", "Y-axis", "Unit", "Date", "Status", "Actions"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for profile in store.list() {
                body.row(26.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&profile.magnification_label);
                    });
                    row.col(|ui| {
                        ui.monospace(format!("{}", profile.x_axis_ratio));
                    });
                    row.col(|ui| {
                        ui.monospace(format!("{}", profile.y_axis_ratio));
                    });
                    row.col(|ui| {
                        ui.label(&profile.unit);
                    });
                    row.col(|ui| {
                        ui.label(profile.created_date.format("%Y-%m-%d").to_string());
                    });
                    row.col(|ui| {
                        if profile.is_active {
                            ui.colored_label(colors.success, "● Active");
                        } else {
                            ui.colored_label(colors.text_muted, "Inactive");
                        }
                    });
                    row.col(|ui| {
                        if !profile.is_active && ui.small_button("✅ Activate").clicked() {
                            action = RegistryAction::Activate(profile.id);
                        }
                        if ui
                            .small_button(egui::RichText::new("🗑 Delete").color(colors.error))
                            .clicked()
                        {
                            action = RegistryAction::Remove(profile.id);
                        }
                    });
                });
            }
        });

    action
}

fn show_active_card(ui: &mut egui::Ui, active: &CalibrationProfile, colors: &ThemeColors) {
    egui::Frame::group(ui.style())
        .fill(colors.faint_bg)
        .show(ui, |ui| {
            ui.colored_label(
                colors.success,
                format!("✔ Active Calibration: {}", active.magnification_label),
            );
            egui::Grid::new("active_calibration_grid")
                .num_columns(2)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    ui.label("X-axis ratio:");
                    ui.strong(format!("{} {}", active.x_axis_ratio, active.unit));
                    ui.end_row();
                    ui.label("Y-axis ratio:");
                    ui.strong(format!("{} {}", active.y_axis_ratio, active.unit));
                    ui.end_row();
                    ui.label("Date:");
                    ui.label(active.created_date.format("%Y-%m-%d").to_string());
                    ui.end_row();
                });
        });
}
