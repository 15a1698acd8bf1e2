/// Toolbar — top menu bar with log export and view switching

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    None,
    ExportLog,
    Quit,
    ShowExisting,
    NewCalibration,
    ToggleLogWindow,
    ThemeToggle,
    ShowAbout,
}

/// Render the toolbar and return any triggered action
pub fn show_toolbar(ctx: &egui::Context, theme_label: &str) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("📁 File", |ui| {
                if ui.button("📋 Export Activity Log…").clicked() {
                    action = ToolbarAction::ExportLog;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("⏻ Quit").clicked() {
                    action = ToolbarAction::Quit;
                    ui.close_menu();
                }
            });

            ui.menu_button("🔍 View", |ui| {
                if ui.button("📏 Existing Calibrations").clicked() {
                    action = ToolbarAction::ShowExisting;
                    ui.close_menu();
                }
                if ui.button("➕ New Calibration").clicked() {
                    action = ToolbarAction::NewCalibration;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("📜 Activity Log").clicked() {
                    action = ToolbarAction::ToggleLogWindow;
                    ui.close_menu();
                }
                if ui.button(format!("🎨 Theme: {}", theme_label)).clicked() {
                    action = ToolbarAction::ThemeToggle;
                    ui.close_menu();
                }
            });

            ui.menu_button("❓ Help", |ui| {
                if ui.button("ℹ About").clicked() {
                    action = ToolbarAction::ShowAbout;
                    ui.close_menu();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(egui::Button::new(egui::RichText::new(theme_label).size(12.0)).corner_radius(12.0))
                    .clicked()
                {
                    action = ToolbarAction::ThemeToggle;
                }
                ui.separator();
                ui.label(
                    egui::RichText::new("Envision Calibration")
                        .color(egui::Color32::from_rgb(0x70, 0x75, 0x80))
                        .size(12.0),
                );
            });
        });
    });

    action
}

/// Pick one or more reference images
pub fn open_images_dialog() -> Option<Vec<PathBuf>> {
    rfd::FileDialog::new()
        .set_title("Select Calibration Images")
        .add_filter("Images", &["png", "jpg", "jpeg", "tif", "tiff", "bmp"])
        .add_filter("All Files", &["*"])
        .pick_files()
}

/// Show save dialog for activity log export
pub fn save_log_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Export Calibration Activity Log")
        .add_filter("Text File", &["txt"])
        .add_filter("JSON", &["json"])
        .save_file()
}
