/// Main application state and eframe::App implementation
///
/// Owns the single calibration store of the session and passes it to every
/// panel that reads or changes it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use eframe::egui;

use envision_calibration::calibration::{
    CalibrationId, CalibrationStore, CalibrationWizard, ReferenceImage, WizardStep,
};
use envision_calibration::config::CalibrationConfig;
use envision_calibration::log::activity::ActivityLog;

use crate::gui::measurement_panel::{self, MeasurementPanelState};
use crate::gui::registry_panel::{self, RegistryAction};
use crate::gui::theme::{self, AppTheme, ThemeColors};
use crate::gui::toolbar::{self, ToolbarAction};
use crate::gui::wizard_panel::{self, WizardAction, WizardPanelState};

/// Which calibration view is shown in the central panel
#[derive(Clone, Copy, PartialEq)]
enum View {
    Existing,
    NewCalibration,
}

pub struct CalibrationApp {
    store: CalibrationStore,
    wizard: CalibrationWizard,

    /// Session activity log, fed by a store subscription
    activity_log: Rc<RefCell<ActivityLog>>,

    view: View,
    wizard_panel_state: WizardPanelState,
    measurement_state: MeasurementPanelState,

    /// Decoded reference images, keyed by `ReferenceImage::id`
    textures: HashMap<u64, egui::TextureHandle>,

    status_message: String,
    show_log_window: bool,
    show_about: bool,

    current_theme: AppTheme,
    theme_colors: ThemeColors,
}

impl CalibrationApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: CalibrationConfig) -> Self {
        let default_theme = AppTheme::Light;
        theme::apply_theme(&cc.egui_ctx, default_theme);

        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(8.0, 5.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
        cc.egui_ctx.set_style(style);

        let mut store = CalibrationStore::with_config(&config);
        let activity_log = Rc::new(RefCell::new(ActivityLog::new()));
        let sink = Rc::clone(&activity_log);
        store.subscribe(move |event| sink.borrow_mut().record(event));

        log::info!(
            "Calibration store ready: {} profiles, retention {:?}",
            store.len(),
            store.retention()
        );

        Self {
            store,
            wizard: CalibrationWizard::new(config.default_unit),
            activity_log,
            view: View::Existing,
            wizard_panel_state: WizardPanelState::default(),
            measurement_state: MeasurementPanelState::default(),
            textures: HashMap::new(),
            status_message: "Ready — activate a calibration or create a new one".to_string(),
            show_log_window: false,
            show_about: false,
            current_theme: default_theme,
            theme_colors: ThemeColors::from_theme(default_theme),
        }
    }

    /// Read dimensions of picked files and hand the readable ones to the wizard
    fn add_images(&mut self, paths: Vec<PathBuf>) {
        let mut accepted = Vec::new();
        for path in paths {
            match image::image_dimensions(&path) {
                Ok(dims) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.display().to_string());
                    accepted.push((name, path, Some(dims)));
                }
                Err(e) => {
                    log::warn!("Skipping unreadable image {}: {}", path.display(), e);
                    self.status_message = format!("Could not read {}: {}", path.display(), e);
                }
            }
        }
        let added = self.wizard.add_images(accepted);
        if added > 0 {
            self.status_message = format!("{} image(s) uploaded", added);
        }
    }

    /// Decode the selected reference image into a texture once
    fn ensure_selected_texture(&mut self, ctx: &egui::Context) {
        let Some(reference) = self.wizard.selected_image().cloned() else {
            return;
        };
        if self.textures.contains_key(&reference.id) {
            return;
        }
        match load_texture(ctx, &reference) {
            Ok(texture) => {
                self.textures.insert(reference.id, texture);
            }
            Err(e) => {
                log::warn!("Failed to decode {}: {}", reference.path.display(), e);
                self.status_message = format!("Could not display {}: {}", reference.name, e);
            }
        }
    }

    fn reset_wizard_view(&mut self) {
        self.wizard_panel_state = WizardPanelState::default();
        self.textures.clear();
        self.view = View::Existing;
    }

    fn handle_wizard_action(&mut self, action: WizardAction) {
        match action {
            WizardAction::PickImages => {
                if let Some(paths) = toolbar::open_images_dialog() {
                    self.add_images(paths);
                }
            }
            WizardAction::SelectImage(index) => {
                self.wizard.select_image(index);
            }
            WizardAction::SetField(field) => {
                self.wizard.set_field(field);
            }
            WizardAction::Click(point) => {
                if !self.wizard.click(point) {
                    self.status_message =
                        "Both points are set — reset them to pick again".to_string();
                }
            }
            WizardAction::ResetPoints => {
                self.wizard.reset_points();
            }
            WizardAction::Back => {
                self.wizard.back();
            }
            WizardAction::Next => {
                self.wizard.advance();
            }
            WizardAction::Save => match self.wizard.save(&mut self.store) {
                Ok(profile) => {
                    self.status_message = format!(
                        "Saved calibration {} ({:.4} {})",
                        profile.magnification_label, profile.x_axis_ratio, profile.unit
                    );
                    self.reset_wizard_view();
                }
                Err(e) => {
                    log::warn!("Calibration save rejected: {}", e);
                    self.status_message = e.user_message();
                }
            },
            WizardAction::Cancel => {
                self.wizard.cancel();
                self.reset_wizard_view();
                self.status_message = "Calibration cancelled".to_string();
            }
            WizardAction::None => {}
        }
    }

    fn handle_registry_action(&mut self, action: RegistryAction) {
        match action {
            RegistryAction::Activate(id) => self.activate(id),
            RegistryAction::Remove(id) => match self.store.remove(id) {
                Ok(profile) => {
                    self.status_message = if profile.is_active {
                        format!("Deleted active calibration {}", profile.magnification_label)
                    } else {
                        format!("Deleted calibration {}", profile.magnification_label)
                    };
                }
                Err(e) => self.status_message = e.user_message(),
            },
            RegistryAction::NewCalibration => self.view = View::NewCalibration,
            RegistryAction::None => {}
        }
    }

    fn activate(&mut self, id: CalibrationId) {
        match self.store.activate(id) {
            Ok(profile) => {
                self.status_message =
                    format!("Calibration {} is now active", profile.magnification_label);
            }
            Err(e) => self.status_message = e.user_message(),
        }
    }

    fn export_log(&mut self, path: &Path) {
        let activity = self.activity_log.borrow();
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let result = if is_json {
            activity.save_json(path)
        } else {
            activity.save_text(path)
        };
        self.status_message = match result {
            Ok(()) => format!("Activity log exported: {}", path.display()),
            Err(e) => format!("Log export failed: {}", e),
        };
    }

    fn handle_toolbar_action(&mut self, ctx: &egui::Context, action: ToolbarAction) {
        match action {
            ToolbarAction::ExportLog => {
                if let Some(path) = toolbar::save_log_dialog() {
                    self.export_log(&path);
                }
            }
            ToolbarAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            ToolbarAction::ShowExisting => self.view = View::Existing,
            ToolbarAction::NewCalibration => self.view = View::NewCalibration,
            ToolbarAction::ToggleLogWindow => self.show_log_window = !self.show_log_window,
            ToolbarAction::ThemeToggle => {
                self.current_theme = self.current_theme.next();
                self.theme_colors = ThemeColors::from_theme(self.current_theme);
            }
            ToolbarAction::ShowAbout => self.show_about = true,
            ToolbarAction::None => {}
        }
    }
}

fn load_texture(
    ctx: &egui::Context,
    reference: &ReferenceImage,
) -> Result<egui::TextureHandle, image::ImageError> {
    let rgba = image::open(&reference.path)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    Ok(ctx.load_texture(
        format!("calibration-image-{}", reference.id),
        color_image,
        egui::TextureOptions::LINEAR,
    ))
}

impl eframe::App for CalibrationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        theme::apply_theme(ctx, self.current_theme);

        let toolbar_action = toolbar::show_toolbar(ctx, self.current_theme.label());
        if toolbar_action != ToolbarAction::None {
            self.handle_toolbar_action(ctx, toolbar_action);
        }

        // ── Status bar ──
        let active_label = self
            .store
            .get_active()
            .map(|p| format!("Active: {} ({} {})", p.magnification_label, p.x_axis_ratio, p.unit))
            .unwrap_or_else(|| "No active calibration".to_string());
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                egui::Frame::new()
                    .fill(self.theme_colors.status_bar_bg)
                    .inner_margin(egui::Margin::symmetric(12, 4)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(&self.status_message);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(egui::RichText::new(&active_label).color(self.theme_colors.text_muted));
                    });
                });
            });

        // ── Measurement sidebar ──
        egui::SidePanel::right("measurement_panel")
            .resizable(true)
            .default_width(260.0)
            .min_width(220.0)
            .show(ctx, |ui| {
                measurement_panel::show_measurement_panel(
                    ui,
                    &self.store,
                    &mut self.measurement_state,
                    &self.theme_colors,
                );
            });

        // ── Central view ──
        match self.view {
            View::Existing => {
                let action = egui::CentralPanel::default()
                    .show(ctx, |ui| {
                        egui::ScrollArea::vertical()
                            .auto_shrink([false, false])
                            .show(ui, |ui| {
                                registry_panel::show_registry_panel(ui, &self.store, &self.theme_colors)
                            })
                            .inner
                    })
                    .inner;
                self.handle_registry_action(action);
            }
            View::NewCalibration => {
                if self.wizard.step() == WizardStep::SelectPoints {
                    self.ensure_selected_texture(ctx);
                }
                let texture = self
                    .wizard
                    .selected_image()
                    .and_then(|reference| self.textures.get(&reference.id));
                let action = egui::CentralPanel::default()
                    .show(ctx, |ui| {
                        egui::ScrollArea::vertical()
                            .auto_shrink([false, false])
                            .show(ui, |ui| {
                                wizard_panel::show_wizard_panel(
                                    ui,
                                    &self.wizard,
                                    &mut self.wizard_panel_state,
                                    texture,
                                    &self.theme_colors,
                                )
                            })
                            .inner
                    })
                    .inner;
                self.handle_wizard_action(action);
            }
        }

        // ── Activity log window ──
        if self.show_log_window {
            let mut export = false;
            egui::Window::new("📜 Calibration Activity Log")
                .open(&mut self.show_log_window)
                .default_size([600.0, 360.0])
                .resizable(true)
                .show(ctx, |ui| {
                    if ui.button("💾 Export…").clicked() {
                        export = true;
                    }
                    ui.separator();
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.style_mut().override_font_id = Some(egui::FontId::monospace(12.0));
                        ui.label(self.activity_log.borrow().to_text());
                    });
                });
            if export {
                if let Some(path) = toolbar::save_log_dialog() {
                    self.export_log(&path);
                }
            }
        }

        // ── About dialog ──
        if self.show_about {
            egui::Window::new("About")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.heading("🔬 Envision Calibration");
                    ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                    ui.add_space(10.0);
                    ui.label("Pixel-to-physical-unit calibration for microscopy measurements.");
                    ui.label("• Guided four-step calibration wizard");
                    ui.label("• Single active calibration for all measurements");
                    ui.label("• Session activity log export");
                });
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) && self.view == View::NewCalibration {
            self.handle_wizard_action(WizardAction::Cancel);
        }
    }
}
