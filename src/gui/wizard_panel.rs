/// New calibration view — renders the four wizard steps
///
/// The panel never mutates the wizard directly; it reports what the user did
/// and the app applies it, so every guard is evaluated in one place.

use envision_calibration::calibration::{
    CalibrationWizard, LengthUnit, PixelPoint, WizardField, WizardStep,
};

use super::theme::ThemeColors;

/// Largest on-screen size of the reference image
const VIEWER_MAX: egui::Vec2 = egui::vec2(720.0, 420.0);
const MARKER_RADIUS: f32 = 6.0;

/// Text buffers backing the wizard's input fields
#[derive(Debug, Clone, Default)]
pub struct WizardPanelState {
    pub magnification_text: String,
    pub real_length_text: String,
}

impl WizardPanelState {
    /// Parse the real length field; blank, non-numeric or non-finite gives `None`
    pub fn parsed_real_length(&self) -> Option<f64> {
        self.real_length_text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardAction {
    None,
    PickImages,
    SelectImage(usize),
    SetField(WizardField),
    Click(PixelPoint),
    ResetPoints,
    Back,
    Next,
    Save,
    Cancel,
}

pub fn show_wizard_panel(
    ui: &mut egui::Ui,
    wizard: &CalibrationWizard,
    state: &mut WizardPanelState,
    texture: Option<&egui::TextureHandle>,
    colors: &ThemeColors,
) -> WizardAction {
    let mut action = WizardAction::None;

    ui.horizontal(|ui| {
        ui.heading("➕ New Calibration");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("✖ Cancel").clicked() {
                action = WizardAction::Cancel;
            }
        });
    });
    ui.separator();
    show_step_indicator(ui, wizard.step(), colors);
    ui.add_space(8.0);

    ui.strong(format!("Step {}", wizard.step()));
    ui.add_space(4.0);

    match wizard.step() {
        WizardStep::UploadImages => show_upload_step(ui, wizard, &mut action),
        WizardStep::SetMagnification => show_magnification_step(ui, wizard, state, &mut action),
        WizardStep::SelectPoints => show_points_step(ui, wizard, texture, colors, &mut action),
        WizardStep::EnterLength => show_length_step(ui, wizard, state, colors, &mut action),
    }

    ui.add_space(10.0);
    ui.separator();
    ui.horizontal(|ui| {
        if ui
            .add_enabled(wizard.can_go_back(), egui::Button::new("⬅ Back"))
            .clicked()
        {
            action = WizardAction::Back;
        }
        if wizard.step() == WizardStep::EnterLength {
            if ui
                .add_enabled(wizard.can_save(), egui::Button::new("💾 Save Calibration"))
                .clicked()
            {
                action = WizardAction::Save;
            }
        } else if ui
            .add_enabled(wizard.can_advance(), egui::Button::new("Next Step ➡"))
            .clicked()
        {
            action = WizardAction::Next;
        }
    });

    action
}

fn show_step_indicator(ui: &mut egui::Ui, current: WizardStep, colors: &ThemeColors) {
    ui.horizontal(|ui| {
        for (i, step) in WizardStep::all().iter().enumerate() {
            let color = if *step <= current {
                colors.step_done
            } else {
                colors.step_pending
            };
            let text = egui::RichText::new(format!("{} {}", step.number(), step.title())).color(color);
            if *step == current {
                ui.label(text.strong());
            } else {
                ui.label(text);
            }
            if i + 1 < WizardStep::all().len() {
                ui.colored_label(color, "──");
            }
        }
    });
}

fn show_upload_step(ui: &mut egui::Ui, wizard: &CalibrationWizard, action: &mut WizardAction) {
    ui.label("Upload one or more images of a reference scale (stage micrometer).");
    if ui.button("📂 Select Images…").clicked() {
        *action = WizardAction::PickImages;
    }
    ui.add_space(6.0);

    if !wizard.has_images() {
        ui.label(egui::RichText::new("No images uploaded").italics());
        return;
    }
    egui::ScrollArea::vertical()
        .max_height(220.0)
        .show(ui, |ui| {
            for (index, image) in wizard.images().iter().enumerate() {
                let selected = wizard.selected_index() == Some(index);
                let label = match image.dimensions {
                    Some((w, h)) => format!("{} ({}×{})", image.name, w, h),
                    None => image.name.clone(),
                };
                if ui.selectable_label(selected, label).clicked() {
                    *action = WizardAction::SelectImage(index);
                }
            }
        });
}

fn show_magnification_step(
    ui: &mut egui::Ui,
    wizard: &CalibrationWizard,
    state: &mut WizardPanelState,
    action: &mut WizardAction,
) {
    egui::Grid::new("magnification_grid")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Magnification:");
            ui.horizontal(|ui| {
                if ui
                    .add(
                        egui::TextEdit::singleline(&mut state.magnification_text)
                            .hint_text("e.g. 100")
                            .desired_width(100.0),
                    )
                    .changed()
                {
                    *action = WizardAction::SetField(WizardField::Magnification(
                        state.magnification_text.clone(),
                    ));
                }
                ui.label("X");
            });
            ui.end_row();

            ui.label("Unit:");
            let mut unit = wizard.unit();
            egui::ComboBox::from_id_salt("calibration_unit")
                .selected_text(unit.label())
                .show_ui(ui, |ui| {
                    for u in LengthUnit::all() {
                        ui.selectable_value(&mut unit, *u, u.label());
                    }
                });
            if unit != wizard.unit() {
                *action = WizardAction::SetField(WizardField::Unit(unit));
            }
            ui.end_row();
        });
}

fn show_points_step(
    ui: &mut egui::Ui,
    wizard: &CalibrationWizard,
    texture: Option<&egui::TextureHandle>,
    colors: &ThemeColors,
    action: &mut WizardAction,
) {
    ui.label("Click the start and then the end of a known length on the image.");

    match texture {
        Some(texture) => {
            let [tex_w, tex_h] = texture.size();
            let image_size = egui::vec2(tex_w as f32, tex_h as f32);
            let scale = (VIEWER_MAX.x / image_size.x)
                .min(VIEWER_MAX.y / image_size.y)
                .min(1.0);
            let display_size = image_size * scale;

            let response = ui.add(
                egui::Image::from_texture(egui::load::SizedTexture::from_handle(texture))
                    .fit_to_exact_size(display_size)
                    .sense(egui::Sense::click()),
            );
            let rect = response.rect;

            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let rel = (pos - rect.min) / scale;
                    *action = WizardAction::Click(PixelPoint::new(rel.x as f64, rel.y as f64));
                }
            }

            let to_screen =
                |p: PixelPoint| rect.min + egui::vec2(p.x as f32, p.y as f32) * scale;
            let painter = ui.painter_at(rect);
            if let (Some(start), Some(end)) = (wizard.start_point(), wizard.end_point()) {
                painter.line_segment(
                    [to_screen(start), to_screen(end)],
                    egui::Stroke::new(2.0, colors.measure_line),
                );
            }
            for (point, color) in [
                (wizard.start_point(), colors.start_marker),
                (wizard.end_point(), colors.end_marker),
            ] {
                if let Some(p) = point {
                    painter.circle(
                        to_screen(p),
                        MARKER_RADIUS,
                        color,
                        egui::Stroke::new(2.0, egui::Color32::WHITE),
                    );
                }
            }
        }
        None => {
            ui.colored_label(colors.warning, "Select an image in step 1 to pick points.");
        }
    }

    ui.add_space(6.0);
    egui::Grid::new("points_grid")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            ui.label("Start:");
            ui.label(point_text(wizard.start_point(), "Click to set start point"));
            ui.end_row();
            ui.label("End:");
            ui.label(point_text(wizard.end_point(), "Click to set end point"));
            ui.end_row();
            ui.label("Pixel distance:");
            ui.strong(format!("{} px", wizard.pixel_distance()));
            ui.end_row();
        });

    if ui
        .add_enabled(
            wizard.start_point().is_some(),
            egui::Button::new("↺ Reset Points"),
        )
        .clicked()
    {
        *action = WizardAction::ResetPoints;
    }
}

fn point_text(point: Option<PixelPoint>, placeholder: &str) -> String {
    match point {
        Some(p) => format!("({}, {})", p.x.round(), p.y.round()),
        None => placeholder.to_string(),
    }
}

fn show_length_step(
    ui: &mut egui::Ui,
    wizard: &CalibrationWizard,
    state: &mut WizardPanelState,
    colors: &ThemeColors,
    action: &mut WizardAction,
) {
    let unit = wizard.unit();
    egui::Grid::new("length_grid")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Pixel distance:");
            ui.strong(format!("{} px", wizard.pixel_distance()));
            ui.end_row();

            ui.label("Real length:");
            ui.horizontal(|ui| {
                if ui
                    .add(
                        egui::TextEdit::singleline(&mut state.real_length_text)
                            .hint_text("e.g. 400")
                            .desired_width(100.0),
                    )
                    .changed()
                {
                    *action = WizardAction::SetField(WizardField::RealLength(
                        state.parsed_real_length(),
                    ));
                }
                ui.label(unit.symbol());
            });
            ui.end_row();
        });

    ui.add_space(6.0);
    if wizard.has_valid_ratio() {
        ui.colored_label(
            colors.success,
            format!(
                "Calibration Ratio: {:.4} {}",
                wizard.ratio(),
                unit.per_pixel_label()
            ),
        );
    } else {
        ui.colored_label(
            colors.text_muted,
            "Enter a positive length for a non-zero pixel distance",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_real_length() {
        let mut state = WizardPanelState::default();
        assert_eq!(state.parsed_real_length(), None);
        state.real_length_text = " 400 ".into();
        assert_eq!(state.parsed_real_length(), Some(400.0));
        state.real_length_text = "4o0".into();
        assert_eq!(state.parsed_real_length(), None);
        state.real_length_text = "inf".into();
        assert_eq!(state.parsed_real_length(), None);
        state.real_length_text = "1e400".into();
        assert_eq!(state.parsed_real_length(), None);
    }

    #[test]
    fn test_point_text_rounds() {
        assert_eq!(point_text(Some(PixelPoint::new(10.4, 9.6)), "-"), "(10, 10)");
        assert_eq!(point_text(None, "Click"), "Click");
    }
}
