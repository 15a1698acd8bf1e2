/// Theme system — switchable Light and Dark color themes

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AppTheme {
    Light,
    Dark,
}

impl AppTheme {
    pub fn label(&self) -> &'static str {
        match self {
            AppTheme::Light => "☀ Light",
            AppTheme::Dark => "🌙 Dark",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            AppTheme::Light => AppTheme::Dark,
            AppTheme::Dark => AppTheme::Light,
        }
    }
}

/// Colors used by the panels on top of the egui visuals
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub panel_fill: egui::Color32,
    pub window_fill: egui::Color32,
    pub faint_bg: egui::Color32,

    pub widget_inactive_bg: egui::Color32,
    pub widget_hovered_stroke: egui::Color32,
    pub widget_active_bg: egui::Color32,

    pub text_muted: egui::Color32,

    pub success: egui::Color32,
    pub warning: egui::Color32,
    pub error: egui::Color32,

    // Calibration point overlay
    pub start_marker: egui::Color32,
    pub end_marker: egui::Color32,
    pub measure_line: egui::Color32,

    // Step indicator
    pub step_done: egui::Color32,
    pub step_pending: egui::Color32,

    pub status_bar_bg: egui::Color32,
    pub shadow_color: egui::Color32,

    pub is_dark: bool,
}

impl ThemeColors {
    pub fn from_theme(theme: AppTheme) -> Self {
        match theme {
            AppTheme::Light => Self::light(),
            AppTheme::Dark => Self::dark(),
        }
    }

    fn light() -> Self {
        Self {
            panel_fill: egui::Color32::from_rgb(0xF7, 0xF7, 0xF8),
            window_fill: egui::Color32::from_rgb(0xFF, 0xFF, 0xFF),
            faint_bg: egui::Color32::from_rgb(0xF0, 0xF1, 0xF3),

            widget_inactive_bg: egui::Color32::from_rgb(0xE3, 0xE5, 0xE8),
            widget_hovered_stroke: egui::Color32::from_rgb(0x5B, 0x9B, 0xD5),
            widget_active_bg: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),

            text_muted: egui::Color32::from_rgb(0x88, 0x8C, 0x94),

            success: egui::Color32::from_rgb(0x27, 0x8B, 0x4A),
            warning: egui::Color32::from_rgb(0xB8, 0x8B, 0x00),
            error: egui::Color32::from_rgb(0xD0, 0x30, 0x30),

            start_marker: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),
            end_marker: egui::Color32::from_rgb(0xD0, 0x30, 0x30),
            measure_line: egui::Color32::from_rgb(0xFF, 0xC0, 0x00),

            step_done: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),
            step_pending: egui::Color32::from_rgb(0xC8, 0xCA, 0xCE),

            status_bar_bg: egui::Color32::from_rgb(0xF0, 0xF1, 0xF3),
            shadow_color: egui::Color32::from_rgba_premultiplied(0, 0, 0, 25),

            is_dark: false,
        }
    }

    fn dark() -> Self {
        Self {
            panel_fill: egui::Color32::from_rgb(0x1B, 0x1D, 0x22),
            window_fill: egui::Color32::from_rgb(0x22, 0x25, 0x2B),
            faint_bg: egui::Color32::from_rgb(0x26, 0x29, 0x30),

            widget_inactive_bg: egui::Color32::from_rgb(0x30, 0x34, 0x3C),
            widget_hovered_stroke: egui::Color32::from_rgb(0x6F, 0xB0, 0xF0),
            widget_active_bg: egui::Color32::from_rgb(0x4A, 0x90, 0xD9),

            text_muted: egui::Color32::from_rgb(0x80, 0x84, 0x90),

            success: egui::Color32::from_rgb(0x3C, 0xC8, 0x6E),
            warning: egui::Color32::from_rgb(0xFF, 0xC8, 0x3C),
            error: egui::Color32::from_rgb(0xFF, 0x55, 0x55),

            start_marker: egui::Color32::from_rgb(0x4A, 0x90, 0xD9),
            end_marker: egui::Color32::from_rgb(0xFF, 0x55, 0x55),
            measure_line: egui::Color32::from_rgb(0xFF, 0xD6, 0x00),

            step_done: egui::Color32::from_rgb(0x4A, 0x90, 0xD9),
            step_pending: egui::Color32::from_rgb(0x44, 0x48, 0x52),

            status_bar_bg: egui::Color32::from_rgb(0x16, 0x18, 0x1C),
            shadow_color: egui::Color32::from_rgba_premultiplied(0, 0, 0, 60),

            is_dark: true,
        }
    }
}

/// Apply a theme to the egui context
pub fn apply_theme(ctx: &egui::Context, theme: AppTheme) {
    let c = ThemeColors::from_theme(theme);

    let mut visuals = if c.is_dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };

    visuals.panel_fill = c.panel_fill;
    visuals.window_fill = c.window_fill;
    visuals.faint_bg_color = c.faint_bg;

    visuals.widgets.inactive.bg_fill = c.widget_inactive_bg;
    visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(4);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, c.widget_hovered_stroke);
    visuals.widgets.active.bg_fill = c.widget_active_bg;

    visuals.window_shadow = egui::epaint::Shadow {
        offset: [0, 2],
        blur: 8,
        spread: 0,
        color: c.shadow_color,
    };

    ctx.set_visuals(visuals);
}
