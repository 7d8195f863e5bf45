//! Dark theme shared by every screen

use std::collections::BTreeMap;

use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

/// Accent used for links, selection and active widget strokes
pub fn accent_color() -> Color32 {
    Color32::from_rgb(38, 166, 154)
}

/// Error text color, also installed as the visuals' error color
pub fn error_color() -> Color32 {
    Color32::from_rgb(229, 84, 81)
}

/// Apply the application's dark theme
pub fn apply_theme(ctx: &Context) {
    let mut style = Style::default();
    let mut visuals = Visuals::dark();

    let bg = Color32::from_rgb(24, 26, 27);
    let panel_bg = Color32::from_rgb(32, 34, 36);
    let widget_bg = Color32::from_rgb(42, 44, 46);
    let hover_bg = Color32::from_rgb(52, 54, 56);
    let active_bg = Color32::from_rgb(62, 64, 66);
    let text = Color32::from_rgb(222, 222, 222);

    visuals.window_fill = panel_bg;
    visuals.panel_fill = panel_bg;
    visuals.extreme_bg_color = bg;
    visuals.faint_bg_color = widget_bg;

    visuals.widgets.noninteractive.bg_fill = widget_bg;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, text);
    visuals.widgets.inactive.bg_fill = widget_bg;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, text);
    visuals.widgets.hovered.bg_fill = hover_bg;
    visuals.widgets.active.bg_fill = active_bg;
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent_color());

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.rounding = Rounding::same(4.0);
    }

    visuals.selection.bg_fill = accent_color().linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent_color());
    visuals.hyperlink_color = accent_color();
    visuals.error_fg_color = error_color();

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);

    let mut text_styles = BTreeMap::new();
    text_styles.insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
    text_styles.insert(TextStyle::Body, FontId::new(13.0, FontFamily::Proportional));
    text_styles.insert(TextStyle::Button, FontId::new(13.0, FontFamily::Proportional));
    text_styles.insert(TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional));
    text_styles.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));
    style.text_styles = text_styles;

    ctx.set_style(style);
    ctx.set_visuals(visuals);
}
