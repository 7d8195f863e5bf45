//! Small widgets shared by the shell

use egui::Ui;

/// Label/value pair on one line, label rendered weak
pub fn key_value_row(ui: &mut Ui, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.weak(label);
        ui.label(value);
    });
}

/// Error text in the theme's error color, with a leading marker
pub fn error_text(ui: &mut Ui, text: &str) {
    let color = ui.visuals().error_fg_color;
    ui.colored_label(color, format!("⚠ {}", text));
}

/// Cut overly long messages so they fit single-line chrome
pub fn truncated(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
