//! Date range controls for the route screen toolbar

use egui_extras::DatePickerButton;

use tm_core::{Action, DateRange};

use crate::ViewContext;

/// Quick ranges offered above the pickers, counting back from the
/// draft's end date
const PRESETS: [(&str, u64); 3] = [("Day", 1), ("Week", 7), ("4 weeks", 28)];

/// Date range editor.
///
/// Disabled until the screen has metrics state to re-fetch, but the
/// current range always shows so the analyzed dates stay visible.
/// Picker edits are held in a draft until Apply so a half-changed
/// range never triggers a fetch; presets skip the draft and apply at
/// once.
#[derive(Default)]
pub struct DateTimePanel {
    draft: Option<DateRange>,
}

impl DateTimePanel {
    pub fn ui(&mut self, ctx: &ViewContext<'_>, ui: &mut egui::Ui) {
        let supported = ctx.snapshot.has_trip_metrics_activity();
        let current = ctx.snapshot.graph_params.date_range;

        ui.add_enabled_ui(supported, |ui| {
            ui.menu_button(format!("📅 {}", current.label()), |ui| {
                let mut draft = self.draft.unwrap_or(current);
                let mut done = false;

                ui.horizontal(|ui| {
                    for (label, days) in PRESETS {
                        if ui.small_button(label).clicked() {
                            ctx.dispatcher.dispatch(Action::SetDateRange(
                                DateRange::trailing_days(draft.end_date, days),
                            ));
                            done = true;
                        }
                    }
                });
                ui.separator();

                egui::Grid::new("date_range_edit")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("From");
                        ui.add(DatePickerButton::new(&mut draft.start_date).id_source("range_start"));
                        ui.end_row();

                        ui.label("To");
                        ui.add(DatePickerButton::new(&mut draft.end_date).id_source("range_end"));
                        ui.end_row();
                    });

                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        ctx.dispatcher.dispatch(Action::SetDateRange(clamped(draft)));
                        done = true;
                    }
                    if ui.button("Cancel").clicked() {
                        done = true;
                    }
                });

                self.draft = if done { None } else { Some(draft) };
                if done {
                    ui.close_menu();
                }
            });
        });
    }
}

/// An end date before the start date collapses to a single day
fn clamped(range: DateRange) -> DateRange {
    if range.end_date < range.start_date {
        DateRange::single_day(range.start_date)
    } else {
        range
    }
}
