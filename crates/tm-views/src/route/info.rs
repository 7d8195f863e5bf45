//! Computed metrics panel

use std::time::Duration;

use egui_extras::{Column, TableBuilder};

use tm_core::MetricStats;

use crate::ViewContext;

/// Shows headway, wait time and trip time statistics once a metrics
/// fetch has started. Loading and error states render in place of the
/// table.
#[derive(Default)]
pub struct InfoView;

impl InfoView {
    pub fn ui(&mut self, ctx: &ViewContext<'_>, ui: &mut egui::Ui) {
        let snapshot = ctx.snapshot;

        if snapshot.trip_metrics_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Computing metrics...");
            });
            return;
        }
        if let Some(error) = &snapshot.trip_metrics_error {
            ui.colored_label(ui.visuals().error_fg_color, error);
            return;
        }
        let metrics = match &snapshot.trip_metrics {
            Some(metrics) => metrics,
            None => return,
        };

        ui.heading("Trip metrics");
        ui.add_space(4.0);
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(110.0))
            .columns(Column::auto().at_least(64.0), 5)
            .header(20.0, |mut header| {
                for title in ["Metric", "Avg", "Median", "P90", "Min", "Max"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                metric_row(&mut body, "Headway", &metrics.headways);
                metric_row(&mut body, "Wait time", &metrics.wait_times);
                if let Some(trip_times) = &metrics.trip_times {
                    metric_row(&mut body, "Trip time", trip_times);
                }
            });
        ui.add_space(4.0);
        ui.weak(format!(
            "{} arrivals at the start stop, {} completed trips",
            metrics.start_arrivals, metrics.completed_trips
        ));
    }
}

fn metric_row(body: &mut egui_extras::TableBody<'_>, label: &str, stats: &MetricStats) {
    body.row(18.0, |mut row| {
        row.col(|ui| {
            ui.label(label);
        });
        for value in [stats.avg, stats.median, stats.p90, stats.min, stats.max] {
            row.col(|ui| {
                ui.monospace(format_minutes(value));
            });
        }
    });
}

/// Statistics are in minutes; rounding to whole seconds keeps the
/// cells compact
fn format_minutes(minutes: f64) -> String {
    let seconds = (minutes.max(0.0) * 60.0).round() as u64;
    humantime::format_duration(Duration::from_secs(seconds)).to_string()
}
