//! Plain route facts shown before any metrics exist

use super::derive::RouteSelection;
use crate::ViewContext;

/// Fallback for the right column: describes the selected route and
/// nudges toward picking stops. Replaced by the metrics panel as soon
/// as a metrics fetch has started.
#[derive(Default)]
pub struct RouteSummaryView;

impl RouteSummaryView {
    pub fn ui(&mut self, ctx: &ViewContext<'_>, ui: &mut egui::Ui) {
        let selection = RouteSelection::derive(ctx.snapshot);
        let route = match selection.route {
            Some(route) => route,
            None => {
                ui.weak("Select a route to see its details.");
                return;
            }
        };

        ui.heading(&route.title);
        ui.add_space(4.0);
        egui::Grid::new("route_summary")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label("Directions");
                ui.label(
                    route
                        .directions
                        .iter()
                        .map(|d| d.title.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                );
                ui.end_row();

                ui.label("Stops");
                ui.label(route.stops.len().to_string());
                ui.end_row();

                if let Some(direction) = selection.direction {
                    ui.label("Stops served");
                    ui.label(format!(
                        "{} {}",
                        direction.stop_ids.len(),
                        direction.title.to_lowercase()
                    ));
                    ui.end_row();
                }
            });
        ui.add_space(8.0);
        ui.weak("Pick a start stop to compute headways and wait times.");
    }
}
