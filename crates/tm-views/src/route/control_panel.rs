//! Route, direction and stop pickers

use egui::ComboBox;

use tm_core::{Action, Direction, LinkPayload, LinkTarget, SelectionKey};

use super::derive::RouteSelection;
use crate::ViewContext;

/// Selection controls for the route screen.
///
/// Every change is dispatched as a navigation link, so picking a level
/// clears everything below it and the breadcrumbs, map and metrics all
/// move in the same update.
#[derive(Default)]
pub struct ControlPanelView;

impl ControlPanelView {
    pub fn ui(&mut self, ctx: &ViewContext<'_>, ui: &mut egui::Ui) {
        let snapshot = ctx.snapshot;
        let routes = match snapshot.routes() {
            Some(routes) => routes,
            None => {
                if snapshot.routes_loading {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading routes...");
                    });
                } else if let Some(error) = &snapshot.routes_error {
                    ui.colored_label(ui.visuals().error_fg_color, error);
                }
                return;
            }
        };
        let selection = RouteSelection::derive(snapshot);
        let params = &snapshot.graph_params;

        egui::Grid::new("selection_controls")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Route");
                ComboBox::from_id_source("route_select")
                    .width(220.0)
                    .selected_text(
                        selection
                            .route
                            .map(|r| r.title.clone())
                            .unwrap_or_else(|| "Select a route".into()),
                    )
                    .show_ui(ui, |ui| {
                        for route in routes {
                            let checked = params.route_id.as_deref() == Some(route.id.as_str());
                            if ui.selectable_label(checked, &route.title).clicked() {
                                let payload = LinkPayload::default()
                                    .with_key(SelectionKey::Route, route.id.clone());
                                ctx.dispatcher
                                    .dispatch(Action::Navigate(LinkTarget::route_screen(payload)));
                            }
                        }
                    });
                ui.end_row();

                ui.label("Direction");
                ui.add_enabled_ui(selection.route.is_some(), |ui| {
                    ComboBox::from_id_source("direction_select")
                        .width(220.0)
                        .selected_text(
                            selection
                                .direction
                                .map(|d| d.title.clone())
                                .unwrap_or_else(|| "Select a direction".into()),
                        )
                        .show_ui(ui, |ui| {
                            let route = match selection.route {
                                Some(route) => route,
                                None => return,
                            };
                            for direction in &route.directions {
                                let checked =
                                    params.direction_id.as_deref() == Some(direction.id.as_str());
                                if ui.selectable_label(checked, &direction.title).clicked() {
                                    let payload = LinkPayload::default()
                                        .with_key(SelectionKey::Route, route.id.clone())
                                        .with_key(SelectionKey::Direction, direction.id.clone());
                                    ctx.dispatcher.dispatch(Action::Navigate(
                                        LinkTarget::route_screen(payload),
                                    ));
                                }
                            }
                        });
                });
                ui.end_row();

                ui.label("From stop");
                ui.add_enabled_ui(selection.direction.is_some(), |ui| {
                    ComboBox::from_id_source("start_stop_select")
                        .width(220.0)
                        .selected_text(
                            selection
                                .start_stop
                                .map(|s| s.title.clone())
                                .unwrap_or_else(|| "Select a start stop".into()),
                        )
                        .show_ui(ui, |ui| {
                            let (route, direction) =
                                match (selection.route, selection.direction) {
                                    (Some(route), Some(direction)) => (route, direction),
                                    _ => return,
                                };
                            for stop_id in &direction.stop_ids {
                                let stop = match route.stop(stop_id) {
                                    Some(stop) => stop,
                                    None => continue,
                                };
                                let checked =
                                    params.start_stop_id.as_deref() == Some(stop_id.as_str());
                                if ui.selectable_label(checked, &stop.title).clicked() {
                                    let payload = LinkPayload::default()
                                        .with_key(SelectionKey::Route, route.id.clone())
                                        .with_key(SelectionKey::Direction, direction.id.clone())
                                        .with_key(SelectionKey::StartStop, stop_id.clone());
                                    ctx.dispatcher.dispatch(Action::Navigate(
                                        LinkTarget::route_screen(payload),
                                    ));
                                }
                            }
                        });
                });
                ui.end_row();

                ui.label("To stop");
                ui.add_enabled_ui(selection.start_stop.is_some(), |ui| {
                    ComboBox::from_id_source("end_stop_select")
                        .width(220.0)
                        .selected_text(
                            selection
                                .end_stop
                                .map(|s| s.title.clone())
                                .unwrap_or_else(|| "Optional end stop".into()),
                        )
                        .show_ui(ui, |ui| {
                            let (route, direction, start_stop_id) = match (
                                selection.route,
                                selection.direction,
                                params.start_stop_id.as_deref(),
                            ) {
                                (Some(route), Some(direction), Some(start)) => {
                                    (route, direction, start)
                                }
                                _ => return,
                            };
                            for stop_id in downstream_stop_ids(direction, start_stop_id) {
                                let stop = match route.stop(stop_id) {
                                    Some(stop) => stop,
                                    None => continue,
                                };
                                let checked =
                                    params.end_stop_id.as_deref() == Some(stop_id.as_str());
                                if ui.selectable_label(checked, &stop.title).clicked() {
                                    let payload = LinkPayload::default()
                                        .with_key(SelectionKey::Route, route.id.clone())
                                        .with_key(SelectionKey::Direction, direction.id.clone())
                                        .with_key(
                                            SelectionKey::StartStop,
                                            start_stop_id.to_string(),
                                        )
                                        .with_key(SelectionKey::EndStop, stop_id.clone());
                                    ctx.dispatcher.dispatch(Action::Navigate(
                                        LinkTarget::route_screen(payload),
                                    ));
                                }
                            }
                        });
                });
                ui.end_row();
            });
    }
}

/// Stops after the given stop in travel order. Empty when the stop is
/// not on the direction at all, which also empties the end stop picker.
fn downstream_stop_ids<'a>(direction: &'a Direction, stop_id: &str) -> &'a [String] {
    match direction.stop_ids.iter().position(|id| id == stop_id) {
        Some(index) => &direction.stop_ids[index + 1..],
        None => &[],
    }
}
