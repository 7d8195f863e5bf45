//! Agency dashboard listing every fetched route

use egui_extras::{Column, TableBuilder};

use tm_core::{Action, LinkPayload, LinkTarget, Route, SelectionKey};

use crate::route::{run_fetch_effect, FetchDeps};
use crate::ViewContext;

/// Landing screen: one row per route of the selected agency, each
/// linking into the route screen. Shares the routes fetch effect with
/// the route screen so whichever screen is visible keeps routes loaded.
#[derive(Default)]
pub struct DashboardView {
    fetch_deps: Option<FetchDeps>,
}

impl DashboardView {
    pub fn ui(&mut self, ctx: &ViewContext<'_>, ui: &mut egui::Ui) {
        run_fetch_effect(ctx, &mut self.fetch_deps);
        let snapshot = ctx.snapshot;

        let agency = snapshot
            .graph_params
            .agency_id
            .as_deref()
            .and_then(tm_core::get_agency);
        match agency {
            Some(agency) => {
                ui.horizontal(|ui| {
                    ui.heading(agency.title);
                    ui.weak(agency.timezone_id);
                });
            }
            None => {
                ui.heading("Select an agency");
                return;
            }
        }
        ui.add_space(4.0);

        if snapshot.routes_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading routes...");
            });
            return;
        }
        if let Some(error) = &snapshot.routes_error {
            ui.colored_label(ui.visuals().error_fg_color, error);
            if ui.button("Retry").clicked() {
                if let Some(agency_id) = snapshot.graph_params.agency_id.clone() {
                    ctx.dispatcher.dispatch(Action::FetchRoutes { agency_id });
                }
            }
            return;
        }

        match snapshot.routes() {
            Some([]) => {
                ui.weak("No routes for this agency");
            }
            Some(routes) => {
                ui.weak(format!("{} routes", routes.len()));
                ui.add_space(4.0);
                route_table(ctx, ui, routes);
            }
            None => {}
        }
    }
}

fn route_table(ctx: &ViewContext<'_>, ui: &mut egui::Ui, routes: &[Route]) {
    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(180.0))
        .column(Column::remainder())
        .column(Column::auto().at_least(48.0))
        .header(20.0, |mut header| {
            for title in ["Route", "Directions", "Stops"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for route in routes {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        if ui.link(&route.title).clicked() {
                            let payload = LinkPayload::default()
                                .with_key(SelectionKey::Route, route.id.clone());
                            ctx.dispatcher
                                .dispatch(Action::Navigate(LinkTarget::route_screen(payload)));
                        }
                    });
                    row.col(|ui| {
                        ui.label(direction_summary(route));
                    });
                    row.col(|ui| {
                        ui.monospace(route.stops.len().to_string());
                    });
                });
            }
        });
}

fn direction_summary(route: &Route) -> String {
    route
        .directions
        .iter()
        .map(|d| d.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_core::Direction;

    #[test]
    fn direction_titles_join_with_commas() {
        let route = Route {
            id: "N".into(),
            agency_id: "muni".into(),
            title: "N-Judah".into(),
            url: None,
            directions: vec![
                Direction {
                    id: "N_0".into(),
                    title: "Inbound".into(),
                    url: None,
                    stop_ids: Vec::new(),
                },
                Direction {
                    id: "N_1".into(),
                    title: "Outbound".into(),
                    url: None,
                    stop_ids: Vec::new(),
                },
            ],
            stops: Default::default(),
        };
        assert_eq!(direction_summary(&route), "Inbound, Outbound");
    }
}
