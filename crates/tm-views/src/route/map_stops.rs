//! Stop map for the selected route

use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoint, Points, Text};

use tm_core::{Action, GraphParams, LinkPayload, LinkTarget, StopInfo};

use super::derive::RouteSelection;
use crate::ViewContext;

/// Lat/lon plot of the route's stops.
///
/// The selected direction is drawn as a polyline in travel order, with
/// the start and end stops highlighted. Longitude is stretched by the
/// latitude so distances read roughly true. Clicking a stop picks the
/// start stop first, then the end stop.
#[derive(Default)]
pub struct MapStopsView;

impl MapStopsView {
    pub fn ui(&mut self, ctx: &ViewContext<'_>, ui: &mut egui::Ui) {
        let selection = RouteSelection::derive(ctx.snapshot);
        let route = match selection.route {
            Some(route) => route,
            None => {
                ui.weak("Select a route to see its stops.");
                return;
            }
        };

        let center_lat = selection
            .agency
            .map(|a| a.map_center.0)
            .unwrap_or_else(|| route.stops.values().map(|s| s.lat).sum::<f64>()
                / route.stops.len().max(1) as f64);

        let direction_points: Vec<[f64; 2]> = selection
            .direction
            .map(|direction| {
                direction
                    .stop_ids
                    .iter()
                    .filter_map(|id| route.stop(id))
                    .map(plot_point)
                    .collect()
            })
            .unwrap_or_default();
        let direction_name = selection.direction.map(|d| d.title.clone());
        let all_stops: Vec<[f64; 2]> = route.stops.values().map(plot_point).collect();

        // Click and hover targets: direction stops when one is chosen,
        // otherwise every stop on the route
        let clickable: Vec<(String, String, [f64; 2])> = match selection.direction {
            Some(direction) => direction
                .stop_ids
                .iter()
                .filter_map(|id| route.stop(id))
                .map(|s| (s.id.clone(), s.title.clone(), plot_point(s)))
                .collect(),
            None => route
                .stops
                .values()
                .map(|s| (s.id.clone(), s.title.clone(), plot_point(s)))
                .collect(),
        };

        let mut plot = Plot::new("stop_map")
            .data_aspect(map_aspect(center_lat))
            .legend(Legend::default());
        // Frame the agency's service area while there are no stops to fit
        if route.stops.is_empty() {
            if let Some(agency) = selection.agency {
                let (lat, lon) = agency.map_center;
                let radius = agency.map_radius_deg;
                plot = plot
                    .include_x(lon - radius)
                    .include_x(lon + radius)
                    .include_y(lat - radius)
                    .include_y(lat + radius);
            }
        }

        plot.show(ui, |plot_ui| {
            plot_ui.points(Points::new(all_stops).radius(2.5).name("Stops"));

            if direction_points.len() >= 2 {
                let mut line = Line::new(direction_points).width(2.0);
                if let Some(name) = &direction_name {
                    line = line.name(name);
                }
                plot_ui.line(line);
            }
            if let Some(stop) = selection.start_stop {
                plot_ui.points(
                    Points::new(vec![plot_point(stop)])
                        .radius(6.0)
                        .shape(MarkerShape::Diamond)
                        .name("Start stop"),
                );
            }
            if let Some(stop) = selection.end_stop {
                plot_ui.points(
                    Points::new(vec![plot_point(stop)])
                        .radius(6.0)
                        .shape(MarkerShape::Square)
                        .name("End stop"),
                );
            }

            let clicked = plot_ui.response().clicked() && !plot_ui.response().dragged();
            if let Some(pointer) = plot_ui.pointer_coordinate() {
                let bounds = plot_ui.plot_bounds();
                let threshold = 0.02 * bounds.width().max(bounds.height());

                if let Some(index) =
                    nearest_stop(&clickable, pointer.x, pointer.y, threshold)
                {
                    let (stop_id, title, point) = &clickable[index];
                    plot_ui.points(
                        Points::new(vec![*point])
                            .radius(5.0)
                            .shape(MarkerShape::Circle),
                    );
                    plot_ui.text(Text::new(
                        PlotPoint::new(point[0], point[1] + threshold),
                        title.clone(),
                    ));

                    if clicked {
                        let payload =
                            next_stop_selection(&ctx.snapshot.graph_params, stop_id);
                        ctx.dispatcher
                            .dispatch(Action::Navigate(LinkTarget::route_screen(payload)));
                    }
                }
            }
        });
    }
}

/// Longitude is x, latitude is y
fn plot_point(stop: &StopInfo) -> [f64; 2] {
    [stop.lon, stop.lat]
}

/// Width of one longitude degree relative to one latitude degree at
/// this latitude
fn map_aspect(lat: f64) -> f32 {
    lat.to_radians().cos().max(0.05) as f32
}

/// Index of the candidate closest to the pointer, if any lies within
/// the threshold. Distances are in plot coordinates, like the bounds
/// the threshold is derived from.
fn nearest_stop(
    candidates: &[(String, String, [f64; 2])],
    x: f64,
    y: f64,
    threshold: f64,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, (_, _, point)) in candidates.iter().enumerate() {
        let dist = ((point[0] - x).powi(2) + (point[1] - y).powi(2)).sqrt();
        if dist < threshold && best.map_or(true, |(_, d)| dist < d) {
            best = Some((index, dist));
        }
    }
    best.map(|(index, _)| index)
}

/// Clicking fills the start stop first, then the end stop; a third
/// click starts over from a fresh start stop. Clicking the current
/// start stop again just drops the end stop.
fn next_stop_selection(params: &GraphParams, stop_id: &str) -> LinkPayload {
    let mut payload = LinkPayload::from_params(params);
    match (&params.start_stop_id, &params.end_stop_id) {
        (Some(start), None) if start != stop_id => {
            payload.end_stop_id = Some(stop_id.to_string());
        }
        _ => {
            payload.start_stop_id = Some(stop_id.to_string());
            payload.end_stop_id = None;
        }
    }
    payload
}
