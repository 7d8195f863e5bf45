//! The single-route screen
//!
//! Composition mirrors the store: a fetch effect keeps routes loaded,
//! every frame re-derives the selection from the snapshot, and the
//! child panels render from that shared derivation.

mod breadcrumbs;
mod control_panel;
mod date_time_panel;
mod derive;
mod info;
mod map_stops;
mod route_summary;

pub use breadcrumbs::{breadcrumb_segments, BreadcrumbSegment};
pub use control_panel::ControlPanelView;
pub use date_time_panel::DateTimePanel;
pub use derive::{fetch_effect, run_fetch_effect, FetchDeps, RouteSelection};
pub use info::InfoView;
pub use map_stops::MapStopsView;
pub use route_summary::RouteSummaryView;

use crate::ViewContext;

/// Route screen: toolbar with the agency title and date controls,
/// breadcrumb trail, stop map on the left, selection controls plus
/// metrics or summary on the right.
pub struct RouteScreenView {
    fetch_deps: Option<FetchDeps>,
    map: MapStopsView,
    control_panel: ControlPanelView,
    info: InfoView,
    summary: RouteSummaryView,
    date_panel: DateTimePanel,
}

impl RouteScreenView {
    pub fn new() -> Self {
        Self {
            fetch_deps: None,
            map: MapStopsView::default(),
            control_panel: ControlPanelView::default(),
            info: InfoView::default(),
            summary: RouteSummaryView::default(),
            date_panel: DateTimePanel::default(),
        }
    }

    pub fn ui(&mut self, ctx: &ViewContext<'_>, ui: &mut egui::Ui) {
        run_fetch_effect(ctx, &mut self.fetch_deps);
        let selection = RouteSelection::derive(ctx.snapshot);

        ui.horizontal(|ui| {
            let title = selection.agency.map(|a| a.title).unwrap_or("Route details");
            ui.heading(title);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                self.date_panel.ui(ctx, ui);
            });
        });
        ui.separator();

        breadcrumbs::breadcrumb_bar(ctx, ui, &selection);
        ui.separator();

        ui.columns(2, |columns| {
            self.map.ui(ctx, &mut columns[0]);

            let right = &mut columns[1];
            self.control_panel.ui(ctx, right);
            right.add_space(8.0);
            if ctx.snapshot.has_trip_metrics_activity() {
                self.info.ui(ctx, right);
            } else {
                self.summary.ui(ctx, right);
            }
        });
    }
}

impl Default for RouteScreenView {
    fn default() -> Self {
        Self::new()
    }
}
