//! Persistent chrome: sidebar, status bar and the about dialog
//!
//! The shell renders around whichever screen is active. It reads the
//! same per-frame snapshot as the screens and requests changes through
//! the dispatcher, never directly.

use egui::{Context, SidePanel, TopBottomPanel};

use tm_core::{
    all_agencies, get_agency, Action, Dispatcher, LinkPayload, LinkTarget, Screen, StoreSnapshot,
};

use crate::widgets;

/// Shell state that survives across frames
pub struct AppShell {
    sidebar_open: bool,
    about_open: bool,
}

impl AppShell {
    pub fn new() -> Self {
        Self {
            sidebar_open: true,
            about_open: false,
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn open_about(&mut self) {
        self.about_open = true;
    }

    /// Navigation drawer: screen links and the agency list
    pub fn sidebar(
        &mut self,
        ctx: &Context,
        screen: Screen,
        snapshot: &StoreSnapshot,
        dispatcher: &Dispatcher,
    ) {
        if !self.sidebar_open {
            return;
        }
        SidePanel::left("sidebar")
            .resizable(false)
            .default_width(170.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.strong("Screens");
                screen_links(ui, screen, snapshot, dispatcher);

                ui.separator();
                ui.strong("Agencies");
                for agency in all_agencies() {
                    let selected = snapshot.graph_params.agency_id.as_deref() == Some(agency.id);
                    if ui.selectable_label(selected, agency.title).clicked() && !selected {
                        dispatcher.dispatch(Action::SelectAgency {
                            agency_id: agency.id.to_string(),
                        });
                    }
                }
            });
    }

    /// Bottom strip: selection summary on the left, fetch state on the right
    pub fn status_bar(&self, ctx: &Context, snapshot: &StoreSnapshot) {
        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(agency) = snapshot
                    .graph_params
                    .agency_id
                    .as_deref()
                    .and_then(get_agency)
                {
                    ui.label(agency.title);
                    ui.separator();
                }
                ui.label(snapshot.graph_params.date_range.label());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if snapshot.routes_loading {
                        ui.spinner();
                        ui.label("Loading routes");
                    } else if snapshot.trip_metrics_loading {
                        ui.spinner();
                        ui.label("Computing metrics");
                    } else if let Some(error) = snapshot
                        .routes_error
                        .as_deref()
                        .or(snapshot.trip_metrics_error.as_deref())
                    {
                        widgets::error_text(ui, &widgets::truncated(error, 80));
                    } else if let Some(routes) = snapshot.routes() {
                        ui.label(format!("{} routes loaded", routes.len()));
                    }
                });
            });
        });
    }

    /// About dialog, shown until closed
    pub fn about_window(&mut self, ctx: &Context) {
        if !self.about_open {
            return;
        }
        let mut open = self.about_open;
        egui::Window::new("About")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Transit Metrics");
                ui.add_space(4.0);
                ui.label(
                    "Headways, wait times and trip times computed from \
                     recorded vehicle positions.",
                );
                ui.add_space(8.0);
                widgets::key_value_row(ui, "Version", env!("CARGO_PKG_VERSION"));
                widgets::key_value_row(ui, "License", env!("CARGO_PKG_LICENSE"));
            });
        self.about_open = open;
    }
}

impl Default for AppShell {
    fn default() -> Self {
        Self::new()
    }
}

/// Links to the app's screens. Switching keeps the current selection;
/// reaching the dashboard with a cleared selection goes through the
/// breadcrumb root instead.
pub fn screen_links(
    ui: &mut egui::Ui,
    current: Screen,
    snapshot: &StoreSnapshot,
    dispatcher: &Dispatcher,
) {
    let targets = [
        (Screen::Dashboard, "Dashboard"),
        (Screen::Route, "Route details"),
    ];
    for (screen, label) in targets {
        if ui.selectable_label(current == screen, label).clicked() && current != screen {
            let payload = LinkPayload::from_params(&snapshot.graph_params);
            dispatcher.dispatch(Action::Navigate(LinkTarget { screen, payload }));
        }
    }
}
