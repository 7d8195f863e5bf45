//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use eframe::egui::{self, Context};
use tracing::info;

use tm_core::{
    all_agencies, Action, DateRange, Dispatcher, GraphParams, LinkTarget, Router,
    RouterSubscriber, RoutesProvider, Screen, Store, TripMetricsProvider,
};
use tm_data::{JsonRoutesSource, RecordedMetricsProvider};
use tm_ui::AppShell;
use tm_views::{DashboardView, RouteScreenView, ViewContext};

mod demo;

/// Main application state
struct TransitApp {
    /// Global store every screen reads from
    store: Store,

    /// Screen router
    router: Arc<Router>,

    /// Executes view actions against the store and providers
    dispatcher: Dispatcher,

    /// Sidebar, status bar and about dialog
    shell: AppShell,

    /// Agency route list screen
    dashboard: DashboardView,

    /// Route metrics screen
    route_screen: RouteScreenView,

    /// Tokio runtime
    runtime: tokio::runtime::Runtime,

    /// Egui context
    egui_ctx: egui::Context,

    /// Keeps the router notification registered
    _nav_subscriber: Arc<RepaintOnNavigate>,
}

/// Requests a repaint whenever the router switches screens
struct RepaintOnNavigate {
    ctx: egui::Context,
}

impl RouterSubscriber for RepaintOnNavigate {
    fn on_route_change(&self, _link: &LinkTarget) {
        self.ctx.request_repaint();
    }
}

impl TransitApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        tm_ui::apply_theme(&cc.egui_ctx);

        // Initialize tokio runtime
        let runtime = tokio::runtime::Runtime::new().unwrap();

        let mut params = match all_agencies().first() {
            Some(agency) => GraphParams::for_agency(agency.id),
            None => GraphParams::default(),
        };
        params.date_range = DateRange::single_day(demo::demo_date());

        let store = Store::with_params(params);
        let router = Arc::new(Router::default());

        let nav_subscriber = Arc::new(RepaintOnNavigate {
            ctx: cc.egui_ctx.clone(),
        });
        router.add_subscriber(nav_subscriber.clone());

        // Recorded data can be mounted at startup; the File menu can
        // switch sources later either way
        let (routes_provider, metrics_provider) = match std::env::var_os("TM_DATA_DIR") {
            Some(dir) => {
                let dir = PathBuf::from(dir);
                info!("loading recorded data from {}", dir.display());
                recorded_providers(dir)
            }
            None => demo::demo_providers(),
        };

        let repaint_ctx = cc.egui_ctx.clone();
        let dispatcher = Dispatcher::new(
            store.clone(),
            router.clone(),
            routes_provider,
            metrics_provider,
            runtime.handle().clone(),
            Arc::new(move || repaint_ctx.request_repaint()),
        );

        Self {
            store,
            router,
            dispatcher,
            shell: AppShell::new(),
            dashboard: DashboardView::default(),
            route_screen: RouteScreenView::new(),
            runtime,
            egui_ctx: cc.egui_ctx.clone(),
            _nav_subscriber: nav_subscriber,
        }
    }

    /// Swap data providers and reload for the current agency
    fn install_providers(
        &mut self,
        routes_provider: Arc<dyn RoutesProvider>,
        metrics_provider: Arc<dyn TripMetricsProvider>,
    ) {
        let repaint_ctx = self.egui_ctx.clone();
        self.dispatcher = Dispatcher::new(
            self.store.clone(),
            self.router.clone(),
            routes_provider,
            metrics_provider,
            self.runtime.handle().clone(),
            Arc::new(move || repaint_ctx.request_repaint()),
        );

        // Selecting the agency again clears stale routes and metrics
        // and refetches through the new providers
        if let Some(agency_id) = self.store.snapshot().graph_params.agency_id {
            self.dispatcher.dispatch(Action::SelectAgency { agency_id });
        }
    }

    fn open_data_dir(&mut self, dir: PathBuf) {
        info!("loading recorded data from {}", dir.display());
        let (routes_provider, metrics_provider) = recorded_providers(dir);
        self.install_providers(routes_provider, metrics_provider);
    }

    /// Handle menu actions
    fn handle_menu(&mut self) {
        let ctx = self.egui_ctx.clone();
        egui::TopBottomPanel::top("menu_bar").show(&ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                if ui.button("☰").on_hover_text("Toggle sidebar").clicked() {
                    self.shell.toggle_sidebar();
                }

                ui.menu_button("File", |ui| {
                    if ui.button("Open data folder...").clicked() {
                        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                            self.open_data_dir(dir);
                        }
                        ui.close_menu();
                    }

                    if ui.button("Use demo data").clicked() {
                        info!("switching to demo data");
                        let (routes_provider, metrics_provider) = demo::demo_providers();
                        self.install_providers(routes_provider, metrics_provider);
                        ui.close_menu();
                    }

                    ui.separator();

                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.shell.open_about();
                        ui.close_menu();
                    }
                });
            });
        });
    }
}

impl eframe::App for TransitApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let snapshot = self.store.snapshot();
        let screen = self.router.screen();

        // Menu bar
        self.handle_menu();

        // Chrome around the active screen
        self.shell.sidebar(ctx, screen, &snapshot, &self.dispatcher);
        self.shell.status_bar(ctx, &snapshot);
        self.shell.about_window(ctx);

        // Active screen
        egui::CentralPanel::default().show(ctx, |ui| {
            let view_ctx = ViewContext {
                snapshot: &snapshot,
                dispatcher: &self.dispatcher,
            };
            match screen {
                Screen::Dashboard => self.dashboard.ui(&view_ctx, ui),
                Screen::Route => self.route_screen.ui(&view_ctx, ui),
            }
        });
    }
}

/// Providers reading a recorded data directory: one subdirectory per
/// agency holding `routes.json` and `positions.csv`
fn recorded_providers(dir: PathBuf) -> (Arc<dyn RoutesProvider>, Arc<dyn TripMetricsProvider>) {
    (
        Arc::new(JsonRoutesSource::new(dir.clone())),
        Arc::new(RecordedMetricsProvider::new(dir)),
    )
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting transit metrics explorer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false, // don't save window geometry between runs
        ..Default::default()
    };

    eframe::run_native(
        "Transit Metrics",
        options,
        Box::new(|cc| Box::new(TransitApp::new(cc))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
