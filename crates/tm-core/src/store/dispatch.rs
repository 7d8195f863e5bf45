//! Actions and the dispatcher that executes them

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::models::{MetricsRequest, Route, TripMetrics};
use crate::navigation::{LinkTarget, Router};
use crate::selection::DateRange;

use super::Store;

/// Source of route configuration for an agency
#[async_trait]
pub trait RoutesProvider: Send + Sync {
    async fn fetch_routes(&self, agency_id: &str) -> anyhow::Result<Vec<Route>>;
}

/// Source of computed trip metrics
#[async_trait]
pub trait TripMetricsProvider: Send + Sync {
    async fn fetch_trip_metrics(&self, request: &MetricsRequest) -> anyhow::Result<TripMetrics>;
}

/// Mutations a view can request
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Load route configuration for an agency
    FetchRoutes { agency_id: String },

    /// Compute trip metrics for a request
    FetchTripMetrics(MetricsRequest),

    /// Follow a link: apply its selection payload, then switch screens
    Navigate(LinkTarget),

    /// Switch agency, resetting selection and fetched data
    SelectAgency { agency_id: String },

    /// Change the analyzed date range
    SetDateRange(DateRange),
}

/// Executes actions against the store, the router and the providers.
///
/// Cloning is cheap; every view gets a handle at construction and keeps
/// it for the life of the app. The dispatcher is the only writer of the
/// store, so all update policy is in one place:
///
/// * navigation and date changes re-derive the metrics request and
///   start or clear the metrics fetch accordingly
/// * fetches run on the tokio runtime and request a repaint when done
/// * late results are dropped by the store when the selection has moved
///   on underneath them
#[derive(Clone)]
pub struct Dispatcher {
    store: Store,
    router: Arc<Router>,
    routes_provider: Arc<dyn RoutesProvider>,
    metrics_provider: Arc<dyn TripMetricsProvider>,
    runtime: tokio::runtime::Handle,
    repaint: Arc<dyn Fn() + Send + Sync>,
}

impl Dispatcher {
    pub fn new(
        store: Store,
        router: Arc<Router>,
        routes_provider: Arc<dyn RoutesProvider>,
        metrics_provider: Arc<dyn TripMetricsProvider>,
        runtime: tokio::runtime::Handle,
        repaint: Arc<dyn Fn() + Send + Sync>,
    ) -> Self {
        Self {
            store,
            router,
            routes_provider,
            metrics_provider,
            runtime,
            repaint,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn dispatch(&self, action: Action) {
        match action {
            Action::FetchRoutes { agency_id } => self.fetch_routes(agency_id),
            Action::FetchTripMetrics(request) => self.fetch_trip_metrics(request),
            Action::Navigate(link) => self.navigate(link),
            Action::SelectAgency { agency_id } => self.select_agency(agency_id),
            Action::SetDateRange(range) => self.set_date_range(range),
        }
    }

    fn navigate(&self, link: LinkTarget) {
        let params = link.payload.apply_to(&self.store.graph_params());
        self.store.set_graph_params(params);
        self.refresh_trip_metrics();
        self.router.navigate_to(link);
    }

    fn select_agency(&self, agency_id: String) {
        info!("switching agency to {}", agency_id);
        self.store.reset_for_agency(agency_id);
    }

    fn set_date_range(&self, range: DateRange) {
        self.store.set_date_range(range);
        self.refresh_trip_metrics();
    }

    /// Re-derive the metrics request from the selection. A complete
    /// request that differs from the one already held starts a fetch;
    /// an incomplete selection drops whatever metrics state is left.
    fn refresh_trip_metrics(&self) {
        match MetricsRequest::from_params(&self.store.graph_params()) {
            Some(request) => {
                if self.store.trip_metrics_request().as_ref() != Some(&request) {
                    self.fetch_trip_metrics(request);
                }
            }
            None => self.store.clear_trip_metrics(),
        }
    }

    fn fetch_routes(&self, agency_id: String) {
        info!("fetching routes for {}", agency_id);
        self.store.begin_routes_fetch();

        let store = self.store.clone();
        let provider = self.routes_provider.clone();
        let repaint = self.repaint.clone();
        self.runtime.spawn(async move {
            run_routes_fetch(store, provider, agency_id).await;
            repaint();
        });
    }

    fn fetch_trip_metrics(&self, request: MetricsRequest) {
        info!(
            "computing trip metrics for route {} direction {}",
            request.route_id, request.direction_id
        );
        self.store.begin_trip_metrics_fetch(request.clone());

        let store = self.store.clone();
        let provider = self.metrics_provider.clone();
        let repaint = self.repaint.clone();
        self.runtime.spawn(async move {
            run_metrics_fetch(store, provider, request).await;
            repaint();
        });
    }
}

async fn run_routes_fetch(store: Store, provider: Arc<dyn RoutesProvider>, agency_id: String) {
    let result = provider.fetch_routes(&agency_id).await;
    match &result {
        Ok(routes) => info!("loaded {} routes for {}", routes.len(), agency_id),
        Err(err) => error!("routes fetch for {} failed: {}", agency_id, err),
    }
    store.finish_routes_fetch(&agency_id, result);
}

async fn run_metrics_fetch(
    store: Store,
    provider: Arc<dyn TripMetricsProvider>,
    request: MetricsRequest,
) {
    let result = provider.fetch_trip_metrics(&request).await;
    if let Err(err) = &result {
        error!("trip metrics fetch failed: {}", err);
    }
    store.finish_trip_metrics_fetch(&request, result);
}
