//! Global application store
//!
//! One store instance holds everything fetched or selected so far.
//! Views take an immutable [`StoreSnapshot`] once per frame and render
//! from it; every mutation goes through a dispatched [`Action`]. That
//! keeps rendering free of hidden writes and makes the update paths
//! testable without any UI.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::{MetricsRequest, Route, TripMetrics};
use crate::selection::{DateRange, GraphParams};

mod dispatch;

pub use dispatch::{Action, Dispatcher, RoutesProvider, TripMetricsProvider};

/// Mutable store contents behind the lock
#[derive(Default)]
struct StoreState {
    /// Current selection
    graph_params: GraphParams,

    /// Route configuration for the selected agency, once fetched
    routes: Option<Arc<Vec<Route>>>,

    /// Bumped every time `routes` is replaced, including when cleared.
    /// Lets readers detect replacement without comparing contents.
    routes_generation: u64,

    /// Error from the most recent routes fetch
    routes_error: Option<String>,

    /// A routes fetch is in flight
    routes_loading: bool,

    /// Metrics for the request below, once computed
    trip_metrics: Option<Arc<TripMetrics>>,

    /// Request the current metrics, error or in-flight fetch belong to
    trip_metrics_request: Option<MetricsRequest>,

    /// Error from the most recent metrics fetch
    trip_metrics_error: Option<String>,

    /// A metrics fetch is in flight
    trip_metrics_loading: bool,
}

/// Shared handle to the global store
#[derive(Clone, Default)]
pub struct Store {
    state: Arc<RwLock<StoreState>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store starting from the given selection
    pub fn with_params(params: GraphParams) -> Self {
        let store = Self::new();
        store.state.write().graph_params = params;
        store
    }

    /// Immutable copy of the store for one frame of rendering
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read();
        StoreSnapshot {
            graph_params: state.graph_params.clone(),
            routes: state.routes.clone(),
            routes_generation: state.routes_generation,
            routes_error: state.routes_error.clone(),
            routes_loading: state.routes_loading,
            trip_metrics: state.trip_metrics.clone(),
            trip_metrics_error: state.trip_metrics_error.clone(),
            trip_metrics_loading: state.trip_metrics_loading,
        }
    }

    pub(crate) fn graph_params(&self) -> GraphParams {
        self.state.read().graph_params.clone()
    }

    pub(crate) fn trip_metrics_request(&self) -> Option<MetricsRequest> {
        self.state.read().trip_metrics_request.clone()
    }

    pub(crate) fn set_graph_params(&self, params: GraphParams) {
        self.state.write().graph_params = params;
    }

    pub(crate) fn set_date_range(&self, range: DateRange) {
        self.state.write().graph_params.date_range = range;
    }

    /// Reset everything agency-specific and select the new agency
    pub(crate) fn reset_for_agency(&self, agency_id: String) {
        let mut state = self.state.write();
        let date_range = state.graph_params.date_range;
        state.graph_params = GraphParams {
            date_range,
            ..GraphParams::for_agency(agency_id)
        };
        state.routes = None;
        state.routes_generation += 1;
        state.routes_error = None;
        state.routes_loading = false;
        state.trip_metrics = None;
        state.trip_metrics_request = None;
        state.trip_metrics_error = None;
        state.trip_metrics_loading = false;
    }

    pub(crate) fn begin_routes_fetch(&self) {
        let mut state = self.state.write();
        state.routes_loading = true;
        state.routes_error = None;
    }

    /// Install a routes fetch result, unless the selected agency has
    /// changed since the fetch started.
    pub(crate) fn finish_routes_fetch(
        &self,
        agency_id: &str,
        result: Result<Vec<Route>, anyhow::Error>,
    ) {
        let mut state = self.state.write();
        if state.graph_params.agency_id.as_deref() != Some(agency_id) {
            return;
        }
        state.routes_loading = false;
        match result {
            Ok(routes) => {
                state.routes = Some(Arc::new(routes));
                state.routes_generation += 1;
                state.routes_error = None;
            }
            Err(err) => {
                state.routes_error = Some(err.to_string());
            }
        }
    }

    pub(crate) fn begin_trip_metrics_fetch(&self, request: MetricsRequest) {
        let mut state = self.state.write();
        state.trip_metrics = None;
        state.trip_metrics_request = Some(request);
        state.trip_metrics_error = None;
        state.trip_metrics_loading = true;
    }

    /// Install a metrics fetch result, unless a newer request has
    /// superseded it.
    pub(crate) fn finish_trip_metrics_fetch(
        &self,
        request: &MetricsRequest,
        result: Result<TripMetrics, anyhow::Error>,
    ) {
        let mut state = self.state.write();
        if state.trip_metrics_request.as_ref() != Some(request) {
            return;
        }
        state.trip_metrics_loading = false;
        match result {
            Ok(metrics) => {
                state.trip_metrics = Some(Arc::new(metrics));
                state.trip_metrics_error = None;
            }
            Err(err) => {
                state.trip_metrics_error = Some(err.to_string());
            }
        }
    }

    pub(crate) fn clear_trip_metrics(&self) {
        let mut state = self.state.write();
        state.trip_metrics = None;
        state.trip_metrics_request = None;
        state.trip_metrics_error = None;
        state.trip_metrics_loading = false;
    }
}

/// Read-only view of the store, taken once per frame
#[derive(Clone)]
pub struct StoreSnapshot {
    pub graph_params: GraphParams,
    pub routes: Option<Arc<Vec<Route>>>,
    pub routes_generation: u64,
    pub routes_error: Option<String>,
    pub routes_loading: bool,
    pub trip_metrics: Option<Arc<TripMetrics>>,
    pub trip_metrics_error: Option<String>,
    pub trip_metrics_loading: bool,
}

impl StoreSnapshot {
    /// Fetched routes as a slice, if present
    pub fn routes(&self) -> Option<&[Route]> {
        self.routes.as_deref().map(|r| r.as_slice())
    }

    /// True once metrics exist, errored or are being computed.
    ///
    /// The route screen uses this to decide between the metrics panel
    /// and the plain route summary, and to enable date range editing.
    pub fn has_trip_metrics_activity(&self) -> bool {
        self.trip_metrics.is_some()
            || self.trip_metrics_error.is_some()
            || self.trip_metrics_loading
    }
}
