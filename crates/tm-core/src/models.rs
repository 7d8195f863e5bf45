//! Transit data model shared by all crates

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::selection::{DateRange, GraphParams};

/// One route of a transit agency, with its directions and stops.
///
/// Stops are keyed by stop id in declaration order. Direction stop
/// lists reference stops by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub agency_id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub directions: Vec<Direction>,
    #[serde(default)]
    pub stops: IndexMap<String, StopInfo>,
}

impl Route {
    /// Back-fill stop ids from their map keys.
    ///
    /// Route config files omit the id inside each stop record since the
    /// map key already carries it.
    pub fn normalize(&mut self) {
        for (stop_id, stop) in self.stops.iter_mut() {
            if stop.id.is_empty() {
                stop.id = stop_id.clone();
            }
        }
    }

    pub fn stop(&self, stop_id: &str) -> Option<&StopInfo> {
        self.stops.get(stop_id)
    }

    pub fn direction(&self, direction_id: &str) -> Option<&Direction> {
        self.directions.iter().find(|d| d.id == direction_id)
    }
}

/// One direction of travel on a route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Direction {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Stops served in travel order
    #[serde(default)]
    pub stop_ids: Vec<String>,
}

/// A single stop on a route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopInfo {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// Summary statistics for one metric, in minutes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub count: usize,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub p90: f64,
}

/// Computed metrics for one route/direction/stop selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripMetrics {
    /// Time between consecutive arrivals at the start stop
    pub headways: MetricStats,

    /// Expected passenger wait at the start stop
    pub wait_times: MetricStats,

    /// Travel time from start stop to end stop, when an end stop is selected
    pub trip_times: Option<MetricStats>,

    /// Arrivals observed at the start stop
    pub start_arrivals: usize,

    /// Start arrivals matched to a later end-stop arrival
    pub completed_trips: usize,
}

/// Everything the metrics engine needs to compute [`TripMetrics`].
///
/// Derivable from the current selection once agency, route, direction
/// and start stop are all chosen; the end stop stays optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsRequest {
    pub agency_id: String,
    pub route_id: String,
    pub direction_id: String,
    pub start_stop_id: String,
    pub end_stop_id: Option<String>,
    pub date_range: DateRange,
}

impl MetricsRequest {
    /// Build a request from the selection, or None while the selection
    /// is still too shallow to compute anything.
    pub fn from_params(params: &GraphParams) -> Option<Self> {
        Some(Self {
            agency_id: params.agency_id.clone()?,
            route_id: params.route_id.clone()?,
            direction_id: params.direction_id.clone()?,
            start_stop_id: params.start_stop_id.clone()?,
            end_stop_id: params.end_stop_id.clone(),
            date_range: params.date_range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_route() -> Route {
        let json = r#"{
            "id": "N",
            "agency_id": "muni",
            "title": "N-Judah",
            "directions": [
                {"id": "N_0", "title": "Inbound", "stop_ids": ["3212", "3211"]}
            ],
            "stops": {
                "3212": {"title": "Judah & La Playa", "lat": 37.76, "lon": -122.508},
                "3211": {"title": "Judah & 46th Ave", "lat": 37.761, "lon": -122.505}
            }
        }"#;
        let mut route: Route = serde_json::from_str(json).unwrap();
        route.normalize();
        route
    }

    #[test]
    fn normalize_backfills_stop_ids_from_map_keys() {
        let route = test_route();
        assert_eq!(route.stop("3212").unwrap().id, "3212");
        assert_eq!(route.stop("3211").unwrap().id, "3211");
    }

    #[test]
    fn direction_lookup_by_id() {
        let route = test_route();
        assert_eq!(route.direction("N_0").unwrap().title, "Inbound");
        assert!(route.direction("N_1").is_none());
    }

    #[test]
    fn metrics_request_requires_start_stop() {
        let mut params = GraphParams::for_agency("muni");
        params.route_id = Some("N".into());
        params.direction_id = Some("N_0".into());
        assert!(MetricsRequest::from_params(&params).is_none());

        params.start_stop_id = Some("3212".into());
        let request = MetricsRequest::from_params(&params).unwrap();
        assert_eq!(request.route_id, "N");
        assert!(request.end_stop_id.is_none());
    }
}
