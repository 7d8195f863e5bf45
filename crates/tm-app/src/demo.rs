//! Built-in demo dataset
//!
//! Generates a morning of simulated service for a couple of agencies so
//! the app is usable before any recorded data directory is opened. The
//! simulated vehicles run fixed schedules, which keeps the numbers on
//! the route screen easy to sanity-check: headways come out at exactly
//! the scheduled interval.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use indexmap::IndexMap;

use tm_core::{
    Direction, MetricsRequest, Route, RoutesProvider, StopInfo, TripMetrics, TripMetricsProvider,
};
use tm_data::{compute_trip_metrics, VehiclePosition};

/// Service date the simulated positions fall on
pub fn demo_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

/// First departure, minutes after midnight UTC
const SERVICE_START_MIN: i64 = 6 * 60;

/// Scheduled interval between departures
const HEADWAY_MIN: i64 = 12;

/// Departures simulated per direction
const TRIPS_PER_DIRECTION: i64 = 20;

/// Travel time between consecutive stops
const LEG_SECS: i64 = 180;

/// Position reporting interval. Divides the leg time evenly, so every
/// vehicle reports a sample exactly at each stop.
const SAMPLE_SECS: i64 = 45;

/// Providers backed by the generated dataset
pub fn demo_providers() -> (Arc<dyn RoutesProvider>, Arc<dyn TripMetricsProvider>) {
    let routes = demo_routes();
    let positions = simulate_positions(&routes);
    (
        Arc::new(DemoRoutesProvider {
            routes: routes.clone(),
        }),
        Arc::new(DemoMetricsProvider { routes, positions }),
    )
}

pub fn demo_routes() -> Vec<Route> {
    vec![
        Route {
            id: "N".into(),
            agency_id: "muni".into(),
            title: "N Judah".into(),
            url: Some("https://www.sfmta.com/routes/n-judah".into()),
            directions: vec![
                Direction {
                    id: "N_0".into(),
                    title: "Inbound to Caltrain".into(),
                    url: None,
                    stop_ids: ids(&["3212", "4448", "5000", "5417"]),
                },
                Direction {
                    id: "N_1".into(),
                    title: "Outbound to Ocean Beach".into(),
                    url: None,
                    stop_ids: ids(&["5417", "5000", "4448", "3212"]),
                },
            ],
            stops: IndexMap::from([
                stop("3212", "Judah St & La Playa St", 37.7601, -122.5087),
                stop("4448", "Judah St & 19th Ave", 37.7614, -122.4757),
                stop("5000", "Carl St & Cole St", 37.7657, -122.4500),
                stop("5417", "Duboce Ave & Church St", 37.7690, -122.4290),
            ]),
        },
        Route {
            id: "J".into(),
            agency_id: "muni".into(),
            title: "J Church".into(),
            url: Some("https://www.sfmta.com/routes/j-church".into()),
            directions: vec![
                Direction {
                    id: "J_0".into(),
                    title: "Inbound to Embarcadero".into(),
                    url: None,
                    stop_ids: ids(&["6994", "6920", "5417"]),
                },
                Direction {
                    id: "J_1".into(),
                    title: "Outbound to Balboa Park".into(),
                    url: None,
                    stop_ids: ids(&["5417", "6920", "6994"]),
                },
            ],
            stops: IndexMap::from([
                stop("6994", "Church St & 30th St", 37.7420, -122.4270),
                stop("6920", "Church St & 24th St", 37.7512, -122.4270),
                stop("5417", "Church St & Duboce Ave", 37.7690, -122.4290),
            ]),
        },
        Route {
            id: "A".into(),
            agency_id: "portland-sc".into(),
            title: "A Loop".into(),
            url: Some("https://portlandstreetcar.org/routes-map".into()),
            directions: vec![Direction {
                id: "A_0".into(),
                title: "Clockwise".into(),
                url: None,
                stop_ids: ids(&["13720", "10764", "9600"]),
            }],
            stops: IndexMap::from([
                stop("13720", "NW 23rd & Marshall", 45.5310, -122.6986),
                stop("10764", "SW 11th & Alder", 45.5203, -122.6827),
                stop("9600", "OMSI / SE Water", 45.5083, -122.6660),
            ]),
        },
    ]
}

/// Simulated vehicle track for every trip of every route.
///
/// Each trip runs one vehicle end to end at a constant pace, reporting
/// every [`SAMPLE_SECS`]. Vehicles do not loop back, so successive
/// trips never share a vehicle id.
pub fn simulate_positions(routes: &[Route]) -> Vec<VehiclePosition> {
    let day_start_ms = demo_date()
        .and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp_millis();

    let mut positions = Vec::new();
    for route in routes {
        for direction in &route.directions {
            let path: Vec<&StopInfo> = direction
                .stop_ids
                .iter()
                .filter_map(|id| route.stop(id))
                .collect();
            if path.len() < 2 {
                continue;
            }
            let total_secs = (path.len() as i64 - 1) * LEG_SECS;

            for trip in 0..TRIPS_PER_DIRECTION {
                let depart_ms = day_start_ms + (SERVICE_START_MIN + trip * HEADWAY_MIN) * 60_000;
                let vehicle_id = format!("{}-{}-{:02}", route.id, direction.id, trip);

                for sample in 0..=total_secs / SAMPLE_SECS {
                    let elapsed = sample * SAMPLE_SECS;
                    let (lat, lon) = along_path(&path, elapsed);
                    positions.push(VehiclePosition {
                        vehicle_id: vehicle_id.clone(),
                        route_id: route.id.clone(),
                        direction_id: Some(direction.id.clone()),
                        lat,
                        lon,
                        timestamp_ms: depart_ms + elapsed * 1000,
                    });
                }
            }
        }
    }
    positions
}

/// Linear position along the stop sequence after `elapsed` seconds
fn along_path(path: &[&StopInfo], elapsed: i64) -> (f64, f64) {
    let leg = (elapsed / LEG_SECS) as usize;
    let last = path.len() - 1;
    if leg >= last {
        return (path[last].lat, path[last].lon);
    }
    let frac = (elapsed % LEG_SECS) as f64 / LEG_SECS as f64;
    let (from, to) = (path[leg], path[leg + 1]);
    (
        from.lat + (to.lat - from.lat) * frac,
        from.lon + (to.lon - from.lon) * frac,
    )
}

fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

fn stop(id: &str, title: &str, lat: f64, lon: f64) -> (String, StopInfo) {
    (
        id.to_string(),
        StopInfo {
            id: id.to_string(),
            title: title.to_string(),
            url: None,
            lat,
            lon,
        },
    )
}

/// Serves the generated route list, filtered per agency
pub struct DemoRoutesProvider {
    routes: Vec<Route>,
}

#[async_trait]
impl RoutesProvider for DemoRoutesProvider {
    async fn fetch_routes(&self, agency_id: &str) -> Result<Vec<Route>> {
        Ok(self
            .routes
            .iter()
            .filter(|route| route.agency_id == agency_id)
            .cloned()
            .collect())
    }
}

/// Runs the real metrics engine over the simulated positions
pub struct DemoMetricsProvider {
    routes: Vec<Route>,
    positions: Vec<VehiclePosition>,
}

#[async_trait]
impl TripMetricsProvider for DemoMetricsProvider {
    async fn fetch_trip_metrics(&self, request: &MetricsRequest) -> Result<TripMetrics> {
        let route = self
            .routes
            .iter()
            .find(|r| r.agency_id == request.agency_id && r.id == request.route_id)
            .ok_or_else(|| {
                anyhow!(
                    "no demo route {} for agency {}",
                    request.route_id,
                    request.agency_id
                )
            })?;
        Ok(compute_trip_metrics(request, route, &self.positions)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_core::DateRange;

    fn request(route_id: &str, direction_id: &str, start: &str, end: Option<&str>) -> MetricsRequest {
        MetricsRequest {
            agency_id: "muni".into(),
            route_id: route_id.into(),
            direction_id: direction_id.into(),
            start_stop_id: start.into(),
            end_stop_id: end.map(String::from),
            date_range: DateRange::single_day(demo_date()),
        }
    }

    #[test]
    fn every_direction_stop_resolves() {
        for route in demo_routes() {
            for direction in &route.directions {
                for stop_id in &direction.stop_ids {
                    assert!(
                        route.stop(stop_id).is_some(),
                        "route {} is missing stop {}",
                        route.id,
                        stop_id
                    );
                }
            }
        }
    }

    #[test]
    fn scheduled_headways_survive_the_pipeline() {
        let routes = demo_routes();
        let positions = simulate_positions(&routes);
        let route = routes.iter().find(|r| r.id == "N").unwrap();

        let metrics = compute_trip_metrics(
            &request("N", "N_0", "3212", Some("5417")),
            route,
            &positions,
        )
        .unwrap();

        assert_eq!(metrics.start_arrivals, TRIPS_PER_DIRECTION as usize);
        assert_eq!(metrics.headways.count, TRIPS_PER_DIRECTION as usize - 1);
        assert!((metrics.headways.avg - HEADWAY_MIN as f64).abs() < 1e-9);
        assert!((metrics.wait_times.avg - HEADWAY_MIN as f64 / 2.0).abs() < 1e-9);

        // three legs between La Playa and Duboce
        let expected_trip = 3.0 * LEG_SECS as f64 / 60.0;
        let trip_times = metrics.trip_times.unwrap();
        assert_eq!(metrics.completed_trips, TRIPS_PER_DIRECTION as usize);
        assert!((trip_times.avg - expected_trip).abs() < 1e-9);
    }

    #[test]
    fn providers_serve_agency_scoped_data() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (routes_provider, metrics_provider) = demo_providers();

        let muni = runtime.block_on(routes_provider.fetch_routes("muni")).unwrap();
        assert_eq!(muni.len(), 2);
        let portland = runtime
            .block_on(routes_provider.fetch_routes("portland-sc"))
            .unwrap();
        assert_eq!(portland.len(), 1);

        let metrics = runtime
            .block_on(metrics_provider.fetch_trip_metrics(&request("J", "J_0", "6994", None)))
            .unwrap();
        assert!(metrics.headways.count > 0);
        assert!(metrics.trip_times.is_none());

        let err = runtime
            .block_on(metrics_provider.fetch_trip_metrics(&request("99", "99_0", "1", None)))
            .unwrap_err();
        assert!(err.to_string().contains("no demo route"));
    }
}
