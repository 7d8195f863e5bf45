//! Trip metrics provider backed by recorded agency data

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::info;

use tm_core::{MetricsRequest, Route, TripMetrics, TripMetricsProvider};

use crate::metrics::compute_trip_metrics;
use crate::sources::{CsvPositionsSource, JsonRoutesSource, VehiclePosition};
use crate::DataError;

/// Routes and positions of the most recently used agency
struct AgencyData {
    agency_id: String,
    routes: Arc<Vec<Route>>,
    positions: Arc<Vec<VehiclePosition>>,
}

/// Computes trip metrics from recorded routes and positions on disk.
///
/// The last loaded agency is kept in memory so repeated requests
/// against the same agency only pay for the computation.
pub struct RecordedMetricsProvider {
    routes: JsonRoutesSource,
    positions: CsvPositionsSource,
    cache: RwLock<Option<AgencyData>>,
}

impl RecordedMetricsProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            routes: JsonRoutesSource::new(base_dir.clone()),
            positions: CsvPositionsSource::new(base_dir),
            cache: RwLock::new(None),
        }
    }

    async fn agency_data(
        &self,
        agency_id: &str,
    ) -> Result<(Arc<Vec<Route>>, Arc<Vec<VehiclePosition>>), DataError> {
        if let Some(data) = self.cache.read().as_ref() {
            if data.agency_id == agency_id {
                return Ok((data.routes.clone(), data.positions.clone()));
            }
        }

        let routes = Arc::new(self.routes.load(agency_id).await?);
        let positions = Arc::new(self.positions.load(agency_id).await?);
        info!(
            "cached {} routes and {} positions for {}",
            routes.len(),
            positions.len(),
            agency_id
        );

        *self.cache.write() = Some(AgencyData {
            agency_id: agency_id.to_string(),
            routes: routes.clone(),
            positions: positions.clone(),
        });
        Ok((routes, positions))
    }
}

#[async_trait]
impl TripMetricsProvider for RecordedMetricsProvider {
    async fn fetch_trip_metrics(&self, request: &MetricsRequest) -> anyhow::Result<TripMetrics> {
        let (routes, positions) = self.agency_data(&request.agency_id).await?;
        let route = routes
            .iter()
            .find(|r| r.id == request.route_id)
            .ok_or_else(|| DataError::RouteNotFound(request.route_id.clone()))?;

        let metrics = compute_trip_metrics(request, route, &positions)?;
        info!(
            "computed metrics for route {}: {} start arrivals, {} completed trips",
            request.route_id, metrics.start_arrivals, metrics.completed_trips
        );
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use chrono::NaiveDate;
    use tm_core::DateRange;

    const DAY_START_MS: i64 = 1_709_596_800_000;

    fn write_fixture(base: &Path) {
        let agency = base.join("muni");
        fs::create_dir_all(&agency).unwrap();
        fs::write(
            agency.join("routes.json"),
            r#"[
                {
                    "id": "N",
                    "agency_id": "muni",
                    "title": "N-Judah",
                    "directions": [
                        {"id": "N_0", "title": "Inbound", "stop_ids": ["3212", "5417"]}
                    ],
                    "stops": {
                        "3212": {"title": "Judah & La Playa", "lat": 37.7601, "lon": -122.5087},
                        "5417": {"title": "Duboce & Church", "lat": 37.7690, "lon": -122.4290}
                    }
                }
            ]"#,
        )
        .unwrap();
        fs::write(
            agency.join("positions.csv"),
            format!(
                "vehicle_id,route_id,direction_id,lat,lon,timestamp_ms\n\
                 1001,N,N_0,37.7601,-122.5087,{}\n\
                 1001,N,N_0,37.7690,-122.4290,{}\n\
                 1002,N,N_0,37.7601,-122.5087,{}\n",
                DAY_START_MS,
                DAY_START_MS + 600_000,
                DAY_START_MS + 600_000,
            ),
        )
        .unwrap();
    }

    fn request(route_id: &str) -> MetricsRequest {
        MetricsRequest {
            agency_id: "muni".into(),
            route_id: route_id.into(),
            direction_id: "N_0".into(),
            start_stop_id: "3212".into(),
            end_stop_id: Some("5417".into()),
            date_range: DateRange::single_day(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()),
        }
    }

    #[test]
    fn computes_metrics_from_recorded_files() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let base = std::env::temp_dir().join(format!("tm-provider-{}", std::process::id()));
        write_fixture(&base);
        let provider = RecordedMetricsProvider::new(&base);

        let metrics = runtime
            .block_on(provider.fetch_trip_metrics(&request("N")))
            .unwrap();
        assert_eq!(metrics.start_arrivals, 2);
        assert_eq!(metrics.headways.count, 1);
        assert!((metrics.headways.avg - 10.0).abs() < 1e-9);
        assert_eq!(metrics.completed_trips, 1);
        assert!((metrics.trip_times.unwrap().avg - 10.0).abs() < 1e-9);

        // Second request is served from the cached agency data
        let again = runtime
            .block_on(provider.fetch_trip_metrics(&request("N")))
            .unwrap();
        assert_eq!(again.start_arrivals, 2);

        let err = runtime
            .block_on(provider.fetch_trip_metrics(&request("J")))
            .unwrap_err();
        assert!(err.to_string().contains("J"));

        let _ = fs::remove_dir_all(&base);
    }
}
