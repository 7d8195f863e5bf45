//! Recorded data sources
//!
//! Agency data lives under one base directory, one subdirectory per
//! agency: `<base>/<agency_id>/routes.json` for route configuration and
//! `<base>/<agency_id>/positions.csv` for the GPS recording.

mod positions_csv;
mod routes_json;

pub use positions_csv::{read_positions, CsvPositionsSource};
pub use routes_json::{parse_routes, JsonRoutesSource};

use serde::Deserialize;

/// One GPS observation of a vehicle
#[derive(Debug, Clone, Deserialize)]
pub struct VehiclePosition {
    pub vehicle_id: String,
    pub route_id: String,
    /// Direction the vehicle was signed up for, when the feed reports one
    #[serde(default)]
    pub direction_id: Option<String>,
    pub lat: f64,
    pub lon: f64,
    /// Observation time in milliseconds since the epoch
    pub timestamp_ms: i64,
}
