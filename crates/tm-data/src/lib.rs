//! Data loading and metrics computation for the transit explorer

pub mod metrics;
pub mod provider;
pub mod sources;

use thiserror::Error;

// Re-exports
pub use metrics::compute_trip_metrics;
pub use provider::RecordedMetricsProvider;
pub use sources::{CsvPositionsSource, JsonRoutesSource, VehiclePosition};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("route {0} not found")]
    RouteNotFound(String),

    #[error("stop {0} not found on route {1}")]
    StopNotFound(String, String),

    #[error("no data: {0}")]
    NoData(String),

    #[error("Join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                DataError::Io(std::io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => DataError::Csv(error.to_string()),
        }
    }
}
