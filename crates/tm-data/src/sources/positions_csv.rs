//! Vehicle position history from CSV files

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use csv::ReaderBuilder;
use tracing::info;

use crate::DataError;

use super::VehiclePosition;

/// Reads recorded vehicle positions for an agency.
///
/// Expects `<base>/<agency_id>/positions.csv` with a header row naming
/// the [`VehiclePosition`] fields.
pub struct CsvPositionsSource {
    base_dir: PathBuf,
}

impl CsvPositionsSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn positions_path(&self, agency_id: &str) -> PathBuf {
        self.base_dir.join(agency_id).join("positions.csv")
    }

    /// Load every recorded position for an agency, sorted by timestamp
    pub async fn load(&self, agency_id: &str) -> Result<Vec<VehiclePosition>, DataError> {
        let path = self.positions_path(agency_id);
        tokio::task::spawn_blocking(move || {
            info!("reading positions from {:?}", path);
            let file = File::open(&path)?;
            read_positions(BufReader::new(file))
        })
        .await?
    }
}

/// Parse positions from any CSV reader and sort them by timestamp.
///
/// The rest of the pipeline assumes time order, so it is enforced here
/// rather than trusted from the recording.
pub fn read_positions<R: Read>(reader: R) -> Result<Vec<VehiclePosition>, DataError> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut positions = Vec::new();
    for result in csv_reader.deserialize() {
        let position: VehiclePosition = result?;
        positions.push(position);
    }
    positions.sort_by_key(|p| p.timestamp_ms);
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_sorts_by_timestamp() {
        let csv = "\
vehicle_id,route_id,direction_id,lat,lon,timestamp_ms
1002,N,N_0,37.761,-122.505,120000
1001,N,N_0,37.760,-122.508,60000
";
        let positions = read_positions(csv.as_bytes()).unwrap();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].vehicle_id, "1001");
        assert_eq!(positions[1].timestamp_ms, 120_000);
    }

    #[test]
    fn empty_direction_becomes_none() {
        let csv = "\
vehicle_id,route_id,direction_id,lat,lon,timestamp_ms
1001,N,,37.760,-122.508,60000
";
        let positions = read_positions(csv.as_bytes()).unwrap();
        assert!(positions[0].direction_id.is_none());
    }

    #[test]
    fn malformed_row_is_an_error() {
        let csv = "\
vehicle_id,route_id,direction_id,lat,lon,timestamp_ms
1001,N,N_0,not-a-number,-122.508,60000
";
        assert!(read_positions(csv.as_bytes()).is_err());
    }
}
