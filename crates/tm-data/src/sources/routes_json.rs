//! Route configuration from JSON files

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use tm_core::{Route, RoutesProvider};

use crate::DataError;

/// Reads route configuration for an agency.
///
/// Expects `<base>/<agency_id>/routes.json` holding a JSON array of
/// routes.
pub struct JsonRoutesSource {
    base_dir: PathBuf,
}

impl JsonRoutesSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn routes_path(&self, agency_id: &str) -> PathBuf {
        self.base_dir.join(agency_id).join("routes.json")
    }

    /// Load the route list for an agency
    pub async fn load(&self, agency_id: &str) -> Result<Vec<Route>, DataError> {
        let path = self.routes_path(agency_id);
        tokio::task::spawn_blocking(move || {
            info!("reading routes from {:?}", path);
            let file = File::open(&path)?;
            parse_routes(BufReader::new(file))
        })
        .await?
    }
}

#[async_trait]
impl RoutesProvider for JsonRoutesSource {
    async fn fetch_routes(&self, agency_id: &str) -> anyhow::Result<Vec<Route>> {
        Ok(self.load(agency_id).await?)
    }
}

/// Parse a routes array from any JSON reader
pub fn parse_routes<R: Read>(reader: R) -> Result<Vec<Route>, DataError> {
    let mut routes: Vec<Route> = serde_json::from_reader(reader)?;
    for route in &mut routes {
        route.normalize();
    }
    Ok(routes)
}
