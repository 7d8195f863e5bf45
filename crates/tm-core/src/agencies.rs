//! Static registry of supported transit agencies

use once_cell::sync::Lazy;

/// Configuration for one supported transit agency
#[derive(Debug, Clone)]
pub struct Agency {
    /// Stable id used in selections and data paths
    pub id: &'static str,

    /// Display name
    pub title: &'static str,

    /// IANA timezone the agency operates in
    pub timezone_id: &'static str,

    /// Initial map center as (lat, lon)
    pub map_center: (f64, f64),

    /// Half-width of the initial map viewport, in degrees
    pub map_radius_deg: f64,
}

static AGENCIES: Lazy<Vec<Agency>> = Lazy::new(|| {
    vec![
        Agency {
            id: "muni",
            title: "San Francisco Muni",
            timezone_id: "America/Los_Angeles",
            map_center: (37.7793, -122.4193),
            map_radius_deg: 0.12,
        },
        Agency {
            id: "portland-sc",
            title: "Portland Streetcar",
            timezone_id: "America/Los_Angeles",
            map_center: (45.5231, -122.6765),
            map_radius_deg: 0.05,
        },
    ]
});

/// All agencies in registry order
pub fn all_agencies() -> &'static [Agency] {
    &AGENCIES
}

/// Look up an agency by id
pub fn get_agency(agency_id: &str) -> Option<&'static Agency> {
    AGENCIES.iter().find(|a| a.id == agency_id)
}
