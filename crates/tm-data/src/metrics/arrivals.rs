//! Arrival detection from raw vehicle positions
//!
//! A vehicle is "at" a stop while its GPS distance to the stop is under
//! an eclipse radius. Each per-vehicle run of in-radius samples is one
//! eclipse; runs are split when consecutive samples are more than a
//! layover gap apart. The arrival time of an eclipse is the earliest
//! sample at its minimum distance.

use ahash::AHashMap;

use tm_core::StopInfo;

use crate::sources::VehiclePosition;

/// Mean earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A vehicle counts as at the stop within this distance, in meters
const ECLIPSE_RADIUS_M: f64 = 750.0;

/// Samples further apart than this belong to separate eclipses, in
/// milliseconds
const ECLIPSE_SPLIT_MS: i64 = 30 * 60 * 1000;

/// One detected arrival of a vehicle at a stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    pub vehicle_id: String,
    pub time_ms: i64,
}

/// In-radius samples of one vehicle, in time order
struct Eclipse {
    vehicle_id: String,
    /// (time_ms, distance_m) pairs
    samples: Vec<(i64, f64)>,
}

/// Great-circle distance between two points, in meters
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1r = lat1.to_radians();
    let lat2r = lat2.to_radians();
    let dlat = lat2r - lat1r;
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1r.cos() * lat2r.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Detect every arrival at one stop.
///
/// `positions` must be sorted by timestamp and may mix vehicles;
/// grouping happens here. Results come back in time order.
pub fn find_arrivals(positions: &[VehiclePosition], stop: &StopInfo) -> Vec<Arrival> {
    let mut arrivals: Vec<Arrival> = find_eclipses(positions, stop)
        .iter()
        .map(nadir)
        .collect();
    arrivals.sort_by_key(|a| a.time_ms);
    arrivals
}

/// Group in-radius samples into per-vehicle eclipses.
///
/// Out-of-radius samples are dropped before grouping, so a brief dip
/// outside the radius does not split an eclipse; only the layover gap
/// does.
fn find_eclipses(positions: &[VehiclePosition], stop: &StopInfo) -> Vec<Eclipse> {
    let mut completed = Vec::new();
    let mut open: AHashMap<String, Eclipse> = AHashMap::new();

    for position in positions {
        let distance = haversine_m(stop.lat, stop.lon, position.lat, position.lon);
        if distance >= ECLIPSE_RADIUS_M {
            continue;
        }

        match open.get_mut(&position.vehicle_id) {
            Some(eclipse) => {
                let (last_time, _) = eclipse.samples[eclipse.samples.len() - 1];
                if position.timestamp_ms - last_time > ECLIPSE_SPLIT_MS {
                    let finished = std::mem::replace(
                        eclipse,
                        Eclipse {
                            vehicle_id: position.vehicle_id.clone(),
                            samples: Vec::new(),
                        },
                    );
                    completed.push(finished);
                }
                eclipse.samples.push((position.timestamp_ms, distance));
            }
            None => {
                open.insert(
                    position.vehicle_id.clone(),
                    Eclipse {
                        vehicle_id: position.vehicle_id.clone(),
                        samples: vec![(position.timestamp_ms, distance)],
                    },
                );
            }
        }
    }

    completed.extend(open.into_values());
    completed
}

/// The earliest minimum-distance sample of an eclipse
fn nadir(eclipse: &Eclipse) -> Arrival {
    let mut best = eclipse.samples[0];
    for &(time_ms, distance) in &eclipse.samples[1..] {
        if distance < best.1 {
            best = (time_ms, distance);
        }
    }
    Arrival {
        vehicle_id: eclipse.vehicle_id.clone(),
        time_ms: best.0,
    }
}
