//! Trip metrics computation
//!
//! Turns a raw position recording into arrival times at the selected
//! stops, then into headway, wait time and trip time statistics.

mod arrivals;
mod stats;

pub use arrivals::{find_arrivals, haversine_m, Arrival};
pub use stats::summarize;

use chrono::{Days, NaiveDate, NaiveTime};
use tracing::debug;

use tm_core::{DateRange, MetricStats, MetricsRequest, Route, TripMetrics};

use crate::sources::VehiclePosition;
use crate::DataError;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Compute metrics for one request.
///
/// `positions` is the whole agency recording; filtering down to the
/// requested route, direction and date range happens here. Fails with
/// [`DataError::NoData`] when nothing was observed at the start stop.
pub fn compute_trip_metrics(
    request: &MetricsRequest,
    route: &Route,
    positions: &[VehiclePosition],
) -> Result<TripMetrics, DataError> {
    let start_stop = route.stop(&request.start_stop_id).ok_or_else(|| {
        DataError::StopNotFound(request.start_stop_id.clone(), route.id.clone())
    })?;

    let (range_start_ms, range_end_ms) = date_range_bounds_ms(&request.date_range);
    let filtered: Vec<VehiclePosition> = positions
        .iter()
        .filter(|p| {
            p.route_id == route.id
                && direction_matches(p, &request.direction_id)
                && p.timestamp_ms >= range_start_ms
                && p.timestamp_ms < range_end_ms
        })
        .cloned()
        .collect();
    debug!(
        "{} of {} positions match route {} direction {}",
        filtered.len(),
        positions.len(),
        route.id,
        request.direction_id
    );

    let start_arrivals = find_arrivals(&filtered, start_stop);
    if start_arrivals.is_empty() {
        return Err(DataError::NoData(format!(
            "no arrivals observed at stop {} on route {}",
            start_stop.id, route.id
        )));
    }

    let headways = headways_minutes(&start_arrivals);

    let mut trip_times = None;
    let mut completed_trips = 0;
    if let Some(end_stop_id) = &request.end_stop_id {
        let end_stop = route
            .stop(end_stop_id)
            .ok_or_else(|| DataError::StopNotFound(end_stop_id.clone(), route.id.clone()))?;
        let end_arrivals = find_arrivals(&filtered, end_stop);
        let times = match_trips(&start_arrivals, &end_arrivals);
        completed_trips = times.len();
        trip_times = Some(summarize(&times));
    }

    Ok(TripMetrics {
        headways: summarize(&headways),
        wait_times: wait_time_stats(&headways),
        trip_times,
        start_arrivals: start_arrivals.len(),
        completed_trips,
    })
}

/// Millisecond bounds of a date range, start inclusive and end
/// exclusive. Service dates are interpreted as UTC days.
fn date_range_bounds_ms(range: &DateRange) -> (i64, i64) {
    let day_start = |date: NaiveDate| date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    let end = range
        .end_date
        .checked_add_days(Days::new(1))
        .unwrap_or(NaiveDate::MAX);
    (day_start(range.start_date), day_start(end))
}

/// Untagged positions match every direction; tagged ones must agree
fn direction_matches(position: &VehiclePosition, direction_id: &str) -> bool {
    match &position.direction_id {
        Some(id) => id == direction_id,
        None => true,
    }
}

/// Minutes between consecutive start-stop arrivals
fn headways_minutes(arrivals: &[Arrival]) -> Vec<f64> {
    arrivals
        .windows(2)
        .map(|pair| (pair[1].time_ms - pair[0].time_ms) as f64 / MS_PER_MINUTE)
        .collect()
}

/// Expected wait at the stop under uniform passenger arrival: half of
/// each headway.
fn wait_time_stats(headways: &[f64]) -> MetricStats {
    let waits: Vec<f64> = headways.iter().map(|h| h / 2.0).collect();
    summarize(&waits)
}

/// Pair each start arrival with the same vehicle's next end arrival.
/// Returns trip durations in minutes.
fn match_trips(start: &[Arrival], end: &[Arrival]) -> Vec<f64> {
    let mut times = Vec::new();
    for departure in start {
        let arrival = end
            .iter()
            .find(|a| a.vehicle_id == departure.vehicle_id && a.time_ms > departure.time_ms);
        if let Some(arrival) = arrival {
            times.push((arrival.time_ms - departure.time_ms) as f64 / MS_PER_MINUTE);
        }
    }
    times
}
