//! Current route/direction/stop selection

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive range of service dates to analyze
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Range covering a single service date
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start_date: date,
            end_date: date,
        }
    }

    /// Range of `days` dates counting back from `end`, both included
    pub fn trailing_days(end: NaiveDate, days: u64) -> Self {
        let start = end
            .checked_sub_days(Days::new(days.saturating_sub(1)))
            .unwrap_or(end);
        Self {
            start_date: start,
            end_date: end,
        }
    }

    /// Number of days covered, counting both endpoints
    pub fn num_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Human-readable label for toolbars and logs
    pub fn label(&self) -> String {
        if self.start_date == self.end_date {
            self.start_date.format("%Y-%m-%d").to_string()
        } else {
            format!(
                "{} to {}",
                self.start_date.format("%Y-%m-%d"),
                self.end_date.format("%Y-%m-%d")
            )
        }
    }
}

/// The selection state driving every screen.
///
/// A screen derives everything it shows from these fields plus the
/// fetched data in the store. The four drill-down keys (route,
/// direction, start stop, end stop) are exactly the keys a navigation
/// link can carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphParams {
    /// Selected transit agency
    pub agency_id: Option<String>,

    /// Selected route within the agency
    pub route_id: Option<String>,

    /// Selected direction of travel within the route
    pub direction_id: Option<String>,

    /// Stop where analyzed trips begin
    pub start_stop_id: Option<String>,

    /// Stop where analyzed trips end
    pub end_stop_id: Option<String>,

    /// Service dates to analyze
    pub date_range: DateRange,
}

impl GraphParams {
    /// Fresh selection for an agency with nothing drilled into yet
    pub fn for_agency(agency_id: impl Into<String>) -> Self {
        Self {
            agency_id: Some(agency_id.into()),
            ..Default::default()
        }
    }

    /// True once a route is selected
    pub fn has_route(&self) -> bool {
        self.route_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_day_range_counts_one_day() {
        let range = DateRange::single_day(date(2024, 3, 5));
        assert_eq!(range.num_days(), 1);
        assert_eq!(range.label(), "2024-03-05");
    }

    #[test]
    fn multi_day_range_counts_both_endpoints() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 7));
        assert_eq!(range.num_days(), 7);
        assert_eq!(range.label(), "2024-03-01 to 2024-03-07");
    }

    #[test]
    fn trailing_days_counts_back_from_the_anchor() {
        let range = DateRange::trailing_days(date(2024, 3, 5), 7);
        assert_eq!(range, DateRange::new(date(2024, 2, 28), date(2024, 3, 5)));
        assert_eq!(range.num_days(), 7);
    }

    #[test]
    fn trailing_one_day_is_the_anchor_alone() {
        let range = DateRange::trailing_days(date(2024, 3, 5), 1);
        assert_eq!(range, DateRange::single_day(date(2024, 3, 5)));
    }

    #[test]
    fn for_agency_clears_drill_down_keys() {
        let params = GraphParams::for_agency("muni");
        assert_eq!(params.agency_id.as_deref(), Some("muni"));
        assert!(params.route_id.is_none());
        assert!(params.direction_id.is_none());
        assert!(params.start_stop_id.is_none());
        assert!(params.end_stop_id.is_none());
    }
}
