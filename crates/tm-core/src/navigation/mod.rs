//! Screen routing
//!
//! Views never switch screens themselves. They hand a [`LinkTarget`] to
//! the dispatcher, which applies the link's selection payload to the
//! store and then tells the [`Router`] to change screens. Interested
//! components subscribe to the router for change notifications.

use serde::{Deserialize, Serialize};

use crate::selection::GraphParams;

mod engine;
mod subscriber;

pub use engine::Router;
pub use subscriber::RouterSubscriber;

/// Screens addressable by a link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Agency overview listing all routes
    #[default]
    Dashboard,
    /// Single-route screen with map, selection controls and metrics
    Route,
}

/// The four drill-down keys a link payload can carry, in drill-down order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKey {
    Route,
    Direction,
    StartStop,
    EndStop,
}

/// Partial selection carried by a link.
///
/// Following a link replaces all four drill-down keys of the current
/// selection with the payload's values, absent ones included. Agency
/// and date range are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPayload {
    pub route_id: Option<String>,
    pub direction_id: Option<String>,
    pub start_stop_id: Option<String>,
    pub end_stop_id: Option<String>,
}

impl LinkPayload {
    /// Capture the four drill-down keys of the current selection
    pub fn from_params(params: &GraphParams) -> Self {
        Self {
            route_id: params.route_id.clone(),
            direction_id: params.direction_id.clone(),
            start_stop_id: params.start_stop_id.clone(),
            end_stop_id: params.end_stop_id.clone(),
        }
    }

    pub fn set(&mut self, key: SelectionKey, id: String) {
        match key {
            SelectionKey::Route => self.route_id = Some(id),
            SelectionKey::Direction => self.direction_id = Some(id),
            SelectionKey::StartStop => self.start_stop_id = Some(id),
            SelectionKey::EndStop => self.end_stop_id = Some(id),
        }
    }

    /// Builder-style variant of [`set`](Self::set)
    pub fn with_key(mut self, key: SelectionKey, id: impl Into<String>) -> Self {
        self.set(key, id.into());
        self
    }

    /// Apply this payload to a selection, replacing the drill-down keys
    /// wholesale and keeping agency and date range.
    pub fn apply_to(&self, current: &GraphParams) -> GraphParams {
        GraphParams {
            agency_id: current.agency_id.clone(),
            route_id: self.route_id.clone(),
            direction_id: self.direction_id.clone(),
            start_stop_id: self.start_stop_id.clone(),
            end_stop_id: self.end_stop_id.clone(),
            date_range: current.date_range,
        }
    }
}

/// A navigable link: the screen to show and the selection to apply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTarget {
    pub screen: Screen,
    pub payload: LinkPayload,
}

impl LinkTarget {
    /// Link back to the agency dashboard, dropping the selection
    pub fn dashboard() -> Self {
        Self {
            screen: Screen::Dashboard,
            payload: LinkPayload::default(),
        }
    }

    /// Link to the route screen with the given selection
    pub fn route_screen(payload: LinkPayload) -> Self {
        Self {
            screen: Screen::Route,
            payload,
        }
    }
}
