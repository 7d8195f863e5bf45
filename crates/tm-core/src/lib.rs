//! Core state for the transit metrics explorer
//!
//! This crate holds the shared data model (agencies, routes, metrics),
//! the current selection, the screen router, and the global store that
//! views read from and dispatch actions against. It knows nothing about
//! how data is loaded or drawn; providers and views live in sibling
//! crates.

pub mod agencies;
pub mod models;
pub mod navigation;
pub mod selection;
pub mod store;

pub use agencies::{all_agencies, get_agency, Agency};
pub use models::{Direction, MetricStats, MetricsRequest, Route, StopInfo, TripMetrics};
pub use navigation::{LinkPayload, LinkTarget, Router, RouterSubscriber, Screen, SelectionKey};
pub use selection::{DateRange, GraphParams};
pub use store::{
    Action, Dispatcher, RoutesProvider, Store, StoreSnapshot, TripMetricsProvider,
};
