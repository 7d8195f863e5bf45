//! Screens and panels for the transit metrics explorer

pub mod dashboard;
pub mod route;

pub use dashboard::DashboardView;
pub use route::RouteScreenView;

use tm_core::{Dispatcher, StoreSnapshot};

/// Context passed to views during rendering.
///
/// The snapshot is taken once per frame by the app; every view renders
/// from the same frozen state and requests changes through the
/// dispatcher only.
pub struct ViewContext<'a> {
    /// Store contents frozen at frame start
    pub snapshot: &'a StoreSnapshot,

    /// Handle for dispatching actions
    pub dispatcher: &'a Dispatcher,
}
