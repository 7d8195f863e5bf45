//! Router subscriber trait

use super::LinkTarget;

/// Trait for components that need to respond to screen changes
pub trait RouterSubscriber: Send + Sync {
    /// Called after the router has switched to a new link
    fn on_route_change(&self, link: &LinkTarget);
}
