//! Router implementation

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::debug;

use super::{LinkTarget, RouterSubscriber, Screen};

/// Tracks the current screen and notifies subscribers on change.
///
/// Subscribers are held weakly so a view dropped by the shell
/// unsubscribes itself.
pub struct Router {
    current: RwLock<LinkTarget>,
    subscribers: RwLock<Vec<Weak<dyn RouterSubscriber>>>,
}

impl Router {
    pub fn new(initial: LinkTarget) -> Self {
        Self {
            current: RwLock::new(initial),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// The link currently shown
    pub fn current(&self) -> LinkTarget {
        self.current.read().clone()
    }

    /// The screen currently shown
    pub fn screen(&self) -> Screen {
        self.current.read().screen
    }

    /// Switch to a new link and notify subscribers
    pub fn navigate_to(&self, link: LinkTarget) {
        debug!("navigating to {:?}", link.screen);
        *self.current.write() = link.clone();
        self.notify_subscribers(&link);
    }

    /// Register a component for change notifications
    pub fn add_subscriber(&self, subscriber: Arc<dyn RouterSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    fn notify_subscribers(&self, link: &LinkTarget) {
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|weak| {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_route_change(link);
                true
            } else {
                false
            }
        });
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(LinkTarget::dashboard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{LinkPayload, SelectionKey};
    use parking_lot::Mutex;

    struct RecordingSubscriber {
        seen: Mutex<Vec<Screen>>,
    }

    impl RouterSubscriber for RecordingSubscriber {
        fn on_route_change(&self, link: &LinkTarget) {
            self.seen.lock().push(link.screen);
        }
    }

    #[test]
    fn navigate_updates_current_and_notifies() {
        let router = Router::default();
        let subscriber = Arc::new(RecordingSubscriber {
            seen: Mutex::new(Vec::new()),
        });
        router.add_subscriber(subscriber.clone());

        let payload = LinkPayload::default().with_key(SelectionKey::Route, "N");
        router.navigate_to(LinkTarget::route_screen(payload));

        assert_eq!(router.screen(), Screen::Route);
        assert_eq!(router.current().payload.route_id.as_deref(), Some("N"));
        assert_eq!(*subscriber.seen.lock(), vec![Screen::Route]);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let router = Router::default();
        let subscriber = Arc::new(RecordingSubscriber {
            seen: Mutex::new(Vec::new()),
        });
        router.add_subscriber(subscriber.clone());
        drop(subscriber);

        router.navigate_to(LinkTarget::dashboard());
        assert!(router.subscribers.read().is_empty());
    }
}
