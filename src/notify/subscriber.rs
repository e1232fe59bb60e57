//! Subscriber-based notifications for reload outcomes.

use crate::error::ConfigError;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;

/// Outcome of one hot-reload attempt.
#[derive(Debug, Clone)]
pub enum ReloadEvent {
    /// The file changed and its new content replaced the tree.
    Reloaded {
        /// The watched file
        path: PathBuf,
    },
    /// The file changed but could not be read or decoded; the previous tree
    /// stays in effect.
    Failed {
        /// The watched file
        path: PathBuf,
        /// Why the reload was skipped
        error: Arc<ConfigError>,
    },
}

impl ReloadEvent {
    /// The file this event is about.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Reloaded { path } | Self::Failed { path, .. } => path,
        }
    }

    /// Whether the reload was applied.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Reloaded { .. })
    }
}

type Callback = Arc<dyn Fn(&ReloadEvent) + Send + Sync>;

/// Internal subscriber registry state.
struct SubscriberRegistryInner {
    subscribers: Vec<(usize, Callback)>,
    next_id: usize,
}

/// Handle for a subscription that can be dropped to unsubscribe.
///
/// When the handle is dropped, the subscription is removed immediately.
pub struct SubscriptionHandle {
    id: usize,
    registry: Arc<RwLock<SubscriberRegistryInner>>,
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        let mut inner = self.registry.write();
        inner.subscribers.retain(|(sub_id, _)| *sub_id != self.id);
    }
}

/// Registry of callbacks invoked after every reload attempt.
///
/// # Examples
///
/// ```rust
/// use treeconf::notify::{ReloadEvent, SubscriberRegistry};
///
/// let registry = SubscriberRegistry::new();
/// let handle = registry.subscribe(|event: &ReloadEvent| {
///     println!("reload of {} applied: {}", event.path().display(), event.is_success());
/// });
/// assert_eq!(registry.subscriber_count(), 1);
///
/// drop(handle);
/// assert_eq!(registry.subscriber_count(), 0);
/// ```
#[derive(Clone)]
pub struct SubscriberRegistry {
    inner: Arc<RwLock<SubscriberRegistryInner>>,
}

impl SubscriberRegistry {
    /// Create a new subscriber registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SubscriberRegistryInner {
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Register a callback. Returns a handle that can be dropped to
    /// unsubscribe.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&ReloadEvent) + Send + Sync + 'static,
    {
        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, Arc::new(callback)));

        SubscriptionHandle {
            id,
            registry: Arc::clone(&self.inner),
        }
    }

    /// Call every subscriber, in subscription order.
    ///
    /// The registry is not locked while callbacks run, so a callback may
    /// subscribe or drop a handle. Such changes apply from the next event.
    pub fn notify_all(&self, event: &ReloadEvent) {
        let callbacks: Vec<Callback> = self
            .inner
            .read()
            .subscribers
            .iter()
            .map(|(_id, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.read().subscribers.len()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn reloaded() -> ReloadEvent {
        ReloadEvent::Reloaded {
            path: PathBuf::from("config.yaml"),
        }
    }

    #[test]
    fn test_subscribe_and_notify() {
        let registry = SubscriberRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let counter_clone = Arc::clone(&counter);
        let _handle = registry.subscribe(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.notify_all(&reloaded());
        registry.notify_all(&reloaded());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe_on_drop() {
        let registry = SubscriberRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let counter_clone = Arc::clone(&counter);
        let handle = registry.subscribe(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        registry.notify_all(&reloaded());
        drop(handle);
        registry.notify_all(&reloaded());

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[test]
    fn test_failed_event_carries_error() {
        let registry = SubscriberRegistry::new();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        let _handle = registry.subscribe(move |event| {
            seen_clone.lock().push(event.clone());
        });

        registry.notify_all(&ReloadEvent::Failed {
            path: PathBuf::from("config.yaml"),
            error: Arc::new(ConfigError::Decode {
                origin: "config.yaml".to_string(),
                message: "bad indent".to_string(),
            }),
        });

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].is_success());
        assert_eq!(seen[0].path(), &PathBuf::from("config.yaml"));
    }

    #[test]
    fn test_callback_can_change_subscriptions() {
        let registry = SubscriberRegistry::new();
        let handles = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let calls = Arc::new(AtomicUsize::new(0));

        // Each call adds a subscriber and drops the handle of the previous one.
        let registry_clone = registry.clone();
        let handles_clone = Arc::clone(&handles);
        let calls_clone = Arc::clone(&calls);
        let _handle = registry.subscribe(move |_| {
            let calls = Arc::clone(&calls_clone);
            let handle = registry_clone.subscribe(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            });
            let mut handles = handles_clone.lock();
            handles.clear();
            handles.push(handle);
        });

        registry.notify_all(&reloaded());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(registry.subscriber_count(), 2);

        registry.notify_all(&reloaded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.subscriber_count(), 2);
    }

    #[test]
    fn test_clone_shares_subscribers() {
        let registry = SubscriberRegistry::new();
        let registry2 = registry.clone();
        let _handle = registry.subscribe(|_| {});
        assert_eq!(registry2.subscriber_count(), 1);
    }
}
