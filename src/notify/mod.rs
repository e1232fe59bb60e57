//! Hot-reload support.
//!
//! Provides file watching and subscriber-based notifications when the
//! configuration is reloaded.

pub mod subscriber;

#[cfg(feature = "file-watch")]
pub mod watcher;

pub use subscriber::{ReloadEvent, SubscriberRegistry, SubscriptionHandle};

#[cfg(feature = "file-watch")]
pub use watcher::WatchHandle;
