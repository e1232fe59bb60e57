//! Polling file watcher for automatic configuration reloads.

use crate::core::Store;
use crate::error::{ConfigError, Result};
use crate::notify::ReloadEvent;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a running watch started by
/// [`Store::load_and_watch`](crate::core::Store::load_and_watch).
///
/// The watch task checks the file's modification time every
/// [`poll_interval`](crate::core::Store::poll_interval). When it changes the
/// file is read and decoded, and the store's whole tree is replaced. A file
/// that cannot be read or decoded is skipped: the previous tree stays in
/// effect and the failure is logged and sent to subscribers.
///
/// Dropping the handle does not stop the task; it then runs for as long as
/// the runtime does. Call [`stop`](Self::stop) or [`shutdown`](Self::shutdown)
/// to end it.
pub struct WatchHandle {
    path: PathBuf,
    stop: Arc<Notify>,
    task: JoinHandle<()>,
}

impl WatchHandle {
    pub(crate) fn spawn(store: Store, path: PathBuf, last_modified: SystemTime) -> Self {
        let stop = Arc::new(Notify::new());
        tracing::info!(
            path = %path.display(),
            interval = ?store.poll_interval(),
            "watching configuration file"
        );

        let watcher = FileWatcher {
            store,
            path: path.clone(),
            last_modified,
            unreadable: false,
        };
        let task = tokio::spawn(watcher.run(Arc::clone(&stop)));

        Self { path, stop, task }
    }

    /// The watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ask the task to stop.
    ///
    /// A reload already in progress is completed and applied; no further
    /// check is started.
    pub fn stop(&self) {
        self.stop.notify_one();
    }

    /// Whether the task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the task and wait for it to end.
    pub async fn shutdown(self) {
        self.stop();
        if let Err(e) = self.task.await {
            tracing::error!(path = %self.path.display(), error = %e, "watch task failed");
        }
    }
}

/// State of one watch: the file and the modification time of the content
/// currently applied.
struct FileWatcher {
    store: Store,
    path: PathBuf,
    last_modified: SystemTime,
    /// Metadata could not be read on the previous check
    unreadable: bool,
}

impl FileWatcher {
    async fn run(mut self, stop: Arc<Notify>) {
        let mut ticker = tokio::time::interval(self.store.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = stop.notified() => break,
                _ = ticker.tick() => {}
            }
            self.poll().await;
        }

        tracing::info!(path = %self.path.display(), "stopped watching configuration file");
    }

    async fn poll(&mut self) {
        let modified = match modified(&self.path).await {
            Ok(modified) => {
                self.unreadable = false;
                modified
            }
            Err(e) => {
                // Report a vanished file once, not on every tick.
                if !self.unreadable {
                    self.unreadable = true;
                    self.report_failure(e);
                }
                return;
            }
        };

        if modified == self.last_modified {
            return;
        }
        self.last_modified = modified;

        match self.reload().await {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "configuration reloaded");
                self.store.subscribers().notify_all(&ReloadEvent::Reloaded {
                    path: self.path.clone(),
                });
            }
            Err(e) => self.report_failure(e),
        }
    }

    async fn reload(&self) -> Result<()> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| ConfigError::io(&self.path, e))?;
        let tree = self
            .store
            .decode(&bytes, &self.path.display().to_string())?;
        self.store.replace(tree);
        Ok(())
    }

    fn report_failure(&self, error: ConfigError) {
        tracing::warn!(
            path = %self.path.display(),
            error = %error,
            "configuration reload skipped, keeping previous configuration"
        );
        self.store.subscribers().notify_all(&ReloadEvent::Failed {
            path: self.path.clone(),
            error: Arc::new(error),
        });
    }
}

/// Modification time of `path`.
pub(crate) async fn modified(path: &Path) -> Result<SystemTime> {
    tokio::fs::metadata(path)
        .await
        .and_then(|metadata| metadata.modified())
        .map_err(|e| ConfigError::io(path, e))
}
