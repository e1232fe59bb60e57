//! The shared configuration store.

use crate::codec::{DocumentCodec, expand_tree};
use crate::core::coerce;
use crate::core::path::KeyPath;
use crate::core::tree;
use crate::core::value::{Mapping, Value};
use crate::core::StoreBuilder;
use crate::error::{ConfigError, Result};
use crate::notify::{ReloadEvent, SubscriberRegistry, SubscriptionHandle};
#[cfg(feature = "file-watch")]
use crate::notify::{WatchHandle, watcher};
use parking_lot::RwLock;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Origin used in decode errors for in-memory documents.
const BYTES_ORIGIN: &str = "<bytes>";

/// A hierarchical configuration store addressed by colon-delimited keys.
///
/// The store holds one tree behind a single read/write lock. Cloning is
/// cheap and every clone shares the same tree, so a store can be handed to
/// any number of threads or tasks. Decoding and encoding happen outside the
/// lock; readers always receive owned copies.
///
/// # Examples
///
/// ```rust
/// use treeconf::prelude::*;
///
/// # fn example() -> Result<()> {
/// let store = Store::new();
/// store.load(b"a:\n  b: 1\n  c: 2\n")?;
/// assert_eq!(store.get_int("a:b")?, 1);
///
/// store.set("a:b", 9)?;
/// assert_eq!(store.get("a:b")?, Value::from(9));
/// assert_eq!(store.get_int("a:c")?, 2);
///
/// store.unset("a")?;
/// assert!(store.get("a:b").unwrap_err().is_not_found());
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Clone)]
pub struct Store {
    /// The current tree; `None` until something is loaded or set
    tree: Arc<RwLock<Option<Mapping>>>,
    /// Codec used by every load and save
    codec: Arc<dyn DocumentCodec>,
    /// Expand `$VAR` references in decoded strings
    expand_env: bool,
    /// How often a watched file is checked
    poll_interval: Duration,
    /// Reload event subscribers
    subscribers: SubscriberRegistry,
}

impl Store {
    /// Default interval between two checks of a watched file.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

    /// Create an empty store using the YAML codec.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new builder for constructing a store.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    pub(crate) fn from_parts(
        codec: Arc<dyn DocumentCodec>,
        expand_env: bool,
        poll_interval: Duration,
    ) -> Self {
        Self {
            tree: Arc::new(RwLock::new(None)),
            codec,
            expand_env,
            poll_interval,
            subscribers: SubscriberRegistry::new(),
        }
    }

    /// The codec this store decodes and encodes with.
    pub fn codec(&self) -> &dyn DocumentCodec {
        self.codec.as_ref()
    }

    /// Interval between two checks of a watched file.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Decode a document and replace the whole tree with it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Decode`] if the codec rejects the bytes; the
    /// current tree is kept.
    pub fn load(&self, bytes: &[u8]) -> Result<()> {
        let tree = self.decode(bytes, BYTES_ORIGIN)?;
        self.replace(tree);
        Ok(())
    }

    /// Read a file and replace the whole tree with its content.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Decode`] if it cannot be decoded.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| ConfigError::io(path, e))?;
        let tree = self.decode(&bytes, &path.display().to_string())?;
        self.replace(tree);
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(())
    }

    /// Load a file, then keep watching it for changes in the background.
    ///
    /// The initial load behaves like [`load_file`](Self::load_file), so a
    /// bad file is reported right away. After that the file is polled every
    /// [`poll_interval`](Self::poll_interval); see [`WatchHandle`] for how
    /// changes and failures are handled. Must be called within a tokio
    /// runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WatchError`] outside a tokio runtime, and
    /// [`ConfigError::Io`] or [`ConfigError::Decode`] from the initial load;
    /// no watch is started in either case.
    #[cfg(feature = "file-watch")]
    pub async fn load_and_watch(&self, path: impl AsRef<Path>) -> Result<WatchHandle> {
        tokio::runtime::Handle::try_current()
            .map_err(|e| ConfigError::WatchError(e.to_string()))?;
        let path = path.as_ref().to_path_buf();
        // Read the timestamp first so a write racing the initial read is
        // picked up by the first poll.
        let last_modified = watcher::modified(&path).await?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| ConfigError::io(&path, e))?;
        let tree = self.decode(&bytes, &path.display().to_string())?;
        self.replace(tree);

        Ok(WatchHandle::spawn(self.clone(), path, last_modified))
    }

    /// Decode a document and merge it over the current tree.
    ///
    /// Values from the document win; see [`merge`](crate::core::merge).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Decode`] if the codec rejects the bytes.
    pub fn merge_bytes(&self, bytes: &[u8]) -> Result<()> {
        let overlay = self.decode(bytes, BYTES_ORIGIN)?;
        self.merge_tree(overlay);
        Ok(())
    }

    /// Read a file and merge it over the current tree.
    ///
    /// # Errors
    ///
    /// Same as [`load_file`](Self::load_file).
    pub fn merge_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| ConfigError::io(path, e))?;
        let overlay = self.decode(&bytes, &path.display().to_string())?;
        self.merge_tree(overlay);
        tracing::debug!(path = %path.display(), "configuration merged");
        Ok(())
    }

    /// Encode the current tree and write it to `path`.
    ///
    /// An existing file is truncated. A new file is created with the Unix
    /// permission bits `mode` (ignored on other platforms). Saving an empty
    /// store writes an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Encode`] or [`ConfigError::Io`].
    pub fn save(&self, path: impl AsRef<Path>, mode: u32) -> Result<()> {
        let path = path.as_ref();
        let snapshot = self.snapshot().unwrap_or_default();
        let bytes = self.codec.encode(&snapshot)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;

        let mut file = options.open(path).map_err(|e| ConfigError::io(path, e))?;
        file.write_all(&bytes)
            .and_then(|()| file.flush())
            .map_err(|e| ConfigError::io(path, e))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "configuration saved");
        Ok(())
    }

    /// Get a copy of the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] for a malformed key and
    /// [`ConfigError::KeyNotFound`] if any segment is missing.
    pub fn get(&self, key: &str) -> Result<Value> {
        let path = KeyPath::parse(key)?;
        let guard = self.tree.read();
        let root = guard.as_ref().ok_or_else(|| path.not_found())?;
        tree::lookup(root, &path).cloned()
    }

    /// Get a string value. Other types are not converted.
    pub fn get_string(&self, key: &str) -> Result<String> {
        coerce::string(key, self.get(key)?)
    }

    /// Get an integer value.
    pub fn get_int(&self, key: &str) -> Result<i64> {
        coerce::int(key, self.get(key)?)
    }

    /// Get a non-negative integer value.
    pub fn get_uint(&self, key: &str) -> Result<u64> {
        coerce::uint(key, self.get(key)?)
    }

    /// Get a numeric value as a float.
    pub fn get_float(&self, key: &str) -> Result<f64> {
        coerce::float(key, self.get(key)?)
    }

    /// Get a boolean value. Strings such as `"true"` are not converted.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        coerce::bool(key, self.get(key)?)
    }

    /// Get a duration; see [`coerce::duration`] for the accepted forms.
    pub fn get_duration(&self, key: &str) -> Result<Duration> {
        coerce::duration(key, self.get(key)?)
    }

    /// Get a sequence with every element converted to text.
    pub fn get_list(&self, key: &str) -> Result<Vec<String>> {
        coerce::list(key, self.get(key)?)
    }

    /// Store `value` under `key`, creating intermediate mappings.
    ///
    /// Any non-mapping value on the way to `key` is replaced by a mapping.
    ///
    /// # Errors
    ///
    /// Only fails with [`ConfigError::InvalidPath`] for a malformed key.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        let path = KeyPath::parse(key)?;
        let value = value.into();
        let mut guard = self.tree.write();
        tree::upsert(guard.get_or_insert_with(Mapping::new), &path, value);
        Ok(())
    }

    /// Remove the value stored under `key`, including any subtree.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KeyNotFound`] if the key is absent; nothing is
    /// changed in that case.
    pub fn unset(&self, key: &str) -> Result<()> {
        let path = KeyPath::parse(key)?;
        let mut guard = self.tree.write();
        let root = guard.as_mut().ok_or_else(|| path.not_found())?;
        tree::delete(root, &path)?;
        Ok(())
    }

    /// Drop the whole tree, returning to the "nothing loaded" state.
    pub fn reset(&self) {
        *self.tree.write() = None;
    }

    /// Whether a tree is currently held.
    pub fn is_loaded(&self) -> bool {
        self.tree.read().is_some()
    }

    /// An owned copy of the whole tree.
    pub fn snapshot(&self) -> Option<Mapping> {
        self.tree.read().clone()
    }

    /// Register a callback for hot-reload outcomes.
    ///
    /// Dropping the returned handle unsubscribes.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&ReloadEvent) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub(crate) fn subscribers(&self) -> &SubscriberRegistry {
        &self.subscribers
    }

    /// Decode with this store's codec, then expand environment references.
    pub(crate) fn decode(&self, bytes: &[u8], origin: &str) -> Result<Mapping> {
        let mut tree = self.codec.decode(bytes, origin)?;
        if self.expand_env {
            expand_tree(&mut tree);
        }
        Ok(tree)
    }

    pub(crate) fn replace(&self, tree: Mapping) {
        *self.tree.write() = Some(tree);
    }

    fn merge_tree(&self, overlay: Mapping) {
        let mut guard = self.tree.write();
        let merged = match guard.as_ref() {
            Some(current) => tree::merge(current, &overlay),
            None => overlay,
        };
        *guard = Some(merged);
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("codec", &self.codec.name())
            .field("loaded", &self.is_loaded())
            .field("expand_env", &self.expand_env)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}
