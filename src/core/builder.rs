//! Builder for constructing Store instances.

use crate::codec::{DocumentCodec, Format, YamlCodec};
use crate::core::Store;
use crate::error::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Builder for constructing a [`Store`].
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use treeconf::prelude::*;
///
/// let store = Store::builder()
///     .with_env_expansion(true)
///     .with_poll_interval(Duration::from_millis(250))
///     .build();
/// assert_eq!(store.poll_interval(), Duration::from_millis(250));
/// ```
pub struct StoreBuilder {
    codec: Arc<dyn DocumentCodec>,
    expand_env: bool,
    poll_interval: Duration,
}

impl StoreBuilder {
    /// Create a new builder with default settings: YAML, no environment
    /// expansion, one second poll interval.
    pub fn new() -> Self {
        Self {
            codec: Arc::new(YamlCodec),
            expand_env: false,
            poll_interval: Store::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Use a specific document codec.
    pub fn with_codec<C: DocumentCodec + 'static>(mut self, codec: C) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// Use the codec matching a file's extension.
    ///
    /// # Errors
    ///
    /// Fails for unknown extensions and for formats whose cargo feature is
    /// disabled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treeconf::prelude::*;
    ///
    /// # fn example() -> Result<()> {
    /// let store = Store::builder().with_format_of("config/app.yml")?.build();
    /// assert_eq!(store.codec().name(), "yaml");
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    pub fn with_format_of(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.codec = Format::from_path(path)?.codec()?;
        Ok(self)
    }

    /// Expand `$VAR` / `${VAR}` in decoded string values.
    ///
    /// Applies to every load, merge and hot-reload. Unset variables expand to
    /// the empty string.
    pub fn with_env_expansion(mut self, enabled: bool) -> Self {
        self.expand_env = enabled;
        self
    }

    /// Interval between two checks of a watched file.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Build an empty store.
    pub fn build(self) -> Store {
        Store::from_parts(self.codec, self.expand_env, self.poll_interval)
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
