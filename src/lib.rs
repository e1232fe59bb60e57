//! # treeconf
//!
//! A hierarchical configuration store with colon-delimited key paths,
//! right-biased merging and hot-reload of a backing file.
//!
//! ## Overview
//!
//! `treeconf` decodes a structured document (YAML by default) into a tree of
//! mappings, sequences and scalars, and gives access to it by paths such as
//! `database:host`:
//! - Typed getters that fail with the key and the expected type
//! - `set` creates intermediate mappings, `unset` removes whole subtrees
//! - Deep merge of two trees, the right-hand side winning
//! - Polling file watcher that swaps the tree atomically on change
//!
//! ## Quick Start
//!
//! ```rust
//! use treeconf::prelude::*;
//!
//! # fn example() -> Result<()> {
//! let store = Store::new();
//! store.load(b"database:\n  host: 127.0.0.1\n  port: 8080\n")?;
//!
//! assert_eq!(store.get_string("database:host")?, "127.0.0.1");
//! assert_eq!(store.get_int("database:port")?, 8080);
//!
//! store.set("database:user", "root")?;
//! store.unset("database:host")?;
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Hot reload
//!
//! ```rust,no_run
//! use treeconf::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let store = Store::new();
//! let watch = store.load_and_watch("config/app.yaml").await?;
//!
//! // Every clone of the store sees reloads.
//! let reader = store.clone();
//! println!("port: {}", reader.get_int("server:port")?);
//!
//! watch.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `file-watch` (default): [`Store::load_and_watch`](core::Store::load_and_watch), requires tokio
//! - `json`, `toml`: additional document codecs

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod codec;
pub mod core;
pub mod error;
pub mod notify;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{Mapping, Store, StoreBuilder, Value};
    pub use crate::error::{ConfigError, Result};
    pub use crate::notify::ReloadEvent;

    #[cfg(feature = "file-watch")]
    pub use crate::notify::WatchHandle;
}
