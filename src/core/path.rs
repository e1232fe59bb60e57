//! Colon-delimited key paths.

use crate::error::{ConfigError, Result};
use std::fmt;

/// Separator between key segments.
pub const SEPARATOR: char = ':';

/// A parsed configuration key such as `database:host`.
///
/// There is no escaping: a literal `:` cannot appear inside a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    raw: String,
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse a key string into its segments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] for an empty key or a key with an
    /// empty segment (`"a::b"`, `":a"`, `"a:"`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treeconf::core::KeyPath;
    ///
    /// let path = KeyPath::parse("database:host").unwrap();
    /// assert_eq!(path.segments(), ["database", "host"]);
    /// assert!(KeyPath::parse("database::host").is_err());
    /// ```
    pub fn parse(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Err(ConfigError::InvalidPath(key.to_string()));
        }

        let segments: Vec<String> = key.split(SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(ConfigError::InvalidPath(key.to_string()));
        }

        Ok(Self {
            raw: key.to_string(),
            segments,
        })
    }

    /// The key as originally written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// All segments, outermost first. Never empty.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The parent segments and the final segment.
    pub fn split_last(&self) -> (&[String], &str) {
        // parse() guarantees at least one segment
        let (last, parents) = self
            .segments
            .split_last()
            .map(|(last, parents)| (last.as_str(), parents))
            .unwrap_or(("", &[]));
        (parents, last)
    }

    pub(crate) fn not_found(&self) -> ConfigError {
        ConfigError::KeyNotFound(self.raw.clone())
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
