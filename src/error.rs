//! Error types for treeconf.

use std::path::PathBuf;

/// Result type alias for treeconf operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The key string is empty or contains an empty segment.
    #[error("invalid key path {0:?}")]
    InvalidPath(String),

    /// A segment of the key is absent from the tree.
    ///
    /// Carries the full key as the caller passed it.
    #[error("key {0:?} not found")]
    KeyNotFound(String),

    /// The value exists but cannot be converted to the requested type.
    #[error("value for the key {key:?} is not a {expected}")]
    WrongType {
        /// The key that was looked up
        key: String,
        /// Name of the requested type
        expected: &'static str,
    },

    /// The document codec rejected its input.
    #[error("failed to decode configuration from {origin}: {message}")]
    Decode {
        /// Where the bytes came from (a file path, or `<bytes>`)
        origin: String,
        /// The codec's error message
        message: String,
    },

    /// The document codec could not serialize the tree.
    #[error("failed to encode configuration as {format}: {message}")]
    Encode {
        /// Name of the target format
        format: &'static str,
        /// The codec's error message
        message: String,
    },

    /// Reading or writing a configuration file failed.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// The file being accessed
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// A configuration check failed.
    #[error("Config Error: {0}")]
    Check(String),

    /// File watching failed to initialize.
    #[error("File watching error: {0}")]
    WatchError(String),

    /// Attempted to use a feature that is not enabled.
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(&'static str),
}

impl ConfigError {
    pub(crate) fn wrong_type(key: &str, expected: &'static str) -> Self {
        Self::WrongType {
            key: key.to_string(),
            expected,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error reports a missing key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ConfigError::KeyNotFound("database:hhh".to_string());
        assert_eq!(err.to_string(), r#"key "database:hhh" not found"#);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_wrong_type_message() {
        let err = ConfigError::wrong_type("fakebool", "boolean");
        assert_eq!(
            err.to_string(),
            r#"value for the key "fakebool" is not a boolean"#
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_io_message_includes_path() {
        let err = ConfigError::io(
            "/etc/app.yaml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/etc/app.yaml"));
        assert!(msg.contains("no such file"));
    }
}
