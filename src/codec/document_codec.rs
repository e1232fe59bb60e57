//! The document codec trait and format detection.

use crate::core::Mapping;
use crate::error::{ConfigError, Result};
use std::path::Path;
use std::sync::Arc;

/// Trait for document codecs.
///
/// Implement this trait to plug another document format into a
/// [`Store`](crate::core::Store).
pub trait DocumentCodec: Send + Sync {
    /// Decode a whole document into a root mapping.
    ///
    /// `origin` names where the bytes came from and is used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Decode`] if the bytes are not a valid document
    /// or the root is not a mapping.
    fn decode(&self, bytes: &[u8], origin: &str) -> Result<Mapping>;

    /// Encode a root mapping as a whole document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Encode`] if the tree cannot be represented.
    fn encode(&self, tree: &Mapping) -> Result<Vec<u8>>;

    /// Human-readable name of the format (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML (`.yaml`, `.yml`)
    Yaml,
    /// JSON (`.json`)
    Json,
    /// TOML (`.toml`)
    Toml,
}

impl Format {
    /// Detect the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Decode`] if the extension is missing or unknown.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treeconf::codec::Format;
    ///
    /// assert_eq!(Format::from_path("config/app.yml").unwrap(), Format::Yaml);
    /// assert!(Format::from_path("config.txt").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ConfigError::Decode {
                origin: path.display().to_string(),
                message: "unable to determine file format".to_string(),
            })?;

        match extension {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(ConfigError::Decode {
                origin: path.display().to_string(),
                message: format!(
                    "unsupported file extension: {extension}. Supported: .yaml, .yml, .toml, .json"
                ),
            }),
        }
    }

    /// A codec for this format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FeatureNotEnabled`] when the format's cargo
    /// feature is off.
    pub fn codec(self) -> Result<Arc<dyn DocumentCodec>> {
        match self {
            Self::Yaml => Ok(Arc::new(super::YamlCodec)),
            #[cfg(feature = "json")]
            Self::Json => Ok(Arc::new(super::JsonCodec)),
            #[cfg(not(feature = "json"))]
            Self::Json => Err(ConfigError::FeatureNotEnabled("json")),
            #[cfg(feature = "toml")]
            Self::Toml => Ok(Arc::new(super::TomlCodec)),
            #[cfg(not(feature = "toml"))]
            Self::Toml => Err(ConfigError::FeatureNotEnabled("toml")),
        }
    }
}
