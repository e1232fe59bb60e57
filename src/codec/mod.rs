//! Document codecs: turning bytes into a [`Mapping`] tree and back.
//!
//! YAML is always available. JSON and TOML are enabled with the `json` and
//! `toml` cargo features.

mod document_codec;
mod env;
mod yaml;

#[cfg(feature = "json")]
mod json;

#[cfg(feature = "toml")]
mod toml;

pub use document_codec::{DocumentCodec, Format};
pub use env::{expand_env, expand_tree};
pub use yaml::YamlCodec;

#[cfg(feature = "json")]
pub use json::JsonCodec;

#[cfg(feature = "toml")]
pub use self::toml::TomlCodec;

use crate::core::{Mapping, Value};
use crate::error::{ConfigError, Result};

/// Turn a decoded document root into the tree's root mapping.
///
/// An empty document yields an empty mapping.
pub(crate) fn into_root(value: Value, origin: &str) -> Result<Mapping> {
    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(ConfigError::Decode {
            origin: origin.to_string(),
            message: format!("document root must be a mapping, found {}", other.type_name()),
        }),
    }
}
