//! TOML codec backed by the `toml` crate.

use super::{DocumentCodec, into_root};
use crate::core::{Mapping, Value};
use crate::error::{ConfigError, Result};

/// TOML document codec.
///
/// TOML has no null, so trees containing [`Value::Null`] fail to encode.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCodec;

impl DocumentCodec for TomlCodec {
    fn decode(&self, bytes: &[u8], origin: &str) -> Result<Mapping> {
        let decode_error = |message: String| ConfigError::Decode {
            origin: origin.to_string(),
            message,
        };
        let text = std::str::from_utf8(bytes).map_err(|e| decode_error(e.to_string()))?;
        let value: Value = toml::from_str(text).map_err(|e| decode_error(e.to_string()))?;
        into_root(value, origin)
    }

    fn encode(&self, tree: &Mapping) -> Result<Vec<u8>> {
        toml::to_string(tree)
            .map(String::into_bytes)
            .map_err(|e| ConfigError::Encode {
                format: self.name(),
                message: e.to_string(),
            })
    }

    fn name(&self) -> &'static str {
        "toml"
    }
}
