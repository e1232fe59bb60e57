//! JSON codec backed by `serde_json`.

use super::{DocumentCodec, into_root};
use crate::core::{Mapping, Value};
use crate::error::{ConfigError, Result};

/// JSON document codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl DocumentCodec for JsonCodec {
    fn decode(&self, bytes: &[u8], origin: &str) -> Result<Mapping> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| ConfigError::Decode {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        into_root(value, origin)
    }

    fn encode(&self, tree: &Mapping) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(tree).map_err(|e| ConfigError::Encode {
            format: self.name(),
            message: e.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
