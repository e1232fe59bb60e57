//! YAML codec backed by `serde_yaml`.

use super::{DocumentCodec, into_root};
use crate::core::{Mapping, Value};
use crate::error::{ConfigError, Result};

/// YAML document codec. The default codec of a [`Store`](crate::core::Store).
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl DocumentCodec for YamlCodec {
    fn decode(&self, bytes: &[u8], origin: &str) -> Result<Mapping> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Mapping::new());
        }
        let value: Value = serde_yaml::from_slice(bytes).map_err(|e| ConfigError::Decode {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        into_root(value, origin)
    }

    fn encode(&self, tree: &Mapping) -> Result<Vec<u8>> {
        serde_yaml::to_string(tree)
            .map(String::into_bytes)
            .map_err(|e| ConfigError::Encode {
                format: self.name(),
                message: e.to_string(),
            })
    }

    fn name(&self) -> &'static str {
        "yaml"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"
database:
  host: 127.0.0.1
  port: 8080
xpto: ble
istrue: false
names:
  - Mary
  - John
multiple-types:
  - Mary
  - 50
  - 5.3
  - true
"#;

    #[test]
    fn test_decode_nested_document() {
        let tree = YamlCodec.decode(DOCUMENT.as_bytes(), "<test>").unwrap();
        let db = tree["database"].as_mapping().unwrap();
        assert_eq!(db["host"], Value::from("127.0.0.1"));
        assert_eq!(db["port"], Value::from(8080));
        assert_eq!(tree["istrue"], Value::from(false));
        assert_eq!(
            tree["multiple-types"],
            Value::Sequence(vec![
                Value::from("Mary"),
                Value::from(50),
                Value::from(5.3),
                Value::from(true),
            ])
        );
    }

    #[test]
    fn test_decode_empty_document() {
        assert!(YamlCodec.decode(b"", "<test>").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_non_mapping_root() {
        let err = YamlCodec.decode(b"- a\n- b\n", "app.yaml").unwrap_err();
        match err {
            ConfigError::Decode { origin, message } => {
                assert_eq!(origin, "app.yaml");
                assert!(message.contains("list"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_ignores_tags() {
        let tree = YamlCodec
            .decode(b"a: !secret foo\nb: !port 8080\nc: !db\n  host: local\n", "<test>")
            .unwrap();
        assert_eq!(tree["a"], Value::from("foo"));
        assert_eq!(tree["b"], Value::from(8080));
        assert_eq!(tree["c"].as_mapping().unwrap()["host"], Value::from("local"));
    }

    #[test]
    fn test_decode_reports_syntax_errors() {
        let err = YamlCodec.decode(b"a: [1, 2\n", "broken.yaml").unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_encode_then_decode() {
        let tree = YamlCodec.decode(DOCUMENT.as_bytes(), "<test>").unwrap();
        let bytes = YamlCodec.encode(&tree).unwrap();
        assert_eq!(YamlCodec.decode(&bytes, "<test>").unwrap(), tree);
    }
}
