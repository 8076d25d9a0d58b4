//! A thin representation of the writer's schema as carried in the container
//! file header.
//!
//! Schema compilation and record-level validation belong to the
//! [`RecordCodec`](crate::RecordCodec) collaborator; this type only holds the
//! JSON text recorded under the `avro.schema` metadata key.

use crate::error::{OcfErr, OcfResult};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::str::FromStr;

/// The JSON schema recorded in a container file header.
///
/// Parsing preserves the order of object keys, so the canonical text of a
/// parsed schema re-serializes byte-for-byte.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    inner: JsonValue,
}

impl Schema {
    /// Returns the canonical JSON text of this schema.
    pub fn canonical_form(&self) -> String {
        self.inner.to_string()
    }

    /// Returns the canonical JSON text of this schema as bytes, as stored
    /// under the `avro.schema` header key.
    pub fn as_bytes(&self) -> Vec<u8> {
        self.canonical_form().into_bytes()
    }

    /// Returns a reference to the underlying JSON value.
    pub fn json(&self) -> &JsonValue {
        &self.inner
    }
}

impl FromStr for Schema {
    type Err = OcfErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner: JsonValue =
            serde_json::from_str(s).map_err(|_| OcfErr::UnknownSchema)?;
        match inner {
            JsonValue::String(_) | JsonValue::Object(_) | JsonValue::Array(_) => {
                Ok(Schema { inner })
            }
            _ => Err(OcfErr::UnknownSchema),
        }
    }
}

/// Parses a schema from the raw bytes of the `avro.schema` header value.
pub(crate) fn schema_from_header_bytes(bytes: &[u8]) -> OcfResult<Schema> {
    let s = std::str::from_utf8(bytes).map_err(|_| OcfErr::HeaderDecodeFailed)?;
    Schema::from_str(s)
}

#[cfg(test)]
mod tests {
    use super::Schema;
    use std::str::FromStr;

    #[test]
    fn primitive_schema_from_str() {
        let schema = Schema::from_str(r##""null""##).unwrap();
        assert_eq!(schema.canonical_form(), r##""null""##);
    }

    #[test]
    fn record_schema_preserves_field_order() {
        let text = r#"{"type":"record","name":"R","fields":[{"name":"x","type":"long"}]}"#;
        let schema = Schema::from_str(text).unwrap();
        assert_eq!(schema.canonical_form(), text);
    }

    #[test]
    fn rejects_non_schema_json() {
        assert!(Schema::from_str("42").is_err());
        assert!(Schema::from_str("not json").is_err());
    }
}
