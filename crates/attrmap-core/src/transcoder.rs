//! A reusable, configured encoder/decoder pair.

use crate::config::TranscoderConfig;
use crate::decoder::decode_with;
use crate::encoder::encode_with;
use crate::error::Result;
use crate::types::AttributeMap;
use serde_json::Value;

/// Encodes and decodes with one configuration, fixed at construction.
///
/// Holds no mutable state, so a single instance can be shared across threads.
///
/// ```
/// use attrmap_core::{SetRepresentation, Transcoder, TranscoderConfig};
/// use serde_json::json;
///
/// let transcoder = Transcoder::new(
///     TranscoderConfig::default().with_set_representation(SetRepresentation::Plain),
/// );
/// let item = transcoder.encode(&json!({"ids": [3, 1, 2]})).unwrap();
/// let document = transcoder.decode(&item).unwrap();
/// assert_eq!(document, json!({"ids": [1, 2, 3]}));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Transcoder {
    config: TranscoderConfig,
}

impl Transcoder {
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranscoderConfig {
        &self.config
    }

    /// Document → attribute map. See [`crate::encoder`].
    pub fn encode(&self, document: &Value) -> Result<AttributeMap> {
        encode_with(document, &self.config)
    }

    /// Attribute map → document. See [`crate::decoder`].
    pub fn decode(&self, item: &AttributeMap) -> Result<Value> {
        decode_with(item, &self.config)
    }
}
