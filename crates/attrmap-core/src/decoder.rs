//! Decoder — converts a store attribute map back into a JSON document.
//!
//! Scalars, lists and maps have direct JSON counterparts. Binary values and sets do not,
//! so the decoder wraps them in the escape-hatch sentinels the encoder recognizes (see
//! [`crate::tagger`]). That keeps `encode(decode(item)) == item` for every item the
//! store can hold.
//!
//! Variants are matched cheapest first; the order is not observable because the enum
//! is closed and each value has exactly one variant.

use crate::config::{SetRepresentation, TranscoderConfig};
use crate::error::{Result, TranscodeError};
use crate::scalar::parse_number_text;
use crate::tagger::{BlobSetTagger, BlobTagger, NumberSetTagger, StringSetTagger, Tagger};
use crate::types::{AttributeMap, AttributeValue};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Decode an attribute map with the default configuration.
pub fn decode(item: &AttributeMap) -> Result<Value> {
    decode_with(item, &TranscoderConfig::default())
}

/// Decode an attribute map into a compact JSON string.
pub fn decode_json(item: &AttributeMap) -> Result<String> {
    let value = decode(item)?;
    Ok(serde_json::to_string(&value)?)
}

/// Decode an attribute map with an explicit configuration. Always returns an object.
pub fn decode_with(item: &AttributeMap, config: &TranscoderConfig) -> Result<Value> {
    let decoder = Decoder { config };
    let document = decoder.decode_map(item, 1)?;
    debug!(attributes = item.len(), "decoded item");
    Ok(document)
}

struct Decoder<'a> {
    config: &'a TranscoderConfig,
}

impl Decoder<'_> {
    fn decode_map(&self, item: &AttributeMap, depth: usize) -> Result<Value> {
        self.check_depth(depth)?;
        let mut object = Map::with_capacity(item.len());
        for (name, attribute) in item {
            object.insert(name.clone(), self.decode_value(attribute, depth)?);
        }
        Ok(Value::Object(object))
    }

    fn decode_list(&self, items: &[AttributeValue], depth: usize) -> Result<Value> {
        self.check_depth(depth)?;
        let values = items
            .iter()
            .map(|item| self.decode_value(item, depth))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Array(values))
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(TranscodeError::NestingTooDeep {
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }

    /// Decode one attribute found inside a container at `depth`.
    fn decode_value(&self, attribute: &AttributeValue, depth: usize) -> Result<Value> {
        match attribute {
            AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
            AttributeValue::Null => Ok(Value::Null),
            AttributeValue::Number(text) => Ok(Value::Number(parse_number_text(text)?)),
            AttributeValue::String(s) => Ok(Value::String(s.clone())),
            AttributeValue::Map(item) => self.decode_map(item, depth + 1),
            AttributeValue::List(items) => self.decode_list(items, depth + 1),
            AttributeValue::Binary(bytes) => Ok(BlobTagger::wrap_bytes(bytes)),
            AttributeValue::BinarySet(set) => self.decode_set::<BlobSetTagger, _>(set, |set| {
                Ok(set.iter().map(|bytes| BlobTagger::wrap_bytes(bytes)).collect())
            }),
            AttributeValue::StringSet(set) => self.decode_set::<StringSetTagger, _>(set, |set| {
                Ok(set.iter().cloned().map(Value::String).collect())
            }),
            AttributeValue::NumberSet(set) => self.decode_set::<NumberSetTagger, _>(set, |set| {
                set.iter()
                    .map(|text| parse_number_text(text).map(Value::Number))
                    .collect()
            }),
        }
    }

    /// Decode a set through tagger `T`, or as a plain array built by `plain`.
    ///
    /// An empty set cannot come from the store; if one shows up anyway it decodes to an
    /// empty array rather than failing.
    fn decode_set<T, M>(
        &self,
        set: &BTreeSet<M>,
        plain: impl FnOnce(&BTreeSet<M>) -> Result<Vec<Value>>,
    ) -> Result<Value>
    where
        T: Tagger<Payload = BTreeSet<M>>,
    {
        if set.is_empty() {
            warn!(sentinel = T::KEY, "empty set attribute decoded as an empty array");
            return Ok(Value::Array(Vec::new()));
        }
        match self.config.set_representation {
            SetRepresentation::Tagged => T::wrap(set),
            SetRepresentation::Plain => Ok(Value::Array(plain(set)?)),
        }
    }
}
