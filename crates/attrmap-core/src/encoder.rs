//! Encoder — converts a JSON document into a store attribute map.
//!
//! The walk is a straight match over `serde_json::Value`:
//!
//! - **Objects** become `M`, unless they are exactly one of the four escape-hatch
//!   sentinels, which become `B`, `BS`, `NS` or `SS` instead
//! - **Null properties** are dropped; the store never holds an explicit null entry
//! - **Arrays** become `NS`/`SS`/`BS` when every element encodes to the same scalar kind
//!   (number, string or binary), and `L` otherwise (empty, mixed, or nested containers)
//! - **Numbers** keep their source text
//!
//! # Example
//! ```
//! use attrmap_core::{encode, AttributeValue};
//! use serde_json::json;
//!
//! let item = encode(&json!({"name": "Alice", "tags": ["a", "b"], "gone": null})).unwrap();
//! assert_eq!(item["name"], AttributeValue::String("Alice".into()));
//! assert!(matches!(item["tags"], AttributeValue::StringSet(_)));
//! assert!(!item.contains_key("gone"));
//! ```

use crate::config::{NullPolicy, TranscoderConfig};
use crate::error::{Result, TranscodeError};
use crate::scalar::number_text;
use crate::tagger::{BlobSetTagger, BlobTagger, NumberSetTagger, StringSetTagger, Tagger};
use crate::types::{AttributeMap, AttributeValue};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Encode a document with the default configuration.
///
/// Fails with [`TranscodeError::InvalidShape`] unless `root` is an object.
pub fn encode(root: &Value) -> Result<AttributeMap> {
    encode_with(root, &TranscoderConfig::default())
}

/// Parse a JSON string and encode it with the default configuration.
pub fn encode_json(json: &str) -> Result<AttributeMap> {
    let value: Value = serde_json::from_str(json)?;
    encode(&value)
}

/// Encode a document with an explicit configuration.
pub fn encode_with(root: &Value, config: &TranscoderConfig) -> Result<AttributeMap> {
    let Value::Object(map) = root else {
        return Err(TranscodeError::InvalidShape(format!(
            "the root of an item must be an object, found {}",
            node_kind(root)
        )));
    };
    let encoder = Encoder { config };
    encoder.check_depth(1)?;
    let item = encoder.encode_properties(map, 1, true)?;
    debug!(attributes = item.len(), "encoded document");
    Ok(item)
}

struct Encoder<'a> {
    config: &'a TranscoderConfig,
}

impl Encoder<'_> {
    /// Encode one node. `depth` counts the containers enclosing it.
    fn encode_value(&self, value: &Value, depth: usize) -> Result<AttributeValue> {
        match value {
            Value::Null => Ok(AttributeValue::Null),
            Value::Bool(b) => Ok(AttributeValue::Bool(*b)),
            Value::Number(n) => Ok(AttributeValue::Number(number_text(n))),
            Value::String(s) => Ok(AttributeValue::String(s.clone())),
            Value::Array(items) => {
                self.check_depth(depth + 1)?;
                self.encode_array(items, depth + 1)
            }
            Value::Object(map) => {
                self.check_depth(depth + 1)?;
                self.encode_object(map, depth + 1)
            }
        }
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(TranscodeError::NestingTooDeep {
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }

    /// Encode an object's properties, skipping those that encode to `Null` when
    /// `drop_nulls` is set.
    fn encode_properties(
        &self,
        map: &Map<String, Value>,
        depth: usize,
        drop_nulls: bool,
    ) -> Result<AttributeMap> {
        let mut item = AttributeMap::new();
        for (key, value) in map {
            let attribute = self.encode_value(value, depth)?;
            if drop_nulls && attribute.is_null() {
                continue;
            }
            item.insert(key.clone(), attribute);
        }
        Ok(item)
    }

    fn encode_object(&self, map: &Map<String, Value>, depth: usize) -> Result<AttributeValue> {
        if let Some(native) = unwrap_sentinel(map)? {
            return Ok(native);
        }
        let drop_nulls = self.config.null_policy == NullPolicy::Recursive;
        let nested = self.encode_properties(map, depth, drop_nulls)?;
        Ok(AttributeValue::Map(nested))
    }

    fn encode_array(&self, items: &[Value], depth: usize) -> Result<AttributeValue> {
        let mut values = Vec::with_capacity(items.len());
        let mut elements = ElementKinds::Empty;
        for item in items {
            let value = self.encode_value(item, depth)?;
            elements = elements.observe(&value);
            values.push(value);
        }

        let inferred = match elements {
            ElementKinds::Numbers => AttributeValue::NumberSet(
                values
                    .into_iter()
                    .filter_map(|value| match value {
                        AttributeValue::Number(text) => Some(text),
                        _ => None,
                    })
                    .collect(),
            ),
            ElementKinds::Strings => AttributeValue::StringSet(
                values
                    .into_iter()
                    .filter_map(|value| match value {
                        AttributeValue::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            ElementKinds::Binaries => AttributeValue::BinarySet(
                values
                    .into_iter()
                    .filter_map(|value| match value {
                        AttributeValue::Binary(bytes) => Some(bytes),
                        _ => None,
                    })
                    .collect(),
            ),
            ElementKinds::Empty | ElementKinds::Mixed => AttributeValue::List(values),
        };
        if !matches!(inferred, AttributeValue::List(_)) {
            trace!(kind = %inferred.kind(), len = items.len(), "inferred set from array");
        }
        Ok(inferred)
    }
}

/// Element kinds seen so far while walking an array.
///
/// A set is only inferred when every element is the same settable scalar; one differing
/// element, or any element that is not a number, string or binary, makes the whole array
/// a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKinds {
    Empty,
    Numbers,
    Strings,
    Binaries,
    Mixed,
}

impl ElementKinds {
    fn observe(self, value: &AttributeValue) -> ElementKinds {
        let kind = match value {
            AttributeValue::Number(_) => ElementKinds::Numbers,
            AttributeValue::String(_) => ElementKinds::Strings,
            AttributeValue::Binary(_) => ElementKinds::Binaries,
            AttributeValue::Null
            | AttributeValue::Bool(_)
            | AttributeValue::List(_)
            | AttributeValue::Map(_)
            | AttributeValue::NumberSet(_)
            | AttributeValue::StringSet(_)
            | AttributeValue::BinarySet(_) => ElementKinds::Mixed,
        };
        match self {
            ElementKinds::Empty => kind,
            seen if seen == kind => seen,
            _ => ElementKinds::Mixed,
        }
    }
}

/// Turn a sentinel object back into its native attribute.
///
/// The four keys are distinct, so at most one tagger can match. A sentinel carrying an
/// empty set becomes `Null`: the store cannot hold an empty set, so the attribute is
/// omitted.
fn unwrap_sentinel(map: &Map<String, Value>) -> Result<Option<AttributeValue>> {
    if map.len() != 1 {
        return Ok(None);
    }
    if let Some(bytes) = BlobTagger::try_unwrap(map)? {
        return Ok(Some(AttributeValue::Binary(bytes)));
    }
    if let Some(set) = BlobSetTagger::try_unwrap(map)? {
        return Ok(Some(non_empty_set(set, AttributeValue::BinarySet)));
    }
    if let Some(set) = NumberSetTagger::try_unwrap(map)? {
        return Ok(Some(non_empty_set(set, AttributeValue::NumberSet)));
    }
    if let Some(set) = StringSetTagger::try_unwrap(map)? {
        return Ok(Some(non_empty_set(set, AttributeValue::StringSet)));
    }
    Ok(None)
}

fn non_empty_set<T>(
    set: BTreeSet<T>,
    variant: fn(BTreeSet<T>) -> AttributeValue,
) -> AttributeValue {
    if set.is_empty() {
        AttributeValue::Null
    } else {
        variant(set)
    }
}

fn node_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
