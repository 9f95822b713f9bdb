//! Escape-hatch taggers for the attribute types JSON has no shape for.
//!
//! A document cannot say "these bytes are binary" or "this array is a set". The decoder
//! therefore wraps binary values and sets in a single-key object whose key is reserved
//! (a semantic prefix plus a fixed UUID suffix), and the encoder recognizes that object
//! and turns it back into the native attribute:
//!
//! ```text
//! Binary     {"MemoryStreamContent838D…": "AP8Q"}
//! BinarySet  {"HashSetMemoryStreamContent838D…": [{"MemoryStreamContent838D…": "AP8Q"}]}
//! NumberSet  {"HashSetNumberContent838D…": [1, 2.50]}
//! StringSet  {"HashSetStringContent838D…": ["a", "b"]}
//! ```
//!
//! The keys are part of the stored data format and must never change.

use crate::error::{Result, TranscodeError};
use crate::scalar::{decode_base64, encode_base64, number_text, parse_number_text};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Sentinel key for a single binary value.
pub const BLOB_KEY: &str = "MemoryStreamContent838D2F22-0D5B-4831-8C04-17C7A6329B31";
/// Sentinel key for a binary set.
pub const BLOB_SET_KEY: &str = "HashSetMemoryStreamContent838D2F22-0D5B-4831-8C04-17C7A6329B31";
/// Sentinel key for a number set.
pub const NUMBER_SET_KEY: &str = "HashSetNumberContent838D2F22-0D5B-4831-8C04-17C7A6329B31";
/// Sentinel key for a string set.
pub const STRING_SET_KEY: &str = "HashSetStringContent838D2F22-0D5B-4831-8C04-17C7A6329B31";

/// Recognize and build one sentinel shape.
///
/// Implementors are zero-sized; everything is an associated function so the encoder and
/// decoder pick a tagger statically.
pub trait Tagger {
    /// The reserved object key marking this sentinel.
    const KEY: &'static str;

    /// The native value carried by the sentinel.
    type Payload;

    /// Return the payload if `object` is exactly this sentinel, `Ok(None)` otherwise.
    ///
    /// An object with extra properties, another key, or a payload of the wrong JSON type
    /// is not a sentinel. A payload of the right type that cannot be decoded is an error.
    fn try_unwrap(object: &Map<String, Value>) -> Result<Option<Self::Payload>>;

    /// Build the sentinel object carrying `payload`.
    fn wrap(payload: &Self::Payload) -> Result<Value>;
}

/// The payload under `key` if `object` has that key and nothing else.
fn sole_property<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if object.len() != 1 {
        return None;
    }
    object.get(key)
}

fn sentinel(key: &str, payload: Value) -> Value {
    let mut object = Map::with_capacity(1);
    object.insert(key.to_string(), payload);
    Value::Object(object)
}

/// Single binary value, payload is a base64 string.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlobTagger;

impl BlobTagger {
    /// Build the sentinel straight from a byte slice.
    pub fn wrap_bytes(bytes: &[u8]) -> Value {
        sentinel(Self::KEY, Value::String(encode_base64(bytes)))
    }
}

impl Tagger for BlobTagger {
    const KEY: &'static str = BLOB_KEY;
    type Payload = Vec<u8>;

    fn try_unwrap(object: &Map<String, Value>) -> Result<Option<Vec<u8>>> {
        let Some(Value::String(encoded)) = sole_property(object, Self::KEY) else {
            return Ok(None);
        };
        decode_base64(encoded)
            .map(Some)
            .ok_or_else(|| TranscodeError::InvalidSentinelPayload {
                key: Self::KEY,
                message: "payload is not valid base64".to_string(),
            })
    }

    fn wrap(payload: &Vec<u8>) -> Result<Value> {
        Ok(Self::wrap_bytes(payload))
    }
}

/// Binary set, payload is an array of blob sentinels.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlobSetTagger;

impl Tagger for BlobSetTagger {
    const KEY: &'static str = BLOB_SET_KEY;
    type Payload = BTreeSet<Vec<u8>>;

    fn try_unwrap(object: &Map<String, Value>) -> Result<Option<BTreeSet<Vec<u8>>>> {
        let Some(Value::Array(members)) = sole_property(object, Self::KEY) else {
            return Ok(None);
        };
        let mut set = BTreeSet::new();
        for member in members {
            let Value::Object(member) = member else {
                return Ok(None);
            };
            match BlobTagger::try_unwrap(member)? {
                Some(bytes) => {
                    set.insert(bytes);
                }
                None => return Ok(None),
            }
        }
        Ok(Some(set))
    }

    fn wrap(payload: &BTreeSet<Vec<u8>>) -> Result<Value> {
        let members = payload
            .iter()
            .map(|bytes| BlobTagger::wrap_bytes(bytes))
            .collect();
        Ok(sentinel(Self::KEY, Value::Array(members)))
    }
}

/// Number set, payload is an array of numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberSetTagger;

impl Tagger for NumberSetTagger {
    const KEY: &'static str = NUMBER_SET_KEY;
    type Payload = BTreeSet<String>;

    fn try_unwrap(object: &Map<String, Value>) -> Result<Option<BTreeSet<String>>> {
        let Some(Value::Array(members)) = sole_property(object, Self::KEY) else {
            return Ok(None);
        };
        let texts = members
            .iter()
            .map(|member| match member {
                Value::Number(number) => Some(number_text(number)),
                _ => None,
            })
            .collect::<Option<BTreeSet<_>>>();
        Ok(texts)
    }

    fn wrap(payload: &BTreeSet<String>) -> Result<Value> {
        let members = payload
            .iter()
            .map(|text| parse_number_text(text).map(Value::Number))
            .collect::<Result<Vec<_>>>()?;
        Ok(sentinel(Self::KEY, Value::Array(members)))
    }
}

/// String set, payload is an array of strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSetTagger;

impl Tagger for StringSetTagger {
    const KEY: &'static str = STRING_SET_KEY;
    type Payload = BTreeSet<String>;

    fn try_unwrap(object: &Map<String, Value>) -> Result<Option<BTreeSet<String>>> {
        let Some(Value::Array(members)) = sole_property(object, Self::KEY) else {
            return Ok(None);
        };
        let strings = members
            .iter()
            .map(|member| member.as_str().map(str::to_string))
            .collect::<Option<BTreeSet<_>>>();
        Ok(strings)
    }

    fn wrap(payload: &BTreeSet<String>) -> Result<Value> {
        let members = payload.iter().cloned().map(Value::String).collect();
        Ok(sentinel(Self::KEY, Value::Array(members)))
    }
}

/// True if `key` is one of the four reserved sentinel keys.
pub fn is_reserved_key(key: &str) -> bool {
    matches!(key, BLOB_KEY | BLOB_SET_KEY | NUMBER_SET_KEY | STRING_SET_KEY)
}
