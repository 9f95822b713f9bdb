//! Typed values ⇄ attribute maps, through `serde`.
//!
//! [`to_item`] serializes any `Serialize` value to a JSON document and encodes it;
//! [`from_item`] decodes and deserializes. Plain Rust collections only reach the store's
//! set and binary types through array inference, so fields that must be stored as a
//! binary value or a set use the [`tagged`] modules:
//!
//! ```
//! use attrmap_core::{from_item, tagged, to_item, AttributeValue};
//! use serde::{Deserialize, Serialize};
//! use std::collections::BTreeSet;
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Saga {
//!     #[serde(with = "tagged::blob")]
//!     body: Vec<u8>,
//!     #[serde(with = "tagged::string_set")]
//!     owners: BTreeSet<String>,
//! }
//!
//! let saga = Saga { body: vec![0, 255], owners: ["a".to_string()].into() };
//! let item = to_item(&saga).unwrap();
//! assert_eq!(item["body"], AttributeValue::Binary(vec![0, 255]));
//! assert_eq!(from_item::<Saga>(&item).unwrap(), saga);
//! ```

use crate::decoder::decode;
use crate::encoder::encode;
use crate::error::{Result, TranscodeError};
use crate::types::AttributeMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Serialize `value` and encode it as an attribute map.
///
/// Fails with [`TranscodeError::InvalidShape`] if `value` does not serialize to an object.
pub fn to_item<T: Serialize + ?Sized>(value: &T) -> Result<AttributeMap> {
    let document = serde_json::to_value(value)?;
    if !document.is_object() {
        return Err(TranscodeError::InvalidShape(format!(
            "{} does not serialize to an object",
            std::any::type_name::<T>()
        )));
    }
    encode(&document)
}

/// Decode an attribute map and deserialize it into `T`.
pub fn from_item<T: DeserializeOwned>(item: &AttributeMap) -> Result<T> {
    let document: Value = decode(item)?;
    Ok(serde_json::from_value(document)?)
}

/// `#[serde(with = "...")]` adapters that write a field through an escape-hatch sentinel.
///
/// Each module serializes to the sentinel shape, which the encoder stores as the native
/// attribute. Set modules deserialize from either the sentinel or a plain array, so they
/// read items decoded with any [`SetRepresentation`](crate::SetRepresentation).
pub mod tagged {
    use crate::scalar::number_text;
    use crate::tagger::{BlobSetTagger, BlobTagger, NumberSetTagger, StringSetTagger, Tagger};
    use serde::de::{DeserializeOwned, Error as DeError};
    use serde::ser::Error as SerError;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Map, Value};
    use std::collections::BTreeSet;

    /// Deserialize the field as a raw document node.
    fn node<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    /// Run a tagger over an object node, mapping "not a sentinel" to a serde error.
    fn unwrap_node<T: Tagger, E: DeError>(
        object: &Map<String, Value>,
    ) -> Result<T::Payload, E> {
        T::try_unwrap(object)
            .map_err(E::custom)?
            .ok_or_else(|| E::custom(format!("expected a {} sentinel", T::KEY)))
    }

    /// A single binary value, stored as `B`.
    pub mod blob {
        use super::*;

        pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
            BlobTagger::wrap_bytes(bytes).serialize(serializer)
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match node(deserializer)? {
                Value::Object(object) => unwrap_node::<BlobTagger, D::Error>(&object),
                other => Err(D::Error::custom(format!(
                    "expected a binary sentinel, found {other}"
                ))),
            }
        }
    }

    /// A binary set, stored as `BS`.
    pub mod blob_set {
        use super::*;

        pub fn serialize<'a, S, C, T>(set: &'a C, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
            &'a C: IntoIterator<Item = &'a T>,
            T: AsRef<[u8]> + ?Sized + 'a,
        {
            let members: BTreeSet<Vec<u8>> = set
                .into_iter()
                .map(|bytes| T::as_ref(bytes).to_vec())
                .collect();
            BlobSetTagger::wrap(&members)
                .map_err(S::Error::custom)?
                .serialize(serializer)
        }

        pub fn deserialize<'de, D, C>(deserializer: D) -> Result<C, D::Error>
        where
            D: Deserializer<'de>,
            C: FromIterator<Vec<u8>>,
        {
            match node(deserializer)? {
                Value::Object(object) => unwrap_node::<BlobSetTagger, D::Error>(&object)
                    .map(|set| set.into_iter().collect()),
                Value::Array(members) => members
                    .into_iter()
                    .map(|member| match member {
                        Value::Object(object) => unwrap_node::<BlobTagger, D::Error>(&object),
                        other => Err(D::Error::custom(format!(
                            "expected a binary sentinel, found {other}"
                        ))),
                    })
                    .collect(),
                other => Err(D::Error::custom(format!(
                    "expected a binary set, found {other}"
                ))),
            }
        }
    }

    /// A string set, stored as `SS`.
    pub mod string_set {
        use super::*;

        pub fn serialize<'a, S, C, T>(set: &'a C, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
            &'a C: IntoIterator<Item = &'a T>,
            T: AsRef<str> + ?Sized + 'a,
        {
            let members: BTreeSet<String> = set
                .into_iter()
                .map(|member| T::as_ref(member).to_string())
                .collect();
            StringSetTagger::wrap(&members)
                .map_err(S::Error::custom)?
                .serialize(serializer)
        }

        pub fn deserialize<'de, D, C>(deserializer: D) -> Result<C, D::Error>
        where
            D: Deserializer<'de>,
            C: FromIterator<String>,
        {
            match node(deserializer)? {
                Value::Object(object) => unwrap_node::<StringSetTagger, D::Error>(&object)
                    .map(|set| set.into_iter().collect()),
                Value::Array(members) => members
                    .into_iter()
                    .map(|member| match member {
                        Value::String(s) => Ok(s),
                        other => Err(D::Error::custom(format!(
                            "expected a string set member, found {other}"
                        ))),
                    })
                    .collect(),
                other => Err(D::Error::custom(format!(
                    "expected a string set, found {other}"
                ))),
            }
        }
    }

    /// A number set, stored as `NS`. Members may be any type that serializes to a number.
    pub mod number_set {
        use super::*;
        use crate::scalar::parse_number_text;

        pub fn serialize<'a, S, C, T>(set: &'a C, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
            &'a C: IntoIterator<Item = &'a T>,
            T: Serialize + 'a,
        {
            let mut members = BTreeSet::new();
            for member in set {
                match serde_json::to_value(member).map_err(S::Error::custom)? {
                    Value::Number(number) => {
                        members.insert(number_text(&number));
                    }
                    other => {
                        return Err(S::Error::custom(format!(
                            "number set members must serialize to numbers, found {other}"
                        )))
                    }
                }
            }
            NumberSetTagger::wrap(&members)
                .map_err(S::Error::custom)?
                .serialize(serializer)
        }

        pub fn deserialize<'de, D, C, T>(deserializer: D) -> Result<C, D::Error>
        where
            D: Deserializer<'de>,
            C: IntoIterator<Item = T> + FromIterator<T>,
            T: DeserializeOwned,
        {
            let numbers: Vec<Value> = match node(deserializer)? {
                Value::Object(object) => unwrap_node::<NumberSetTagger, D::Error>(&object)?
                    .iter()
                    .map(|text| parse_number_text(text).map(Value::Number))
                    .collect::<crate::Result<_>>()
                    .map_err(D::Error::custom)?,
                Value::Array(members) => members,
                other => {
                    return Err(D::Error::custom(format!(
                        "expected a number set, found {other}"
                    )))
                }
            };
            numbers
                .into_iter()
                .map(|number| serde_json::from_value::<T>(number).map_err(D::Error::custom))
                .collect()
        }
    }
}
