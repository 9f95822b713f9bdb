//! The store's JSON wire shape for attribute values.
//!
//! Every value is an object with exactly one type descriptor:
//!
//! ```text
//! {"S": "text"}   {"N": "3.140"}   {"B": "AP8Q"}   {"BOOL": true}   {"NULL": true}
//! {"L": [...]}    {"M": {...}}     {"SS": [...]}   {"NS": ["1"]}    {"BS": ["AP8Q"]}
//! ```
//!
//! Numbers travel as strings and binary values as standard base64.

use crate::error::{Result, TranscodeError};
use crate::scalar::{decode_base64, encode_base64, parse_number_text};
use crate::types::{AttributeKind, AttributeMap, AttributeValue};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

impl AttributeValue {
    /// Render this value in the wire shape.
    pub fn to_wire(&self) -> Value {
        let payload = match self {
            AttributeValue::Null => Value::Bool(true),
            AttributeValue::Bool(b) => Value::Bool(*b),
            AttributeValue::Number(text) => Value::String(text.clone()),
            AttributeValue::String(s) => Value::String(s.clone()),
            AttributeValue::Binary(bytes) => Value::String(encode_base64(bytes)),
            AttributeValue::List(items) => {
                Value::Array(items.iter().map(AttributeValue::to_wire).collect())
            }
            AttributeValue::Map(item) => item_to_wire(item),
            AttributeValue::NumberSet(set) | AttributeValue::StringSet(set) => {
                Value::Array(set.iter().cloned().map(Value::String).collect())
            }
            AttributeValue::BinarySet(set) => Value::Array(
                set.iter()
                    .map(|bytes| Value::String(encode_base64(bytes)))
                    .collect(),
            ),
        };
        let mut descriptor = Map::with_capacity(1);
        descriptor.insert(self.kind().descriptor().to_string(), payload);
        Value::Object(descriptor)
    }

    /// Parse a value from the wire shape.
    ///
    /// Fails with [`TranscodeError::InvalidAttribute`] unless the value carries exactly one
    /// known descriptor with a payload of the right JSON type, and with
    /// [`TranscodeError::InvalidNumberText`] for malformed `N`/`NS` members.
    pub fn from_wire(value: &Value) -> Result<AttributeValue> {
        let Value::Object(descriptor) = value else {
            return Err(invalid("expected an object with one type descriptor"));
        };
        let mut entries = descriptor.iter();
        let (tag, payload) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(invalid(format!(
                    "expected exactly one type descriptor, found {}",
                    descriptor.len()
                )))
            }
        };
        let kind = AttributeKind::from_descriptor(tag)
            .ok_or_else(|| invalid(format!("unknown type descriptor {tag:?}")))?;

        match (kind, payload) {
            (AttributeKind::Null, Value::Bool(true)) => Ok(AttributeValue::Null),
            (AttributeKind::Bool, Value::Bool(b)) => Ok(AttributeValue::Bool(*b)),
            (AttributeKind::Number, Value::String(text)) => {
                parse_number_text(text)?;
                Ok(AttributeValue::Number(text.clone()))
            }
            (AttributeKind::String, Value::String(s)) => Ok(AttributeValue::String(s.clone())),
            (AttributeKind::Binary, Value::String(encoded)) => {
                Ok(AttributeValue::Binary(wire_bytes(encoded)?))
            }
            (AttributeKind::List, Value::Array(items)) => items
                .iter()
                .map(AttributeValue::from_wire)
                .collect::<Result<Vec<_>>>()
                .map(AttributeValue::List),
            (AttributeKind::Map, Value::Object(_)) => {
                item_from_wire(payload).map(AttributeValue::Map)
            }
            (AttributeKind::NumberSet, Value::Array(members)) => {
                let texts = wire_strings(kind, members)?;
                for text in &texts {
                    parse_number_text(text)?;
                }
                Ok(AttributeValue::NumberSet(texts))
            }
            (AttributeKind::StringSet, Value::Array(members)) => {
                wire_strings(kind, members).map(AttributeValue::StringSet)
            }
            (AttributeKind::BinarySet, Value::Array(members)) => wire_strings(kind, members)?
                .iter()
                .map(|encoded| wire_bytes(encoded))
                .collect::<Result<BTreeSet<_>>>()
                .map(AttributeValue::BinarySet),
            (kind, payload) => Err(invalid(format!("descriptor {kind} cannot hold {payload}"))),
        }
    }
}

/// Render an attribute map as a wire item (an object of wire values).
pub fn item_to_wire(item: &AttributeMap) -> Value {
    Value::Object(
        item.iter()
            .map(|(name, value)| (name.clone(), value.to_wire()))
            .collect(),
    )
}

/// Parse a wire item. Fails with [`TranscodeError::InvalidShape`] unless `value` is an
/// object.
pub fn item_from_wire(value: &Value) -> Result<AttributeMap> {
    let Value::Object(attributes) = value else {
        return Err(TranscodeError::InvalidShape(
            "a wire item must be an object".to_string(),
        ));
    };
    attributes
        .iter()
        .map(|(name, value)| AttributeValue::from_wire(value).map(|value| (name.clone(), value)))
        .collect()
}

fn wire_strings(kind: AttributeKind, members: &[Value]) -> Result<BTreeSet<String>> {
    members
        .iter()
        .map(|member| {
            member
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid(format!("{kind} members must be strings, found {member}")))
        })
        .collect()
}

fn wire_bytes(encoded: &str) -> Result<Vec<u8>> {
    decode_base64(encoded).ok_or_else(|| invalid(format!("{encoded:?} is not valid base64")))
}

fn invalid(message: impl Into<String>) -> TranscodeError {
    TranscodeError::InvalidAttribute(message.into())
}
