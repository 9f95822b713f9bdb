//! The store's attribute value model.
//!
//! `AttributeValue` is closed on purpose: adding a variant must touch every match in the
//! encoder, decoder and wire codec.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A record as the store sees it: attribute name to value.
pub type AttributeMap = BTreeMap<String, AttributeValue>;

/// One attribute value, tagged the way the wide-column store tags it.
///
/// Numbers are kept as text so that `3.140` stays `3.140`. Sets use `BTreeSet` so
/// members are distinct and iteration order is deterministic; the store never holds an
/// empty set, and the encoder never produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    /// Number text, exactly as it appeared in the source document.
    Number(String),
    String(String),
    Binary(Vec<u8>),
    List(Vec<AttributeValue>),
    Map(AttributeMap),
    NumberSet(BTreeSet<String>),
    StringSet(BTreeSet<String>),
    BinarySet(BTreeSet<Vec<u8>>),
}

impl AttributeValue {
    /// The variant of this value without its payload.
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Null => AttributeKind::Null,
            AttributeValue::Bool(_) => AttributeKind::Bool,
            AttributeValue::Number(_) => AttributeKind::Number,
            AttributeValue::String(_) => AttributeKind::String,
            AttributeValue::Binary(_) => AttributeKind::Binary,
            AttributeValue::List(_) => AttributeKind::List,
            AttributeValue::Map(_) => AttributeKind::Map,
            AttributeValue::NumberSet(_) => AttributeKind::NumberSet,
            AttributeValue::StringSet(_) => AttributeKind::StringSet,
            AttributeValue::BinarySet(_) => AttributeKind::BinarySet,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

/// Fieldless mirror of [`AttributeValue`], named after the store's type descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeKind {
    Null,
    Bool,
    Number,
    String,
    Binary,
    List,
    Map,
    NumberSet,
    StringSet,
    BinarySet,
}

impl AttributeKind {
    /// All ten kinds, in descriptor order.
    pub const ALL: [AttributeKind; 10] = [
        AttributeKind::Null,
        AttributeKind::Bool,
        AttributeKind::Number,
        AttributeKind::String,
        AttributeKind::Binary,
        AttributeKind::List,
        AttributeKind::Map,
        AttributeKind::NumberSet,
        AttributeKind::StringSet,
        AttributeKind::BinarySet,
    ];

    /// The type descriptor used on the wire (`"S"`, `"N"`, `"BS"`, ...).
    pub fn descriptor(self) -> &'static str {
        match self {
            AttributeKind::Null => "NULL",
            AttributeKind::Bool => "BOOL",
            AttributeKind::Number => "N",
            AttributeKind::String => "S",
            AttributeKind::Binary => "B",
            AttributeKind::List => "L",
            AttributeKind::Map => "M",
            AttributeKind::NumberSet => "NS",
            AttributeKind::StringSet => "SS",
            AttributeKind::BinarySet => "BS",
        }
    }

    /// Inverse of [`AttributeKind::descriptor`].
    pub fn from_descriptor(descriptor: &str) -> Option<AttributeKind> {
        AttributeKind::ALL
            .into_iter()
            .find(|kind| kind.descriptor() == descriptor)
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor())
    }
}
