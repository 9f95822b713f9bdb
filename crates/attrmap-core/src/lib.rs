//! # attrmap-core
//!
//! Lossless transcoder between JSON documents (`serde_json::Value`) and the attribute
//! maps of a wide-column store (string, number, binary, boolean, null, list, map, and
//! string/number/binary sets).
//!
//! JSON has no way to say "binary" or "set", so the decoder wraps those values in
//! reserved single-key sentinel objects, and the encoder turns the sentinels back into
//! native attributes. On the way in, arrays whose elements are all numbers, all strings,
//! or all binary values become sets.
//!
//! ## Quick start
//!
//! ```rust
//! use attrmap_core::{decode, encode_json, AttributeValue};
//!
//! // JSON → attribute map
//! let item = encode_json(r#"{"id":"42","price":3.140,"tags":["a","b"],"note":null}"#).unwrap();
//! assert_eq!(item["price"], AttributeValue::Number("3.140".into()));
//! assert!(matches!(item["tags"], AttributeValue::StringSet(_)));
//! assert!(!item.contains_key("note"));
//!
//! // attribute map → JSON (the set comes back as a string-set sentinel)
//! let document = decode(&item).unwrap();
//! assert_eq!(document["price"].to_string(), "3.140");
//! ```
//!
//! ## Modules
//!
//! - [`encoder`] — document → attribute map
//! - [`decoder`] — attribute map → document
//! - [`tagger`] — escape-hatch sentinels for binary values and sets
//! - [`wire`] — the store's JSON wire shape (`{"S": ...}`, `{"NS": [...]}`, ...)
//! - [`item`] — typed values ⇄ attribute maps through `serde`
//! - [`config`] / [`transcoder`] — configuration and a reusable configured transcoder
//! - [`error`] — error types

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod item;
pub mod scalar;
pub mod tagger;
pub mod transcoder;
pub mod types;
pub mod wire;

pub use config::{NullPolicy, SetRepresentation, TranscoderConfig, DEFAULT_MAX_DEPTH};
pub use decoder::{decode, decode_json, decode_with};
pub use encoder::{encode, encode_json, encode_with};
pub use error::{Result, TranscodeError};
pub use item::{from_item, tagged, to_item};
pub use tagger::{BlobSetTagger, BlobTagger, NumberSetTagger, StringSetTagger, Tagger};
pub use transcoder::Transcoder;
pub use types::{AttributeKind, AttributeMap, AttributeValue};
pub use wire::{item_from_wire, item_to_wire};
