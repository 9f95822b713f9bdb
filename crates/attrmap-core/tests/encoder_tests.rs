/// Encoder contract tests: JSON document → attribute map.
use attrmap_core::tagger::{BLOB_KEY, BLOB_SET_KEY, NUMBER_SET_KEY, STRING_SET_KEY};
use attrmap_core::{
    encode, encode_json, encode_with, AttributeValue, NullPolicy, TranscodeError,
    TranscoderConfig,
};
use serde_json::json;
use std::collections::BTreeSet;

fn n(text: &str) -> AttributeValue {
    AttributeValue::Number(text.to_string())
}

fn s(text: &str) -> AttributeValue {
    AttributeValue::String(text.to_string())
}

fn texts(members: &[&str]) -> BTreeSet<String> {
    members.iter().map(|m| m.to_string()).collect()
}

// ============================================================================
// Root shape
// ============================================================================

#[test]
fn encode_rejects_non_object_roots() {
    for root in [json!(null), json!(1), json!("x"), json!(true), json!([1, 2])] {
        let err = encode(&root).unwrap_err();
        assert!(
            matches!(err, TranscodeError::InvalidShape(_)),
            "root {root} should be rejected, got {err:?}"
        );
    }
}

#[test]
fn encode_empty_object() {
    let item = encode(&json!({})).unwrap();
    assert!(item.is_empty());
}

#[test]
fn encode_json_reports_parse_errors() {
    assert!(matches!(
        encode_json("{not json"),
        Err(TranscodeError::Json(_))
    ));
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn encode_scalars() {
    let item = encode(&json!({"b": true, "f": false, "n": 42, "s": "hello"})).unwrap();
    assert_eq!(item["b"], AttributeValue::Bool(true));
    assert_eq!(item["f"], AttributeValue::Bool(false));
    assert_eq!(item["n"], n("42"));
    assert_eq!(item["s"], s("hello"));
}

#[test]
fn encode_preserves_number_text() {
    let item = encode_json(r#"{"pi": 3.140, "big": 123456789012345678901234567890}"#).unwrap();
    assert_eq!(item["pi"], n("3.140"));
    assert_eq!(item["big"], n("123456789012345678901234567890"));
}

#[test]
fn encode_keeps_number_text_handed_over_by_the_parser() {
    let document: serde_json::Value = serde_json::from_str(r#"{"e": 1.5E+3}"#).unwrap();
    let parsed_text = document["e"].to_string();
    let item = encode(&document).unwrap();
    assert_eq!(item["e"], n(&parsed_text));
}

#[test]
fn encode_empty_string_is_kept() {
    let item = encode(&json!({"s": ""})).unwrap();
    assert_eq!(item["s"], s(""));
}

// ============================================================================
// Null suppression
// ============================================================================

#[test]
fn encode_drops_null_properties() {
    let item = encode(&json!({"a": 1, "b": null})).unwrap();
    assert_eq!(item.len(), 1);
    assert_eq!(item["a"], n("1"));
}

#[test]
fn encode_drops_nested_null_properties() {
    let item = encode(&json!({"outer": {"keep": "x", "gone": null}})).unwrap();
    let AttributeValue::Map(outer) = &item["outer"] else {
        panic!("expected a map, got {:?}", item["outer"]);
    };
    assert_eq!(outer.len(), 1);
    assert_eq!(outer["keep"], s("x"));
}

#[test]
fn encode_top_level_null_policy_keeps_nested_nulls() {
    let config = TranscoderConfig::default().with_null_policy(NullPolicy::TopLevel);
    let item = encode_with(&json!({"gone": null, "outer": {"kept": null}}), &config).unwrap();
    assert!(!item.contains_key("gone"));
    let AttributeValue::Map(outer) = &item["outer"] else {
        panic!("expected a map");
    };
    assert_eq!(outer["kept"], AttributeValue::Null);
}

#[test]
fn encode_keeps_null_list_elements() {
    let item = encode(&json!({"l": [1, null, 2]})).unwrap();
    assert_eq!(
        item["l"],
        AttributeValue::List(vec![n("1"), AttributeValue::Null, n("2")])
    );
}

// ============================================================================
// Set inference
// ============================================================================

#[test]
fn encode_number_array_as_number_set() {
    let item = encode_json(r#"{"ids": [1, 2, 3]}"#).unwrap();
    assert_eq!(item["ids"], AttributeValue::NumberSet(texts(&["1", "2", "3"])));
}

#[test]
fn encode_number_set_keeps_member_text() {
    let item = encode_json(r#"{"ids": [1.0, 1.00, 2]}"#).unwrap();
    assert_eq!(
        item["ids"],
        AttributeValue::NumberSet(texts(&["1.0", "1.00", "2"]))
    );
}

#[test]
fn encode_string_array_as_string_set() {
    let item = encode(&json!({"tags": ["1", "2", "3"]})).unwrap();
    assert_eq!(item["tags"], AttributeValue::StringSet(texts(&["1", "2", "3"])));
}

#[test]
fn encode_string_set_collapses_duplicates() {
    let item = encode(&json!({"tags": ["b", "a", "b"]})).unwrap();
    assert_eq!(item["tags"], AttributeValue::StringSet(texts(&["a", "b"])));
}

#[test]
fn encode_blob_sentinel_array_as_binary_set() {
    let item = encode(&json!({"blobs": [{BLOB_KEY: "AP8Q"}, {BLOB_KEY: "YQ=="}]})).unwrap();
    let expected: BTreeSet<Vec<u8>> = [vec![0x00, 0xFF, 0x10], b"a".to_vec()].into();
    assert_eq!(item["blobs"], AttributeValue::BinarySet(expected));
}

#[test]
fn encode_mixed_array_as_list() {
    let item = encode(&json!({"l": [1, "a"]})).unwrap();
    assert_eq!(item["l"], AttributeValue::List(vec![n("1"), s("a")]));
}

#[test]
fn encode_single_differing_element_forces_list() {
    let item = encode(&json!({"l": ["a", "b", 3, "c"]})).unwrap();
    assert_eq!(
        item["l"],
        AttributeValue::List(vec![s("a"), s("b"), n("3"), s("c")])
    );
}

#[test]
fn encode_empty_array_as_empty_list() {
    let item = encode(&json!({"l": []})).unwrap();
    assert_eq!(item["l"], AttributeValue::List(vec![]));
}

#[test]
fn encode_bool_array_as_list() {
    let item = encode(&json!({"l": [true, false]})).unwrap();
    assert_eq!(
        item["l"],
        AttributeValue::List(vec![AttributeValue::Bool(true), AttributeValue::Bool(false)])
    );
}

#[test]
fn encode_nested_containers_force_list() {
    let item = encode(&json!({"l": [["a"], "a"]})).unwrap();
    assert_eq!(
        item["l"],
        AttributeValue::List(vec![AttributeValue::StringSet(texts(&["a"])), s("a")])
    );

    let item = encode(&json!({"l": [{"k": 1}, {"k": 2}]})).unwrap();
    let AttributeValue::List(elements) = &item["l"] else {
        panic!("expected a list");
    };
    assert_eq!(elements.len(), 2);
    assert!(elements.iter().all(|e| matches!(e, AttributeValue::Map(_))));
}

// ============================================================================
// Sentinels
// ============================================================================

#[test]
fn encode_blob_sentinel_as_binary() {
    let item = encode(&json!({"data": {BLOB_KEY: "AP8Q"}})).unwrap();
    assert_eq!(item["data"], AttributeValue::Binary(vec![0x00, 0xFF, 0x10]));
}

#[test]
fn encode_empty_blob_sentinel_as_empty_binary() {
    let item = encode(&json!({"data": {BLOB_KEY: ""}})).unwrap();
    assert_eq!(item["data"], AttributeValue::Binary(vec![]));
}

#[test]
fn encode_blob_set_sentinel() {
    let item = encode(&json!({"data": {BLOB_SET_KEY: [{BLOB_KEY: "AP8Q"}]}})).unwrap();
    let expected: BTreeSet<Vec<u8>> = [vec![0x00, 0xFF, 0x10]].into();
    assert_eq!(item["data"], AttributeValue::BinarySet(expected));
}

#[test]
fn encode_number_set_sentinel() {
    let item = encode_json(&format!(r#"{{"data": {{"{NUMBER_SET_KEY}": [2.50, 1]}}}}"#)).unwrap();
    assert_eq!(item["data"], AttributeValue::NumberSet(texts(&["1", "2.50"])));
}

#[test]
fn encode_string_set_sentinel() {
    let item = encode(&json!({"data": {STRING_SET_KEY: ["x", "y"]}})).unwrap();
    assert_eq!(item["data"], AttributeValue::StringSet(texts(&["x", "y"])));
}

#[test]
fn encode_empty_set_sentinel_omits_attribute() {
    for key in [BLOB_SET_KEY, NUMBER_SET_KEY, STRING_SET_KEY] {
        let item = encode(&json!({"keep": 1, "data": {key: []}})).unwrap();
        assert!(!item.contains_key("data"), "{key} with no members must be omitted");
        assert_eq!(item.len(), 1);
    }
}

#[test]
fn encode_sentinel_key_with_wrong_payload_is_a_plain_map() {
    let item = encode(&json!({"data": {STRING_SET_KEY: "not an array"}})).unwrap();
    let AttributeValue::Map(map) = &item["data"] else {
        panic!("expected a map, got {:?}", item["data"]);
    };
    assert_eq!(map[STRING_SET_KEY], s("not an array"));

    let item = encode(&json!({"data": {NUMBER_SET_KEY: ["1", "2"]}})).unwrap();
    assert!(matches!(item["data"], AttributeValue::Map(_)));

    let item = encode(&json!({"data": {BLOB_KEY: 17}})).unwrap();
    assert!(matches!(item["data"], AttributeValue::Map(_)));
}

#[test]
fn encode_sentinel_key_with_siblings_is_a_plain_map() {
    let item = encode(&json!({"data": {BLOB_KEY: "AP8Q", "other": true}})).unwrap();
    let AttributeValue::Map(map) = &item["data"] else {
        panic!("expected a map");
    };
    assert_eq!(map.len(), 2);
    assert_eq!(map[BLOB_KEY], s("AP8Q"));
}

#[test]
fn encode_blob_sentinel_with_bad_base64_fails() {
    let err = encode(&json!({"data": {BLOB_KEY: "***"}})).unwrap_err();
    assert!(matches!(
        err,
        TranscodeError::InvalidSentinelPayload { key: BLOB_KEY, .. }
    ));
}

#[test]
fn encode_root_sentinel_is_not_unwrapped() {
    let item = encode(&json!({BLOB_KEY: "AP8Q"})).unwrap();
    assert_eq!(item[BLOB_KEY], s("AP8Q"));
}

// ============================================================================
// Nesting limit
// ============================================================================

fn nested_objects(levels: usize) -> serde_json::Value {
    let mut value = json!(1);
    for _ in 0..levels {
        value = json!({ "k": value });
    }
    value
}

#[test]
fn encode_accepts_nesting_up_to_limit() {
    let config = TranscoderConfig::default().with_max_depth(3);
    assert!(encode_with(&nested_objects(3), &config).is_ok());
}

#[test]
fn encode_rejects_nesting_past_limit() {
    let config = TranscoderConfig::default().with_max_depth(3);
    let err = encode_with(&nested_objects(4), &config).unwrap_err();
    assert!(matches!(err, TranscodeError::NestingTooDeep { limit: 3 }));
}

#[test]
fn encode_counts_arrays_toward_nesting() {
    let config = TranscoderConfig::default().with_max_depth(2);
    let err = encode_with(&json!({"l": [[1]]}), &config).unwrap_err();
    assert!(matches!(err, TranscodeError::NestingTooDeep { limit: 2 }));
}
