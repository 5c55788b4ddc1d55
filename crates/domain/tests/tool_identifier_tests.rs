//! Tests for the tool-identifier grammar behind `ExpectedToolCalls`.
//!
//! Covers the documented fixed cases plus grammar-wide properties.

use mcp_eval_domain::test_case::{ExpectedToolCalls, TestCase};
use proptest::prelude::*;

#[test]
fn test_prefixed_identifiers() {
    let cases = [
        ("azmcp-foundry-models-list", "foundry", "foundry_models_list"),
        ("azmcp-storage-blob-list", "storage", "storage_blob_list"),
        ("azmcp-cosmos-database-container-item-query", "cosmos", "cosmos_database_container_item_query"),
    ];
    for (identifier, service, command) in cases {
        let expected = ExpectedToolCalls::parse(identifier);
        assert_eq!(expected.service, service, "service for {identifier}");
        assert_eq!(expected.command, command, "command for {identifier}");
    }
}

#[test]
fn test_unprefixed_identifiers() {
    let expected = ExpectedToolCalls::parse("storage-blob-list");
    assert_eq!(expected.identifiers(), ["storage", "storage_blob_list"]);

    let expected = ExpectedToolCalls::parse("keyvault_secret_get");
    assert_eq!(expected.identifiers(), ["keyvault", "keyvault_secret_get"]);

    let expected = ExpectedToolCalls::parse("ping");
    assert_eq!(expected.identifiers(), ["ping", "ping"]);
}

#[test]
fn test_jsonl_round_trip_is_lossless() {
    let cases = vec![
        TestCase::new("list blobs in test-container", "azmcp-storage-blob-list", "storage"),
        TestCase::new("検索インデックスを一覧表示", "azmcp-search-index-list", "search"),
        TestCase::new("ping the server", "ping", "extension"),
    ];
    let jsonl: String = cases
        .iter()
        .map(|c| serde_json::to_string(c).unwrap() + "\n")
        .collect();

    // Non-ASCII text must survive unescaped.
    assert!(jsonl.contains("検索インデックス"));

    let parsed: Vec<TestCase> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(parsed, cases);
}

proptest! {
    #[test]
    fn test_service_is_first_segment(segments in prop::collection::vec("[a-z][a-z0-9]{0,7}", 1..5)) {
        let identifier = segments.join("-");
        let expected = ExpectedToolCalls::parse(&identifier);
        prop_assert_eq!(&expected.service, &segments[0]);
    }

    #[test]
    fn test_command_never_contains_hyphen(segments in prop::collection::vec("[a-z][a-z0-9]{0,7}", 1..5)) {
        let identifier = format!("azmcp-{}", segments.join("-"));
        let expected = ExpectedToolCalls::parse(&identifier);
        prop_assert!(!expected.command.contains('-'));
        prop_assert_eq!(&expected.command, &segments.join("_"));
    }

    #[test]
    fn test_prefix_is_transparent(segments in prop::collection::vec("[a-z][a-z0-9]{0,7}", 2..5)) {
        // The azmcp- prefix must not leak into either identifier.
        let bare = segments.join("-");
        let prefixed = format!("azmcp-{bare}");
        let from_prefixed = ExpectedToolCalls::parse(&prefixed);
        let from_bare = ExpectedToolCalls::parse(&bare);
        prop_assert_eq!(from_prefixed, from_bare);
    }

    #[test]
    fn test_serde_always_emits_two_elements(segments in prop::collection::vec("[a-z][a-z0-9]{0,7}", 1..5)) {
        let expected = ExpectedToolCalls::parse(&segments.join("-"));
        let value = serde_json::to_value(&expected).unwrap();
        let array = value.as_array().unwrap();
        prop_assert_eq!(array.len(), 2);
    }
}
