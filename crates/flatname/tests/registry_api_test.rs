//! Integration tests for the Registry API
//!
//! These tests drive the public API with realistic element sets.

use serde::Deserialize;

use flatname::{
    DecodeError, ErrorCode, NameFormatter, NestedNameFormatter, Registry,
    config::{AppConfig, AttachPolicy, RegistryConfig},
    decode,
    payload::{JsonPayloadDecoder, Payload},
};

const AB: &str = "AB";
const AB_B: &str = "AB-BAB3";
const AB_B_AB: &str = "AB-B-ABAB_AB-BAB33_1";
const ACCORDION: &str = "accordionAB_AB-BAB3_AB-B-ABAB_AB-BAB33_13_1_2";
const TEXT: &str =
    "textAB_AB-BAB3_AB-B-ABAB_AB-BAB33_1_accordionAB_AB-BAB3_AB-B-ABAB_AB-BAB33_13_1_23_1_2_4";

fn nested_registry() -> Registry {
    let mut registry = Registry::default();
    // Insertion order is irrelevant.
    registry.add(ACCORDION, "block", None);
    registry.add(AB_B, "block", None);
    registry.add("headlineAB", "input", None);
    registry.add(AB_B_AB, "areablock", None);
    registry.add(AB, "areablock", None);
    registry.add(TEXT, "wysiwyg", None);
    registry
}

#[test]
fn test_registry_api_exists() {
    let registry = Registry::default();

    assert!(registry.is_empty());
    assert!(!registry.is_processed());
}

#[test]
fn test_container_with_suffix_parent() {
    let mut registry = Registry::default();
    registry.add(AB, "block", None);
    registry.add(AB_B, "block", None);

    let child = registry.get_element(AB_B).expect("Failed to decode");
    assert_eq!(child.parent().map(|p| p.encoded_name()), Some(AB));
    assert_eq!(child.level(), 1);

    let ancestors: Vec<&str> = child.ancestors().iter().map(|a| a.encoded_name()).collect();
    assert_eq!(ancestors, [AB]);
}

#[test]
fn test_deeply_nested_container() {
    let mut registry = nested_registry();

    let accordion = registry.get_element(ACCORDION).expect("Failed to decode");
    assert_eq!(accordion.real_name().unwrap(), "accordion");
    assert_eq!(accordion.index().unwrap(), Some(2));
    assert_eq!(accordion.index_path().unwrap(), &[3, 1, 2]);
    assert_eq!(accordion.level(), 3);
    assert_eq!(accordion.parent().map(|p| p.encoded_name()), Some(AB_B_AB));

    let inner = registry.get_element(AB_B_AB).unwrap();
    assert_eq!(inner.real_name().unwrap(), "AB-B-AB");
    assert_eq!(inner.index().unwrap(), Some(1));
}

#[test]
fn test_leaf_inside_deepest_container() {
    let mut registry = nested_registry();

    let text = registry.get_element(TEXT).unwrap();
    assert_eq!(text.real_name().unwrap(), "text");
    assert_eq!(text.index_path().unwrap(), &[3, 1, 2, 4]);
    assert_eq!(text.parent().map(|p| p.encoded_name()), Some(ACCORDION));
}

#[test]
fn test_leaf_directly_inside_root_block() {
    let mut registry = nested_registry();

    let headline = registry.get_element("headlineAB").unwrap();
    assert_eq!(headline.real_name().unwrap(), "headline");
    assert_eq!(headline.parent().map(|p| p.encoded_name()), Some(AB));
}

#[test]
fn test_missing_element_is_not_found() {
    let mut registry = nested_registry();

    let err = registry.get_element("missing").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E301);
}

#[test]
fn test_unrelated_roots() {
    let mut registry = Registry::default();
    registry.add("AB", "block", None);
    registry.add("AB2", "block", None);

    for name in ["AB", "AB2"] {
        let element = registry.get_element(name).unwrap();
        assert!(element.parent().is_none());
        assert_eq!(element.real_name().unwrap(), name);
        assert!(element.index_path().unwrap().is_empty());
    }
}

#[test]
fn test_every_root_keeps_its_name() {
    let mut registry = nested_registry();

    for element in registry.elements().unwrap().values() {
        if element.parent().is_none() {
            assert_eq!(element.real_name().unwrap(), element.encoded_name());
            assert!(element.index_path().unwrap().is_empty());
        }
    }
}

#[test]
fn test_index_prefix_matches_ancestors() {
    let mut registry = nested_registry();

    for element in registry.elements().unwrap().values() {
        let ancestor_indexes: Vec<u32> = element
            .ancestors()
            .iter()
            .filter_map(|a| a.index().unwrap())
            .collect();
        let index_path = element.index_path().unwrap();
        if let Some((_, prefix)) = index_path.split_last() {
            assert_eq!(prefix, ancestor_indexes.as_slice(), "{element}");
        }
    }
}

#[test]
fn test_nested_names() {
    let mut registry = nested_registry();

    let accordion = registry.get_element(ACCORDION).unwrap();
    assert_eq!(
        NestedNameFormatter.format(accordion).unwrap(),
        "AB:3.AB-B:1.AB-B-AB:2.accordion"
    );
}

#[test]
fn test_decode_shortcut_with_strict_config() {
    let config = AppConfig::new(RegistryConfig::new(AttachPolicy::Strict));
    let entries = [
        ("b", "block", None),
        ("b_", "block", None),
        ("xb_", "input", None),
    ];

    let err = decode(entries, &config).unwrap_err();
    match err {
        flatname::FlatnameError::Decode(DecodeError::AmbiguousBuild { name, candidates }) => {
            assert_eq!(name, "xb_");
            assert_eq!(candidates, ["b_", "b"]);
        }
        other => panic!("Expected AmbiguousBuild, got {other:?}"),
    }
}

#[test]
fn test_malformed_input_aborts() {
    let mut registry = Registry::default();
    registry.add(AB, "areablock", None);
    registry.add(AB_B, "block", None);
    registry.add("textAB_AB-BAB34_1", "input", None);

    let err = registry.process().unwrap_err();
    assert_eq!(err.code(), ErrorCode::E103);
    assert!(registry.get_element(AB).is_err());
}

#[derive(Debug, Deserialize, PartialEq)]
struct AreaState {
    key: String,
    hidden: bool,
}

#[test]
fn test_payload_decoding() {
    let mut registry = Registry::default();
    registry.add(
        AB,
        "areablock",
        Some(Payload::from(r#"[{"key":"1","hidden":false}]"#)),
    );

    let element = registry.get_element(AB).unwrap();
    let payload = element.as_container().and_then(|c| c.payload()).unwrap();
    let states = payload
        .decode(&JsonPayloadDecoder::<Vec<AreaState>>::new())
        .unwrap();

    assert_eq!(
        states,
        [AreaState {
            key: "1".to_string(),
            hidden: false
        }]
    );
}
