//! Integration tests for loading the FAQ knowledge base from disk.

mod common;

use iassist::knowledge::{KnowledgeContext, KnowledgeError};

use common::{write_faq, PAIRING_FAQ};

#[test]
fn test_load_example_file() {
    let (_dir, path) = write_faq(PAIRING_FAQ);

    let context = KnowledgeContext::load(&path).unwrap();

    assert_eq!(
        context.as_str(),
        "Q: How do I pair my phone?\nA: Use Bluetooth settings.\n\n"
    );
    assert_eq!(context.entry_count(), 1);
}

#[test]
fn test_load_keeps_file_order_and_skips_incomplete() {
    let (_dir, path) = write_faq(
        r#"[
            {"question": "Does the HUD show navigation?", "answer": "Yes.", "source": "manual"},
            {"question": "Orphan question"},
            {"question": "How do I charge?", "answer": "Use a Type 2 connector."}
        ]"#,
    );

    let context = KnowledgeContext::load(&path).unwrap();
    let text = context.as_str();

    assert_eq!(text.matches("Q: ").count(), 2);
    assert!(!text.contains("Orphan"));
    let hud = text.find("Does the HUD").unwrap();
    let charge = text.find("How do I charge").unwrap();
    assert!(hud < charge);
}

#[test]
fn test_load_empty_file_is_valid() {
    let (_dir, path) = write_faq("");

    let context = KnowledgeContext::load(&path).unwrap();
    assert!(context.is_empty());
    assert_eq!(context.entry_count(), 0);
}

#[test]
fn test_missing_and_malformed_are_distinguishable() {
    let dir = tempfile::tempdir().unwrap();
    let missing = KnowledgeContext::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(missing, KnowledgeError::NotFound { .. }));

    let (_dir, path) = write_faq(r#"[{"question": "unterminated"#);
    let malformed = KnowledgeContext::load(&path).unwrap_err();
    assert!(matches!(malformed, KnowledgeError::Malformed { .. }));

    assert_ne!(missing.to_string(), malformed.to_string());
    assert!(missing.to_string().contains("absent.json"));
    assert!(malformed.to_string().contains("manual_faqs.json"));
}

#[test]
fn test_wrong_top_level_shape_is_malformed() {
    let (_dir, path) = write_faq(r#"{"question": "q", "answer": "a"}"#);

    let err = KnowledgeContext::load(&path).unwrap_err();
    assert!(matches!(err, KnowledgeError::Malformed { .. }));
}
