//! # Localization Tests
//!
//! Unit tests for the Fluent-backed message catalogue: retrieval,
//! argument interpolation, and missing-key fallbacks.

use sozdik_bot::localization::LocalizationManager;
use std::collections::HashMap;

fn setup_localization() -> LocalizationManager {
    LocalizationManager::new().expect("Failed to create localization manager")
}

#[test]
fn test_get_message_existing_key() {
    let manager = setup_localization();

    let message = manager.get_message("operation-cancelled", None);
    assert!(!message.is_empty());
    assert!(message.contains("отменена"));
}

#[test]
fn test_get_message_nonexistent_key() {
    let manager = setup_localization();

    let message = manager.get_message("nonexistent-key", None);
    assert!(message.starts_with("Missing translation:"));
}

#[test]
fn test_get_message_with_args() {
    let manager = setup_localization();

    let mut args = HashMap::new();
    args.insert("score", "7");
    args.insert("total", "10");

    let message = manager.get_message("quiz-finished", Some(&args));
    assert!(message.contains("7/10"));
}

#[test]
fn test_get_message_with_args_slice() {
    let manager = setup_localization();

    let message = manager.get_message_with_args(
        "quiz-wrong",
        &[("answer", "B) sediment")],
    );
    assert!(message.contains("B) sediment"));
}

#[test]
fn test_flashcard_template_keeps_spoiler_markers() {
    let manager = setup_localization();

    let message = manager.get_message_with_args(
        "flashcard-card",
        &[
            ("word", "Rock"),
            ("synonyms", "stone"),
            ("ru", "камень"),
            ("kz", "тас"),
        ],
    );
    // answers stay wrapped in MarkdownV2 spoilers
    assert!(message.contains("||stone||"));
    assert!(message.contains("||камень||"));
    assert!(message.contains("||тас||"));
}

#[test]
fn test_no_directional_isolates_in_output() {
    let manager = setup_localization();

    let message = manager.get_message_with_args("quiz-question", &[("number", "1"), ("question", "What?")]);
    // isolation marks would break Telegram rendering
    assert!(!message.contains('\u{2068}'));
    assert!(!message.contains('\u{2069}'));
    assert!(message.contains("Вопрос 1"));
}
