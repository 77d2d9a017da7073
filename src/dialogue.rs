//! Per-chat conversation state.
//!
//! One tagged union covers every flow the bot runs: the admin add-word
//! conversation, flashcard viewing, a standalone quiz, and the reading
//! lesson with its embedded quiz. A chat is in exactly one variant at a
//! time, which is what enforces the single-active-flow rule: command entry
//! points refuse to start a flow unless the state is [`FlowState::Idle`].

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::quiz::QuizRun;
use crate::store::DictionaryEntry;

/// Conversation state, one per chat, held in process memory.
/// Abandoned flows keep their state until cancelled, completed, or the
/// process restarts; there is no expiry timer.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum FlowState {
    #[default]
    Idle,
    // Add-word conversation (admin only), one field gained per step
    AwaitingWord,
    AwaitingSynonyms {
        word: String,
    },
    AwaitingRuTranslation {
        word: String,
        synonyms: Vec<String>,
    },
    AwaitingKzTranslation {
        word: String,
        synonyms: Vec<String>,
        ru: String,
    },
    AwaitingConfirmation {
        draft: DictionaryEntry,
    },
    Flashcards {
        words: Vec<String>,
        current_index: usize,
        message_id: Option<i32>,
    },
    Quiz {
        run: QuizRun,
    },
    Lesson {
        slug: String,
        stage_idx: usize,
        stage_msg_id: Option<i32>,
        vocab_msg_id: Option<i32>,
    },
    // Lesson quiz keeps the surrounding lesson position so the stage
    // message can be restored when the quiz finishes
    LessonQuiz {
        slug: String,
        stage_idx: usize,
        stage_msg_id: Option<i32>,
        vocab_msg_id: Option<i32>,
        q_index: usize,
        score: u32,
        quiz_msg_id: Option<i32>,
    },
}

impl FlowState {
    /// True when some flow is in progress and new flows must be refused.
    pub fn is_active(&self) -> bool {
        !matches!(self, FlowState::Idle)
    }

    /// True while the add-word conversation owns the chat. The add-word
    /// cancel button must not abort any other flow.
    pub fn is_add_word(&self) -> bool {
        matches!(
            self,
            FlowState::AwaitingWord
                | FlowState::AwaitingSynonyms { .. }
                | FlowState::AwaitingRuTranslation { .. }
                | FlowState::AwaitingKzTranslation { .. }
                | FlowState::AwaitingConfirmation { .. }
        )
    }
}

/// Type alias for the bot's dialogue handle
pub type FlowDialogue = Dialogue<FlowState, InMemStorage<FlowState>>;

/// Free-text escape hatch: "отмена"/"cancel" aborts the current flow.
pub fn is_cancel_word(text: &str) -> bool {
    matches!(text.trim().to_lowercase().as_str(), "отмена" | "cancel")
}

/// Normalize a new dictionary word: trimmed, first letter uppercased,
/// the rest lowercased.
pub fn capitalize_word(word: &str) -> String {
    let trimmed = word.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Split a synonyms answer on commas, trimming each part.
pub fn split_synonyms(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalization_matches_entry_format() {
        assert_eq!(capitalize_word("rock"), "Rock");
        assert_eq!(capitalize_word("  ROCK  "), "Rock");
        assert_eq!(capitalize_word(""), "");
    }

    #[test]
    fn synonyms_split_and_trim() {
        assert_eq!(
            split_synonyms("stone , boulder,pebble"),
            vec!["stone", "boulder", "pebble"]
        );
        assert!(split_synonyms("  ,, ").is_empty());
    }

    #[test]
    fn cancel_word_is_bilingual_and_case_insensitive() {
        assert!(is_cancel_word("Отмена"));
        assert!(is_cancel_word(" CANCEL "));
        assert!(!is_cancel_word("continue"));
    }

    #[test]
    fn idle_is_the_only_inactive_state() {
        assert!(!FlowState::Idle.is_active());
        assert!(FlowState::AwaitingWord.is_active());
        assert!(FlowState::Flashcards {
            words: vec![],
            current_index: 0,
            message_id: None
        }
        .is_active());
    }
}
