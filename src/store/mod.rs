//! Document store for dictionary entries, quiz sections, and reading lessons.
//!
//! Two backends sit behind the [`Store`] handle: [`MongoStore`] for the
//! production MongoDB deployment and [`MemoryStore`] for tests and the
//! flat-file variant. Handlers receive the handle by injection so tests can
//! substitute the in-memory backend.

pub mod memory;
pub mod mongo;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// A dictionary entry keyed by the English word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub word: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub ru: String,
    #[serde(default)]
    pub kz: String,
}

/// One multiple-choice question of a general or topic quiz.
///
/// `options` entries carry their letter as the first character
/// ("A) ..."), and `correct_answer` repeats the correct option, so the
/// letter comparison uses first characters on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// A single vocabulary row of a reading lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabItem {
    pub term: String,
    pub definition: String,
    #[serde(default)]
    pub example: String,
}

/// Word-definition matching task; `answer_key` maps item numbers to
/// lowercase option letters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchTask {
    pub left: Vec<String>,
    pub right: BTreeMap<String, String>,
    pub answer_key: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillItem {
    pub n: u32,
    pub text: String,
    pub answer: String,
}

/// Fill-in-the-blanks task graded positionally against `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillTask {
    pub word_bank: Vec<String>,
    pub items: Vec<FillItem>,
}

/// Lesson-embedded quiz question answered by a zero-based option index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonQuestion {
    pub q: String,
    pub options: Vec<String>,
    pub answer_index: usize,
}

/// A complete reading lesson document, read-only at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub vocabulary: Vec<VocabItem>,
    #[serde(default)]
    pub reading_text: Vec<String>,
    #[serde(default)]
    pub discussion_questions: Vec<String>,
    #[serde(default)]
    pub quiz: Vec<LessonQuestion>,
    pub task1_match: MatchTask,
    pub task2_fill: FillTask,
    #[serde(default)]
    pub task3_discussion: Vec<String>,
}

/// Slug/title pair for the lesson picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonSummary {
    pub slug: String,
    pub title: String,
}

/// Injected store handle dispatching to the configured backend.
#[derive(Debug)]
pub enum Store {
    Mongo(MongoStore),
    Memory(MemoryStore),
}

impl Store {
    /// Case-insensitive exact lookup by word key.
    pub async fn find_word(&self, word: &str) -> Result<Option<DictionaryEntry>> {
        match self {
            Store::Mongo(s) => s.find_word(word).await,
            Store::Memory(s) => Ok(s.find_word(word)),
        }
    }

    /// Insert-or-update by word key, overwriting synonyms and translations.
    pub async fn upsert_word(&self, entry: &DictionaryEntry) -> Result<()> {
        match self {
            Store::Mongo(s) => s.upsert_word(entry).await,
            Store::Memory(s) => {
                s.upsert_word(entry);
                Ok(())
            }
        }
    }

    /// All word keys starting with the given uppercase letter, sorted ascending.
    pub async fn words_by_letter(&self, letter: char) -> Result<Vec<String>> {
        match self {
            Store::Mongo(s) => s.words_by_letter(letter).await,
            Store::Memory(s) => Ok(s.words_by_letter(letter)),
        }
    }

    /// Every word key in the dictionary.
    pub async fn all_words(&self) -> Result<Vec<String>> {
        match self {
            Store::Mongo(s) => s.all_words().await,
            Store::Memory(s) => Ok(s.all_words()),
        }
    }

    /// Uniform random entry, `None` when the dictionary is empty.
    pub async fn random_word(&self) -> Result<Option<DictionaryEntry>> {
        match self {
            Store::Mongo(s) => s.random_word().await,
            Store::Memory(s) => Ok(s.random_word()),
        }
    }

    /// Words of the thematic category, sorted ascending.
    pub async fn topic_words(&self) -> Result<Vec<String>> {
        match self {
            Store::Mongo(s) => s.topic_words().await,
            Store::Memory(s) => Ok(s.topic_words()),
        }
    }

    /// Question list of a numbered general quiz section.
    pub async fn quiz_section(&self, section: i64) -> Result<Option<Vec<QuizQuestion>>> {
        match self {
            Store::Mongo(s) => s.quiz_section(section).await,
            Store::Memory(s) => Ok(s.quiz_section(section)),
        }
    }

    /// Topic quiz section names, deduplicated in collection order.
    pub async fn topic_quiz_sections(&self) -> Result<Vec<String>> {
        match self {
            Store::Mongo(s) => s.topic_quiz_sections().await,
            Store::Memory(s) => Ok(s.topic_quiz_sections()),
        }
    }

    /// Question list of a named topic quiz section.
    pub async fn topic_quiz(&self, section: &str) -> Result<Option<Vec<QuizQuestion>>> {
        match self {
            Store::Mongo(s) => s.topic_quiz(section).await,
            Store::Memory(s) => Ok(s.topic_quiz(section)),
        }
    }

    /// Slug/title pairs of all reading lessons.
    pub async fn lessons(&self) -> Result<Vec<LessonSummary>> {
        match self {
            Store::Mongo(s) => s.lessons().await,
            Store::Memory(s) => Ok(s.lessons()),
        }
    }

    /// Full lesson document by slug.
    pub async fn lesson(&self, slug: &str) -> Result<Option<Lesson>> {
        match self {
            Store::Mongo(s) => s.lesson(slug).await,
            Store::Memory(s) => Ok(s.lesson(slug)),
        }
    }
}
