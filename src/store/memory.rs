//! In-memory backend: used by tests and by the flat-file dictionary variant.

use rand::seq::IteratorRandom;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::RwLock;
use tracing::{info, warn};

use super::{DictionaryEntry, Lesson, LessonSummary, QuizQuestion};

/// Process-local store over plain maps. Dictionary keys live in a sorted
/// map so letter browsing comes out in ascending order for free.
#[derive(Debug, Default)]
pub struct MemoryStore {
    dictionary: RwLock<BTreeMap<String, DictionaryEntry>>,
    topic_words: RwLock<Vec<String>>,
    quiz_sections: RwLock<HashMap<i64, Vec<QuizQuestion>>>,
    topic_quizzes: RwLock<Vec<(String, Vec<QuizQuestion>)>>,
    lessons: RwLock<Vec<Lesson>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dictionary from a flat text file of `Word (syn1, syn2) - ru - kz`
    /// lines. Malformed lines are logged and skipped.
    pub fn from_flat_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let store = Self::new();
        let mut loaded = 0usize;
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_dictionary_line(line) {
                Some(entry) => {
                    store.upsert_word(&entry);
                    loaded += 1;
                }
                None => warn!(line = %line, "Skipping malformed dictionary line"),
            }
        }
        info!(words = loaded, "Loaded flat-file dictionary");
        Ok(store)
    }

    pub fn find_word(&self, word: &str) -> Option<DictionaryEntry> {
        let needle = word.trim().to_lowercase();
        let dict = self.dictionary.read().unwrap();
        dict.values()
            .find(|e| e.word.to_lowercase() == needle)
            .cloned()
    }

    pub fn upsert_word(&self, entry: &DictionaryEntry) {
        let mut dict = self.dictionary.write().unwrap();
        dict.insert(entry.word.clone(), entry.clone());
    }

    pub fn words_by_letter(&self, letter: char) -> Vec<String> {
        let dict = self.dictionary.read().unwrap();
        dict.keys()
            .filter(|w| w.starts_with(letter))
            .cloned()
            .collect()
    }

    pub fn all_words(&self) -> Vec<String> {
        let dict = self.dictionary.read().unwrap();
        dict.keys().cloned().collect()
    }

    pub fn random_word(&self) -> Option<DictionaryEntry> {
        let dict = self.dictionary.read().unwrap();
        dict.values().choose(&mut rand::thread_rng()).cloned()
    }

    pub fn topic_words(&self) -> Vec<String> {
        let mut words = self.topic_words.read().unwrap().clone();
        words.sort();
        words
    }

    pub fn add_topic_word(&self, word: &str) {
        self.topic_words.write().unwrap().push(word.to_string());
    }

    pub fn quiz_section(&self, section: i64) -> Option<Vec<QuizQuestion>> {
        self.quiz_sections.read().unwrap().get(&section).cloned()
    }

    pub fn add_quiz_section(&self, section: i64, questions: Vec<QuizQuestion>) {
        self.quiz_sections
            .write()
            .unwrap()
            .insert(section, questions);
    }

    pub fn topic_quiz_sections(&self) -> Vec<String> {
        let quizzes = self.topic_quizzes.read().unwrap();
        let mut sections = Vec::new();
        for (section, _) in quizzes.iter() {
            if !sections.contains(section) {
                sections.push(section.clone());
            }
        }
        sections
    }

    pub fn topic_quiz(&self, section: &str) -> Option<Vec<QuizQuestion>> {
        let quizzes = self.topic_quizzes.read().unwrap();
        quizzes
            .iter()
            .find(|(name, _)| name == section)
            .map(|(_, questions)| questions.clone())
    }

    pub fn add_topic_quiz(&self, section: &str, questions: Vec<QuizQuestion>) {
        self.topic_quizzes
            .write()
            .unwrap()
            .push((section.to_string(), questions));
    }

    pub fn lessons(&self) -> Vec<LessonSummary> {
        let lessons = self.lessons.read().unwrap();
        lessons
            .iter()
            .map(|l| LessonSummary {
                slug: l.slug.clone(),
                title: l.title.clone(),
            })
            .collect()
    }

    pub fn lesson(&self, slug: &str) -> Option<Lesson> {
        let lessons = self.lessons.read().unwrap();
        lessons.iter().find(|l| l.slug == slug).cloned()
    }

    pub fn add_lesson(&self, lesson: Lesson) {
        self.lessons.write().unwrap().push(lesson);
    }
}

/// Parse one `Word (syn1, syn2) - ru - kz` line into an entry.
pub fn parse_dictionary_line(line: &str) -> Option<DictionaryEntry> {
    let (head, tail) = line.split_once(')')?;
    let (word, synonyms) = head.split_once('(')?;
    let tail = tail.strip_prefix(" -").unwrap_or(tail);
    let (ru, kz) = tail.split_once(" - ")?;

    let word = word.trim();
    if word.is_empty() {
        return None;
    }

    Some(DictionaryEntry {
        word: word.to_string(),
        synonyms: synonyms
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        ru: ru.trim().to_string(),
        kz: kz.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_line() {
        let entry = parse_dictionary_line("Rock (stone, boulder) - камень - тас").unwrap();
        assert_eq!(entry.word, "Rock");
        assert_eq!(entry.synonyms, vec!["stone", "boulder"]);
        assert_eq!(entry.ru, "камень");
        assert_eq!(entry.kz, "тас");
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_dictionary_line("no separators here").is_none());
        assert!(parse_dictionary_line("word (syn) no dash part").is_none());
        assert!(parse_dictionary_line("(syn) - ru - kz").is_none());
        assert!(parse_dictionary_line("").is_none());
    }

    #[test]
    fn keeps_translation_with_inner_dash() {
        let entry = parse_dictionary_line("Ore (mineral) - руда - кен - тас").unwrap();
        // Only the first ` - ` splits ru from kz, the rest stays in kz
        assert_eq!(entry.ru, "руда");
        assert_eq!(entry.kz, "кен - тас");
    }
}
