//! MongoDB backend for the document store.

use anyhow::{Context, Result};
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection, Database};
use serde::Deserialize;
use tracing::info;

use super::{DictionaryEntry, Lesson, LessonSummary, QuizQuestion};

/// General quiz document: one numbered section with its question list.
#[derive(Debug, Deserialize)]
struct QuizSectionDoc {
    #[allow(dead_code)]
    section: i64,
    #[serde(default)]
    questions: Vec<QuizQuestion>,
}

/// Topic quiz document: one named section with its question list.
#[derive(Debug, Deserialize)]
struct TopicQuizDoc {
    section: String,
    #[serde(default)]
    questions: Vec<QuizQuestion>,
}

#[derive(Debug, Deserialize)]
struct TopicWordDoc {
    word: String,
}

/// MongoDB-backed store over the bot's five collections.
#[derive(Debug)]
pub struct MongoStore {
    dictionary: Collection<DictionaryEntry>,
    quiz_data: Collection<QuizSectionDoc>,
    mining_words: Collection<TopicWordDoc>,
    mining_quizzes: Collection<TopicQuizDoc>,
    readings: Collection<Lesson>,
    db: Database,
}

impl MongoStore {
    /// Connect to MongoDB and bind the bot's collections.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .context("Failed to connect to MongoDB")?;
        let db = client.database(db_name);
        info!(db = %db_name, "Connected to MongoDB");

        Ok(Self {
            dictionary: db.collection("dictionary"),
            quiz_data: db.collection("quiz_data"),
            mining_words: db.collection("mining_words"),
            mining_quizzes: db.collection("mining_quizzes"),
            readings: db.collection("readings"),
            db,
        })
    }

    pub async fn find_word(&self, word: &str) -> Result<Option<DictionaryEntry>> {
        // Anchored case-insensitive regex keeps the stored key's original casing
        let pattern = format!("^{}$", regex::escape(word.trim()));
        let entry = self
            .dictionary
            .find_one(doc! { "word": { "$regex": pattern, "$options": "i" } })
            .await
            .context("Dictionary lookup failed")?;
        Ok(entry)
    }

    pub async fn upsert_word(&self, entry: &DictionaryEntry) -> Result<()> {
        self.dictionary
            .update_one(
                doc! { "word": entry.word.as_str() },
                doc! { "$set": {
                    "synonyms": entry.synonyms.clone(),
                    "ru": entry.ru.as_str(),
                    "kz": entry.kz.as_str(),
                } },
            )
            .upsert(true)
            .await
            .context("Dictionary upsert failed")?;
        Ok(())
    }

    pub async fn words_by_letter(&self, letter: char) -> Result<Vec<String>> {
        let pattern = format!("^{}", regex::escape(&letter.to_string()));
        let entries: Vec<DictionaryEntry> = self
            .dictionary
            .find(doc! { "word": { "$regex": pattern } })
            .sort(doc! { "word": 1 })
            .await
            .context("Letter browse query failed")?
            .try_collect()
            .await?;
        Ok(entries.into_iter().map(|e| e.word).collect())
    }

    pub async fn all_words(&self) -> Result<Vec<String>> {
        let values = self
            .dictionary
            .distinct("word", doc! {})
            .await
            .context("Distinct word query failed")?;
        Ok(values
            .into_iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect())
    }

    pub async fn random_word(&self) -> Result<Option<DictionaryEntry>> {
        let mut cursor = self
            .db
            .collection::<Document>("dictionary")
            .aggregate(vec![doc! { "$sample": { "size": 1 } }])
            .await
            .context("Random sample query failed")?;
        match cursor.try_next().await? {
            Some(document) => Ok(Some(mongodb::bson::from_document(document)?)),
            None => Ok(None),
        }
    }

    pub async fn topic_words(&self) -> Result<Vec<String>> {
        let docs: Vec<TopicWordDoc> = self
            .mining_words
            .find(doc! {})
            .await
            .context("Topic words query failed")?
            .try_collect()
            .await?;
        let mut words: Vec<String> = docs.into_iter().map(|d| d.word).collect();
        words.sort();
        Ok(words)
    }

    pub async fn quiz_section(&self, section: i64) -> Result<Option<Vec<QuizQuestion>>> {
        let doc = self
            .quiz_data
            .find_one(doc! { "section": section })
            .await
            .context("Quiz section lookup failed")?;
        Ok(doc.map(|d| d.questions))
    }

    pub async fn topic_quiz_sections(&self) -> Result<Vec<String>> {
        let docs: Vec<TopicQuizDoc> = self
            .mining_quizzes
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await
            .context("Topic quiz sections query failed")?
            .try_collect()
            .await?;

        // Deduplicate while keeping collection order
        let mut sections = Vec::new();
        for doc in docs {
            if !sections.contains(&doc.section) {
                sections.push(doc.section);
            }
        }
        Ok(sections)
    }

    pub async fn topic_quiz(&self, section: &str) -> Result<Option<Vec<QuizQuestion>>> {
        let doc = self
            .mining_quizzes
            .find_one(doc! { "section": section })
            .await
            .context("Topic quiz lookup failed")?;
        Ok(doc.map(|d| d.questions))
    }

    pub async fn lessons(&self) -> Result<Vec<LessonSummary>> {
        let docs: Vec<Document> = self
            .db
            .collection::<Document>("readings")
            .find(doc! {})
            .projection(doc! { "_id": 0, "slug": 1, "title": 1 })
            .await
            .context("Lesson list query failed")?
            .try_collect()
            .await?;
        Ok(docs
            .into_iter()
            .filter_map(|d| mongodb::bson::from_document(d).ok())
            .collect())
    }

    pub async fn lesson(&self, slug: &str) -> Result<Option<Lesson>> {
        let lesson = self
            .readings
            .find_one(doc! { "slug": slug })
            .await
            .context("Lesson lookup failed")?;
        Ok(lesson)
    }
}
