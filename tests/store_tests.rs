//! # Store Tests
//!
//! Exercises the injected store handle against the in-memory backend:
//! dictionary CRUD, letter browsing, quiz sections, and lesson lookup.

use anyhow::Result;
use sozdik_bot::store::{DictionaryEntry, MemoryStore, QuizQuestion, Store};
use std::io::Write;

fn entry(word: &str, synonyms: &[&str], ru: &str, kz: &str) -> DictionaryEntry {
    DictionaryEntry {
        word: word.to_string(),
        synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        ru: ru.to_string(),
        kz: kz.to_string(),
    }
}

fn question(text: &str, correct: &str) -> QuizQuestion {
    QuizQuestion {
        question: text.to_string(),
        options: vec!["A) yes".to_string(), "B) no".to_string()],
        correct_answer: correct.to_string(),
    }
}

#[tokio::test]
async fn upsert_then_lookup_returns_entry_verbatim() -> Result<()> {
    let store = Store::Memory(MemoryStore::new());
    let rock = entry("Rock", &["stone", "boulder"], "камень", "тас");

    store.upsert_word(&rock).await?;
    let found = store.find_word("Rock").await?;
    assert_eq!(found, Some(rock));
    Ok(())
}

#[tokio::test]
async fn lookup_is_case_insensitive_and_trims() -> Result<()> {
    let store = Store::Memory(MemoryStore::new());
    store.upsert_word(&entry("Rock", &[], "камень", "тас")).await?;

    assert!(store.find_word("rock").await?.is_some());
    assert!(store.find_word("  ROCK  ").await?.is_some());
    assert!(store.find_word("rocky").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn upsert_replaces_existing_entry() -> Result<()> {
    let store = Store::Memory(MemoryStore::new());
    store.upsert_word(&entry("Ore", &[], "руда", "кен")).await?;
    store
        .upsert_word(&entry("Ore", &["mineral"], "руда", "кен"))
        .await?;

    let found = store.find_word("ore").await?.ok_or_else(|| anyhow::anyhow!("missing"))?;
    assert_eq!(found.synonyms, vec!["mineral"]);
    assert_eq!(store.all_words().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn letter_browse_is_sorted_and_filtered() -> Result<()> {
    let store = Store::Memory(MemoryStore::new());
    for (word, ru) in [("Rock", "камень"), ("River", "река"), ("Ore", "руда")] {
        store.upsert_word(&entry(word, &[], ru, "")).await?;
    }

    assert_eq!(store.words_by_letter('R').await?, vec!["River", "Rock"]);
    assert!(store.words_by_letter('Z').await?.is_empty());
    assert_eq!(store.all_words().await?, vec!["Ore", "River", "Rock"]);
    Ok(())
}

#[tokio::test]
async fn random_word_on_empty_dictionary_is_none() -> Result<()> {
    let store = Store::Memory(MemoryStore::new());
    assert!(store.random_word().await?.is_none());

    store.upsert_word(&entry("Rock", &[], "камень", "тас")).await?;
    assert_eq!(store.random_word().await?.map(|e| e.word), Some("Rock".to_string()));
    Ok(())
}

#[tokio::test]
async fn quiz_sections_are_looked_up_by_number() -> Result<()> {
    let memory = MemoryStore::new();
    memory.add_quiz_section(3, vec![question("q", "A) yes")]);
    let store = Store::Memory(memory);

    assert!(store.quiz_section(3).await?.is_some());
    assert!(store.quiz_section(4).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn topic_quiz_sections_keep_insertion_order_and_dedupe() -> Result<()> {
    let memory = MemoryStore::new();
    memory.add_topic_quiz("Mining", vec![question("q1", "A) yes")]);
    memory.add_topic_quiz("Geology", vec![question("q2", "B) no")]);
    memory.add_topic_quiz("Mining", vec![question("q3", "A) yes")]);
    let store = Store::Memory(memory);

    assert_eq!(store.topic_quiz_sections().await?, vec!["Mining", "Geology"]);
    // Named lookup returns the first matching section
    let mining = store.topic_quiz("Mining").await?.ok_or_else(|| anyhow::anyhow!("missing"))?;
    assert_eq!(mining[0].question, "q1");
    assert!(store.topic_quiz("Physics").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn flat_file_loads_entries_and_skips_bad_lines() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "Rock (stone, boulder) - камень - тас")?;
    writeln!(file, "this line is malformed")?;
    writeln!(file)?;
    writeln!(file, "Ore (mineral) - руда - кен")?;

    let store = Store::Memory(MemoryStore::from_flat_file(file.path())?);
    assert_eq!(store.all_words().await?, vec!["Ore", "Rock"]);
    let rock = store.find_word("rock").await?.ok_or_else(|| anyhow::anyhow!("missing"))?;
    assert_eq!(rock.synonyms, vec!["stone", "boulder"]);
    assert_eq!(rock.kz, "тас");
    Ok(())
}

#[tokio::test]
async fn topic_words_come_back_sorted() -> Result<()> {
    let memory = MemoryStore::new();
    memory.add_topic_word("Shaft");
    memory.add_topic_word("Drill");
    let store = Store::Memory(memory);

    assert_eq!(store.topic_words().await?, vec!["Drill", "Shaft"]);
    Ok(())
}
