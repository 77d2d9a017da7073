//! # Lesson Tests
//!
//! Walks a realistic lesson document through the store, the stage
//! sequence, and both free-text grading tasks.

use anyhow::Result;
use sozdik_bot::lesson::{grade_task1, grade_task2, Stage, STAGES};
use sozdik_bot::store::{
    FillItem, FillTask, Lesson, LessonQuestion, MatchTask, MemoryStore, Store, VocabItem,
};
use std::collections::BTreeMap;

fn mining_lesson() -> Lesson {
    let mut right = BTreeMap::new();
    right.insert("a".to_string(), "digging minerals out of the ground".to_string());
    right.insert("b".to_string(), "loose material carried by water".to_string());
    let mut answer_key = BTreeMap::new();
    answer_key.insert("1".to_string(), "a".to_string());
    answer_key.insert("2".to_string(), "b".to_string());

    Lesson {
        slug: "mining".to_string(),
        title: "Mining".to_string(),
        vocabulary: vec![VocabItem {
            term: "ore".to_string(),
            definition: "rock containing metal".to_string(),
            example: "iron ore".to_string(),
        }],
        reading_text: vec!["Mining is the extraction of valuable minerals.".to_string()],
        discussion_questions: vec!["Why do countries mine?".to_string()],
        quiz: vec![LessonQuestion {
            q: "What is ore?".to_string(),
            options: vec![
                "Rock containing metal".to_string(),
                "A kind of river".to_string(),
            ],
            answer_index: 0,
        }],
        task1_match: MatchTask {
            left: vec!["mining".to_string(), "sediment".to_string()],
            right,
            answer_key,
        },
        task2_fill: FillTask {
            word_bank: vec!["mining".to_string(), "sediment".to_string()],
            items: vec![
                FillItem {
                    n: 1,
                    text: "___ is the extraction of minerals.".to_string(),
                    answer: "mining".to_string(),
                },
                FillItem {
                    n: 2,
                    text: "Rivers carry ___ downstream.".to_string(),
                    answer: "sediment".to_string(),
                },
            ],
        },
        task3_discussion: vec!["Discuss mining in your region.".to_string()],
    }
}

#[test]
fn seven_stages_in_fixed_order() {
    assert_eq!(STAGES.len(), 7);
    assert_eq!(Stage::from_index(0), Some(Stage::Vocab));
    assert_eq!(Stage::from_index(Stage::last_index()), Some(Stage::Task3));
    assert_eq!(Stage::from_index(STAGES.len()), None);
}

#[tokio::test]
async fn lesson_lookup_by_slug() -> Result<()> {
    let memory = MemoryStore::new();
    memory.add_lesson(mining_lesson());
    let store = Store::Memory(memory);

    let summaries = store.lessons().await?;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].title, "Mining");

    let lesson = store.lesson("mining").await?.ok_or_else(|| anyhow::anyhow!("missing"))?;
    assert_eq!(lesson.quiz[0].answer_index, 0);
    assert!(store.lesson("unknown").await?.is_none());
    Ok(())
}

#[test]
fn task1_grading_against_lesson_answer_key() {
    let lesson = mining_lesson();

    let full = grade_task1(&lesson.task1_match, "1-a, 2-b");
    assert_eq!((full.correct, full.total), (2, 2));

    // sloppy separators and case still parse
    let sloppy = grade_task1(&lesson.task1_match, "1 : A\n2-B");
    assert_eq!(sloppy.correct, 2);

    let partial = grade_task1(&lesson.task1_match, "1-b, 2-b");
    assert_eq!(partial.correct, 1);

    let garbage = grade_task1(&lesson.task1_match, "no pairs at all");
    assert_eq!((garbage.correct, garbage.total), (0, 2));
}

#[test]
fn task2_grading_against_lesson_items() {
    let lesson = mining_lesson();

    let rows = grade_task2(&lesson.task2_fill.items, "Mining, Sediment");
    assert!(rows.iter().all(|r| r.is_correct));

    let short = grade_task2(&lesson.task2_fill.items, "mining");
    assert!(short[0].is_correct);
    assert!(!short[1].is_correct);
    assert_eq!(short[1].guess, None);
    assert_eq!(short[1].answer, "sediment");

    let swapped = grade_task2(&lesson.task2_fill.items, "sediment, mining");
    assert!(swapped.iter().all(|r| !r.is_correct));
}
