//! Reading-lesson stages and task grading.
//!
//! A lesson walks through seven fixed stages; navigation moves one stage at
//! a time and re-renders a single reusable message. Task 1 and Task 2 grade
//! free-text answers, degrading malformed input to misses rather than errors.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::store::{FillItem, MatchTask};

/// The fixed stage order of every lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vocab,
    Text,
    Discussion,
    Quiz,
    Task1,
    Task2,
    Task3,
}

pub const STAGES: [Stage; 7] = [
    Stage::Vocab,
    Stage::Text,
    Stage::Discussion,
    Stage::Quiz,
    Stage::Task1,
    Stage::Task2,
    Stage::Task3,
];

impl Stage {
    pub fn from_index(index: usize) -> Option<Stage> {
        STAGES.get(index).copied()
    }

    pub fn last_index() -> usize {
        STAGES.len() - 1
    }
}

/// `1-d, 2:e` style pairs; letters limited to the option range a-j.
static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*[-:]\s*([a-jA-J])").unwrap()
});

/// Splits task-2 answers on commas, semicolons, and newlines.
static TOKEN_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,\n;]+").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct Task1Result {
    pub correct: usize,
    pub total: usize,
}

/// Grade a task-1 answer string against the lesson's answer key.
///
/// Pairs are regex-extracted; anything unparseable simply never matches.
/// When the same item number appears twice the later pair wins.
pub fn grade_task1(task: &MatchTask, input: &str) -> Task1Result {
    let submitted: HashMap<String, String> = PAIR_RE
        .captures_iter(input)
        .map(|cap| (cap[1].to_string(), cap[2].to_lowercase()))
        .collect();

    let correct = task
        .answer_key
        .iter()
        .filter(|(number, letter)| {
            submitted.get(number.as_str()).map(|s| s.as_str()) == Some(letter.to_lowercase().as_str())
        })
        .count();

    Task1Result {
        correct,
        total: task.answer_key.len(),
    }
}

/// Per-item grading outcome of a task-2 answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Task2Row {
    pub number: u32,
    pub guess: Option<String>,
    pub answer: String,
    pub is_correct: bool,
}

/// Grade task-2 tokens positionally against the ordered item list.
/// Fewer tokens than items count as misses for the remaining items.
pub fn grade_task2(items: &[FillItem], input: &str) -> Vec<Task2Row> {
    let tokens: Vec<String> = TOKEN_SPLIT_RE
        .split(input)
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let answer = item.answer.to_lowercase();
            let guess = tokens.get(i).cloned();
            let is_correct = guess.as_deref() == Some(answer.as_str());
            Task2Row {
                number: item.n,
                guess,
                answer,
                is_correct,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn match_task(key: &[(&str, &str)]) -> MatchTask {
        MatchTask {
            left: vec!["mining".to_string(), "sediment".to_string()],
            right: BTreeMap::new(),
            answer_key: key
                .iter()
                .map(|(n, l)| (n.to_string(), l.to_string()))
                .collect(),
        }
    }

    fn fill_items(answers: &[&str]) -> Vec<FillItem> {
        answers
            .iter()
            .enumerate()
            .map(|(i, a)| FillItem {
                n: (i + 1) as u32,
                text: format!("blank {}", i + 1),
                answer: a.to_string(),
            })
            .collect()
    }

    #[test]
    fn stage_order_is_fixed() {
        assert_eq!(Stage::from_index(0), Some(Stage::Vocab));
        assert_eq!(Stage::from_index(3), Some(Stage::Quiz));
        assert_eq!(Stage::from_index(6), Some(Stage::Task3));
        assert_eq!(Stage::from_index(7), None);
        assert_eq!(Stage::last_index(), 6);
    }

    #[test]
    fn task1_full_credit() {
        let task = match_task(&[("1", "d"), ("2", "e")]);
        let result = grade_task1(&task, "1-d, 2-e");
        assert_eq!(result, Task1Result { correct: 2, total: 2 });
    }

    #[test]
    fn task1_is_case_insensitive_and_accepts_colons() {
        let task = match_task(&[("1", "d"), ("2", "e")]);
        let result = grade_task1(&task, "1 : D, 2:E");
        assert_eq!(result.correct, 2);
    }

    #[test]
    fn task1_malformed_pairs_just_miss() {
        let task = match_task(&[("1", "d"), ("2", "e")]);
        let result = grade_task1(&task, "garbage 1=d 2_e");
        assert_eq!(result, Task1Result { correct: 0, total: 2 });
    }

    #[test]
    fn task1_duplicate_number_takes_last_pair() {
        let task = match_task(&[("1", "d")]);
        assert_eq!(grade_task1(&task, "1-a, 1-d").correct, 1);
        assert_eq!(grade_task1(&task, "1-d, 1-a").correct, 0);
    }

    #[test]
    fn task2_grades_positionally() {
        let items = fill_items(&["mining", "sediment"]);
        let rows = grade_task2(&items, "Mining; sediment");
        assert!(rows[0].is_correct);
        assert!(rows[1].is_correct);
    }

    #[test]
    fn task2_short_answer_counts_missing_as_wrong() {
        let items = fill_items(&["a", "b"]);
        let rows = grade_task2(&items, "a");
        assert!(rows[0].is_correct);
        assert!(!rows[1].is_correct);
        assert_eq!(rows[1].guess, None);
    }

    #[test]
    fn task2_splits_on_newlines_and_skips_blanks() {
        let items = fill_items(&["one", "two", "three"]);
        let rows = grade_task2(&items, "one\n\n two,, three");
        assert!(rows.iter().all(|r| r.is_correct));
    }
}
