//! Quiz progression: question list, current index, running score.

use serde::{Deserialize, Serialize};

use crate::store::QuizQuestion;

/// Feedback for one answered question.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerVerdict {
    Correct,
    /// Carries the full stored correct-answer text for display.
    Wrong { correct_answer: String },
}

/// A running quiz held in session state between callback events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRun {
    pub questions: Vec<QuizQuestion>,
    pub current: usize,
    pub score: u32,
}

impl QuizRun {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current: 0,
            score: 0,
        }
    }

    /// The question awaiting an answer, `None` once the run is finished.
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.questions.len()
    }

    /// Grade the submitted option letter against the current question's
    /// correct answer (first characters compared), then advance.
    pub fn answer(&mut self, letter: &str) -> AnswerVerdict {
        let verdict = match self.current_question() {
            Some(question) => {
                let correct_letter = question.correct_answer.chars().next();
                let submitted_letter = letter.chars().next();
                if submitted_letter.is_some() && submitted_letter == correct_letter {
                    AnswerVerdict::Correct
                } else {
                    AnswerVerdict::Wrong {
                        correct_answer: question.correct_answer.clone(),
                    }
                }
            }
            None => AnswerVerdict::Wrong {
                correct_answer: String::new(),
            },
        };

        if verdict == AnswerVerdict::Correct {
            self.score += 1;
        }
        self.current += 1;
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, correct: &str) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: vec![
                "A) first".to_string(),
                "B) second".to_string(),
                "C) third".to_string(),
            ],
            correct_answer: correct.to_string(),
        }
    }

    #[test]
    fn correct_answer_increments_score() {
        let mut run = QuizRun::new(vec![question("q1", "B) second")]);
        assert_eq!(run.answer("B"), AnswerVerdict::Correct);
        assert_eq!(run.score, 1);
        assert!(run.is_finished());
    }

    #[test]
    fn wrong_answer_reports_correct_text() {
        let mut run = QuizRun::new(vec![question("q1", "A) first")]);
        let verdict = run.answer("C");
        assert_eq!(
            verdict,
            AnswerVerdict::Wrong {
                correct_answer: "A) first".to_string()
            }
        );
        assert_eq!(run.score, 0);
    }

    #[test]
    fn two_of_three_scenario() {
        let mut run = QuizRun::new(vec![
            question("q1", "A) first"),
            question("q2", "B) second"),
            question("q3", "C) third"),
        ]);
        run.answer("A");
        run.answer("B");
        run.answer("A");
        assert!(run.is_finished());
        assert_eq!(run.score, 2);
        assert_eq!(run.total(), 3);
    }

    #[test]
    fn score_never_exceeds_total() {
        let mut run = QuizRun::new(vec![question("q1", "A) first")]);
        run.answer("A");
        // Answering past the end neither scores nor panics
        run.answer("A");
        assert_eq!(run.score, 1);
        assert!(run.score as usize <= run.total());
    }

    #[test]
    fn advances_to_next_question() {
        let mut run = QuizRun::new(vec![question("q1", "A) first"), question("q2", "B) second")]);
        run.answer("A");
        assert_eq!(run.current_question().map(|q| q.question.as_str()), Some("q2"));
        assert!(!run.is_finished());
    }
}
