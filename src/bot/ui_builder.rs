//! UI Builder module for creating keyboards and formatting messages.
//!
//! Callback payloads are colon-delimited `namespace:action:args` tokens,
//! parsed back in the callback handler.

use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
};

use crate::lesson::Stage;
use crate::localization::{t, t_args};
use crate::store::{DictionaryEntry, Lesson, LessonQuestion, LessonSummary, QuizQuestion};

/// Persistent reply keyboard listing every command.
pub fn main_keyboard() -> KeyboardMarkup {
    let rows = vec![
        vec![KeyboardButton::new("/help"), KeyboardButton::new("/start")],
        vec![KeyboardButton::new("/list"), KeyboardButton::new("/add_word")],
        vec![
            KeyboardButton::new("/random_word"),
            KeyboardButton::new("/flashcards"),
        ],
        vec![
            KeyboardButton::new("/start_quiz"),
            KeyboardButton::new("/reading"),
        ],
    ];
    let mut keyboard = KeyboardMarkup::new(rows);
    keyboard.resize_keyboard = true;
    keyboard
}

/// A–Z letter grid, six per row, with the thematic category underneath.
pub fn alphabet_keyboard() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    let letters: Vec<char> = ('A'..='Z').collect();
    for chunk in letters.chunks(6) {
        rows.push(
            chunk
                .iter()
                .map(|l| InlineKeyboardButton::callback(l.to_string(), format!("dict:letter:{}", l)))
                .collect(),
        );
    }
    rows.push(vec![InlineKeyboardButton::callback(
        t("btn-topic-words"),
        "dict:topic".to_string(),
    )]);
    InlineKeyboardMarkup::new(rows)
}

pub fn confirmation_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(t("btn-confirm"), "addword:confirm".to_string()),
        InlineKeyboardButton::callback(t("btn-cancel"), "addword:cancel".to_string()),
    ]])
}

pub fn cancel_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        t("btn-cancel"),
        "addword:cancel".to_string(),
    )]])
}

pub fn flashcard_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback(t("btn-prev-word"), "cards:prev".to_string()),
            InlineKeyboardButton::callback(t("btn-next-word"), "cards:next".to_string()),
        ],
        vec![InlineKeyboardButton::callback(
            t("btn-exit"),
            "cards:exit".to_string(),
        )],
    ])
}

/// Twenty numbered general quiz sections, six per row, plus the switch to
/// topic quizzes.
pub fn general_quiz_keyboard() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    let numbers: Vec<u32> = (1..=20).collect();
    for chunk in numbers.chunks(6) {
        rows.push(
            chunk
                .iter()
                .map(|n| {
                    InlineKeyboardButton::callback(n.to_string(), format!("quiz:section:{}", n))
                })
                .collect(),
        );
    }
    rows.push(vec![InlineKeyboardButton::callback(
        t("btn-topic-quizzes"),
        "quiz:topics".to_string(),
    )]);
    InlineKeyboardMarkup::new(rows)
}

/// One full-width button per topic section, plus the way back.
pub fn topic_quiz_keyboard(sections: &[String]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = sections
        .iter()
        .map(|section| {
            vec![InlineKeyboardButton::callback(
                section.clone(),
                format!("quiz:topic:{}", section),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        t("btn-general-quizzes"),
        "quiz:sections".to_string(),
    )]);
    InlineKeyboardMarkup::new(rows)
}

/// One button per answer option, keyed by the option's first character,
/// with an exit row underneath.
pub fn quiz_options_keyboard(question: &QuizQuestion) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = question
        .options
        .iter()
        .map(|option| {
            let letter = option.chars().next().unwrap_or('?');
            vec![InlineKeyboardButton::callback(
                option.clone(),
                format!("quiz:answer:{}", letter),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        t("btn-exit-quiz"),
        "quiz:exit".to_string(),
    )]);
    InlineKeyboardMarkup::new(rows)
}

pub fn lessons_keyboard(lessons: &[LessonSummary]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(lessons.iter().map(|lesson| {
        vec![InlineKeyboardButton::callback(
            lesson.title.clone(),
            format!("lesson:open:{}", lesson.slug),
        )]
    }))
}

/// Stage navigation: no "back" at the first stage, no "forward" at the
/// last, the lesson list always reachable.
pub fn lesson_nav_keyboard(stage_idx: usize, slug: &str) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    let mut nav_row = Vec::new();
    if stage_idx > 0 {
        nav_row.push(InlineKeyboardButton::callback(
            t("btn-back"),
            format!("lesson:nav:{}:{}", slug, stage_idx - 1),
        ));
    }
    if stage_idx < Stage::last_index() {
        nav_row.push(InlineKeyboardButton::callback(
            t("btn-next"),
            format!("lesson:nav:{}:{}", slug, stage_idx + 1),
        ));
    }
    if !nav_row.is_empty() {
        rows.push(nav_row);
    }
    rows.push(vec![InlineKeyboardButton::callback(
        t("btn-lesson-list"),
        "lesson:list".to_string(),
    )]);
    InlineKeyboardMarkup::new(rows)
}

/// A/B/C/D answer buttons for one lesson quiz question.
pub fn lesson_quiz_keyboard(q_index: usize, question: &LessonQuestion) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new((0..question.options.len()).map(|i| {
        let letter = (b'A' + i as u8) as char;
        vec![InlineKeyboardButton::callback(
            letter.to_string(),
            format!("lesson:answer:{}:{}", q_index, i),
        )]
    }))
}

/// Escape text for Telegram MarkdownV2.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '=' | '|'
                | '{' | '}' | '.' | '!'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn synonyms_display(entry: &DictionaryEntry) -> String {
    if entry.synonyms.is_empty() {
        t("no-synonyms")
    } else {
        entry.synonyms.join(", ")
    }
}

fn translation_display(value: &str) -> String {
    if value.is_empty() {
        t("no-translation")
    } else {
        value.to_string()
    }
}

/// Word card shown on exact lookup hits (Markdown).
pub fn format_word_card(entry: &DictionaryEntry) -> String {
    t_args(
        "word-card",
        &[
            ("word", &entry.word),
            ("synonyms", &synonyms_display(entry)),
            ("ru", &translation_display(&entry.ru)),
            ("kz", &translation_display(&entry.kz)),
        ],
    )
}

pub fn format_random_word_card(entry: &DictionaryEntry) -> String {
    t_args(
        "random-word-card",
        &[
            ("word", &entry.word),
            ("synonyms", &synonyms_display(entry)),
            ("ru", &translation_display(&entry.ru)),
            ("kz", &translation_display(&entry.kz)),
        ],
    )
}

/// Flashcard with answers hidden behind MarkdownV2 spoilers.
pub fn format_flashcard(entry: &DictionaryEntry) -> String {
    t_args(
        "flashcard-card",
        &[
            ("word", &escape_markdown_v2(&entry.word)),
            ("synonyms", &escape_markdown_v2(&synonyms_display(entry))),
            ("ru", &escape_markdown_v2(&translation_display(&entry.ru))),
            ("kz", &escape_markdown_v2(&translation_display(&entry.kz))),
        ],
    )
}

/// "Did you mean" reply for lookup misses.
pub fn format_not_found(word: &str, suggestions: &[String]) -> String {
    let listed = suggestions
        .iter()
        .map(|s| format!("🔹 {}", s))
        .collect::<Vec<_>>()
        .join("\n");
    t_args("word-not-found", &[("word", word), ("suggestions", &listed)])
}

/// Bulleted word list under a heading.
pub fn format_word_list(heading: &str, words: &[String]) -> String {
    let listed = words
        .iter()
        .map(|w| format!("🔹 {}", w))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n\n{}", heading, listed)
}

/// Draft summary presented at the add-word confirmation step.
pub fn format_draft_review(draft: &DictionaryEntry) -> String {
    t_args(
        "addword-review",
        &[
            ("word", &draft.word),
            ("synonyms", &draft.synonyms.join(", ")),
            ("ru", &draft.ru),
            ("kz", &draft.kz),
        ],
    )
}

/// One quiz question with its one-based number.
pub fn format_quiz_question(number: usize, question: &QuizQuestion) -> String {
    t_args(
        "quiz-question",
        &[
            ("number", &number.to_string()),
            ("question", &question.question),
        ],
    )
}

/// Lesson quiz question with lettered options (Markdown).
pub fn format_lesson_question(q_index: usize, question: &LessonQuestion) -> String {
    let options = question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| format!("{}) {}", (b'A' + i as u8) as char, option))
        .collect::<Vec<_>>()
        .join("\n");
    format!("*Q{}.* {}\n\n{}", q_index + 1, question.q, options)
}

/// Task 1 body: numbered left column and lettered options.
pub fn format_task1(lesson: &Lesson) -> String {
    let list = lesson
        .task1_match
        .left
        .iter()
        .enumerate()
        .map(|(i, word)| format!("{}) {}", i + 1, word))
        .collect::<Vec<_>>()
        .join("\n");
    let options = lesson
        .task1_match
        .right
        .iter()
        .map(|(letter, definition)| format!("{}) {}", letter, definition))
        .collect::<Vec<_>>()
        .join("\n");
    t_args("lesson-task1", &[("list", &list), ("options", &options)])
}

/// Task 2 body: word bank and numbered blanks.
pub fn format_task2(lesson: &Lesson) -> String {
    let bank = lesson.task2_fill.word_bank.join(", ");
    let items = lesson
        .task2_fill
        .items
        .iter()
        .map(|item| format!("{}) {}", item.n, item.text))
        .collect::<Vec<_>>()
        .join("\n");
    t_args("lesson-task2", &[("bank", &bank), ("items", &items)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> DictionaryEntry {
        DictionaryEntry {
            word: "Rock".to_string(),
            synonyms: vec!["stone".to_string()],
            ru: "камень".to_string(),
            kz: "тас".to_string(),
        }
    }

    #[test]
    fn word_card_contains_translations_and_synonyms() {
        let card = format_word_card(&entry());
        assert!(card.contains("Rock"));
        assert!(card.contains("stone"));
        assert!(card.contains("камень"));
        assert!(card.contains("тас"));
    }

    #[test]
    fn markdown_v2_escaping() {
        assert_eq!(escape_markdown_v2("a.b-c!"), "a\\.b\\-c\\!");
        assert_eq!(escape_markdown_v2("plain"), "plain");
    }

    #[test]
    fn flashcard_hides_answers_in_spoilers() {
        let card = format_flashcard(&entry());
        assert!(card.contains("||stone||"));
        assert!(card.contains("||камень||"));
    }

    #[test]
    fn main_keyboard_lists_every_command_and_resizes() {
        let keyboard = main_keyboard();
        assert!(keyboard.resize_keyboard);
        let buttons: usize = keyboard.keyboard.iter().map(|r| r.len()).sum();
        assert_eq!(buttons, 8);
    }

    #[test]
    fn alphabet_keyboard_has_26_letters_and_topic_row() {
        let keyboard = alphabet_keyboard();
        let buttons: usize = keyboard.inline_keyboard.iter().map(|r| r.len()).sum();
        assert_eq!(buttons, 27);
    }

    #[test]
    fn nav_keyboard_boundary_policy() {
        let first = lesson_nav_keyboard(0, "mining");
        // nav row has only "next"; the list row is separate
        assert_eq!(first.inline_keyboard[0].len(), 1);

        let last = lesson_nav_keyboard(Stage::last_index(), "mining");
        assert_eq!(last.inline_keyboard[0].len(), 1);

        let middle = lesson_nav_keyboard(3, "mining");
        assert_eq!(middle.inline_keyboard[0].len(), 2);
    }

    #[test]
    fn general_quiz_keyboard_lists_20_sections() {
        let keyboard = general_quiz_keyboard();
        let buttons: usize = keyboard.inline_keyboard.iter().map(|r| r.len()).sum();
        assert_eq!(buttons, 21);
    }
}
