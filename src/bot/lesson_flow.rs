//! Reading-lesson flow: stage rendering over one reusable message, the
//! vocabulary image, task grading, and the lesson-embedded quiz.

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, InputFile, MessageId, ParseMode};
use tracing::warn;

use crate::dialogue::{FlowDialogue, FlowState};
use crate::lesson::{grade_task1, grade_task2, Stage};
use crate::localization::{t, t_args};
use crate::store::Lesson;
use crate::vocab_image::render_vocab_card;

use super::ui_builder::{
    format_lesson_question, format_task1, format_task2, lesson_nav_keyboard,
    lesson_quiz_keyboard,
};

/// Best-effort edit-in-place: edit the known message when possible, fall
/// back to sending a new one (stale or deleted messages reject edits).
/// Returns the id of the message now showing the text.
pub async fn edit_or_send(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<i32>,
    text: &str,
    keyboard: Option<InlineKeyboardMarkup>,
    parse_mode: Option<ParseMode>,
) -> Result<i32> {
    if let Some(mid) = message_id {
        let mut request = bot.edit_message_text(chat_id, MessageId(mid), text);
        if let Some(kb) = keyboard.clone() {
            request = request.reply_markup(kb);
        }
        if let Some(pm) = parse_mode {
            request = request.parse_mode(pm);
        }
        match request.await {
            Ok(edited) => return Ok(edited.id.0),
            Err(e) => warn!(message_id = mid, error = %e, "Edit failed, sending a new message"),
        }
    }

    let mut request = bot.send_message(chat_id, text);
    if let Some(kb) = keyboard {
        request = request.reply_markup(kb);
    }
    if let Some(pm) = parse_mode {
        request = request.parse_mode(pm);
    }
    let sent = request.await?;
    Ok(sent.id.0)
}

/// Best-effort delete; stale ids are expected and ignored.
pub async fn try_delete(bot: &Bot, chat_id: ChatId, message_id: Option<i32>) {
    if let Some(mid) = message_id {
        if let Err(e) = bot.delete_message(chat_id, MessageId(mid)).await {
            warn!(message_id = mid, error = %e, "Delete failed, ignoring");
        }
    }
}

/// The vocabulary image lives in its own message and is re-sent on every
/// visit to the vocab stage; rendering failures are swallowed so the
/// stage still shows its navigation text.
async fn refresh_vocab_photo(
    bot: &Bot,
    chat_id: ChatId,
    lesson: &Lesson,
    vocab_msg_id: Option<i32>,
) -> Option<i32> {
    let image = match render_vocab_card(&lesson.title, &lesson.vocabulary) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(slug = %lesson.slug, error = %e, "Vocabulary image rendering failed, skipping");
            return vocab_msg_id;
        }
    };

    try_delete(bot, chat_id, vocab_msg_id).await;

    let caption = t_args("lesson-vocab-caption", &[("title", &lesson.title)]);
    match bot
        .send_photo(chat_id, InputFile::memory(image).file_name("vocab.png"))
        .caption(caption)
        .await
    {
        Ok(sent) => Some(sent.id.0),
        Err(e) => {
            warn!(slug = %lesson.slug, error = %e, "Vocabulary photo send failed, skipping");
            None
        }
    }
}

/// Render one stage over the reusable stage message and store the updated
/// lesson position in the dialogue.
pub async fn send_stage(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: &FlowDialogue,
    lesson: &Lesson,
    stage_idx: usize,
    stage_msg_id: Option<i32>,
    vocab_msg_id: Option<i32>,
) -> Result<()> {
    let stage = match Stage::from_index(stage_idx) {
        Some(stage) => stage,
        None => return Ok(()),
    };
    let keyboard = lesson_nav_keyboard(stage_idx, &lesson.slug);

    let mut vocab_msg_id = vocab_msg_id;
    let (text, parse_mode) = match stage {
        Stage::Vocab => {
            vocab_msg_id = refresh_vocab_photo(bot, chat_id, lesson, vocab_msg_id).await;
            (t("lesson-vocab-nav"), None)
        }
        Stage::Text => (
            t_args("lesson-text", &[("body", &lesson.reading_text.join("\n\n"))]),
            Some(ParseMode::Markdown),
        ),
        Stage::Discussion => {
            let body = lesson
                .discussion_questions
                .iter()
                .enumerate()
                .map(|(i, q)| format!("{}. {}", i + 1, q))
                .collect::<Vec<_>>()
                .join("\n");
            (
                t_args("lesson-discussion", &[("body", &body)]),
                Some(ParseMode::Markdown),
            )
        }
        Stage::Quiz => (t("lesson-quiz-intro"), None),
        Stage::Task1 => (format_task1(lesson), Some(ParseMode::Markdown)),
        Stage::Task2 => (format_task2(lesson), Some(ParseMode::Markdown)),
        Stage::Task3 => {
            let body = lesson
                .task3_discussion
                .iter()
                .enumerate()
                .map(|(i, q)| format!("{}. {}", i + 1, q))
                .collect::<Vec<_>>()
                .join("\n");
            (
                t_args("lesson-task3", &[("body", &body)]),
                Some(ParseMode::Markdown),
            )
        }
    };

    let stage_msg_id =
        Some(edit_or_send(bot, chat_id, stage_msg_id, &text, Some(keyboard), parse_mode).await?);

    if stage == Stage::Quiz && !lesson.quiz.is_empty() {
        // Entering the quiz stage starts the lesson quiz from scratch
        let quiz_msg_id =
            Some(send_lesson_question(bot, chat_id, lesson, 0, None).await?);
        dialogue
            .update(FlowState::LessonQuiz {
                slug: lesson.slug.clone(),
                stage_idx,
                stage_msg_id,
                vocab_msg_id,
                q_index: 0,
                score: 0,
                quiz_msg_id,
            })
            .await?;
    } else {
        dialogue
            .update(FlowState::Lesson {
                slug: lesson.slug.clone(),
                stage_idx,
                stage_msg_id,
                vocab_msg_id,
            })
            .await?;
    }

    Ok(())
}

/// The quiz question lives in its own message, re-sent per question.
async fn send_lesson_question(
    bot: &Bot,
    chat_id: ChatId,
    lesson: &Lesson,
    q_index: usize,
    quiz_msg_id: Option<i32>,
) -> Result<i32> {
    try_delete(bot, chat_id, quiz_msg_id).await;

    let question = &lesson.quiz[q_index];
    let sent = bot
        .send_message(chat_id, format_lesson_question(q_index, question))
        .parse_mode(ParseMode::Markdown)
        .reply_markup(lesson_quiz_keyboard(q_index, question))
        .await?;
    Ok(sent.id.0)
}

/// Alert text limit leaves room for the verdict prefix.
const MAX_ALERT_OPTION_LEN: usize = 220;

/// Grade one lesson quiz answer, alert the verdict, and either show the
/// next question or close the quiz and restore stage navigation.
#[allow(clippy::too_many_arguments)]
pub async fn handle_lesson_answer(
    bot: &Bot,
    q: &CallbackQuery,
    dialogue: &FlowDialogue,
    lesson: &Lesson,
    stage_idx: usize,
    stage_msg_id: Option<i32>,
    vocab_msg_id: Option<i32>,
    mut score: u32,
    quiz_msg_id: Option<i32>,
    answered_index: usize,
    chosen_option: usize,
) -> Result<()> {
    let chat_id = match q.message.as_ref() {
        Some(message) => message.chat().id,
        None => return Ok(()),
    };
    let question = match lesson.quiz.get(answered_index) {
        Some(question) => question,
        None => {
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        }
    };

    let is_correct = chosen_option == question.answer_index;
    if is_correct {
        score += 1;
    }

    let verdict = if is_correct {
        t("lesson-quiz-correct")
    } else {
        let letter = ((b'A' + question.answer_index as u8) as char).to_string();
        let mut text = question
            .options
            .get(question.answer_index)
            .cloned()
            .unwrap_or_default();
        if text.chars().count() > MAX_ALERT_OPTION_LEN {
            text = text.chars().take(MAX_ALERT_OPTION_LEN).collect::<String>() + "…";
        }
        t_args("lesson-quiz-wrong", &[("letter", &letter), ("text", &text)])
    };

    let next_index = answered_index + 1;

    if next_index < lesson.quiz.len() {
        if let Err(e) = bot
            .answer_callback_query(q.id.clone())
            .text(&verdict)
            .show_alert(true)
            .await
        {
            warn!(error = %e, "Verdict alert failed, continuing");
        }

        let quiz_msg_id =
            Some(send_lesson_question(bot, chat_id, lesson, next_index, quiz_msg_id).await?);
        dialogue
            .update(FlowState::LessonQuiz {
                slug: lesson.slug.clone(),
                stage_idx,
                stage_msg_id,
                vocab_msg_id,
                q_index: next_index,
                score,
                quiz_msg_id,
            })
            .await?;
        return Ok(());
    }

    // Last question: verdict and final score share one alert
    let result = t_args(
        "lesson-quiz-result",
        &[
            ("score", &score.to_string()),
            ("total", &lesson.quiz.len().to_string()),
        ],
    );
    if let Err(e) = bot
        .answer_callback_query(q.id.clone())
        .text(format!("{}\n\n{}", verdict, result))
        .show_alert(true)
        .await
    {
        warn!(error = %e, "Final verdict alert failed, continuing");
    }

    try_delete(bot, chat_id, quiz_msg_id).await;

    let stage_msg_id = Some(
        edit_or_send(
            bot,
            chat_id,
            stage_msg_id,
            &t("lesson-quiz-done"),
            Some(lesson_nav_keyboard(stage_idx, &lesson.slug)),
            None,
        )
        .await?,
    );
    dialogue
        .update(FlowState::Lesson {
            slug: lesson.slug.clone(),
            stage_idx,
            stage_msg_id,
            vocab_msg_id,
        })
        .await?;

    Ok(())
}

/// Free-text input while a lesson is open: grades task answers at the two
/// grading stages, ignores text elsewhere. The user's message is deleted
/// to keep the thread compact.
pub async fn handle_task_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &FlowDialogue,
    lesson: &Lesson,
    stage_idx: usize,
    stage_msg_id: Option<i32>,
    vocab_msg_id: Option<i32>,
    text: &str,
) -> Result<()> {
    let stage = match Stage::from_index(stage_idx) {
        Some(stage) => stage,
        None => return Ok(()),
    };
    if stage != Stage::Task1 && stage != Stage::Task2 {
        return Ok(());
    }

    try_delete(bot, msg.chat.id, Some(msg.id.0)).await;

    let body = match stage {
        Stage::Task1 => {
            let result = grade_task1(&lesson.task1_match, text);
            let details = lesson
                .task1_match
                .answer_key
                .iter()
                .map(|(n, l)| format!("{}-{}", n, l))
                .collect::<Vec<_>>()
                .join(", ");
            t_args(
                "task1-result",
                &[
                    ("correct", &result.correct.to_string()),
                    ("total", &result.total.to_string()),
                    ("details", &details),
                ],
            )
        }
        Stage::Task2 => {
            let rows = grade_task2(&lesson.task2_fill.items, text);
            let correct = rows.iter().filter(|r| r.is_correct).count();
            let listed = rows
                .iter()
                .map(|row| {
                    format!(
                        "{}) {} {} (ans: {})",
                        row.number,
                        if row.is_correct { "✅" } else { "❌" },
                        row.guess.as_deref().unwrap_or("—"),
                        row.answer
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            t_args(
                "task2-result",
                &[
                    ("correct", &correct.to_string()),
                    ("total", &rows.len().to_string()),
                    ("rows", &listed),
                ],
            )
        }
        _ => return Ok(()),
    };

    let stage_msg_id = Some(
        edit_or_send(
            bot,
            msg.chat.id,
            stage_msg_id,
            &body,
            Some(lesson_nav_keyboard(stage_idx, &lesson.slug)),
            None,
        )
        .await?,
    );
    dialogue
        .update(FlowState::Lesson {
            slug: lesson.slug.clone(),
            stage_idx,
            stage_msg_id,
            vocab_msg_id,
        })
        .await?;

    Ok(())
}
