//! Callback query handler.
//!
//! Payloads are colon-delimited `namespace:action:args` tokens produced by
//! `ui_builder`. Topic names may themselves contain colons, so splitting
//! stops after the action.

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};
use tracing::{info, warn};

use crate::dialogue::{FlowDialogue, FlowState};
use crate::localization::{t, t_args};
use crate::quiz::{AnswerVerdict, QuizRun};
use crate::store::Store;

use super::lesson_flow;
use super::message_handler::send_flashcard;
use super::ui_builder::{
    format_quiz_question, format_word_list, general_quiz_keyboard, lessons_keyboard,
    quiz_options_keyboard, topic_quiz_keyboard,
};

/// Main callback entry point.
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: FlowDialogue,
    store: Arc<Store>,
) -> Result<()> {
    let data = match q.data.as_deref() {
        Some(data) => data.to_string(),
        None => return Ok(()),
    };
    let message = match q.message.as_ref() {
        Some(message) => message,
        None => return Ok(()),
    };
    let chat_id = message.chat().id;
    let msg_id = message.id().0;

    let mut parts = data.splitn(3, ':');
    let namespace = parts.next().unwrap_or("");
    let action = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("");

    info!(user_id = %q.from.id, callback = %data, "Callback received");

    match namespace {
        "dict" => handle_dict(&bot, &q, &store, chat_id, action, args).await,
        "addword" => handle_addword(&bot, &q, &dialogue, &store, chat_id, msg_id, action).await,
        "cards" => handle_cards(&bot, &q, &dialogue, &store, chat_id, action).await,
        "quiz" => handle_quiz(&bot, &q, &dialogue, &store, chat_id, msg_id, action, args).await,
        "lesson" => handle_lesson(&bot, &q, &dialogue, &store, chat_id, msg_id, action, args).await,
        _ => {
            warn!(callback = %data, "Unrecognized callback payload");
            ack(&bot, &q).await
        }
    }
}

/// Plain acknowledgement that stops the button spinner.
async fn ack(bot: &Bot, q: &CallbackQuery) -> Result<()> {
    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

/// Pop-up alert shown over the chat.
async fn alert(bot: &Bot, q: &CallbackQuery, text: &str) -> Result<()> {
    bot.answer_callback_query(q.id.clone())
        .text(text)
        .show_alert(true)
        .await?;
    Ok(())
}

async fn handle_dict(
    bot: &Bot,
    q: &CallbackQuery,
    store: &Store,
    chat_id: ChatId,
    action: &str,
    args: &str,
) -> Result<()> {
    let (heading_key, empty_key, words) = match action {
        "letter" => {
            let letter = match args.chars().next() {
                Some(letter) => letter,
                None => return ack(bot, q).await,
            };
            let words = store.words_by_letter(letter).await?;
            ("letter-words-heading", "letter-words-empty", words)
        }
        "topic" => ("topic-words-heading", "topic-words-empty", store.topic_words().await?),
        _ => return ack(bot, q).await,
    };

    ack(bot, q).await?;
    if words.is_empty() {
        bot.send_message(chat_id, t_args(empty_key, &[("letter", args)]))
            .parse_mode(ParseMode::Markdown)
            .await?;
    } else {
        let heading = t_args(heading_key, &[("letter", args)]);
        bot.send_message(chat_id, format_word_list(&heading, &words))
            .parse_mode(ParseMode::Markdown)
            .await?;
    }
    Ok(())
}

async fn handle_addword(
    bot: &Bot,
    q: &CallbackQuery,
    dialogue: &FlowDialogue,
    store: &Store,
    chat_id: ChatId,
    msg_id: i32,
    action: &str,
) -> Result<()> {
    let state = dialogue.get().await?.unwrap_or_default();

    match action {
        "confirm" => {
            let draft = match state {
                FlowState::AwaitingConfirmation { draft } => draft,
                _ => return ack(bot, q).await,
            };
            store.upsert_word(&draft).await?;
            info!(word = %draft.word, "Dictionary entry saved");
            ack(bot, q).await?;
            bot.edit_message_text(chat_id, MessageId(msg_id), t("addword-saved"))
                .await?;
            dialogue.exit().await?;
        }
        "cancel" => {
            // A stale cancel button must not abort an unrelated flow
            if !state.is_add_word() {
                return ack(bot, q).await;
            }
            ack(bot, q).await?;
            bot.edit_message_text(chat_id, MessageId(msg_id), t("operation-cancelled"))
                .await?;
            dialogue.exit().await?;
        }
        _ => return ack(bot, q).await,
    }
    Ok(())
}

async fn handle_cards(
    bot: &Bot,
    q: &CallbackQuery,
    dialogue: &FlowDialogue,
    store: &Store,
    chat_id: ChatId,
    action: &str,
) -> Result<()> {
    let (words, current_index, message_id) = match dialogue.get().await?.unwrap_or_default() {
        FlowState::Flashcards {
            words,
            current_index,
            message_id,
        } => (words, current_index, message_id),
        // Stale buttons on a card from a finished session
        _ => return ack(bot, q).await,
    };

    match action {
        "exit" => {
            ack(bot, q).await?;
            lesson_flow::try_delete(bot, chat_id, message_id).await;
            bot.send_message(chat_id, t("flashcards-exited")).await?;
            dialogue.exit().await?;
            return Ok(());
        }
        "next" | "prev" => {
            let len = words.len();
            let next_index = if action == "next" {
                (current_index + 1) % len
            } else {
                (current_index + len - 1) % len
            };
            ack(bot, q).await?;
            let new_id = send_flashcard(bot, chat_id, store, &words, next_index, message_id).await?;
            dialogue
                .update(FlowState::Flashcards {
                    words,
                    current_index: next_index,
                    message_id: Some(new_id),
                })
                .await?;
        }
        _ => return ack(bot, q).await,
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn handle_quiz(
    bot: &Bot,
    q: &CallbackQuery,
    dialogue: &FlowDialogue,
    store: &Store,
    chat_id: ChatId,
    msg_id: i32,
    action: &str,
    args: &str,
) -> Result<()> {
    let state = dialogue.get().await?.unwrap_or_default();

    match action {
        "section" | "topic" => {
            if state.is_active() {
                return alert(bot, q, &t("quiz-busy")).await;
            }
            let questions = if action == "section" {
                let section: i64 = match args.parse() {
                    Ok(section) if (1..=20).contains(&section) => section,
                    _ => return alert(bot, q, &t("quiz-bad-section")).await,
                };
                store.quiz_section(section).await?
            } else {
                store.topic_quiz(args).await?
            };
            let questions = match questions {
                Some(questions) if !questions.is_empty() => questions,
                _ => return alert(bot, q, &t("quiz-not-found")).await,
            };

            ack(bot, q).await?;
            let run = QuizRun::new(questions);
            show_quiz_question(bot, chat_id, msg_id, &run).await?;
            dialogue.update(FlowState::Quiz { run }).await?;
        }
        "topics" => {
            ack(bot, q).await?;
            let sections = store.topic_quiz_sections().await?;
            bot.edit_message_text(chat_id, MessageId(msg_id), t("quiz-choose-topic"))
                .reply_markup(topic_quiz_keyboard(&sections))
                .await?;
        }
        "sections" => {
            ack(bot, q).await?;
            bot.edit_message_text(chat_id, MessageId(msg_id), t("quiz-choose-section"))
                .reply_markup(general_quiz_keyboard())
                .await?;
        }
        "answer" => {
            let mut run = match state {
                FlowState::Quiz { run } => run,
                _ => return alert(bot, q, &t("quiz-exit-nothing")).await,
            };

            let verdict = match run.answer(args) {
                AnswerVerdict::Correct => t("quiz-correct"),
                AnswerVerdict::Wrong { correct_answer } => {
                    t_args("quiz-wrong", &[("answer", &correct_answer)])
                }
            };
            alert(bot, q, &verdict).await?;

            if run.is_finished() {
                let summary = t_args(
                    "quiz-finished",
                    &[
                        ("score", &run.score.to_string()),
                        ("total", &run.total().to_string()),
                    ],
                );
                bot.edit_message_text(chat_id, MessageId(msg_id), summary).await?;
                dialogue.exit().await?;
            } else {
                show_quiz_question(bot, chat_id, msg_id, &run).await?;
                dialogue.update(FlowState::Quiz { run }).await?;
            }
        }
        "exit" => {
            if !matches!(state, FlowState::Quiz { .. }) {
                return alert(bot, q, &t("quiz-exit-nothing")).await;
            }
            ack(bot, q).await?;
            bot.edit_message_text(chat_id, MessageId(msg_id), t("operation-cancelled"))
                .await?;
            dialogue.exit().await?;
        }
        _ => return ack(bot, q).await,
    }
    Ok(())
}

/// The quiz lives in one message, edited question by question.
async fn show_quiz_question(bot: &Bot, chat_id: ChatId, msg_id: i32, run: &QuizRun) -> Result<()> {
    let question = match run.current_question() {
        Some(question) => question,
        None => return Ok(()),
    };
    bot.edit_message_text(
        chat_id,
        MessageId(msg_id),
        format_quiz_question(run.current + 1, question),
    )
    .reply_markup(quiz_options_keyboard(question))
    .await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn handle_lesson(
    bot: &Bot,
    q: &CallbackQuery,
    dialogue: &FlowDialogue,
    store: &Store,
    chat_id: ChatId,
    msg_id: i32,
    action: &str,
    args: &str,
) -> Result<()> {
    let state = dialogue.get().await?.unwrap_or_default();

    match action {
        "list" => {
            // Leaving a lesson clears its companion messages
            if let FlowState::Lesson { vocab_msg_id, .. } = &state {
                lesson_flow::try_delete(bot, chat_id, *vocab_msg_id).await;
            }
            if let FlowState::LessonQuiz {
                vocab_msg_id,
                quiz_msg_id,
                ..
            } = &state
            {
                lesson_flow::try_delete(bot, chat_id, *vocab_msg_id).await;
                lesson_flow::try_delete(bot, chat_id, *quiz_msg_id).await;
            }
            dialogue.exit().await?;

            ack(bot, q).await?;
            let lessons = store.lessons().await?;
            if lessons.is_empty() {
                bot.edit_message_text(chat_id, MessageId(msg_id), t("lesson-none"))
                    .await?;
            } else {
                bot.edit_message_text(chat_id, MessageId(msg_id), t("lesson-choose"))
                    .reply_markup(lessons_keyboard(&lessons))
                    .await?;
            }
        }
        "open" => {
            // A fresh lesson may be opened from idle or over another lesson
            if state.is_add_word()
                || matches!(state, FlowState::Flashcards { .. } | FlowState::Quiz { .. })
            {
                return alert(bot, q, &t("flow-busy")).await;
            }
            let lesson = match store.lesson(args).await? {
                Some(lesson) => lesson,
                None => return alert(bot, q, &t("lesson-not-found")).await,
            };
            // Opening over another lesson clears its companion messages
            if let FlowState::Lesson { vocab_msg_id, .. } = &state {
                lesson_flow::try_delete(bot, chat_id, *vocab_msg_id).await;
            }
            if let FlowState::LessonQuiz {
                vocab_msg_id,
                quiz_msg_id,
                ..
            } = &state
            {
                lesson_flow::try_delete(bot, chat_id, *vocab_msg_id).await;
                lesson_flow::try_delete(bot, chat_id, *quiz_msg_id).await;
            }
            ack(bot, q).await?;
            // Reuse the lesson list message as the stage message
            lesson_flow::send_stage(bot, chat_id, dialogue, &lesson, 0, Some(msg_id), None)
                .await?;
        }
        "nav" => {
            let (slug, stage_idx) = match args.rsplit_once(':') {
                Some((slug, idx)) => match idx.parse::<usize>() {
                    Ok(idx) => (slug, idx),
                    Err(_) => return ack(bot, q).await,
                },
                None => return ack(bot, q).await,
            };
            let (stage_msg_id, vocab_msg_id) = match &state {
                FlowState::Lesson {
                    stage_msg_id,
                    vocab_msg_id,
                    ..
                } => (*stage_msg_id, *vocab_msg_id),
                FlowState::LessonQuiz {
                    stage_msg_id,
                    vocab_msg_id,
                    quiz_msg_id,
                    ..
                } => {
                    // Navigating away abandons the quiz question
                    lesson_flow::try_delete(bot, chat_id, *quiz_msg_id).await;
                    (*stage_msg_id, *vocab_msg_id)
                }
                // Stale navigation buttons after a restart: reopen in place
                _ => (Some(msg_id), None),
            };
            let lesson = match store.lesson(slug).await? {
                Some(lesson) => lesson,
                None => return alert(bot, q, &t("lesson-not-found")).await,
            };
            ack(bot, q).await?;
            lesson_flow::send_stage(
                bot,
                chat_id,
                dialogue,
                &lesson,
                stage_idx,
                stage_msg_id.or(Some(msg_id)),
                vocab_msg_id,
            )
            .await?;
        }
        "answer" => {
            let (
                slug,
                stage_idx,
                stage_msg_id,
                vocab_msg_id,
                q_index,
                score,
                quiz_msg_id,
            ) = match state {
                FlowState::LessonQuiz {
                    slug,
                    stage_idx,
                    stage_msg_id,
                    vocab_msg_id,
                    q_index,
                    score,
                    quiz_msg_id,
                } => (
                    slug,
                    stage_idx,
                    stage_msg_id,
                    vocab_msg_id,
                    q_index,
                    score,
                    quiz_msg_id,
                ),
                _ => return ack(bot, q).await,
            };

            let (answered_index, chosen_option) = match args.split_once(':') {
                Some((qi, opt)) => match (qi.parse::<usize>(), opt.parse::<usize>()) {
                    (Ok(qi), Ok(opt)) => (qi, opt),
                    _ => return ack(bot, q).await,
                },
                None => return ack(bot, q).await,
            };
            // Taps on an already-answered question are ignored
            if answered_index != q_index {
                return ack(bot, q).await;
            }

            let lesson = match store.lesson(&slug).await? {
                Some(lesson) => lesson,
                None => return alert(bot, q, &t("lesson-not-found")).await,
            };
            lesson_flow::handle_lesson_answer(
                bot,
                q,
                dialogue,
                &lesson,
                stage_idx,
                stage_msg_id,
                vocab_msg_id,
                score,
                quiz_msg_id,
                answered_index,
                chosen_option,
            )
            .await?;
        }
        _ => return ack(bot, q).await,
    }
    Ok(())
}
