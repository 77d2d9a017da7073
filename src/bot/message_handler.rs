//! Message handler: command entry points, free-text dictionary lookups,
//! and routing of text typed while a flow is open.

use std::sync::Arc;

use anyhow::Result;
use rand::seq::SliceRandom;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::info;

use crate::dialogue::{is_cancel_word, FlowDialogue, FlowState};
use crate::fuzzy::closest_matches;
use crate::localization::t;
use crate::store::Store;

use super::dialogue_manager;
use super::lesson_flow;
use super::ui_builder::{
    alphabet_keyboard, flashcard_keyboard, format_flashcard, format_not_found,
    format_random_word_card, format_word_card, general_quiz_keyboard, lessons_keyboard,
    main_keyboard,
};
use super::BotConfig;

/// How many fuzzy suggestions a lookup miss shows.
const SUGGESTION_COUNT: usize = 3;

/// Main message entry point, dispatched per conversation state.
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: FlowDialogue,
    store: Arc<Store>,
    config: Arc<BotConfig>,
) -> Result<()> {
    let text = match msg.text() {
        Some(text) => text.to_string(),
        None => return Ok(()),
    };

    let state = dialogue.get().await?.unwrap_or_default();

    // Commands never interrupt an open flow
    if state.is_active() && text.starts_with('/') {
        bot.send_message(msg.chat.id, t("flow-busy")).await?;
        return Ok(());
    }

    match state {
        FlowState::Idle => handle_idle_text(&bot, &msg, &dialogue, &store, &config, &text).await,
        FlowState::AwaitingWord => {
            dialogue_manager::handle_word_input(&bot, &msg, dialogue, &text).await
        }
        FlowState::AwaitingSynonyms { word } => {
            dialogue_manager::handle_synonyms_input(&bot, &msg, dialogue, &text, word).await
        }
        FlowState::AwaitingRuTranslation { word, synonyms } => {
            dialogue_manager::handle_ru_input(&bot, &msg, dialogue, &text, word, synonyms).await
        }
        FlowState::AwaitingKzTranslation { word, synonyms, ru } => {
            dialogue_manager::handle_kz_input(&bot, &msg, dialogue, &text, word, synonyms, ru)
                .await
        }
        FlowState::AwaitingConfirmation { .. } => {
            if is_cancel_word(&text) {
                bot.send_message(msg.chat.id, t("operation-cancelled")).await?;
                dialogue.exit().await?;
            } else {
                bot.send_message(msg.chat.id, t("use-buttons")).await?;
            }
            Ok(())
        }
        FlowState::Flashcards { message_id, .. } => {
            if is_cancel_word(&text) {
                lesson_flow::try_delete(&bot, msg.chat.id, message_id).await;
                bot.send_message(msg.chat.id, t("flashcards-exited")).await?;
                dialogue.exit().await?;
            } else {
                bot.send_message(msg.chat.id, t("use-buttons")).await?;
            }
            Ok(())
        }
        FlowState::Quiz { .. } => {
            if is_cancel_word(&text) {
                bot.send_message(msg.chat.id, t("operation-cancelled")).await?;
                dialogue.exit().await?;
            } else {
                bot.send_message(msg.chat.id, t("use-buttons")).await?;
            }
            Ok(())
        }
        FlowState::Lesson {
            slug,
            stage_idx,
            stage_msg_id,
            vocab_msg_id,
        } => {
            if is_cancel_word(&text) {
                lesson_flow::try_delete(&bot, msg.chat.id, vocab_msg_id).await;
                bot.send_message(msg.chat.id, t("operation-cancelled")).await?;
                dialogue.exit().await?;
                return Ok(());
            }
            let lesson = match store.lesson(&slug).await? {
                Some(lesson) => lesson,
                None => {
                    bot.send_message(msg.chat.id, t("lesson-not-found")).await?;
                    dialogue.exit().await?;
                    return Ok(());
                }
            };
            lesson_flow::handle_task_input(
                &bot,
                &msg,
                &dialogue,
                &lesson,
                stage_idx,
                stage_msg_id,
                vocab_msg_id,
                &text,
            )
            .await
        }
        FlowState::LessonQuiz { vocab_msg_id, .. } => {
            if is_cancel_word(&text) {
                lesson_flow::try_delete(&bot, msg.chat.id, vocab_msg_id).await;
                bot.send_message(msg.chat.id, t("operation-cancelled")).await?;
                dialogue.exit().await?;
            } else {
                bot.send_message(msg.chat.id, t("use-buttons")).await?;
            }
            Ok(())
        }
    }
}

/// Idle-state text: either a command or a dictionary lookup.
async fn handle_idle_text(
    bot: &Bot,
    msg: &Message,
    dialogue: &FlowDialogue,
    store: &Store,
    config: &BotConfig,
    text: &str,
) -> Result<()> {
    // "/cmd@BotName arg" -> "/cmd"
    let command = text
        .split_whitespace()
        .next()
        .and_then(|token| token.split('@').next())
        .unwrap_or("");

    match command {
        "/start" => {
            bot.send_message(msg.chat.id, t("start-welcome"))
                .parse_mode(ParseMode::Markdown)
                .reply_markup(main_keyboard())
                .await?;
        }
        "/help" => {
            bot.send_message(msg.chat.id, t("help-text"))
                .parse_mode(ParseMode::Markdown)
                .await?;
        }
        "/list" => {
            bot.send_message(msg.chat.id, t("list-prompt"))
                .reply_markup(alphabet_keyboard())
                .await?;
        }
        "/random_word" => match store.random_word().await? {
            Some(entry) => {
                bot.send_message(msg.chat.id, format_random_word_card(&entry))
                    .parse_mode(ParseMode::Markdown)
                    .await?;
            }
            None => {
                bot.send_message(msg.chat.id, t("dictionary-empty"))
                    .parse_mode(ParseMode::Markdown)
                    .await?;
            }
        },
        "/flashcards" => start_flashcards(bot, msg, dialogue, store).await?,
        "/start_quiz" => {
            bot.send_message(msg.chat.id, t("quiz-choose-section"))
                .reply_markup(general_quiz_keyboard())
                .await?;
        }
        "/add_word" => {
            dialogue_manager::start_add_word(bot, msg, dialogue.clone(), config).await?;
        }
        "/reading" => {
            let lessons = store.lessons().await?;
            if lessons.is_empty() {
                bot.send_message(msg.chat.id, t("lesson-none")).await?;
            } else {
                bot.send_message(msg.chat.id, t("lesson-choose"))
                    .reply_markup(lessons_keyboard(&lessons))
                    .await?;
            }
        }
        _ if text.starts_with('/') => {
            bot.send_message(msg.chat.id, t("help-text"))
                .parse_mode(ParseMode::Markdown)
                .await?;
        }
        _ => lookup_word(bot, msg, store, text).await?,
    }

    Ok(())
}

/// Exact lookup first, fuzzy suggestions on a miss.
async fn lookup_word(bot: &Bot, msg: &Message, store: &Store, text: &str) -> Result<()> {
    match store.find_word(text).await? {
        Some(entry) => {
            bot.send_message(msg.chat.id, format_word_card(&entry))
                .parse_mode(ParseMode::Markdown)
                .await?;
        }
        None => {
            let words = store.all_words().await?;
            let suggestions = closest_matches(text, &words, SUGGESTION_COUNT);
            info!(query = %text, suggestions = suggestions.len(), "Dictionary miss");
            bot.send_message(msg.chat.id, format_not_found(text.trim(), &suggestions))
                .parse_mode(ParseMode::Markdown)
                .await?;
        }
    }
    Ok(())
}

/// Shuffle the whole dictionary and show the first card.
async fn start_flashcards(
    bot: &Bot,
    msg: &Message,
    dialogue: &FlowDialogue,
    store: &Store,
) -> Result<()> {
    let mut words = store.all_words().await?;
    if words.is_empty() {
        bot.send_message(msg.chat.id, t("dictionary-empty"))
            .parse_mode(ParseMode::Markdown)
            .await?;
        return Ok(());
    }
    words.shuffle(&mut rand::thread_rng());

    let message_id = send_flashcard(bot, msg.chat.id, store, &words, 0, None).await?;
    dialogue
        .update(FlowState::Flashcards {
            words,
            current_index: 0,
            message_id: Some(message_id),
        })
        .await?;
    Ok(())
}

/// One flashcard per message: the previous card is deleted and a fresh
/// message sent, so the spoilers come back hidden.
pub async fn send_flashcard(
    bot: &Bot,
    chat_id: ChatId,
    store: &Store,
    words: &[String],
    index: usize,
    prev_msg_id: Option<i32>,
) -> Result<i32> {
    lesson_flow::try_delete(bot, chat_id, prev_msg_id).await;

    let word = &words[index];
    let text = match store.find_word(word).await? {
        Some(entry) => format_flashcard(&entry),
        None => super::ui_builder::escape_markdown_v2(word),
    };
    let sent = bot
        .send_message(chat_id, text)
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(flashcard_keyboard())
        .await?;
    Ok(sent.id.0)
}
