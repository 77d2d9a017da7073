//! Dialogue Manager module for the admin add-word conversation.
//!
//! One handler per state; each validates the free-text input, stores it in
//! the growing draft, and advances. "отмена"/"cancel" aborts at any step.

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::info;

use crate::dialogue::{
    capitalize_word, is_cancel_word, split_synonyms, FlowDialogue, FlowState,
};
use crate::localization::t;
use crate::store::DictionaryEntry;

use super::ui_builder::{cancel_keyboard, confirmation_keyboard, format_draft_review};
use super::BotConfig;

/// Entry point for `/add_word`: admin allow-list, then the first prompt.
pub async fn start_add_word(
    bot: &Bot,
    msg: &Message,
    dialogue: FlowDialogue,
    config: &BotConfig,
) -> Result<()> {
    let user_id = msg.from.as_ref().map(|u| u.id.0);
    let is_admin = user_id.map(|id| config.admin_ids.contains(&id)).unwrap_or(false);
    if !is_admin {
        info!(user_id = ?user_id, "Rejected non-admin add-word attempt");
        bot.send_message(msg.chat.id, t("addword-denied")).await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, t("addword-enter-word"))
        .reply_markup(cancel_keyboard())
        .await?;
    dialogue.update(FlowState::AwaitingWord).await?;
    Ok(())
}

/// Cancels the flow when the user typed the escape word.
async fn cancelled_by_text(
    bot: &Bot,
    msg: &Message,
    dialogue: &FlowDialogue,
    text: &str,
) -> Result<bool> {
    if is_cancel_word(text) {
        bot.send_message(msg.chat.id, t("operation-cancelled")).await?;
        dialogue.exit().await?;
        return Ok(true);
    }
    Ok(false)
}

pub async fn handle_word_input(
    bot: &Bot,
    msg: &Message,
    dialogue: FlowDialogue,
    text: &str,
) -> Result<()> {
    if cancelled_by_text(bot, msg, &dialogue, text).await? {
        return Ok(());
    }

    let word = capitalize_word(text);
    if word.is_empty() {
        bot.send_message(msg.chat.id, t("empty-input")).await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, t("addword-enter-synonyms"))
        .reply_markup(cancel_keyboard())
        .await?;
    dialogue.update(FlowState::AwaitingSynonyms { word }).await?;
    Ok(())
}

pub async fn handle_synonyms_input(
    bot: &Bot,
    msg: &Message,
    dialogue: FlowDialogue,
    text: &str,
    word: String,
) -> Result<()> {
    if cancelled_by_text(bot, msg, &dialogue, text).await? {
        return Ok(());
    }

    let synonyms = split_synonyms(text);
    if synonyms.is_empty() {
        bot.send_message(msg.chat.id, t("empty-input")).await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, t("addword-enter-ru"))
        .reply_markup(cancel_keyboard())
        .await?;
    dialogue
        .update(FlowState::AwaitingRuTranslation { word, synonyms })
        .await?;
    Ok(())
}

pub async fn handle_ru_input(
    bot: &Bot,
    msg: &Message,
    dialogue: FlowDialogue,
    text: &str,
    word: String,
    synonyms: Vec<String>,
) -> Result<()> {
    if cancelled_by_text(bot, msg, &dialogue, text).await? {
        return Ok(());
    }

    let ru = text.trim().to_string();
    if ru.is_empty() {
        bot.send_message(msg.chat.id, t("empty-input")).await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, t("addword-enter-kz"))
        .reply_markup(cancel_keyboard())
        .await?;
    dialogue
        .update(FlowState::AwaitingKzTranslation { word, synonyms, ru })
        .await?;
    Ok(())
}

/// Last input: assemble the draft and show the confirmation summary.
pub async fn handle_kz_input(
    bot: &Bot,
    msg: &Message,
    dialogue: FlowDialogue,
    text: &str,
    word: String,
    synonyms: Vec<String>,
    ru: String,
) -> Result<()> {
    if cancelled_by_text(bot, msg, &dialogue, text).await? {
        return Ok(());
    }

    let kz = text.trim().to_string();
    if kz.is_empty() {
        bot.send_message(msg.chat.id, t("empty-input")).await?;
        return Ok(());
    }

    let draft = DictionaryEntry {
        word,
        synonyms,
        ru,
        kz,
    };

    bot.send_message(msg.chat.id, format_draft_review(&draft))
        .parse_mode(ParseMode::Markdown)
        .reply_markup(confirmation_keyboard())
        .await?;
    dialogue
        .update(FlowState::AwaitingConfirmation { draft })
        .await?;
    Ok(())
}
