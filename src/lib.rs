//! # Sozdik Telegram Bot
//!
//! A Telegram bot serving an English–Russian–Kazakh vocabulary dictionary
//! with flashcards, multiple-choice quizzes, and guided reading lessons,
//! backed by a document store.

pub mod bot;
pub mod dialogue;
pub mod fuzzy;
pub mod lesson;
pub mod localization;
pub mod quiz;
pub mod store;
pub mod vocab_image;
