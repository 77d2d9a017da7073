//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `message_handler`: Handles commands, dictionary lookups, and flow text input
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and formats messages
//! - `dialogue_manager`: Steps of the admin add-word conversation
//! - `lesson_flow`: Reading-lesson stage rendering and grading

pub mod callback_handler;
pub mod dialogue_manager;
pub mod lesson_flow;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

/// Runtime settings the handlers need beyond the store.
#[derive(Clone, Debug, Default)]
pub struct BotConfig {
    /// Telegram user ids allowed to run `/add_word`.
    pub admin_ids: Vec<u64>,
}
