//! Chat application module for the FlowFix assistant.
//!
//! This module provides the conversation state behind the chat widget and
//! the pieces the `flowfix-chat` REPL is built from:
//!
//! - One outstanding exchange per conversation, enforced by the session
//! - A fixed fallback reply whenever the assistant cannot be reached
//! - Slash commands for widget control
//!
//! # Architecture
//!
//! - `session`: the conversation session and its submit lifecycle
//! - `widget`: visibility flag and lazy session creation
//! - `config`: CLI argument parsing and configuration
//! - `commands`: slash command parsing

mod commands;
mod config;
mod session;
mod widget;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use session::{
    ConversationSession, GREETING, PendingExchange, Rejection, SessionStats, SubmitOutcome,
};
pub use widget::ChatWidget;
