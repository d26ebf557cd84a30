use serde::{Deserialize, Serialize};

use crate::types::Sender;

/// One entry of a conversation transcript.
///
/// Messages are never modified once they have been appended to a session's
/// transcript; the session only hands out shared references to them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Who wrote the message.
    pub sender: Sender,

    /// The message text, exactly as typed or received.
    pub text: String,
}

impl Message {
    /// Create a new message.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }

    /// Create a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Create a new assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }
}
