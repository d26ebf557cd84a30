use std::fmt;

use serde::{Deserialize, Serialize};

/// Who authored a message in the transcript.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing into the widget.
    User,

    /// The FlowFix assistant, or the local fallback standing in for it.
    Assistant,
}

impl Sender {
    /// Returns true for the user side of the conversation.
    pub fn is_user(&self) -> bool {
        matches!(self, Sender::User)
    }

    /// Returns true for the assistant side of the conversation.
    pub fn is_assistant(&self) -> bool {
        matches!(self, Sender::Assistant)
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Assistant => write!(f, "assistant"),
        }
    }
}
