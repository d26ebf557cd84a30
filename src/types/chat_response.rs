use serde::{Deserialize, Serialize};

/// Body of a successful `POST /chat` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    /// The assistant's reply text.
    pub response: String,
}

/// The assistant's reply, as handed to a conversation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    /// The reply text.
    pub text: String,
}

impl AssistantReply {
    /// Create a reply from its text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<ChatResponse> for AssistantReply {
    fn from(response: ChatResponse) -> Self {
        Self::new(response.response)
    }
}
