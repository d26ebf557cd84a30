use serde::{Deserialize, Serialize};

/// Body of a `POST /chat` request.
///
/// Only the latest user message travels to the assistant; the transcript
/// stays on this side of the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,

    /// Conversation key understood by assistants that keep their own memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// Create a request carrying only the message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
        }
    }

    /// Attach a session identifier to the request.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}
