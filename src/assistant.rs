//! The seam between a conversation session and whatever produces replies.
//!
//! A session only ever needs one thing from the outside world: turn a user
//! message into either a reply or an [`AssistantUnavailable`].  The HTTP
//! client implements [`Assistant`]; tests substitute their own.

use std::error;
use std::fmt;

use crate::client::FlowFix;
use crate::error::Error;
use crate::types::AssistantReply;

/// The text appended in place of a reply whenever the assistant is unavailable.
pub const FALLBACK_REPLY: &str =
    "Sorry, I seem to be having trouble connecting. Please try again later.";

/////////////////////////////////////////// AssistantUnavailable ///////////////////////////////////////////

/// The single failure a session knows about.
///
/// Network errors, timeouts, non-success statuses and malformed payloads all
/// collapse into this one value; none of them is retried automatically.
#[derive(Clone, Debug)]
pub struct AssistantUnavailable {
    reason: String,
    cause: Option<Error>,
}

impl AssistantUnavailable {
    /// Creates an unavailability with a reason and no underlying error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            cause: None,
        }
    }

    /// The exchange was dropped before the assistant answered.
    pub fn abandoned() -> Self {
        Self::new("exchange abandoned before the assistant answered")
    }

    /// Human-readable reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The client error behind this failure, if there was one.
    pub fn cause(&self) -> Option<&Error> {
        self.cause.as_ref()
    }
}

impl fmt::Display for AssistantUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "assistant unavailable: {}", self.reason)
    }
}

impl error::Error for AssistantUnavailable {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.cause.as_ref().map(|e| e as &(dyn error::Error + 'static))
    }
}

impl From<Error> for AssistantUnavailable {
    fn from(err: Error) -> Self {
        Self {
            reason: err.to_string(),
            cause: Some(err),
        }
    }
}

///////////////////////////////////////////////// Assistant ////////////////////////////////////////////////

/// Something that answers user messages.
#[async_trait::async_trait]
pub trait Assistant: Send + Sync {
    /// Send the latest user message and wait for the reply.
    ///
    /// Only `text` is sent; implementations receive no transcript.
    async fn send(&self, text: &str) -> Result<AssistantReply, AssistantUnavailable>;
}

#[async_trait::async_trait]
impl Assistant for FlowFix {
    async fn send(&self, text: &str) -> Result<AssistantReply, AssistantUnavailable> {
        let request = self.request(text);
        self.chat(request)
            .await
            .map(AssistantReply::from)
            .map_err(AssistantUnavailable::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn wraps_client_errors() {
        let unavailable = AssistantUnavailable::from(Error::internal_server("boom"));
        assert_eq!(unavailable.reason(), "Internal server error: boom");
        assert!(unavailable.cause().is_some_and(Error::is_server_error));
        assert!(unavailable.source().is_some());
    }

    #[test]
    fn abandoned_has_no_cause() {
        let unavailable = AssistantUnavailable::abandoned();
        assert!(unavailable.cause().is_none());
        assert!(unavailable.to_string().starts_with("assistant unavailable:"));
    }
}
