//! Core conversation session.
//!
//! A [`ConversationSession`] owns the transcript of one chat widget, the
//! text the user has typed but not yet sent, and the flag saying an exchange
//! with the assistant is outstanding.  Submitting is split into
//! [`ConversationSession::begin`] and [`PendingExchange::complete`] so the
//! one-outstanding-exchange rule is visible in the types; most callers want
//! [`ConversationSession::submit`], which drives both halves.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use serde_json::to_writer_pretty;
use time::OffsetDateTime;

use crate::assistant::{Assistant, AssistantUnavailable, FALLBACK_REPLY};
use crate::error::{Error, Result};
use crate::observability::{
    SESSION_EXCHANGE_DURATION, SESSION_FALLBACKS, SESSION_REJECTED_BUSY, SESSION_REJECTED_EMPTY,
    SESSION_REPLIES, SESSION_SUBMISSIONS,
};
use crate::types::{AssistantReply, Message};

/// The assistant message every session starts with.
pub const GREETING: &str =
    "Hi! I am Vern, the FlowFix AI assistant. How can I help with your plumbing today?";

/// Why a submission was turned away.  Either way nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The text was empty or only whitespace.
    Empty,
    /// An exchange is already outstanding.
    Busy,
}

/// What happened to a call to [`ConversationSession::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The assistant's reply was appended.
    Replied,
    /// The assistant was unavailable; the fallback reply was appended.
    FellBack,
    /// Empty or whitespace-only input; nothing changed and nothing was sent.
    RejectedEmpty,
    /// An exchange was already outstanding; nothing changed.
    RejectedBusy,
}

impl SubmitOutcome {
    /// Returns true if the submission added two messages to the transcript.
    pub fn was_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Replied | SubmitOutcome::FellBack)
    }
}

impl From<Rejection> for SubmitOutcome {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Empty => SubmitOutcome::RejectedEmpty,
            Rejection::Busy => SubmitOutcome::RejectedBusy,
        }
    }
}

/// The one outstanding exchange of a session.
///
/// Handed out by [`ConversationSession::begin`], it holds the session
/// mutably until [`PendingExchange::complete`] resolves it.  Dropping it
/// unresolved appends the fallback reply, so the session is never left busy
/// and every accepted submission gains exactly one assistant turn.
///
/// While an exchange is outstanding nothing else can reach its session:
///
/// ```compile_fail
/// # use flowfix::chat::ConversationSession;
/// # use flowfix::AssistantReply;
/// let mut session = ConversationSession::new();
/// let exchange = session.begin("Hi").unwrap();
/// session.begin("again");
/// exchange.complete(Ok(AssistantReply::new("Hello!")));
/// ```
#[derive(Debug)]
#[must_use = "dropping an exchange resolves it with the fallback reply"]
pub struct PendingExchange<'a> {
    session: &'a mut ConversationSession,
    text: String,
    started: Instant,
    resolved: bool,
}

impl PendingExchange<'_> {
    /// The user text to send to the assistant.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The session this exchange belongs to.
    pub fn session(&self) -> &ConversationSession {
        &*self.session
    }

    /// Finishes the exchange with the assistant's outcome.
    ///
    /// Appends the reply, or the fallback when the assistant was unavailable,
    /// and clears the busy flag on both paths.
    pub fn complete(
        mut self,
        outcome: std::result::Result<AssistantReply, AssistantUnavailable>,
    ) -> SubmitOutcome {
        self.resolved = true;
        self.session.finish(self.started, outcome)
    }
}

impl Drop for PendingExchange<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            self.resolved = true;
            self.session
                .finish(self.started, Err(AssistantUnavailable::abandoned()));
        }
    }
}

/// Aggregated stats for a conversation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// Number of messages in the transcript, greeting included.
    pub message_count: usize,
    /// Number of user turns.
    pub user_turns: usize,
    /// Number of assistant turns, greeting and fallbacks included.
    pub assistant_turns: usize,
    /// Number of exchanges that ended in the fallback reply.
    pub fallback_count: usize,
    /// Whether an exchange is outstanding.
    pub awaiting_response: bool,
}

/// In-memory conversation state for one chat widget.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    transcript: Vec<Message>,
    pending_input: String,
    awaiting_response: bool,
    fallback_count: usize,
}

impl ConversationSession {
    /// Creates a session seeded with the greeting.
    pub fn new() -> Self {
        Self::with_greeting(GREETING)
    }

    /// Creates a session seeded with a custom greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            transcript: vec![Message::assistant(greeting)],
            pending_input: String::new(),
            awaiting_response: false,
            fallback_count: 0,
        }
    }

    /// The transcript, oldest message first.
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// The most recent message.
    pub fn last_message(&self) -> Option<&Message> {
        self.transcript.last()
    }

    /// Returns the number of messages in the transcript.
    pub fn message_count(&self) -> usize {
        self.transcript.len()
    }

    /// Text typed but not yet submitted.
    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    /// Whether an exchange with the assistant is outstanding.
    pub fn awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    /// Replaces the pending input.
    ///
    /// Input is locked while an exchange is outstanding; returns false and
    /// leaves the buffer untouched in that case.
    pub fn set_input(&mut self, text: impl Into<String>) -> bool {
        if self.awaiting_response {
            return false;
        }
        self.pending_input = text.into();
        true
    }

    /// Starts an exchange for `text`.
    ///
    /// On success the user turn has been appended, the pending input cleared
    /// and the session marked busy.  On rejection nothing changed.
    ///
    /// The busy rejection only arises when an earlier exchange was leaked
    /// with [`std::mem::forget`]; such a session stays busy.
    pub fn begin(&mut self, text: &str) -> std::result::Result<PendingExchange<'_>, Rejection> {
        if text.trim().is_empty() {
            SESSION_REJECTED_EMPTY.click();
            return Err(Rejection::Empty);
        }
        if self.awaiting_response {
            SESSION_REJECTED_BUSY.click();
            return Err(Rejection::Busy);
        }
        SESSION_SUBMISSIONS.click();
        self.transcript.push(Message::user(text));
        self.pending_input.clear();
        self.awaiting_response = true;
        Ok(PendingExchange {
            session: self,
            text: text.to_string(),
            started: Instant::now(),
            resolved: false,
        })
    }

    /// Submits `text` and waits for the assistant.
    ///
    /// Empty input and submissions made while busy are rejected without
    /// touching the transcript.  Otherwise the transcript gains the user turn
    /// immediately and exactly one assistant turn once the exchange resolves.
    /// If the returned future is dropped before the assistant answers, the
    /// exchange resolves as unavailable.
    pub async fn submit<A: Assistant + ?Sized>(
        &mut self,
        assistant: &A,
        text: &str,
    ) -> SubmitOutcome {
        let exchange = match self.begin(text) {
            Ok(exchange) => exchange,
            Err(rejection) => return rejection.into(),
        };
        let outcome = assistant.send(exchange.text()).await;
        exchange.complete(outcome)
    }

    /// Submits the pending input.
    pub async fn submit_input<A: Assistant + ?Sized>(&mut self, assistant: &A) -> SubmitOutcome {
        if self.awaiting_response {
            SESSION_REJECTED_BUSY.click();
            return SubmitOutcome::RejectedBusy;
        }
        let text = self.pending_input.clone();
        self.submit(assistant, &text).await
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        let user_turns = self
            .transcript
            .iter()
            .filter(|m| m.sender.is_user())
            .count();
        SessionStats {
            message_count: self.transcript.len(),
            user_turns,
            assistant_turns: self.transcript.len() - user_turns,
            fallback_count: self.fallback_count,
            awaiting_response: self.awaiting_response,
        }
    }

    /// Exports the transcript to `path` as pretty-printed JSON.
    pub fn save_transcript_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let transcript = TranscriptFile::new(&self.transcript);
        let file = File::create(path.as_ref())
            .map_err(|err| Error::io("failed to create transcript file", err))?;
        let mut writer = BufWriter::new(file);
        to_writer_pretty(&mut writer, &transcript).map_err(|err| {
            Error::serialization("failed to serialize transcript", Some(Box::new(err)))
        })?;
        writer
            .flush()
            .map_err(|err| Error::io("failed to write transcript file", err))
    }

    fn finish(
        &mut self,
        started: Instant,
        outcome: std::result::Result<AssistantReply, AssistantUnavailable>,
    ) -> SubmitOutcome {
        SESSION_EXCHANGE_DURATION.add(started.elapsed().as_secs_f64());
        let result = match outcome {
            Ok(reply) => {
                SESSION_REPLIES.click();
                self.transcript.push(Message::assistant(reply.text));
                SubmitOutcome::Replied
            }
            Err(_) => {
                SESSION_FALLBACKS.click();
                self.fallback_count += 1;
                self.transcript.push(Message::assistant(FALLBACK_REPLY));
                SubmitOutcome::FellBack
            }
        };
        self.awaiting_response = false;
        result
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct TranscriptFile<'a> {
    version: u8,
    #[serde(serialize_with = "crate::utils::time::serialize")]
    exported_at: OffsetDateTime,
    messages: &'a [Message],
}

impl<'a> TranscriptFile<'a> {
    fn new(messages: &'a [Message]) -> Self {
        Self {
            version: 1,
            exported_at: OffsetDateTime::now_utc(),
            messages,
        }
    }
}
