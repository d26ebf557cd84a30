//! The chat widget: a visibility flag and the session it hosts.

use crate::assistant::Assistant;
use crate::chat::session::{ConversationSession, SubmitOutcome};

/// A chat widget that creates its conversation the first time it is shown.
///
/// Closing the widget only hides it; the session and its transcript live
/// until [`ChatWidget::reset`] or until the widget itself is dropped.
#[derive(Debug, Default)]
pub struct ChatWidget {
    open: bool,
    session: Option<ConversationSession>,
}

impl ChatWidget {
    /// Creates a closed widget with no session yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the widget is currently shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Shows the widget, creating the session on first open.
    ///
    /// Returns true if this call created the session.
    pub fn open(&mut self) -> bool {
        self.open = true;
        if self.session.is_none() {
            self.session = Some(ConversationSession::new());
            true
        } else {
            false
        }
    }

    /// Hides the widget.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Flips visibility.  Returns the new state.
    pub fn toggle(&mut self) -> bool {
        if self.open {
            self.close();
        } else {
            self.open();
        }
        self.open
    }

    /// Discards the session.  An open widget immediately gets a fresh one.
    pub fn reset(&mut self) {
        self.session = None;
        if self.open {
            self.session = Some(ConversationSession::new());
        }
    }

    /// The hosted session, if one has been created.
    pub fn session(&self) -> Option<&ConversationSession> {
        self.session.as_ref()
    }

    /// The hosted session for mutation, if one has been created.
    pub fn session_mut(&mut self) -> Option<&mut ConversationSession> {
        self.session.as_mut()
    }

    /// Submits `text` through the hosted session.
    ///
    /// Returns `None` while the widget is closed; nothing is recorded or sent.
    pub async fn submit<A: Assistant + ?Sized>(
        &mut self,
        assistant: &A,
        text: &str,
    ) -> Option<SubmitOutcome> {
        if !self.open {
            return None;
        }
        let session = self.session.as_mut()?;
        Some(session.submit(assistant, text).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_created_on_first_open_only() {
        let mut widget = ChatWidget::new();
        assert!(!widget.is_open());
        assert!(widget.session().is_none());

        assert!(widget.open());
        assert!(widget.is_open());
        assert_eq!(widget.session().map(|s| s.message_count()), Some(1));

        widget.close();
        assert!(!widget.is_open());
        assert!(widget.session().is_some());
        assert!(!widget.open());
    }

    #[test]
    fn toggle_flips_visibility() {
        let mut widget = ChatWidget::new();
        assert!(widget.toggle());
        assert!(widget.session().is_some());
        assert!(!widget.toggle());
        assert!(widget.session().is_some());
    }

    #[test]
    fn reset_discards_transcript() {
        let mut widget = ChatWidget::new();
        widget.open();
        let session = widget.session_mut().unwrap();
        let exchange = session.begin("hello").unwrap();
        exchange.complete(Ok(crate::AssistantReply::new("hi")));
        assert_eq!(widget.session().unwrap().message_count(), 3);

        widget.reset();
        assert_eq!(widget.session().unwrap().message_count(), 1);

        widget.close();
        widget.reset();
        assert!(widget.session().is_none());
    }
}
