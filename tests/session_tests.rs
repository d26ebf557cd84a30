//! Conversation session behavior against substitute assistants.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::Notify;
use tokio_test::{assert_pending, assert_ready_eq};

use flowfix::chat::{ChatWidget, ConversationSession, GREETING, Rejection, SubmitOutcome};
use flowfix::{Assistant, AssistantReply, AssistantUnavailable, FALLBACK_REPLY, Message};

/// Replies from a script and remembers what it was asked.
#[derive(Default)]
struct Scripted {
    replies: Mutex<VecDeque<Result<AssistantReply, AssistantUnavailable>>>,
    seen: Mutex<Vec<String>>,
}

impl Scripted {
    fn replying(replies: &[&str]) -> Self {
        let scripted = Self::default();
        for reply in replies {
            scripted.push(Ok(AssistantReply::new(*reply)));
        }
        scripted
    }

    fn push(&self, reply: Result<AssistantReply, AssistantUnavailable>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Assistant for Scripted {
    async fn send(&self, text: &str) -> Result<AssistantReply, AssistantUnavailable> {
        self.seen.lock().unwrap().push(text.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AssistantUnavailable::new("script exhausted")))
    }
}

/// Holds its reply until the gate is opened.
struct Gate {
    notify: Notify,
    reply: String,
}

impl Gate {
    fn new(reply: &str) -> Self {
        Self {
            notify: Notify::new(),
            reply: reply.to_string(),
        }
    }

    fn open(&self) {
        self.notify.notify_one();
    }
}

#[async_trait::async_trait]
impl Assistant for Gate {
    async fn send(&self, _: &str) -> Result<AssistantReply, AssistantUnavailable> {
        self.notify.notified().await;
        Ok(AssistantReply::new(self.reply.clone()))
    }
}

/// Never answers.
struct Stalled;

#[async_trait::async_trait]
impl Assistant for Stalled {
    async fn send(&self, _: &str) -> Result<AssistantReply, AssistantUnavailable> {
        std::future::pending::<()>().await;
        Err(AssistantUnavailable::new("unreachable"))
    }
}

#[tokio::test]
async fn reply_is_appended_after_user_turn() {
    let assistant = Scripted::replying(&["Hello!"]);
    let mut session = ConversationSession::new();

    let outcome = session.submit(&assistant, "Hi").await;

    assert_eq!(outcome, SubmitOutcome::Replied);
    assert_eq!(
        session.transcript(),
        &[
            Message::assistant(GREETING),
            Message::user("Hi"),
            Message::assistant("Hello!"),
        ]
    );
    assert!(!session.awaiting_response());
}

#[tokio::test]
async fn unavailable_assistant_yields_fallback() {
    let assistant = Scripted::default();
    assistant.push(Err(AssistantUnavailable::new("network down")));
    let mut session = ConversationSession::new();

    let outcome = session.submit(&assistant, "test").await;

    assert_eq!(outcome, SubmitOutcome::FellBack);
    assert_eq!(session.message_count(), 3);
    assert_eq!(
        session.last_message(),
        Some(&Message::assistant(FALLBACK_REPLY))
    );
    assert!(!session.awaiting_response());
    assert_eq!(session.stats().fallback_count, 1);
}

#[tokio::test]
async fn whitespace_sends_nothing() {
    let assistant = Scripted::replying(&["unused"]);
    let mut session = ConversationSession::new();
    session.set_input("half-typed");

    let outcome = session.submit(&assistant, "   ").await;

    assert_eq!(outcome, SubmitOutcome::RejectedEmpty);
    assert_eq!(session.transcript(), &[Message::assistant(GREETING)]);
    assert_eq!(session.pending_input(), "half-typed");
    assert!(assistant.seen().is_empty());
}

#[test]
fn session_is_locked_while_an_exchange_is_outstanding() {
    let mut session = ConversationSession::new();

    let first = session.begin("a").unwrap();
    assert!(first.session().awaiting_response());
    assert_eq!(first.session().message_count(), 2);
    assert_eq!(first.session().pending_input(), "");

    first.complete(Ok(AssistantReply::new("reply to a")));
    assert_eq!(
        session.transcript(),
        &[
            Message::assistant(GREETING),
            Message::user("a"),
            Message::assistant("reply to a"),
        ]
    );
    assert!(!session.awaiting_response());
}

/// Starts an exchange, then bails out before the assistant is asked.
fn begin_then_bail(session: &mut ConversationSession, text: &str) -> Result<(), String> {
    let _exchange = session.begin(text).map_err(|r| format!("{r:?}"))?;
    Err("lost the connection before sending".to_string())
}

#[test]
fn early_return_with_an_exchange_still_unlocks() {
    let mut session = ConversationSession::new();

    assert!(begin_then_bail(&mut session, "hi").is_err());

    assert!(!session.awaiting_response());
    assert_eq!(
        session.last_message(),
        Some(&Message::assistant(FALLBACK_REPLY))
    );
    assert_eq!(session.message_count(), 3);
    assert!(session.begin("next").is_ok());
}

#[test]
fn exchanges_stay_with_the_session_that_began_them() {
    let mut a = ConversationSession::new();
    let mut b = ConversationSession::new();

    let for_a = a.begin("for a").unwrap();
    let for_b = b.begin("for b").unwrap();
    for_b.complete(Err(AssistantUnavailable::new("offline")));
    for_a.complete(Ok(AssistantReply::new("reply for a")));

    assert_eq!(
        a.transcript(),
        &[
            Message::assistant(GREETING),
            Message::user("for a"),
            Message::assistant("reply for a"),
        ]
    );
    assert_eq!(
        b.transcript(),
        &[
            Message::assistant(GREETING),
            Message::user("for b"),
            Message::assistant(FALLBACK_REPLY),
        ]
    );
    assert!(!a.awaiting_response());
    assert!(!b.awaiting_response());
}

#[tokio::test]
async fn busy_session_sends_nothing() {
    let assistant = Scripted::replying(&["first"]);
    let mut session = ConversationSession::new();
    std::mem::forget(session.begin("first question").unwrap());

    assert_eq!(
        session.submit_input(&assistant).await,
        SubmitOutcome::RejectedBusy
    );
    assert_eq!(
        session.submit(&assistant, "second question").await,
        SubmitOutcome::RejectedBusy
    );
    assert_eq!(session.begin("third").unwrap_err(), Rejection::Busy);
    assert_eq!(session.message_count(), 2);
    assert!(assistant.seen().is_empty());
}

#[tokio::test]
async fn only_the_latest_message_is_sent() {
    let assistant = Scripted::replying(&["one", "two", "three"]);
    let mut session = ConversationSession::new();

    for text in ["my tap drips", "it's the kitchen", "tomorrow works"] {
        assert!(session.submit(&assistant, text).await.was_accepted());
    }

    assert_eq!(
        assistant.seen(),
        vec!["my tap drips", "it's the kitchen", "tomorrow works"]
    );
    assert_eq!(session.message_count(), 7);
}

#[tokio::test]
async fn submit_input_sends_and_clears_buffer() {
    let assistant = Scripted::replying(&["We cover LS1 to LS28."]);
    let mut session = ConversationSession::new();
    assert!(session.set_input("Do you cover Leeds?"));

    let outcome = session.submit_input(&assistant).await;

    assert_eq!(outcome, SubmitOutcome::Replied);
    assert_eq!(session.pending_input(), "");
    assert_eq!(assistant.seen(), vec!["Do you cover Leeds?"]);
}

#[tokio::test]
async fn transcript_grows_by_two_per_accepted_submission() {
    let assistant = Scripted::default();
    let inputs = ["a", "", "b", " \t", "c", "d"];
    for (i, _) in inputs.iter().enumerate() {
        if i % 2 == 0 {
            assistant.push(Ok(AssistantReply::new(format!("reply {i}"))));
        } else {
            assistant.push(Err(AssistantUnavailable::new("flaky")));
        }
    }
    let mut session = ConversationSession::new();

    for text in inputs {
        let before = session.message_count();
        let outcome = session.submit(&assistant, text).await;
        let after = session.message_count();
        if outcome.was_accepted() {
            assert_eq!(after, before + 2);
            assert_eq!(session.transcript()[before], Message::user(text));
        } else {
            assert_eq!(outcome, SubmitOutcome::RejectedEmpty);
            assert_eq!(after, before);
        }
        assert!(!session.awaiting_response());
    }
    assert_eq!(session.message_count(), 1 + 2 * 4);
}

#[test]
fn submission_stays_pending_until_the_assistant_answers() {
    let gate = Gate::new("Hello!");
    let mut session = ConversationSession::new();
    {
        let mut task = tokio_test::task::spawn(session.submit(&gate, "Hi"));
        assert_pending!(task.poll());
        assert_pending!(task.poll());
        gate.open();
        assert!(task.is_woken());
        assert_ready_eq!(task.poll(), SubmitOutcome::Replied);
    }
    assert_eq!(
        session.last_message(),
        Some(&Message::assistant("Hello!"))
    );
    assert!(!session.awaiting_response());
}

#[tokio::test(start_paused = true)]
async fn abandoned_exchange_resolves_as_fallback() {
    let mut session = ConversationSession::new();

    let result = tokio::time::timeout(Duration::from_secs(30), session.submit(&Stalled, "x")).await;

    assert!(result.is_err());
    assert!(!session.awaiting_response());
    assert_eq!(session.message_count(), 3);
    assert_eq!(
        session.last_message(),
        Some(&Message::assistant(FALLBACK_REPLY))
    );
}

#[tokio::test]
async fn closed_widget_records_nothing() {
    let assistant = Scripted::replying(&["hello"]);
    let mut widget = ChatWidget::new();

    assert_eq!(widget.submit(&assistant, "Hi").await, None);
    assert!(widget.session().is_none());

    widget.open();
    widget.close();
    assert_eq!(widget.submit(&assistant, "Hi").await, None);
    assert_eq!(widget.session().map(|s| s.message_count()), Some(1));

    widget.open();
    assert_eq!(
        widget.submit(&assistant, "Hi").await,
        Some(SubmitOutcome::Replied)
    );
    assert_eq!(widget.session().map(|s| s.message_count()), Some(3));
    assert_eq!(assistant.seen(), vec!["Hi"]);
}

#[tokio::test]
async fn exported_transcript_is_json() {
    let assistant = Scripted::replying(&["Hello!"]);
    let mut session = ConversationSession::new();
    session.submit(&assistant, "Hi").await;

    let path = std::env::temp_dir().join(format!(
        "flowfix-transcript-{}.json",
        std::process::id()
    ));
    session.save_transcript_to(&path).unwrap();
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(saved["version"], 1);
    assert!(saved["exported_at"].as_str().is_some());
    assert_eq!(
        saved["messages"],
        serde_json::json!([
            {"sender": "assistant", "text": GREETING},
            {"sender": "user", "text": "Hi"},
            {"sender": "assistant", "text": "Hello!"},
        ])
    );
}
