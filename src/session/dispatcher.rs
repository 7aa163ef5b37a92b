//! Query round-trips
//!
//! The dispatcher is the only writer of the session. A send appends the user
//! message, asks the backend, then appends exactly one assistant message:
//! the reply, or the fixed error text when anything went wrong.

use super::state::{RejectReason, SessionAction};
use super::store::SessionStore;
use crate::backend::ChatBackend;
use crate::messages::{Message, Role};
use crate::speech::VoiceOutputAdapter;
use crate::AssistantError;
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Result of one call to [`RequestDispatcher::send`]
#[derive(Debug, Clone)]
pub enum SendOutcome {
    /// Nothing was sent and the session is unchanged
    Rejected(RejectReason),
    /// The backend answered; carries the appended assistant message
    Answered(Message),
    /// The round-trip failed; carries the appended error message
    Failed(Message),
}

impl SendOutcome {
    pub fn message(&self) -> Option<&Message> {
        match self {
            SendOutcome::Rejected(_) => None,
            SendOutcome::Answered(m) | SendOutcome::Failed(m) => Some(m),
        }
    }
}

/// Notifications for the UI
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchEvent {
    /// A message was added to the session
    Appended { id: Uuid, role: Role },
    /// Something the user should be told once, e.g. a missing capability
    Notice(String),
    /// A query arrived while another was in flight and was not sent
    Deferred(String),
}

#[derive(Clone)]
pub struct RequestDispatcher {
    store: SessionStore,
    backend: Arc<dyn ChatBackend>,
    voice: Option<Arc<VoiceOutputAdapter>>,
    events: Option<Sender<DispatchEvent>>,
    synthesis_notice_sent: Arc<AtomicBool>,
}

impl RequestDispatcher {
    pub fn new(store: SessionStore, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            store,
            backend,
            voice: None,
            events: None,
            synthesis_notice_sent: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Speak every assistant message through `voice`
    pub fn with_voice_output(mut self, voice: Arc<VoiceOutputAdapter>) -> Self {
        self.voice = Some(voice);
        self
    }

    pub fn with_events(mut self, events: Sender<DispatchEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Send one query and wait for the round-trip to finish
    ///
    /// Never fails: backend problems become the error message in the
    /// session, and refusals (blank query, request in flight) leave the
    /// session untouched.
    pub async fn send(&self, query: &str) -> SendOutcome {
        let user = match self.store.apply(SessionAction::Send(query.to_string())) {
            Ok(message) => message,
            Err(reason) => {
                debug!("Query not sent: {}", reason);
                if reason == RejectReason::RequestPending {
                    self.notify(DispatchEvent::Deferred(query.trim().to_string()));
                }
                return SendOutcome::Rejected(reason);
            }
        };
        self.notify(DispatchEvent::Appended {
            id: user.id,
            role: user.role,
        });
        info!("Sending query: {}", user.content);

        let mut guard = PendingGuard {
            store: &self.store,
            armed: true,
        };
        let result = self.backend.query(&user.content).await;
        guard.armed = false;

        let outcome = match result {
            Ok(reply) => {
                debug!("Reply received ({} chars)", reply.content.len());
                match self.store.apply(SessionAction::ReceiveSuccess(reply)) {
                    Ok(message) => SendOutcome::Answered(message),
                    Err(reason) => SendOutcome::Rejected(reason),
                }
            }
            Err(e) => {
                error!("Query failed: {}", e);
                match self.store.apply(SessionAction::ReceiveFailure {
                    reason: e.to_string(),
                }) {
                    Ok(message) => SendOutcome::Failed(message),
                    Err(reason) => SendOutcome::Rejected(reason),
                }
            }
        };

        if let Some(message) = outcome.message() {
            self.notify(DispatchEvent::Appended {
                id: message.id,
                role: message.role,
            });
            self.speak(&message.content);
        }

        outcome
    }

    /// Run [`send`](Self::send) on `handle` without blocking the caller
    pub fn spawn_send(&self, handle: &Handle, query: String) -> JoinHandle<SendOutcome> {
        let dispatcher = self.clone();
        handle.spawn(async move { dispatcher.send(&query).await })
    }

    fn speak(&self, text: &str) {
        let Some(voice) = &self.voice else {
            return;
        };
        if !voice.config().auto_speak || text.is_empty() {
            return;
        }

        match voice.speak(text) {
            Ok(()) => {}
            Err(e @ AssistantError::CapabilityUnavailable(_)) => {
                if !self.synthesis_notice_sent.swap(true, Ordering::SeqCst) {
                    warn!("{}; replies will not be spoken", e);
                    self.notify(DispatchEvent::Notice(e.user_message()));
                }
            }
            Err(e) => warn!("Failed to speak reply: {}", e),
        }
    }

    fn notify(&self, event: DispatchEvent) {
        if let Some(events) = &self.events {
            if events.send(event).is_err() {
                debug!("Event receiver dropped");
            }
        }
    }
}

/// Clears the pending flag if a send is abandoned mid-flight
struct PendingGuard<'a> {
    store: &'a SessionStore,
    armed: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Query abandoned before the backend answered");
            let _ = self.store.apply(SessionAction::ReceiveFailure {
                reason: "request abandoned".to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{MessageKind, Reply};
    use crate::session::BACKEND_ERROR_TEXT;
    use crate::speech::scripted::RecordingSynthesizer;
    use crate::speech::{Voice, VoiceConfig};
    use crate::Result;
    use async_trait::async_trait;
    use crossbeam_channel::unbounded;
    use parking_lot::Mutex;
    use std::time::Duration;

    /// Replies with a canned result and records what it was asked
    struct CannedBackend {
        reply: Result<Reply>,
        asked: Mutex<Vec<String>>,
    }

    impl CannedBackend {
        fn new(reply: Result<Reply>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                asked: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatBackend for CannedBackend {
        async fn query(&self, message: &str) -> Result<Reply> {
            self.asked.lock().push(message.to_string());
            self.reply.clone()
        }
    }

    /// Never answers
    struct SilentBackend;

    #[async_trait]
    impl ChatBackend for SilentBackend {
        async fn query(&self, _message: &str) -> Result<Reply> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_successful_round_trip() {
        let backend = CannedBackend::new(Ok(Reply::text("Revenue was $1.2M")));
        let dispatcher = RequestDispatcher::new(SessionStore::default(), backend.clone());

        let outcome = dispatcher.send("  What was revenue?  ").await;

        let SendOutcome::Answered(reply) = outcome else {
            panic!("expected an answer, got {:?}", outcome);
        };
        assert_eq!(reply.content, "Revenue was $1.2M");
        assert!(matches!(reply.kind, Some(MessageKind::Text)));
        assert_eq!(backend.asked.lock().as_slice(), ["What was revenue?"]);

        let messages = dispatcher.store().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].content, "What was revenue?");
        assert!(!dispatcher.store().is_pending());
    }

    #[tokio::test]
    async fn test_failure_appends_error_text() {
        let backend = CannedBackend::new(Err(AssistantError::Transport("refused".into())));
        let dispatcher = RequestDispatcher::new(SessionStore::default(), backend);

        let outcome = dispatcher.send("top products").await;

        assert!(matches!(&outcome, SendOutcome::Failed(m) if m.content == BACKEND_ERROR_TEXT));
        assert_eq!(dispatcher.store().len(), 3);
        assert!(!dispatcher.store().is_pending());
    }

    #[tokio::test]
    async fn test_blank_query_is_not_sent() {
        let backend = CannedBackend::new(Ok(Reply::text("unused")));
        let dispatcher = RequestDispatcher::new(SessionStore::default(), backend.clone());

        let outcome = dispatcher.send(" \t ").await;

        assert!(matches!(outcome, SendOutcome::Rejected(RejectReason::EmptyQuery)));
        assert!(backend.asked.lock().is_empty());
        assert_eq!(dispatcher.store().len(), 1);
    }

    #[tokio::test]
    async fn test_abandoned_send_clears_pending() {
        let dispatcher = RequestDispatcher::new(SessionStore::default(), Arc::new(SilentBackend));

        let result = tokio::time::timeout(Duration::from_millis(20), dispatcher.send("slow")).await;
        assert!(result.is_err());

        assert!(!dispatcher.store().is_pending());
        assert_eq!(
            dispatcher.store().last().map(|m| m.content),
            Some(BACKEND_ERROR_TEXT.to_string())
        );
    }

    #[tokio::test]
    async fn test_events_for_each_appended_message() {
        let (tx, rx) = unbounded();
        let backend = CannedBackend::new(Ok(Reply::text("ok")));
        let dispatcher = RequestDispatcher::new(SessionStore::default(), backend).with_events(tx);

        dispatcher.send("hi").await;

        let roles: Vec<Role> = rx
            .try_iter()
            .filter_map(|event| match event {
                DispatchEvent::Appended { role, .. } => Some(role),
                _ => None,
            })
            .collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
    }

    #[tokio::test]
    async fn test_reply_spoken_once() {
        let synth = Arc::new(RecordingSynthesizer::with_voices(vec![Voice::new("Fred", "en-US")]));
        let voice = Arc::new(VoiceOutputAdapter::new(Some(synth.clone()), VoiceConfig::default()));
        let backend = CannedBackend::new(Ok(Reply::text("Sales are up")));
        let dispatcher =
            RequestDispatcher::new(SessionStore::default(), backend).with_voice_output(voice);

        dispatcher.send("how are sales").await;

        let spoken = synth.spoken();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].text, "Sales are up");
    }

    #[tokio::test]
    async fn test_empty_reply_not_spoken() {
        let synth = Arc::new(RecordingSynthesizer::new());
        let voice = Arc::new(VoiceOutputAdapter::new(Some(synth.clone()), VoiceConfig::default()));
        let backend = CannedBackend::new(Ok(Reply::text("")));
        let dispatcher =
            RequestDispatcher::new(SessionStore::default(), backend).with_voice_output(voice);

        dispatcher.send("anything").await;

        assert!(synth.spoken().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_reply_spoken() {
        let synth = Arc::new(RecordingSynthesizer::with_voices(vec![Voice::new("Fred", "en-US")]));
        let voice = Arc::new(VoiceOutputAdapter::new(Some(synth.clone()), VoiceConfig::default()));
        let backend = CannedBackend::new(Ok(Reply::text(" ")));
        let dispatcher =
            RequestDispatcher::new(SessionStore::default(), backend).with_voice_output(voice);

        dispatcher.send("anything").await;

        let spoken = synth.spoken();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].text, " ");
    }

    #[tokio::test]
    async fn test_query_during_pending_is_deferred() {
        let (tx, rx) = unbounded();
        let dispatcher =
            RequestDispatcher::new(SessionStore::default(), Arc::new(SilentBackend)).with_events(tx);

        let first = dispatcher.spawn_send(&Handle::current(), "first".to_string());
        for _ in 0..100 {
            if dispatcher.store().is_pending() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let outcome = dispatcher.send("  second ").await;
        assert!(matches!(outcome, SendOutcome::Rejected(RejectReason::RequestPending)));
        assert!(rx
            .try_iter()
            .any(|e| e == DispatchEvent::Deferred("second".to_string())));

        first.abort();
    }

    #[tokio::test]
    async fn test_missing_synthesis_noticed_once() {
        let (tx, rx) = unbounded();
        let voice = Arc::new(VoiceOutputAdapter::new(None, VoiceConfig::default()));
        let backend = CannedBackend::new(Ok(Reply::text("hello")));
        let dispatcher = RequestDispatcher::new(SessionStore::default(), backend)
            .with_voice_output(voice)
            .with_events(tx);

        dispatcher.send("one").await;
        dispatcher.send("two").await;

        let notices = rx
            .try_iter()
            .filter(|e| matches!(e, DispatchEvent::Notice(_)))
            .count();
        assert_eq!(notices, 1);
        assert_eq!(dispatcher.store().len(), 5);
    }

    #[tokio::test]
    async fn test_auto_speak_disabled() {
        let synth = Arc::new(RecordingSynthesizer::with_voices(vec![Voice::new("Fred", "en-US")]));
        let voice = Arc::new(VoiceOutputAdapter::new(
            Some(synth.clone()),
            VoiceConfig::default().without_auto_speak(),
        ));
        let backend = CannedBackend::new(Ok(Reply::text("quiet")));
        let dispatcher =
            RequestDispatcher::new(SessionStore::default(), backend).with_voice_output(voice);

        dispatcher.send("hello").await;

        assert!(synth.spoken().is_empty());
    }
}
