use super::state::{RejectReason, RequestState, SessionAction, SessionState};
use crate::messages::Message;
use parking_lot::RwLock;
use std::sync::Arc;

/// Thread-safe handle to the conversation
///
/// Cloning shares the same session. Readers (the UI) take snapshots; only the
/// request dispatcher applies actions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    pub fn new(greeting: &str) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionState::new(greeting))),
        }
    }

    pub(crate) fn apply(&self, action: SessionAction) -> Result<Message, RejectReason> {
        self.inner.write().apply(action)
    }

    /// Copy of every message, oldest first
    pub fn messages(&self) -> Vec<Message> {
        self.inner.read().messages().to_vec()
    }

    pub fn last(&self) -> Option<Message> {
        self.inner.read().messages().last().cloned()
    }

    pub fn request_state(&self) -> RequestState {
        self.inner.read().request_state()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.read().is_pending()
    }

    pub fn len(&self) -> usize {
        self.inner.read().messages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().messages().is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionState::default())),
        }
    }
}
