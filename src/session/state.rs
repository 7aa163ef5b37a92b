//! Conversation state and its transitions
//!
//! The session is a small reducer: every change goes through
//! [`SessionState::apply`] with one of three actions, so the send/receive
//! lifecycle can be tested without a backend or a window.

use crate::messages::{Message, Reply};
use std::fmt;

/// Fixed narrative shown when a round-trip fails for any reason
pub const BACKEND_ERROR_TEXT: &str = "Error connecting to the backend.";

/// Default assistant greeting seeded into every new session
pub const DEFAULT_GREETING: &str = "Hello! I can help you analyze and visualize retail data.";

/// Whether a backend request is in flight
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestState::Idle => write!(f, "Idle"),
            RequestState::Pending => write!(f, "Pending"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionAction {
    /// User submitted a query
    Send(String),
    /// Backend answered with a validated reply
    ReceiveSuccess(Reply),
    /// Round-trip failed; `reason` is for logs only
    ReceiveFailure { reason: String },
}

/// Why an action left the session untouched
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Query was empty or whitespace
    EmptyQuery,
    /// Another request is still in flight
    RequestPending,
    /// A reply arrived with no request outstanding
    NotPending,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::EmptyQuery => write!(f, "query is empty"),
            RejectReason::RequestPending => write!(f, "a request is already pending"),
            RejectReason::NotPending => write!(f, "no request is pending"),
        }
    }
}

/// Ordered message log plus the single-request gate
#[derive(Clone, Debug)]
pub struct SessionState {
    messages: Vec<Message>,
    request: RequestState,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}

impl SessionState {
    /// Create a session seeded with one assistant greeting
    pub fn new(greeting: &str) -> Self {
        let mut messages = Vec::new();
        if !greeting.trim().is_empty() {
            messages.push(Message::assistant_text(greeting));
        }

        Self {
            messages,
            request: RequestState::Idle,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn request_state(&self) -> RequestState {
        self.request
    }

    pub fn is_pending(&self) -> bool {
        self.request.is_pending()
    }

    /// Apply an action, returning a copy of the message it appended
    pub fn apply(&mut self, action: SessionAction) -> Result<Message, RejectReason> {
        let message = match action {
            SessionAction::Send(query) => {
                let query = query.trim();
                if query.is_empty() {
                    return Err(RejectReason::EmptyQuery);
                }
                if self.request.is_pending() {
                    return Err(RejectReason::RequestPending);
                }
                self.request = RequestState::Pending;
                Message::user(query)
            }
            SessionAction::ReceiveSuccess(reply) => {
                if !self.request.is_pending() {
                    return Err(RejectReason::NotPending);
                }
                self.request = RequestState::Idle;
                Message::from_reply(reply)
            }
            SessionAction::ReceiveFailure { .. } => {
                if !self.request.is_pending() {
                    return Err(RejectReason::NotPending);
                }
                self.request = RequestState::Idle;
                Message::assistant_text(BACKEND_ERROR_TEXT)
            }
        };

        self.messages.push(message.clone());
        Ok(message)
    }
}
