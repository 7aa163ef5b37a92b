//! Retail Assistant - conversational client for a retail analytics backend
//!
//! Natural-language questions go to a remote reasoning service; its replies
//! come back as narrative text, a data table or a chart, and can be spoken
//! aloud. Spoken questions are accepted when the host can recognize speech.

pub mod backend;
pub mod integration;
pub mod messages;
pub mod render;
pub mod session;
pub mod speech;
pub mod ui;

use std::fmt;
use thiserror::Error;

/// Optional host features the client can use when present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    SpeechRecognition,
    SpeechSynthesis,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::SpeechRecognition => write!(f, "speech recognition"),
            Capability::SpeechSynthesis => write!(f, "speech synthesis"),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum AssistantError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend returned status {status}: {body}")]
    BackendStatus { status: u16, body: String },

    #[error("Malformed reply: {0}")]
    MalformedReply(String),

    #[error("Host does not provide {0}")]
    CapabilityUnavailable(Capability),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel error: {0}")]
    Channel(String),
}

impl From<reqwest::Error> for AssistantError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AssistantError::MalformedReply(e.to_string())
        } else {
            AssistantError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AssistantError {
    fn from(e: serde_json::Error) -> Self {
        AssistantError::MalformedReply(e.to_string())
    }
}

impl AssistantError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The next query is a fresh attempt
            AssistantError::Transport(_) => true,
            AssistantError::BackendStatus { .. } => true,
            AssistantError::MalformedReply(_) => true,
            // The user may simply try the microphone again
            AssistantError::Recognition(_) => true,
            AssistantError::Synthesis(_) => true,
            // Host features do not appear at runtime
            AssistantError::CapabilityUnavailable(_) => false,
            AssistantError::Config(_) => false,
            AssistantError::Channel(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::Transport(_)
            | AssistantError::BackendStatus { .. }
            | AssistantError::MalformedReply(_) => "Error connecting to the backend.".to_string(),
            AssistantError::CapabilityUnavailable(Capability::SpeechRecognition) => {
                "Speech recognition is not supported on this system.".to_string()
            }
            AssistantError::CapabilityUnavailable(Capability::SpeechSynthesis) => {
                "Speech output is not supported on this system. Replies will be shown as text only."
                    .to_string()
            }
            AssistantError::Recognition(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            AssistantError::Synthesis(_) => {
                "Text-to-speech failed. The reply is shown as text.".to_string()
            }
            AssistantError::Config(_) => "Configuration error. Please check settings.".to_string(),
            AssistantError::Channel(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
