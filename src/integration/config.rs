//! Client configuration
//!
//! Endpoint, greeting and voice settings in one place, with environment
//! overrides for the values that differ between deployments.

use crate::session::DEFAULT_GREETING;
use crate::speech::VoiceConfig;
use crate::{AssistantError, Result};
use reqwest::Url;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/chat";

/// Overrides the backend endpoint
pub const ENDPOINT_ENV: &str = "ASSISTANT_API_ENDPOINT";

/// Optional request timeout in whole seconds
pub const TIMEOUT_ENV: &str = "ASSISTANT_REQUEST_TIMEOUT_SECS";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Backend chat endpoint
    pub endpoint: String,

    /// No timeout unless set
    pub request_timeout: Option<Duration>,

    /// First assistant message of every session
    pub greeting: String,

    /// Speech settings
    pub voice: VoiceConfig,

    /// Whether to offer the microphone
    pub enable_voice_input: bool,

    /// Whether to speak replies
    pub enable_voice_output: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: None,
            greeting: DEFAULT_GREETING.to_string(),
            voice: VoiceConfig::default(),
            enable_voice_input: true,
            enable_voice_output: true,
        }
    }
}

impl ClientConfig {
    /// Defaults plus overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults plus overrides from `lookup`; blank values are ignored
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(endpoint) = value(ENDPOINT_ENV) {
            config.endpoint = endpoint;
        }

        if let Some(secs) = value(TIMEOUT_ENV) {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Some(Duration::from_secs(secs)),
                _ => warn!("Ignoring invalid {}: '{}'", TIMEOUT_ENV, secs),
            }
        }

        config
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    pub fn with_voice(mut self, voice: VoiceConfig) -> Self {
        self.voice = voice;
        self
    }

    /// Text-only input
    pub fn without_voice_input(mut self) -> Self {
        self.enable_voice_input = false;
        self
    }

    /// Replies are never spoken
    pub fn without_voice_output(mut self) -> Self {
        self.enable_voice_output = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            AssistantError::Config(format!("Invalid endpoint '{}': {}", self.endpoint, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AssistantError::Config(format!(
                "Endpoint must use http or https: {}",
                self.endpoint
            )));
        }

        if !(self.voice.rate > 0.0) {
            return Err(AssistantError::Config(format!(
                "Speech rate must be positive, got {}",
                self.voice.rate
            )));
        }
        if !(self.voice.pitch > 0.0) {
            return Err(AssistantError::Config(format!(
                "Speech pitch must be positive, got {}",
                self.voice.pitch
            )));
        }

        Ok(())
    }
}
