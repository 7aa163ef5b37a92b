//! Host speech capabilities
//!
//! Recognition and synthesis engines belong to the host. The client only
//! talks to them through these traits, and either may be missing.

use crate::{Capability, Result};
use crossbeam_channel::Sender;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A synthesis voice offered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// BCP 47 tag such as `en-US`
    pub locale: String,
    /// Host's default voice for its locale
    pub is_default: bool,
}

impl Voice {
    pub fn new(name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locale: locale.into(),
            is_default: false,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Locale match ignoring case and `_`/`-` spelling
    pub fn matches_locale(&self, locale: &str) -> bool {
        normalize_locale(&self.locale) == normalize_locale(locale)
    }
}

fn normalize_locale(locale: &str) -> String {
    locale.trim().replace('_', "-").to_ascii_lowercase()
}

/// One request to speak
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// `None` lets the host pick its default voice
    pub voice: Option<Voice>,
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Called by the host whenever its voice list changes
pub type VoicesListener = Arc<dyn Fn() + Send + Sync>;

pub trait SpeechSynthesizer: Send + Sync {
    /// Voices currently available; may be empty until the host has loaded them
    fn voices(&self) -> Vec<Voice>;

    /// Register for voice-list changes. Hosts must invoke listeners without
    /// holding any lock that `voices()` needs.
    fn add_voices_listener(&self, listener: VoicesListener) -> ListenerId;

    fn remove_voices_listener(&self, id: ListenerId);

    /// Start speaking without waiting for playback to finish. Playback stops
    /// when `cancel` fires.
    fn speak(&self, utterance: Utterance, cancel: CancellationToken) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionOptions {
    pub locale: String,
    /// Deliver partial hypotheses as well as final results
    pub interim_results: bool,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            interim_results: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Result { transcript: String, is_final: bool },
    Error(String),
    /// Session finished; no more events follow
    End,
}

pub trait SpeechRecognizer: Send + Sync {
    /// Open one recognition session. Events go to `events` until `End` is
    /// sent or `cancel` fires.
    fn start(
        &self,
        options: &RecognitionOptions,
        events: Sender<RecognitionEvent>,
        cancel: CancellationToken,
    ) -> Result<()>;
}

/// Speech engines the host makes available
#[derive(Clone, Default)]
pub struct HostCapabilities {
    pub recognizer: Option<Arc<dyn SpeechRecognizer>>,
    pub synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
}

impl HostCapabilities {
    /// A host without any speech support
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_recognizer(mut self, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::SpeechRecognition => self.recognizer.is_some(),
            Capability::SpeechSynthesis => self.synthesizer.is_some(),
        }
    }
}

impl fmt::Debug for HostCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCapabilities")
            .field("recognizer", &self.recognizer.is_some())
            .field("synthesizer", &self.synthesizer.is_some())
            .finish()
    }
}
