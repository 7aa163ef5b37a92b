//! In-memory speech engines
//!
//! Stand-ins for host engines: a recognizer that replays queued events and a
//! synthesizer that records what it was asked to say. Used by the test
//! suites and handy for driving the client without audio hardware.

use super::host::{
    ListenerId, RecognitionEvent, RecognitionOptions, SpeechRecognizer, SpeechSynthesizer,
    Utterance, Voice, VoicesListener,
};
use crate::{AssistantError, Result};
use crossbeam_channel::Sender;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

#[derive(Default)]
pub struct ScriptedRecognizer {
    queued: Mutex<Vec<RecognitionEvent>>,
    open: Mutex<Option<Sender<RecognitionEvent>>>,
    starts: AtomicUsize,
    last_options: Mutex<Option<RecognitionOptions>>,
    failure: Option<String>,
}

impl ScriptedRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recognizer whose `start` always fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Events replayed as soon as the next session starts
    pub fn queue(&self, events: Vec<RecognitionEvent>) {
        self.queued.lock().extend(events);
    }

    /// Push an event into the most recent session
    pub fn emit(&self, event: RecognitionEvent) {
        if let Some(events) = self.open.lock().as_ref() {
            let _ = events.send(event);
        }
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<RecognitionOptions> {
        self.last_options.lock().clone()
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn start(
        &self,
        options: &RecognitionOptions,
        events: Sender<RecognitionEvent>,
        _cancel: CancellationToken,
    ) -> Result<()> {
        if let Some(message) = &self.failure {
            return Err(AssistantError::Recognition(message.clone()));
        }

        self.starts.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock() = Some(options.clone());

        for event in self.queued.lock().drain(..) {
            let _ = events.send(event);
        }
        *self.open.lock() = Some(events);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSynthesizer {
    voices: RwLock<Vec<Voice>>,
    listeners: Mutex<Vec<(ListenerId, VoicesListener)>>,
    next_listener: AtomicU64,
    spoken: Mutex<Vec<(Utterance, CancellationToken)>>,
}

impl RecordingSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            voices: RwLock::new(voices),
            ..Self::default()
        }
    }

    /// Replace the voice list and notify listeners
    pub fn set_voices(&self, voices: Vec<Voice>) {
        *self.voices.write() = voices;
        let listeners: Vec<VoicesListener> =
            self.listeners.lock().iter().map(|(_, l)| l.clone()).collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().iter().map(|(u, _)| u.clone()).collect()
    }

    /// Cancellation tokens handed over with each utterance, oldest first
    pub fn tokens(&self) -> Vec<CancellationToken> {
        self.spoken.lock().iter().map(|(_, t)| t.clone()).collect()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn voices(&self) -> Vec<Voice> {
        self.voices.read().clone()
    }

    fn add_voices_listener(&self, listener: VoicesListener) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::SeqCst));
        self.listeners.lock().push((id, listener));
        id
    }

    fn remove_voices_listener(&self, id: ListenerId) {
        self.listeners.lock().retain(|(existing, _)| *existing != id);
    }

    fn speak(&self, utterance: Utterance, cancel: CancellationToken) -> Result<()> {
        self.spoken.lock().push((utterance, cancel));
        Ok(())
    }
}
