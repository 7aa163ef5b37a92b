//! Spoken questions
//!
//! One recognition session at a time. The first final transcript of a
//! session goes to the caller's callback; everything else is logged.

use super::host::{RecognitionEvent, RecognitionOptions, SpeechRecognizer};
use crate::{AssistantError, Capability, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenOutcome {
    /// A new session is running
    Started,
    /// A session was already running; nothing changed
    AlreadyListening,
    /// The host refused to start; the error has been logged
    Failed,
}

pub struct VoiceInputAdapter {
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    options: RecognitionOptions,
    active: Arc<AtomicBool>,
    session: Arc<Mutex<Option<CancellationToken>>>,
}

impl VoiceInputAdapter {
    pub fn new(recognizer: Option<Arc<dyn SpeechRecognizer>>, locale: impl Into<String>) -> Self {
        if recognizer.is_none() {
            info!("Speech recognition not available on this host");
        }

        Self {
            recognizer,
            options: RecognitionOptions {
                locale: locale.into(),
                interim_results: false,
            },
            active: Arc::new(AtomicBool::new(false)),
            session: Arc::new(Mutex::new(None)),
        }
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn is_listening(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Start a recognition session
    ///
    /// `on_transcript` runs at most once, on a worker thread, with the first
    /// final transcript. Recognition errors end the session without calling it.
    pub fn start_listening<F>(&self, on_transcript: F) -> Result<ListenOutcome>
    where
        F: FnOnce(String) + Send + 'static,
    {
        let Some(recognizer) = &self.recognizer else {
            return Err(AssistantError::CapabilityUnavailable(
                Capability::SpeechRecognition,
            ));
        };

        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Recognition already running, ignoring start");
            return Ok(ListenOutcome::AlreadyListening);
        }

        let (event_tx, event_rx) = unbounded();
        let cancel = CancellationToken::new();
        *self.session.lock() = Some(cancel.clone());

        if let Err(e) = recognizer.start(&self.options, event_tx, cancel.clone()) {
            error!("Failed to start speech recognition: {}", e);
            self.session.lock().take();
            self.active.store(false, Ordering::Release);
            return Ok(ListenOutcome::Failed);
        }

        info!("Listening ({})", self.options.locale);

        let active = self.active.clone();
        let session = self.session.clone();
        thread::spawn(move || {
            run_session(event_rx, cancel, on_transcript);
            session.lock().take();
            active.store(false, Ordering::Release);
            debug!("Recognition session closed");
        });

        Ok(ListenOutcome::Started)
    }

    /// End the running session without waiting for a result
    pub fn stop_listening(&self) {
        if let Some(token) = self.session.lock().as_ref() {
            info!("Stopping speech recognition");
            token.cancel();
        }
    }
}

impl Drop for VoiceInputAdapter {
    fn drop(&mut self) {
        self.stop_listening();
    }
}

fn run_session<F>(events: Receiver<RecognitionEvent>, cancel: CancellationToken, on_transcript: F)
where
    F: FnOnce(String),
{
    let mut callback = Some(on_transcript);

    loop {
        match events.recv_timeout(POLL_INTERVAL) {
            Ok(RecognitionEvent::Result {
                transcript,
                is_final,
            }) => {
                if !is_final {
                    debug!("Ignoring interim result");
                    continue;
                }
                match callback.take() {
                    Some(deliver) => {
                        info!("Transcript: {}", transcript);
                        deliver(transcript);
                    }
                    None => debug!("Ignoring extra final result"),
                }
            }
            Ok(RecognitionEvent::Error(message)) => {
                error!("Speech recognition error: {}", message);
                break;
            }
            Ok(RecognitionEvent::End) => break,
            Err(RecvTimeoutError::Timeout) => {
                if cancel.is_cancelled() {
                    debug!("Recognition cancelled");
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
