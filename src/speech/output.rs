//! Spoken replies
//!
//! Picks a voice once the host's voice list is known and keeps it current
//! as the list changes. Speaking a new reply interrupts the previous one.

use super::config::VoiceConfig;
use super::host::{ListenerId, SpeechSynthesizer, Utterance, Voice, VoicesListener};
use super::voice_select::select_voice;
use crate::{AssistantError, Capability, Result};
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct VoiceOutputAdapter {
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    config: VoiceConfig,
    selected: Arc<RwLock<Option<Voice>>>,
    listener: Option<ListenerId>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl VoiceOutputAdapter {
    pub fn new(synthesizer: Option<Arc<dyn SpeechSynthesizer>>, config: VoiceConfig) -> Self {
        let selected = Arc::new(RwLock::new(None));

        let listener = synthesizer.as_ref().map(|synth| {
            let resolve = voice_resolver(Arc::downgrade(synth), selected.clone(), config.locale.clone());
            let id = synth.add_voices_listener(resolve.clone());
            // The list may already be loaded, in which case no change event comes
            resolve();
            id
        });

        if synthesizer.is_none() {
            info!("Speech synthesis not available on this host");
        }

        Self {
            synthesizer,
            config,
            selected,
            listener,
            in_flight: Mutex::new(None),
        }
    }

    pub fn is_available(&self) -> bool {
        self.synthesizer.is_some()
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    /// Voice that the next utterance will use
    pub fn selected_voice(&self) -> Option<Voice> {
        self.selected.read().clone()
    }

    /// Speak `text` with the selected voice
    pub fn speak(&self, text: &str) -> Result<()> {
        let Some(synth) = &self.synthesizer else {
            return Err(AssistantError::CapabilityUnavailable(Capability::SpeechSynthesis));
        };

        if text.is_empty() {
            return Ok(());
        }

        let voice = self.selected_voice();
        if voice.is_none() {
            warn!("No voice selected yet, speaking with the host default");
        }

        let utterance = Utterance {
            text: text.to_string(),
            locale: voice
                .as_ref()
                .map(|v| v.locale.clone())
                .unwrap_or_else(|| self.config.locale.clone()),
            voice,
            rate: self.config.rate,
            pitch: self.config.pitch,
        };

        let token = CancellationToken::new();
        {
            let mut in_flight = self.in_flight.lock();
            if let Some(previous) = in_flight.replace(token.clone()) {
                if self.config.cancel_previous_utterance {
                    debug!("Interrupting previous utterance");
                    previous.cancel();
                }
            }
        }

        debug!("Speaking {} chars", utterance.text.len());
        synth.speak(utterance, token).map_err(|e| {
            warn!("Speech synthesis failed: {}", e);
            e
        })
    }

    /// Stop the current utterance, if any
    pub fn cancel(&self) {
        if let Some(token) = self.in_flight.lock().take() {
            token.cancel();
        }
    }
}

impl Drop for VoiceOutputAdapter {
    fn drop(&mut self) {
        self.cancel();
        if let (Some(synth), Some(id)) = (&self.synthesizer, self.listener) {
            synth.remove_voices_listener(id);
            debug!("Voice list listener removed");
        }
    }
}

fn voice_resolver(
    synth: Weak<dyn SpeechSynthesizer>,
    selected: Arc<RwLock<Option<Voice>>>,
    locale: String,
) -> VoicesListener {
    Arc::new(move || {
        let Some(synth) = synth.upgrade() else {
            return;
        };
        let voices = synth.voices();
        let choice = select_voice(&voices, &locale);
        match &choice {
            Some(voice) => debug!("Selected voice '{}' ({})", voice.name, voice.locale),
            None => debug!("No voices available yet"),
        }
        *selected.write() = choice;
    })
}
