//! Assistant client
//!
//! Builds the session, backend, dispatcher and voice adapters from a
//! [`ClientConfig`] and the host's speech capabilities.

use crate::backend::{ChatBackend, HttpBackend};
use crate::integration::config::ClientConfig;
use crate::messages::Message;
use crate::render::{RenderedMessage, ResponseRenderer};
use crate::session::{DispatchEvent, RequestDispatcher, SendOutcome, SessionStore};
use crate::speech::{HostCapabilities, ListenOutcome, VoiceInputAdapter, VoiceOutputAdapter};
use crate::Result;
use crossbeam_channel::{unbounded, Receiver};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub struct AssistantClient {
    config: ClientConfig,
    store: SessionStore,
    dispatcher: RequestDispatcher,
    renderer: ResponseRenderer,
    voice_input: VoiceInputAdapter,
    voice_output: Option<Arc<VoiceOutputAdapter>>,
    events: Receiver<DispatchEvent>,
}

impl AssistantClient {
    /// Client talking to the HTTP backend at `config.endpoint`
    pub fn new(config: ClientConfig, host: HostCapabilities) -> Result<Self> {
        config.validate()?;
        let backend = Arc::new(HttpBackend::from_config(&config)?);
        Self::with_backend(config, host, backend)
    }

    /// Client talking to any backend
    pub fn with_backend(
        config: ClientConfig,
        host: HostCapabilities,
        backend: Arc<dyn ChatBackend>,
    ) -> Result<Self> {
        config.validate()?;

        let store = SessionStore::new(&config.greeting);
        let (event_tx, event_rx) = unbounded();
        let mut dispatcher = RequestDispatcher::new(store.clone(), backend).with_events(event_tx);

        let voice_output = if config.enable_voice_output {
            let adapter = Arc::new(VoiceOutputAdapter::new(host.synthesizer.clone(), config.voice.clone()));
            dispatcher = dispatcher.with_voice_output(adapter.clone());
            Some(adapter)
        } else {
            None
        };

        let recognizer = if config.enable_voice_input {
            host.recognizer.clone()
        } else {
            None
        };
        let voice_input = VoiceInputAdapter::new(recognizer, config.voice.locale.clone());

        info!(
            "Assistant client ready (voice input: {}, voice output: {})",
            voice_input.is_available(),
            voice_output.as_ref().is_some_and(|v| v.is_available())
        );

        Ok(Self {
            config,
            store,
            dispatcher,
            renderer: ResponseRenderer::new(),
            voice_input,
            voice_output,
            events: event_rx,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    pub fn renderer(&self) -> &ResponseRenderer {
        &self.renderer
    }

    pub fn voice_input(&self) -> &VoiceInputAdapter {
        &self.voice_input
    }

    /// Dispatcher notifications, drained by the UI each frame
    pub fn events(&self) -> &Receiver<DispatchEvent> {
        &self.events
    }

    pub fn messages(&self) -> Vec<Message> {
        self.store.messages()
    }

    pub fn render(&self, message: &Message) -> RenderedMessage {
        self.renderer.render(message)
    }

    pub async fn send(&self, query: &str) -> SendOutcome {
        self.dispatcher.send(query).await
    }

    pub fn spawn_send(&self, handle: &Handle, query: String) -> JoinHandle<SendOutcome> {
        self.dispatcher.spawn_send(handle, query)
    }

    /// Start a voice query; see [`VoiceInputAdapter::start_listening`]
    pub fn listen<F>(&self, on_transcript: F) -> Result<ListenOutcome>
    where
        F: FnOnce(String) + Send + 'static,
    {
        self.voice_input.start_listening(on_transcript)
    }

    /// Start a voice query whose final transcript is sent like typed text
    ///
    /// A transcript that arrives while another request is in flight is not
    /// sent; the dispatcher reports it as [`DispatchEvent::Deferred`].
    pub fn listen_and_send(&self, handle: &Handle) -> Result<ListenOutcome> {
        let dispatcher = self.dispatcher.clone();
        let handle = handle.clone();
        self.voice_input.start_listening(move |transcript| {
            debug!("Sending voice transcript");
            // Outcome is recorded in the session
            drop(dispatcher.spawn_send(&handle, transcript));
        })
    }

    pub fn stop_listening(&self) {
        self.voice_input.stop_listening();
    }

    /// Stop listening and speaking
    pub fn shutdown(&self) {
        self.voice_input.stop_listening();
        if let Some(voice) = &self.voice_output {
            voice.cancel();
        }
        info!("Assistant client shut down");
    }
}
