//! Main application struct and eframe integration

use crate::integration::{AssistantClient, ClientConfig};
use crate::session::DispatchEvent;
use crate::speech::{HostCapabilities, ListenOutcome};
use crate::ui::components::{InputAction, InputBar, MessageList, NoticeWindow};
use crate::ui::state::UiState;
use crate::ui::theme::Theme;
use crate::{AssistantError, Result};
use egui::{self, CentralPanel, RichText, TopBottomPanel};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info};

/// Idle polling so late dispatcher events still reach the window
const IDLE_REPAINT: Duration = Duration::from_millis(250);

pub struct AssistantApp {
    client: AssistantClient,
    runtime: Runtime,
    state: UiState,
    theme: Theme,
}

impl AssistantApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ClientConfig, host: HostCapabilities) -> Result<Self> {
        let theme = Theme::light();
        theme.apply(&cc.egui_ctx);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("assistant-io")
            .enable_all()
            .build()
            .map_err(|e| AssistantError::Config(format!("Failed to start async runtime: {}", e)))?;

        let client = AssistantClient::new(config, host)?;
        info!("Connected to {}", client.config().endpoint);

        Ok(Self {
            client,
            runtime,
            state: UiState::new(),
            theme,
        })
    }

    fn submit(&mut self, query: String) {
        debug!("Submitting query from UI");
        // Outcome is recorded in the session; the handle is not needed
        drop(self.client.spawn_send(self.runtime.handle(), query));
    }

    fn start_listening(&mut self) {
        match self.client.listen_and_send(self.runtime.handle()) {
            Ok(ListenOutcome::Started) | Ok(ListenOutcome::AlreadyListening) => {}
            Ok(ListenOutcome::Failed) => debug!("Voice input did not start"),
            Err(e) => self.state.show_notice(e.user_message()),
        }
    }

    /// Drain dispatcher events
    fn poll_events(&mut self) {
        while let Ok(event) = self.client.events().try_recv() {
            match event {
                DispatchEvent::Notice(text) => self.state.show_notice(text),
                // Keep an unsent voice query so it can be sent by hand
                DispatchEvent::Deferred(query) => {
                    if self.state.input_text.trim().is_empty() {
                        self.state.input_text = query;
                    }
                }
                DispatchEvent::Appended { role, .. } => debug!("Message appended ({:?})", role),
            }
        }
    }

    fn show_header(&self, ctx: &egui::Context, pending: bool) {
        TopBottomPanel::top("header")
            .frame(egui::Frame::none().fill(self.theme.bg_secondary).inner_margin(12.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Retail Analytics Assistant")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if pending {
                            ui.spinner();
                            ui.label(RichText::new("Thinking...").size(12.0).color(self.theme.text_muted));
                        }
                    });
                });
            });
    }

    fn show_input_area(&mut self, ctx: &egui::Context, pending: bool) -> Option<InputAction> {
        let listening = self.client.voice_input().is_listening();
        let voice_input = self.client.config().enable_voice_input;

        TopBottomPanel::bottom("input_area")
            .frame(egui::Frame::none().fill(self.theme.bg_primary).inner_margin(self.theme.spacing_sm))
            .show(ctx, |ui| {
                InputBar::new(&mut self.state, &self.theme)
                    .pending(pending)
                    .listening(listening)
                    .voice_input(voice_input)
                    .show(ui)
            })
            .inner
    }

    fn show_content(&self, ctx: &egui::Context, pending: bool) {
        let messages = self.client.messages();
        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(egui::Margin::symmetric(self.theme.spacing, 0.0)),
            )
            .show(ctx, |ui| {
                MessageList::new(&messages, self.client.renderer(), &self.theme)
                    .pending(pending)
                    .show(ui);
            });
    }
}

impl eframe::App for AssistantApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();

        let pending = self.client.store().is_pending();

        self.show_header(ctx, pending);
        let action = self.show_input_area(ctx, pending);
        self.show_content(ctx, pending);
        NoticeWindow::new(&mut self.state, &self.theme).show(ctx);

        match action {
            Some(InputAction::Send(query)) => self.submit(query),
            Some(InputAction::StartListening) => self.start_listening(),
            Some(InputAction::StopListening) => self.client.stop_listening(),
            None => {}
        }

        if pending || self.client.voice_input().is_listening() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(IDLE_REPAINT);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.client.shutdown();
    }
}
