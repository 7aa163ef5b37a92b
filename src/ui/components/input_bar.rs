//! Input bar component
//!
//! Microphone, text input and send button. The bar does not talk to the
//! backend itself; it reports what the user asked for.

use crate::ui::state::UiState;
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};

/// What the user did in the input bar this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Send this (trimmed, non-empty) query
    Send(String),
    StartListening,
    StopListening,
}

pub struct InputBar<'a> {
    state: &'a mut UiState,
    theme: &'a Theme,
    pending: bool,
    listening: bool,
    voice_input: bool,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut UiState, theme: &'a Theme) -> Self {
        Self {
            state,
            theme,
            pending: false,
            listening: false,
            voice_input: true,
        }
    }

    /// A request is in flight; sending is disabled
    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    pub fn listening(mut self, listening: bool) -> Self {
        self.listening = listening;
        self
    }

    /// Show the microphone button
    pub fn voice_input(mut self, enabled: bool) -> Self {
        self.voice_input = enabled;
        self
    }

    pub fn show(mut self, ui: &mut egui::Ui) -> Option<InputAction> {
        let mut action = None;

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if self.voice_input {
                        action = action.take().or(self.show_mic_button(ui));
                        ui.add_space(self.theme.spacing_sm);
                    }

                    action = action.take().or(self.show_text_input(ui));

                    ui.add_space(self.theme.spacing_sm);

                    action = action.take().or(self.show_send_button(ui));
                });
            });

        action
    }

    fn show_mic_button(&mut self, ui: &mut egui::Ui) -> Option<InputAction> {
        let (color, label, tooltip) = if self.listening {
            (self.theme.listening, "Stop voice input", "Listening... click to stop")
        } else {
            (self.theme.text_secondary, "Start voice input", "Ask by voice")
        };

        let mut button = egui::Button::new(RichText::new("🎤").size(18.0).color(color))
            .min_size(Vec2::splat(40.0))
            .rounding(self.theme.button_rounding);
        if self.listening {
            button = button.fill(self.theme.listening.gamma_multiply(0.2));
        }

        let response = ui.add(button);
        response.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Button, true, label));

        if self.listening {
            let t = ui.ctx().input(|i| i.time);
            let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;
            ui.painter().circle_stroke(
                response.rect.center(),
                response.rect.width() / 2.0 + 2.0 + pulse * 3.0,
                egui::Stroke::new(2.0 * pulse, self.theme.listening.gamma_multiply(1.0 - pulse * 0.5)),
            );
            ui.ctx().request_repaint();
        }

        let clicked = response.clicked();
        response.on_hover_text(tooltip);

        match (clicked, self.listening) {
            (false, _) => None,
            (true, false) => Some(InputAction::StartListening),
            (true, true) => Some(InputAction::StopListening),
        }
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui) -> Option<InputAction> {
        let available_width = ui.available_width() - 56.0;

        let text_edit = egui::TextEdit::singleline(&mut self.state.input_text)
            .hint_text("Ask about sales, products, stores...")
            .desired_width(available_width)
            .font(egui::TextStyle::Body)
            .margin(egui::Margin::symmetric(12.0, 8.0))
            .id(egui::Id::new("message_input"));

        let response = ui.add(text_edit);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, "Message input")
        });

        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        if submitted && !self.pending {
            if let Some(query) = self.state.take_query() {
                return Some(InputAction::Send(query));
            }
        }
        None
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) -> Option<InputAction> {
        let can_send = self.state.has_query() && !self.pending;

        let button_color = if can_send {
            self.theme.primary
        } else {
            self.theme.text_muted
        };

        let button = egui::Button::new(RichText::new("➤").size(16.0).color(egui::Color32::WHITE))
            .min_size(Vec2::splat(40.0))
            .rounding(self.theme.button_rounding)
            .fill(button_color);

        let response = ui.add_enabled(can_send, button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, can_send, "Send message")
        });

        let clicked = response.clicked();
        response.on_hover_text("Send (Enter)");

        if clicked {
            return self.state.take_query().map(InputAction::Send);
        }
        None
    }
}
