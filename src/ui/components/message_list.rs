//! Message list component
//!
//! Displays the conversation: narrative bubbles, analytics visuals and the
//! generated query, with a typing indicator while a reply is pending.

use super::analytics_view::AnalyticsView;
use crate::messages::Message;
use crate::render::ResponseRenderer;
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, RichText};

pub struct MessageList<'a> {
    messages: &'a [Message],
    pending: bool,
    renderer: &'a ResponseRenderer,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(messages: &'a [Message], renderer: &'a ResponseRenderer, theme: &'a Theme) -> Self {
        Self {
            messages,
            pending: false,
            renderer,
            theme,
        }
    }

    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .id_salt("message_list")
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.add_space(self.theme.spacing);

                    for message in self.messages {
                        self.show_message(ui, message);
                        ui.add_space(self.theme.spacing_sm);
                    }

                    if self.pending {
                        self.show_loading(ui);
                    }

                    ui.add_space(self.theme.spacing);
                });
            });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message) {
        let is_user = message.is_user();
        let rendered = self.renderer.render(message);

        let (bubble_color, text_color) = if is_user {
            (self.theme.user_bubble, Color32::WHITE)
        } else {
            (self.theme.assistant_bubble, self.theme.text_primary)
        };
        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(if is_user { "You" } else { "Assistant" })
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(2.0);

            let max_width = ui.available_width() * 0.8;

            egui::Frame::none()
                .fill(bubble_color)
                .rounding(self.theme.bubble_rounding)
                .stroke(egui::Stroke::new(1.0, self.theme.bg_tertiary))
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);

                    ui.with_layout(egui::Layout::top_down(Align::LEFT), |ui| {
                        if !rendered.narrative.is_empty() {
                            let label_text = if is_user {
                                format!("User message: {}", rendered.narrative)
                            } else {
                                format!("Assistant response: {}", rendered.narrative)
                            };
                            let response = ui.label(RichText::new(&rendered.narrative).color(text_color));
                            response.widget_info(|| {
                                egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label_text)
                            });
                        }

                        if let Some(visual) = &rendered.visual {
                            ui.add_space(self.theme.spacing_sm);
                            AnalyticsView::new(visual, self.theme, message.id).show(ui);
                        }

                        if let Some(query) = &rendered.generated_query {
                            ui.add_space(self.theme.spacing_sm);
                            self.show_generated_query(ui, query);
                        }
                    });
                });

            ui.label(
                RichText::new(message.timestamp.format("%H:%M").to_string())
                    .size(10.0)
                    .color(self.theme.text_muted),
            );
        });
    }

    fn show_generated_query(&self, ui: &mut egui::Ui, query: &str) {
        ui.label(
            RichText::new("Generated SQL")
                .size(11.0)
                .strong()
                .color(self.theme.text_muted),
        );

        egui::Frame::none()
            .fill(self.theme.code_bg)
            .rounding(self.theme.button_rounding)
            .inner_margin(egui::Margin::symmetric(10.0, 8.0))
            .show(ui, |ui| {
                let response = ui.label(
                    RichText::new(query)
                        .monospace()
                        .color(Color32::from_rgb(134, 239, 172)),
                );
                let label_text = format!("Generated SQL: {}", query);
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label_text)
                });
            });
    }

    fn show_loading(&self, ui: &mut egui::Ui) {
        ui.with_layout(egui::Layout::top_down(Align::LEFT), |ui| {
            egui::Frame::none()
                .fill(self.theme.assistant_bubble)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    let response = ui
                        .horizontal(|ui| {
                            let t = ui.ctx().input(|i| i.time);
                            for i in 0..3 {
                                let alpha = ((t * 3.0 + i as f64 * 0.5).sin() * 0.5 + 0.5) as f32;
                                ui.label(
                                    RichText::new("●")
                                        .size(10.0)
                                        .color(self.theme.text_muted.gamma_multiply(alpha)),
                                );
                            }
                        })
                        .response;
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, "Waiting for reply")
                    });
                });
        });

        ui.ctx().request_repaint();
    }
}
