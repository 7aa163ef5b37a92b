use crate::ui::state::UiState;
use crate::ui::theme::Theme;
use egui::{self, RichText};

/// Modal notice with a single OK button
pub struct NoticeWindow<'a> {
    state: &'a mut UiState,
    theme: &'a Theme,
}

impl<'a> NoticeWindow<'a> {
    pub fn new(state: &'a mut UiState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ctx: &egui::Context) {
        let Some(text) = self.state.notice.clone() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                let response = ui.label(RichText::new(&text).color(self.theme.text_primary));
                let label_text = format!("Notice: {}", text);
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label_text)
                });

                ui.add_space(self.theme.spacing_sm);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.state.dismiss_notice();
        }
    }
}
