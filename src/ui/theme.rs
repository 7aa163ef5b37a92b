//! Theme and styling
//!
//! Colors, spacing and text styles for the assistant window.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

#[derive(Clone, Debug)]
pub struct Theme {
    /// Accent for buttons, links and the user bubble
    pub primary: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    /// Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// Message bubbles
    pub user_bubble: Color32,
    pub assistant_bubble: Color32,

    /// Generated query block
    pub code_bg: Color32,

    /// Chart axes and grid lines
    pub chart_axis: Color32,
    pub chart_grid: Color32,

    /// Microphone while listening
    pub listening: Color32,

    pub button_rounding: Rounding,
    pub card_rounding: Rounding,
    pub bubble_rounding: Rounding,

    /// Standard spacing
    pub spacing: f32,
    /// Small spacing
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            primary: Color32::from_rgb(37, 99, 235),    // Blue

            bg_primary: Color32::from_rgb(243, 244, 246),   // Light gray
            bg_secondary: Color32::from_rgb(255, 255, 255), // White
            bg_tertiary: Color32::from_rgb(229, 231, 235),  // Border gray

            text_primary: Color32::from_rgb(17, 24, 39),
            text_secondary: Color32::from_rgb(55, 65, 81),
            text_muted: Color32::from_rgb(107, 114, 128),

            user_bubble: Color32::from_rgb(37, 99, 235),
            assistant_bubble: Color32::from_rgb(255, 255, 255),

            code_bg: Color32::from_rgb(31, 41, 55),

            chart_axis: Color32::from_rgb(107, 114, 128),
            chart_grid: Color32::from_rgb(229, 231, 235),

            listening: Color32::from_rgb(220, 38, 38),

            button_rounding: Rounding::same(8.0),
            card_rounding: Rounding::same(12.0),
            bubble_rounding: Rounding::same(14.0),

            spacing: 16.0,
            spacing_sm: 8.0,
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::light();

        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_secondary;

        visuals.widgets.noninteractive.bg_fill = self.bg_secondary;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.inactive.bg_fill = self.bg_tertiary;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.hovered.bg_fill = self.primary.gamma_multiply(0.8);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.active.bg_fill = self.primary;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

        visuals.selection.bg_fill = self.primary.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.primary);

        visuals.hyperlink_color = self.primary;

        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.bg_tertiary);

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.window_margin = egui::Margin::same(self.spacing);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm);

        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(22.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Monospace,
            FontId::new(12.0, FontFamily::Monospace),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            FontId::new(11.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_theme_uses_light_visuals() {
        let ctx = egui::Context::default();
        Theme::light().apply(&ctx);

        assert!(!ctx.style().visuals.dark_mode);
        assert_eq!(ctx.style().visuals.panel_fill, Theme::light().bg_primary);
    }
}
