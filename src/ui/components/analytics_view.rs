//! Analytics visuals
//!
//! Tables go through `egui::Grid`; bar, line and pie charts are drawn with
//! the painter.

use crate::render::{PieChart, SeriesChart, TableView, VisualForm};
use crate::ui::theme::Theme;
use egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke, Vec2};
use std::f32::consts::{FRAC_PI_2, TAU};

const CHART_HEIGHT: f32 = 220.0;
const MAX_CHART_WIDTH: f32 = 520.0;
const AXIS_GUTTER: f32 = 44.0;
const LABEL_GUTTER: f32 = 30.0;
const GRID_LINES: usize = 4;
const PIE_STEP: f32 = 0.05;

pub struct AnalyticsView<'a> {
    visual: &'a VisualForm,
    theme: &'a Theme,
    id_salt: egui::Id,
}

impl<'a> AnalyticsView<'a> {
    pub fn new(visual: &'a VisualForm, theme: &'a Theme, id_salt: impl std::hash::Hash) -> Self {
        Self {
            visual,
            theme,
            id_salt: egui::Id::new(id_salt),
        }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        match self.visual {
            VisualForm::Table(table) => self.show_table(ui, table),
            VisualForm::Bar(chart) => self.show_series(ui, chart, false),
            VisualForm::Line(chart) => self.show_series(ui, chart, true),
            VisualForm::Pie(chart) => self.show_pie(ui, chart),
        }
    }

    fn show_table(&self, ui: &mut egui::Ui, table: &TableView) {
        let response = egui::ScrollArea::horizontal()
            .id_salt(self.id_salt.with("table_scroll"))
            .show(ui, |ui| {
                egui::Grid::new(self.id_salt.with("table"))
                    .striped(true)
                    .spacing(Vec2::new(self.theme.spacing, 4.0))
                    .show(ui, |ui| {
                        for column in &table.columns {
                            ui.label(RichText::new(&column.header).strong().color(self.theme.text_primary));
                        }
                        ui.end_row();

                        for row in 0..table.rows.len() {
                            for column in 0..table.columns.len() {
                                ui.label(RichText::new(table.cell(row, column)).color(self.theme.text_secondary));
                            }
                            ui.end_row();
                        }
                    })
                    .response
            });

        let label = format!("Data table: {} rows", table.rows.len());
        response
            .inner
            .widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Other, true, &label));
    }

    fn allocate_chart(&self, ui: &mut egui::Ui, label: String) -> Rect {
        let width = ui.available_width().min(MAX_CHART_WIDTH).max(120.0);
        let (rect, response) = ui.allocate_exact_size(Vec2::new(width, CHART_HEIGHT), Sense::hover());
        response.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Other, true, &label));
        rect
    }

    fn show_series(&self, ui: &mut egui::Ui, chart: &SeriesChart, as_line: bool) {
        let kind = if as_line { "Line chart" } else { "Bar chart" };
        let rect = self.allocate_chart(ui, format!("{}: {} by {}", kind, chart.y_label, chart.x_label));
        let painter = ui.painter_at(rect);

        let plot = Rect::from_min_max(
            Pos2::new(rect.left() + AXIS_GUTTER, rect.top() + 18.0),
            Pos2::new(rect.right() - 8.0, rect.bottom() - LABEL_GUTTER),
        );

        let (lo, hi) = chart.value_range();
        let span = if hi > lo { hi - lo } else { 1.0 };
        let to_y = |v: f64| plot.bottom() - ((v - lo) / span) as f32 * plot.height();

        // Grid with value ticks
        let font = FontId::proportional(10.0);
        for step in 0..=GRID_LINES {
            let value = lo + span * step as f64 / GRID_LINES as f64;
            let y = to_y(value);
            painter.line_segment(
                [Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)],
                Stroke::new(1.0, self.theme.chart_grid),
            );
            painter.text(
                Pos2::new(plot.left() - 4.0, y),
                Align2::RIGHT_CENTER,
                format_tick(value),
                font.clone(),
                self.theme.chart_axis,
            );
        }

        let baseline = to_y(0.0);
        painter.line_segment(
            [Pos2::new(plot.left(), baseline), Pos2::new(plot.right(), baseline)],
            Stroke::new(1.0, self.theme.chart_axis),
        );

        painter.text(
            Pos2::new(rect.left(), rect.top()),
            Align2::LEFT_TOP,
            &chart.y_label,
            FontId::proportional(11.0),
            self.theme.text_secondary,
        );
        painter.text(
            Pos2::new(plot.center().x, rect.bottom()),
            Align2::CENTER_BOTTOM,
            &chart.x_label,
            FontId::proportional(11.0),
            self.theme.text_secondary,
        );

        if chart.points.is_empty() {
            return;
        }

        let slot = plot.width() / chart.points.len() as f32;
        let color = self.theme.primary;
        let mut segment: Vec<Pos2> = Vec::new();

        for (i, point) in chart.points.iter().enumerate() {
            let x = plot.left() + slot * (i as f32 + 0.5);

            painter.text(
                Pos2::new(x, plot.bottom() + 4.0),
                Align2::CENTER_TOP,
                &point.category,
                font.clone(),
                self.theme.chart_axis,
            );

            let Some(value) = point.value.filter(|v| v.is_finite()) else {
                // Gap in the line
                flush_line(&painter, &mut segment, color);
                continue;
            };
            let y = to_y(value);

            if as_line {
                segment.push(Pos2::new(x, y));
                painter.circle_filled(Pos2::new(x, y), 3.0, color);
            } else {
                let half = (slot * 0.3).max(1.0);
                let bar = Rect::from_min_max(
                    Pos2::new(x - half, y.min(baseline)),
                    Pos2::new(x + half, y.max(baseline)),
                );
                painter.rect_filled(bar, 2.0, color);
            }
        }
        flush_line(&painter, &mut segment, color);
    }

    fn show_pie(&self, ui: &mut egui::Ui, chart: &PieChart) {
        ui.horizontal(|ui| {
            let rect = self.allocate_chart_square(ui, format!("Pie chart: {} slices", chart.slices.len()));
            let painter = ui.painter_at(rect);
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0 - 4.0;

            let mut start = -FRAC_PI_2;
            for (i, slice) in chart.slices.iter().enumerate() {
                let sweep = chart.fraction(i) as f32 * TAU;
                if sweep <= 0.0 {
                    continue;
                }
                paint_wedge(&painter, center, radius, start, sweep, slice.color);
                start += sweep;
            }

            if chart.total() <= 0.0 {
                painter.circle_stroke(center, radius, Stroke::new(1.0, self.theme.chart_grid));
            }

            ui.add_space(self.theme.spacing_sm);

            ui.vertical(|ui| {
                for slice in &chart.slices {
                    ui.horizontal(|ui| {
                        let (swatch, _) = ui.allocate_exact_size(Vec2::splat(10.0), Sense::hover());
                        ui.painter().rect_filled(swatch, 2.0, slice.color);
                        let value = slice.value.map(format_tick).unwrap_or_else(|| "-".to_string());
                        ui.label(
                            RichText::new(format!("{} ({})", slice.label, value))
                                .size(12.0)
                                .color(self.theme.text_secondary),
                        );
                    });
                }
            });
        });
    }

    fn allocate_chart_square(&self, ui: &mut egui::Ui, label: String) -> Rect {
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(CHART_HEIGHT), Sense::hover());
        response.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Other, true, &label));
        rect
    }
}

fn flush_line(painter: &egui::Painter, segment: &mut Vec<Pos2>, color: Color32) {
    if segment.len() > 1 {
        painter.add(Shape::line(std::mem::take(segment), Stroke::new(2.0, color)));
    }
    segment.clear();
}

/// Fill a pie wedge as a fan of thin triangles so large sweeps stay convex
fn paint_wedge(painter: &egui::Painter, center: Pos2, radius: f32, start: f32, sweep: f32, color: Color32) {
    let steps = (sweep / PIE_STEP).ceil().max(1.0) as usize;
    let at = |angle: f32| center + Vec2::new(angle.cos(), angle.sin()) * radius;

    for step in 0..steps {
        let a0 = start + sweep * step as f32 / steps as f32;
        let a1 = start + sweep * (step + 1) as f32 / steps as f32;
        painter.add(Shape::convex_polygon(
            vec![center, at(a0), at(a1)],
            color,
            Stroke::NONE,
        ));
    }
}

fn format_tick(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
