use super::visual::{
    humanize, Column, PieChart, RenderedMessage, SeriesChart, SeriesPoint, Slice, TableView,
    VisualForm, PIE_PALETTE,
};
use crate::messages::{display_scalar, numeric_scalar, Analytics, ChartType, Message, Row};
use tracing::debug;

/// Turns a validated message into something drawable
///
/// Only reads the canonical descriptor; legacy payloads were already
/// translated at the wire boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseRenderer;

impl ResponseRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, message: &Message) -> RenderedMessage {
        RenderedMessage {
            narrative: message.content.clone(),
            visual: message.analytics().and_then(|a| self.visual(a)),
            generated_query: message.generated_query.clone(),
        }
    }

    /// Visual part only; `None` means narrative text alone
    pub fn visual(&self, analytics: &Analytics) -> Option<VisualForm> {
        if analytics.data.is_empty() {
            return None;
        }

        let vis = &analytics.visualization;
        match &vis.chart_type {
            ChartType::None => None,
            ChartType::Table => Some(VisualForm::Table(table(&analytics.data))),
            ChartType::Bar => Some(VisualForm::Bar(series(&analytics.data, &vis.x_axis, &vis.y_axis))),
            ChartType::Line => Some(VisualForm::Line(series(&analytics.data, &vis.x_axis, &vis.y_axis))),
            ChartType::Pie => Some(VisualForm::Pie(pie(&analytics.data, &vis.x_axis, &vis.y_axis))),
            ChartType::Unknown(name) => {
                debug!("No renderer for chart type '{}'", name);
                None
            }
        }
    }
}

fn table(rows: &[Row]) -> TableView {
    let columns = rows
        .first()
        .map(|first| {
            first
                .keys()
                .map(|key| Column {
                    key: key.clone(),
                    header: humanize(key),
                })
                .collect()
        })
        .unwrap_or_default();

    TableView {
        columns,
        rows: rows.to_vec(),
    }
}

fn series(rows: &[Row], x_axis: &str, y_axis: &str) -> SeriesChart {
    SeriesChart {
        x_label: humanize(x_axis),
        y_label: humanize(y_axis),
        points: rows
            .iter()
            .map(|row| SeriesPoint {
                category: row.get(x_axis).map(display_scalar).unwrap_or_default(),
                value: row.get(y_axis).and_then(numeric_scalar),
            })
            .collect(),
    }
}

fn pie(rows: &[Row], x_axis: &str, y_axis: &str) -> PieChart {
    PieChart {
        slices: rows
            .iter()
            .enumerate()
            .map(|(i, row)| Slice {
                label: row.get(x_axis).map(display_scalar).unwrap_or_default(),
                value: row.get(y_axis).and_then(numeric_scalar),
                color: PIE_PALETTE[i % PIE_PALETTE.len()],
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{parse_reply, Reply, Visualization};
    use serde_json::{json, Value};

    fn rows(value: Value) -> Vec<Row> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    fn render_reply(reply: Reply) -> RenderedMessage {
        ResponseRenderer::new().render(&Message::from_reply(reply))
    }

    #[test]
    fn test_text_has_no_visual() {
        let rendered = render_reply(Reply::text("Hello"));
        assert_eq!(rendered.narrative, "Hello");
        assert!(rendered.visual.is_none());

        let rendered = ResponseRenderer::new().render(&Message::user("hi"));
        assert!(rendered.visual.is_none());
    }

    #[test]
    fn test_table_keeps_key_and_row_order() {
        let data = rows(json!([{"a": 1, "b": 2}, {"a": 3, "b": 4}]));
        let rendered = render_reply(Reply::analytics(
            "Here you go",
            Visualization::without_axes(ChartType::Table),
            data.clone(),
        ));

        let Some(VisualForm::Table(table)) = rendered.visual else {
            panic!("expected a table");
        };
        let keys: Vec<&str> = table.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(table.rows, data);
    }

    #[test]
    fn test_table_column_order_from_wire() {
        let reply = parse_reply(
            r#"{"content":"x","type":"analytics",
                "visualization":{"chart_type":"table"},
                "data":[{"store_name":"North","total_sales":10,"avg_basket":2.5}]}"#,
        )
        .unwrap();
        let rendered = render_reply(reply);

        let Some(VisualForm::Table(table)) = rendered.visual else {
            panic!("expected a table");
        };
        let headers: Vec<&str> = table.columns.iter().map(|c| c.header.as_str()).collect();
        assert_eq!(headers, ["Store Name", "Total Sales", "Avg Basket"]);
    }

    #[test]
    fn test_bar_uses_only_declared_axes() {
        let data = rows(json!([
            {"region": "North", "month": "Jan", "sales": 100},
            {"region": "South", "month": "Feb", "sales": 150}
        ]));
        let rendered = render_reply(Reply::analytics(
            "",
            Visualization::new(ChartType::Bar, "month", "sales"),
            data,
        ));

        let Some(VisualForm::Bar(chart)) = rendered.visual else {
            panic!("expected a bar chart");
        };
        assert_eq!(chart.x_label, "Month");
        assert_eq!(chart.y_label, "Sales");
        assert_eq!(
            chart.points,
            vec![
                SeriesPoint { category: "Jan".into(), value: Some(100.0) },
                SeriesPoint { category: "Feb".into(), value: Some(150.0) },
            ]
        );
    }

    #[test]
    fn test_line_chart() {
        let data = rows(json!([{"day": 1, "orders": "7"}, {"day": 2, "orders": "n/a"}]));
        let rendered = render_reply(Reply::analytics(
            "",
            Visualization::new(ChartType::Line, "day", "orders"),
            data,
        ));

        let Some(VisualForm::Line(chart)) = rendered.visual else {
            panic!("expected a line chart");
        };
        assert_eq!(chart.points[0].value, Some(7.0));
        assert_eq!(chart.points[1].value, None);
        assert_eq!(chart.points[1].category, "2");
    }

    #[test]
    fn test_pie_colors_cycle_by_index() {
        let data: Vec<Row> = (0..7)
            .map(|i| json!({"category": format!("c{}", i), "share": i + 1}))
            .map(|v| v.as_object().cloned().unwrap())
            .collect();
        let rendered = render_reply(Reply::analytics(
            "",
            Visualization::new(ChartType::Pie, "category", "share"),
            data,
        ));

        let Some(VisualForm::Pie(pie)) = rendered.visual else {
            panic!("expected a pie chart");
        };
        assert_eq!(pie.slices.len(), 7);
        for (i, slice) in pie.slices.iter().enumerate() {
            assert_eq!(slice.color, PIE_PALETTE[i % 5]);
            assert_eq!(slice.label, format!("c{}", i));
        }
    }

    #[test]
    fn test_none_or_empty_data_has_no_visual() {
        let data = rows(json!([{"a": 1}]));
        let rendered = render_reply(Reply::analytics(
            "",
            Visualization::without_axes(ChartType::None),
            data,
        ));
        assert!(rendered.visual.is_none());

        let rendered = render_reply(Reply::analytics(
            "",
            Visualization::without_axes(ChartType::Table),
            Vec::new(),
        ));
        assert!(rendered.visual.is_none());
    }

    #[test]
    fn test_unknown_chart_renders_nothing() {
        let data = rows(json!([{"a": 1, "b": 2}]));
        let rendered = render_reply(Reply::analytics(
            "",
            Visualization::new(ChartType::Unknown("heatmap".into()), "a", "b"),
            data,
        ));
        assert!(rendered.visual.is_none());
    }

    #[test]
    fn test_generated_query_independent_of_visual() {
        let rendered = render_reply(Reply::text("No chart").with_generated_query("SELECT 1"));
        assert!(rendered.visual.is_none());
        assert_eq!(rendered.generated_query.as_deref(), Some("SELECT 1"));
    }
}
