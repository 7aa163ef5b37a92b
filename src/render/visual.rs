use crate::messages::{display_scalar, Row};
use egui::Color32;

/// Slice colors, assigned by row position
pub const PIE_PALETTE: [Color32; 5] = [
    Color32::from_rgb(0x3b, 0x82, 0xf6),
    Color32::from_rgb(0x22, 0xc5, 0x5e),
    Color32::from_rgb(0xfa, 0xcc, 0x15),
    Color32::from_rgb(0xef, 0x44, 0x44),
    Color32::from_rgb(0xa8, 0x55, 0xf7),
];

/// `total_sales` -> `Total Sales`
pub fn humanize(field: &str) -> String {
    field
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub key: String,
    pub header: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl TableView {
    /// Display text for one cell; missing keys show as empty
    pub fn cell(&self, row: usize, column: usize) -> String {
        match (self.rows.get(row), self.columns.get(column)) {
            (Some(row), Some(column)) => row.get(&column.key).map(display_scalar).unwrap_or_default(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub category: String,
    /// `None` when the cell is not numeric; drawn as a gap
    pub value: Option<f64>,
}

/// Single-series bar or line chart
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesChart {
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<SeriesPoint>,
}

impl SeriesChart {
    /// Value range for the y axis, always including zero
    pub fn value_range(&self) -> (f64, f64) {
        self.points
            .iter()
            .filter_map(|p| p.value)
            .filter(|v| v.is_finite())
            .fold((0.0, 0.0), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: Option<f64>,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub slices: Vec<Slice>,
}

impl PieChart {
    /// Sum of the positive slice values
    pub fn total(&self) -> f64 {
        self.slices
            .iter()
            .filter_map(|s| s.value)
            .filter(|v| v.is_finite() && *v > 0.0)
            .sum()
    }

    /// Share of the whole for slice `index`, 0.0 for empty or negative slices
    pub fn fraction(&self, index: usize) -> f64 {
        let total = self.total();
        match self.slices.get(index).and_then(|s| s.value) {
            Some(v) if total > 0.0 && v.is_finite() && v > 0.0 => v / total,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VisualForm {
    Table(TableView),
    Bar(SeriesChart),
    Line(SeriesChart),
    Pie(PieChart),
}

/// Everything needed to draw one message
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub narrative: String,
    pub visual: Option<VisualForm>,
    pub generated_query: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("total_sales"), "Total Sales");
        assert_eq!(humanize("month"), "Month");
        assert_eq!(humanize("avg__order_value"), "Avg Order Value");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_palette_matches_brand_colors() {
        assert_eq!(PIE_PALETTE[0], Color32::from_rgb(59, 130, 246));
        assert_eq!(PIE_PALETTE[4], Color32::from_rgb(168, 85, 247));
    }

    #[test]
    fn test_series_value_range() {
        let chart = SeriesChart {
            x_label: "Month".into(),
            y_label: "Sales".into(),
            points: vec![
                SeriesPoint { category: "Jan".into(), value: Some(120.0) },
                SeriesPoint { category: "Feb".into(), value: None },
                SeriesPoint { category: "Mar".into(), value: Some(-30.0) },
            ],
        };
        assert_eq!(chart.value_range(), (-30.0, 120.0));
    }

    #[test]
    fn test_pie_fractions() {
        let pie = PieChart {
            slices: vec![
                Slice { label: "A".into(), value: Some(3.0), color: PIE_PALETTE[0] },
                Slice { label: "B".into(), value: Some(1.0), color: PIE_PALETTE[1] },
                Slice { label: "C".into(), value: None, color: PIE_PALETTE[2] },
            ],
        };
        assert_eq!(pie.total(), 4.0);
        assert_eq!(pie.fraction(0), 0.75);
        assert_eq!(pie.fraction(2), 0.0);
        assert_eq!(pie.fraction(9), 0.0);
    }

    #[test]
    fn test_table_cells() {
        let row = json!({"product": "Socks", "units": 12, "note": null});
        let table = TableView {
            columns: vec![
                Column { key: "product".into(), header: "Product".into() },
                Column { key: "units".into(), header: "Units".into() },
                Column { key: "note".into(), header: "Note".into() },
                Column { key: "missing".into(), header: "Missing".into() },
            ],
            rows: vec![row.as_object().cloned().unwrap()],
        };
        assert_eq!(table.cell(0, 0), "Socks");
        assert_eq!(table.cell(0, 1), "12");
        assert_eq!(table.cell(0, 2), "");
        assert_eq!(table.cell(0, 3), "");
        assert_eq!(table.cell(1, 0), "");
    }
}
