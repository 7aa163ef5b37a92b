use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// One row of analytics data, keys in the order the backend sent them
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// How the backend asked for analytics data to be displayed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChartType {
    #[default]
    None,
    Bar,
    Line,
    Pie,
    Table,
    /// A chart type this client does not know; rendered as nothing
    Unknown(String),
}

impl ChartType {
    /// Parse a wire spelling. Both `bar` and `bar_chart` style names are accepted.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "none" => ChartType::None,
            "bar" | "bar_chart" => ChartType::Bar,
            "line" | "line_chart" => ChartType::Line,
            "pie" | "pie_chart" => ChartType::Pie,
            "table" => ChartType::Table,
            _ => ChartType::Unknown(name.trim().to_string()),
        }
    }

    /// Whether rendering needs both an x and a y field
    pub fn requires_axes(&self) -> bool {
        matches!(self, ChartType::Bar | ChartType::Line | ChartType::Pie)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChartType::None => "none",
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Table => "table",
            ChartType::Unknown(name) => name,
        }
    }
}

/// Visualization descriptor `{chart_type, x_axis, y_axis}`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Visualization {
    pub chart_type: ChartType,
    pub x_axis: String,
    pub y_axis: String,
}

impl Visualization {
    pub fn new(chart_type: ChartType, x_axis: impl Into<String>, y_axis: impl Into<String>) -> Self {
        Self {
            chart_type,
            x_axis: x_axis.into(),
            y_axis: y_axis.into(),
        }
    }

    /// Descriptor for charts that do not use axes (table, none)
    pub fn without_axes(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Analytics {
    pub visualization: Visualization,
    pub data: Vec<Row>,
}

/// Assistant payload shape, validated at the wire boundary
#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    Text,
    Analytics(Analytics),
}

/// A validated backend reply (a message minus its role)
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub content: String,
    pub kind: MessageKind,
    pub generated_query: Option<String>,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: MessageKind::Text,
            generated_query: None,
        }
    }

    pub fn analytics(content: impl Into<String>, visualization: Visualization, data: Vec<Row>) -> Self {
        Self {
            content: content.into(),
            kind: MessageKind::Analytics(Analytics {
                visualization,
                data,
            }),
            generated_query: None,
        }
    }

    pub fn with_generated_query(mut self, query: impl Into<String>) -> Self {
        self.generated_query = Some(query.into());
        self
    }
}

/// One turn in the conversation
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    /// Present on assistant replies only; `None` renders as text
    pub kind: Option<MessageKind>,
    pub generated_query: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: String, kind: Option<MessageKind>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            kind,
            generated_query: None,
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), None)
    }

    /// Assistant message with plain narrative and no declared type
    pub fn assistant_text(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into(), None)
    }

    pub fn from_reply(reply: Reply) -> Self {
        let mut message = Self::new(Role::Assistant, reply.content, Some(reply.kind));
        message.generated_query = reply.generated_query;
        message
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn analytics(&self) -> Option<&Analytics> {
        match &self.kind {
            Some(MessageKind::Analytics(analytics)) => Some(analytics),
            _ => None,
        }
    }
}

/// Display text for a cell value
pub fn display_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Numeric reading of a cell value; numeric strings are accepted
pub fn numeric_scalar(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
