//! Backend reply boundary
//!
//! The backend answers with loosely shaped JSON. Everything it sends is
//! checked here and turned into a [`Reply`]; payloads that cannot be rendered
//! as declared are degraded to plain text so nothing downstream has to look
//! for optional keys.

use super::types::{Analytics, ChartType, MessageKind, Reply, Row, Visualization};
use crate::{AssistantError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Request body posted to the backend
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Only `content` is typed strictly; every other field is checked by hand so
/// a badly shaped one degrades the reply instead of failing it
#[derive(Debug, Deserialize)]
struct WireReply {
    #[serde(default)]
    content: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<Value>,
    #[serde(default)]
    visualization: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    raw_sql: Option<Value>,
    #[serde(default)]
    generated_query: Option<Value>,
}

/// Parse a reply body
pub fn parse_reply(body: &str) -> Result<Reply> {
    let value: Value = serde_json::from_str(body)?;
    reply_from_value(value)
}

/// Validate an already decoded JSON reply
pub fn reply_from_value(value: Value) -> Result<Reply> {
    if !value.is_object() {
        return Err(AssistantError::MalformedReply(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    let wire: WireReply = serde_json::from_value(value)?;
    Ok(validate(wire))
}

fn validate(wire: WireReply) -> Reply {
    let content = wire.content.unwrap_or_default();
    let generated_query = query_field(wire.raw_sql, "raw_sql")
        .or_else(|| query_field(wire.generated_query, "generated_query"));

    let kind_name = match wire.kind {
        None => String::new(),
        Some(Value::String(kind)) => kind.trim().to_ascii_lowercase(),
        Some(other) => {
            warn!("Reply type is {}, showing as text", json_kind(&other));
            String::new()
        }
    };

    let kind = match kind_name.as_str() {
        "analytics" => analytics_kind(wire.visualization, wire.data),
        "" | "text" => MessageKind::Text,
        other => {
            warn!("Unknown reply type '{}', showing as text", other);
            MessageKind::Text
        }
    };

    Reply {
        content,
        kind,
        generated_query,
    }
}

fn query_field(value: Option<Value>, name: &str) -> Option<String> {
    match value? {
        Value::String(query) if !query.trim().is_empty() => Some(query),
        Value::String(_) | Value::Null => None,
        other => {
            warn!("Ignoring {} that is {}", name, json_kind(&other));
            None
        }
    }
}

fn analytics_kind(visualization: Option<Value>, data: Option<Value>) -> MessageKind {
    let rows = match data {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => collect_rows(items),
        Some(other) => {
            warn!("Analytics data is {}, showing as text", json_kind(&other));
            return MessageKind::Text;
        }
    };

    let visualization = match visualization {
        Some(Value::String(name)) => canonicalize_legacy(&name, &rows),
        Some(Value::Object(fields)) => match descriptor(&fields) {
            Some(visualization) => visualization,
            None => return MessageKind::Text,
        },
        None | Some(Value::Null) => {
            warn!("Analytics reply without a visualization, showing as text");
            return MessageKind::Text;
        }
        Some(other) => {
            warn!("Visualization is {}, showing as text", json_kind(&other));
            return MessageKind::Text;
        }
    };

    if visualization.chart_type.requires_axes() {
        if visualization.x_axis.is_empty() || visualization.y_axis.is_empty() {
            warn!(
                "{} chart without both axes, showing as text",
                visualization.chart_type.as_str()
            );
            return MessageKind::Text;
        }

        let incomplete = rows.iter().position(|row| {
            !row.contains_key(&visualization.x_axis) || !row.contains_key(&visualization.y_axis)
        });
        if let Some(index) = incomplete {
            warn!(
                "Row {} lacks '{}' or '{}', showing as text",
                index, visualization.x_axis, visualization.y_axis
            );
            return MessageKind::Text;
        }
    }

    let data = if visualization.chart_type == ChartType::None {
        Vec::new()
    } else {
        rows
    };

    debug!(
        "Analytics reply: chart={}, rows={}",
        visualization.chart_type.as_str(),
        data.len()
    );

    MessageKind::Analytics(Analytics {
        visualization,
        data,
    })
}

/// Read a `{chart_type, x_axis, y_axis}` descriptor; absent fields are empty
fn descriptor(fields: &Map<String, Value>) -> Option<Visualization> {
    let text = |name: &str| match fields.get(name) {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(value)) => Some(value.clone()),
        Some(other) => {
            warn!("Visualization {} is {}, showing as text", name, json_kind(other));
            None
        }
    };

    Some(Visualization {
        chart_type: ChartType::parse(&text("chart_type")?),
        x_axis: text("x_axis")?,
        y_axis: text("y_axis")?,
    })
}

/// Translate a legacy chart name into the canonical descriptor.
///
/// Legacy payloads carry no axis names; the first key of the first row is the
/// category and the second is the value.
pub fn canonicalize_legacy(chart_name: &str, rows: &[Row]) -> Visualization {
    let chart_type = ChartType::parse(chart_name);
    if !chart_type.requires_axes() {
        return Visualization::without_axes(chart_type);
    }

    let mut keys = rows.first().into_iter().flat_map(|row| row.keys());
    let x_axis = keys.next().cloned().unwrap_or_default();
    let y_axis = keys.next().cloned().unwrap_or_default();

    Visualization::new(chart_type, x_axis, y_axis)
}

fn collect_rows(data: Vec<Value>) -> Vec<Row> {
    let total = data.len();
    let rows: Vec<Row> = data
        .into_iter()
        .filter_map(|value| match value {
            Value::Object(row) => Some(row),
            _ => None,
        })
        .collect();

    if rows.len() != total {
        warn!("Dropped {} non-object data rows", total - rows.len());
    }

    rows
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
