//! Shared extraction building blocks

use chrono::{DateTime, Utc};
use serde_json::Value;

use kubemulti_types::{ValueExt, as_integer};

use super::{ExtractContext, NONE, UNKNOWN};
use crate::format::human_duration;

/// Render a string, number, or bool leaf
pub(crate) fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A resource quantity, either a plain string or `{ "string": ... }`
pub(crate) fn quantity(value: &Value) -> Option<&str> {
    value
        .as_str()
        .or_else(|| value.nested_str(&["string"]).found())
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .ok()
}

/// RFC-3339 timestamp at `path`
pub(crate) fn timestamp_at(value: &Value, path: &[&str]) -> Option<DateTime<Utc>> {
    value.nested_str(path).found().and_then(parse_timestamp)
}

/// Elapsed time since `then`, suffixed with "ago"
pub(crate) fn ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format!("{} ago", human_duration(now - then))
}

/// Comma-join, or `<none>` when there is nothing to join
pub(crate) fn join_or_none(parts: Vec<String>) -> String {
    if parts.is_empty() {
        NONE.to_string()
    } else {
        parts.join(",")
    }
}

/// String at the column path
pub(crate) fn path_string(ctx: &ExtractContext<'_>) -> String {
    ctx.record
        .nested_str(&ctx.path())
        .found()
        .map(str::to_string)
        .unwrap_or_else(|| ctx.default_value())
}

/// Integer at the column path
pub(crate) fn path_integer(ctx: &ExtractContext<'_>) -> String {
    ctx.at_path()
        .and_then(as_integer)
        .map(|n| n.to_string())
        .unwrap_or_else(|| ctx.default_value())
}

/// Length of the sequence at the column path
pub(crate) fn path_len(ctx: &ExtractContext<'_>) -> String {
    ctx.record
        .nested_slice(&ctx.path())
        .found()
        .map_or(0, <[Value]>::len)
        .to_string()
}

/// Age of the timestamp at the column path, without suffix
pub(crate) fn created_at(ctx: &ExtractContext<'_>) -> String {
    timestamp_at(ctx.record, &ctx.path())
        .map(|t| human_duration(ctx.now - t))
        .unwrap_or_else(|| UNKNOWN.to_string())
}
