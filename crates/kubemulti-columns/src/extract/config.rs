//! Config, quota, and event columns

use kubemulti_types::ValueExt;

use super::common::{ago, join_or_none, parse_timestamp, quantity};
use super::{ExtractContext, NONE, UNKNOWN};
use crate::format::format_label_map;

/// Event timestamps, most specific first
const EVENT_TIMESTAMPS: [&str; 3] = ["lastTimestamp", "firstTimestamp", "eventTime"];

/// DATA: entries across data and binaryData
pub(crate) fn data_count(ctx: &ExtractContext<'_>) -> String {
    let count: usize = ["data", "binaryData"]
        .iter()
        .filter_map(|key| ctx.record.nested_map(&[*key]).found())
        .map(|map| map.len())
        .sum();
    count.to_string()
}

/// HARD and USED: sorted `resource:quantity` pairs
pub(crate) fn resource_amounts(ctx: &ExtractContext<'_>) -> String {
    let Some(amounts) = ctx.record.nested_map(&ctx.path()).found() else {
        return NONE.to_string();
    };

    let mut parts: Vec<String> = amounts
        .iter()
        .filter_map(|(resource, value)| quantity(value).map(|q| format!("{resource}:{q}")))
        .collect();
    parts.sort();
    join_or_none(parts)
}

/// LAST SEEN: age of the latest event timestamp
pub(crate) fn last_seen(ctx: &ExtractContext<'_>) -> String {
    let Some(raw) = EVENT_TIMESTAMPS
        .iter()
        .map(|key| ctx.record.lookup(&[*key]))
        .find(|lookup| !lookup.is_missing())
    else {
        return UNKNOWN.to_string();
    };

    // A timestamp that is present but unreadable does not fall through
    raw.found()
        .and_then(|v| v.as_str())
        .and_then(parse_timestamp)
        .map(|t| ago(t, ctx.now))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// OBJECT: `kind/name` of the involved object
pub(crate) fn involved_object(ctx: &ExtractContext<'_>) -> String {
    let kind = ctx.record.nested_str(&["involvedObject", "kind"]).found();
    let name = ctx.record.nested_str(&["involvedObject", "name"]).found();
    match (kind, name) {
        (Some(kind), Some(name)) => format!("{kind}/{name}"),
        _ => UNKNOWN.to_string(),
    }
}

pub(crate) fn node_selector(ctx: &ExtractContext<'_>) -> String {
    ctx.record
        .nested_map(&ctx.path())
        .found()
        .map(format_label_map)
        .unwrap_or_else(|| NONE.to_string())
}

#[cfg(test)]
mod tests {
    use crate::extract::extract_at;
    use crate::registry::columns_for;
    use chrono::{DateTime, TimeZone, Utc};
    use kubemulti_types::ColumnDefinition;
    use serde_json::{Value, json};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn cell(record: &Value, resource: &str, name: &str) -> String {
        let column = columns_for(resource)
            .iter()
            .find(|c| c.name == name)
            .unwrap();
        extract_at(record, column, now())
    }

    #[test]
    fn test_data_count() {
        let cm = json!({ "data": { "a": "1", "b": "2" }, "binaryData": { "c": "AA==" } });
        assert_eq!(cell(&cm, "configmaps", "DATA"), "3");
        assert_eq!(cell(&json!({}), "secrets", "DATA"), "0");
    }

    #[test]
    fn test_quota_amounts_are_sorted() {
        let quota = json!({ "status": {
            "hard": { "pods": "10", "limits.cpu": "4", "requests.memory": { "string": "8Gi" } },
            "used": {}
        }});
        assert_eq!(
            cell(&quota, "resourcequotas", "HARD"),
            "limits.cpu:4,pods:10,requests.memory:8Gi"
        );
        assert_eq!(cell(&quota, "resourcequotas", "USED"), "<none>");
        assert_eq!(cell(&json!({}), "resourcequotas", "USED"), "<none>");
    }

    #[test]
    fn test_event_last_seen() {
        let event = json!({
            "lastTimestamp": "2024-05-01T11:59:15Z",
            "firstTimestamp": "2024-05-01T10:00:00Z"
        });
        assert_eq!(cell(&event, "events", "LAST SEEN"), "45s ago");

        let first_only = json!({ "firstTimestamp": "2024-05-01T11:30:00Z" });
        assert_eq!(cell(&first_only, "events", "LAST SEEN"), "30m ago");

        let new_style = json!({ "eventTime": "2024-05-01T11:59:00.000000Z" });
        assert_eq!(cell(&new_style, "events", "LAST SEEN"), "60s ago");

        assert_eq!(cell(&json!({}), "events", "LAST SEEN"), "<unknown>");
        assert_eq!(cell(&json!({ "lastTimestamp": "bad" }), "events", "LAST SEEN"), "<unknown>");
    }

    #[test]
    fn test_event_object_needs_a_path() {
        let event = json!({ "involvedObject": { "kind": "Pod", "name": "web-0" } });
        assert_eq!(cell(&event, "events", "OBJECT"), "<unknown>");

        let with_path = ColumnDefinition::new("OBJECT", "involvedObject", "<unknown>");
        assert_eq!(extract_at(&event, &with_path, now()), "Pod/web-0");
        assert_eq!(extract_at(&json!({}), &with_path, now()), "<unknown>");
    }

    #[test]
    fn test_event_plain_columns() {
        let event = json!({ "type": "Warning", "reason": "BackOff", "message": "restarting" });
        assert_eq!(cell(&event, "events", "TYPE"), "Warning");
        assert_eq!(cell(&event, "events", "REASON"), "BackOff");
        assert_eq!(cell(&event, "events", "MESSAGE"), "restarting");
        assert_eq!(cell(&json!({}), "events", "TYPE"), "<unknown>");
    }

    #[test]
    fn test_daemonset_node_selector() {
        let ds = json!({ "spec": { "template": { "spec": {
            "nodeSelector": { "kubernetes.io/os": "linux", "disk": "ssd" }
        }}}});
        assert_eq!(
            cell(&ds, "daemonsets", "NODE SELECTOR"),
            "disk=ssd,kubernetes.io/os=linux"
        );
        assert_eq!(cell(&json!({}), "daemonsets", "NODE SELECTOR"), "<none>");
    }
}
