//! Small deterministic formatters shared by the extractors and the CLI

use std::fmt;

use chrono::TimeDelta;
use serde_json::{Map, Value};

use kubemulti_types::ValueExt;

/// Label key prefix carrying node roles
const NODE_ROLE_PREFIX: &str = "node-role.kubernetes.io/";

/// Readiness of a node, from its `Ready` condition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeStatus {
    Ready,
    NotReady,
    Unknown,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::NotReady => "NotReady",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a node record by its `Ready` condition
///
/// A `"True"` status is Ready, any other status is NotReady, and a missing
/// condition is Unknown.
pub fn node_status(node: &Value) -> NodeStatus {
    let Some(conditions) = node.nested_slice(&["status", "conditions"]).found() else {
        return NodeStatus::Unknown;
    };

    conditions
        .iter()
        .find(|c| c.nested_str(&["type"]).found() == Some("Ready"))
        .map(|c| match c.nested_str(&["status"]).found() {
            Some("True") => NodeStatus::Ready,
            _ => NodeStatus::NotReady,
        })
        .unwrap_or(NodeStatus::Unknown)
}

/// First node role from `node-role.kubernetes.io/<role>` labels
///
/// Labels are scanned in key order so the answer is stable.
pub fn node_role(node: &Value) -> String {
    let Some(labels) = node.nested_map(&["metadata", "labels"]).found() else {
        return "<none>".to_string();
    };

    let mut roles: Vec<&str> = labels
        .keys()
        .filter_map(|key| key.strip_prefix(NODE_ROLE_PREFIX))
        .filter(|role| !role.is_empty())
        .collect();
    roles.sort_unstable();

    roles
        .first()
        .map(|role| role.to_string())
        .unwrap_or_else(|| "<none>".to_string())
}

/// Render labels as `k=v` pairs sorted on the rendered pair
///
/// An empty set renders as `<none>`.
pub fn format_labels<I, K, V>(labels: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<String> = labels
        .into_iter()
        .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
        .collect();

    if pairs.is_empty() {
        return "<none>".to_string();
    }

    pairs.sort();
    pairs.join(",")
}

/// [`format_labels`] over a JSON object, ignoring non-string values
pub fn format_label_map(labels: &Map<String, Value>) -> String {
    format_labels(
        labels
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|v| (k.as_str(), v))),
    )
}

/// kubectl's short form of a volume access mode
pub fn abbreviate_access_mode(mode: &str) -> &str {
    match mode {
        "ReadWriteOnce" => "RWO",
        "ReadOnlyMany" => "ROX",
        "ReadWriteMany" => "RWX",
        "ReadWriteOncePod" => "RWOP",
        other => other,
    }
}

/// Human readable elapsed time, following kubectl's age formatting
///
/// Precision drops as the duration grows: `90s`, `5m30s`, `3h15m`,
/// `2d4h`, `45d`, `3y12d`. A clock skew of up to one second reads as
/// `0s`; anything further in the future is `<invalid>`.
pub fn human_duration(delta: TimeDelta) -> String {
    let seconds = delta.num_seconds();
    if seconds < -1 {
        return "<invalid>".to_string();
    }
    if seconds < 0 {
        return "0s".to_string();
    }
    if seconds < 60 * 2 {
        return format!("{seconds}s");
    }

    let minutes = seconds / 60;
    if minutes < 10 {
        let s = seconds % 60;
        return if s == 0 {
            format!("{minutes}m")
        } else {
            format!("{minutes}m{s}s")
        };
    }
    if minutes < 60 * 3 {
        return format!("{minutes}m");
    }

    let hours = minutes / 60;
    if hours < 8 {
        let m = minutes % 60;
        return if m == 0 {
            format!("{hours}h")
        } else {
            format!("{hours}h{m}m")
        };
    }
    if hours < 48 {
        return format!("{hours}h");
    }

    let days = hours / 24;
    if hours < 24 * 8 {
        let h = hours % 24;
        return if h == 0 {
            format!("{days}d")
        } else {
            format!("{days}d{h}h")
        };
    }
    if hours < 24 * 365 * 2 {
        return format!("{days}d");
    }

    let years = days / 365;
    if hours < 24 * 365 * 8 {
        let d = days % 365;
        return if d == 0 {
            format!("{years}y")
        } else {
            format!("{years}y{d}d")
        };
    }

    format!("{years}y")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_format_labels() {
        let empty: HashMap<String, String> = HashMap::new();
        assert_eq!(format_labels(&empty), "<none>");
        assert_eq!(format_labels([("b", "2"), ("a", "1")]), "a=1,b=2");

        let mut labels = BTreeMap::new();
        labels.insert("tier".to_string(), "web".to_string());
        labels.insert("app".to_string(), "shop".to_string());
        assert_eq!(format_labels(&labels), "app=shop,tier=web");
    }

    #[test]
    fn test_format_labels_sorts_on_rendered_pair() {
        // "a.b=1" sorts before "a=2" because '.' < '='
        assert_eq!(format_labels([("a", "2"), ("a.b", "1")]), "a.b=1,a=2");
    }

    #[test]
    fn test_format_label_map_skips_non_strings() {
        let value = json!({ "app": "web", "count": 3 });
        assert_eq!(format_label_map(value.as_object().unwrap()), "app=web");
    }

    #[test]
    fn test_abbreviate_access_mode() {
        assert_eq!(abbreviate_access_mode("ReadWriteOnce"), "RWO");
        assert_eq!(abbreviate_access_mode("ReadOnlyMany"), "ROX");
        assert_eq!(abbreviate_access_mode("ReadWriteMany"), "RWX");
        assert_eq!(abbreviate_access_mode("ReadWriteOncePod"), "RWOP");
        assert_eq!(abbreviate_access_mode("SomethingNew"), "SomethingNew");
    }

    #[test]
    fn test_node_status() {
        let ready = json!({ "status": { "conditions": [
            { "type": "MemoryPressure", "status": "False" },
            { "type": "Ready", "status": "True" }
        ]}});
        let not_ready = json!({ "status": { "conditions": [{ "type": "Ready", "status": "Unknown" }]}});
        let no_condition = json!({ "status": { "conditions": [] }});

        assert_eq!(node_status(&ready), NodeStatus::Ready);
        assert_eq!(node_status(&not_ready), NodeStatus::NotReady);
        assert_eq!(node_status(&no_condition), NodeStatus::Unknown);
        assert_eq!(node_status(&json!({})), NodeStatus::Unknown);
        assert_eq!(NodeStatus::NotReady.to_string(), "NotReady");
    }

    #[test]
    fn test_node_role() {
        let node = json!({ "metadata": { "labels": {
            "kubernetes.io/hostname": "n1",
            "node-role.kubernetes.io/worker": "",
            "node-role.kubernetes.io/control-plane": ""
        }}});
        assert_eq!(node_role(&node), "control-plane");

        let plain = json!({ "metadata": { "labels": { "node-role.kubernetes.io/": "" }}});
        assert_eq!(node_role(&plain), "<none>");
        assert_eq!(node_role(&json!({})), "<none>");
    }

    #[test]
    fn test_human_duration_boundaries() {
        let secs = TimeDelta::seconds;
        assert_eq!(human_duration(secs(-5)), "<invalid>");
        assert_eq!(human_duration(TimeDelta::milliseconds(-900)), "0s");
        assert_eq!(human_duration(secs(-1)), "0s");
        assert_eq!(human_duration(secs(0)), "0s");
        assert_eq!(human_duration(secs(90)), "90s");
        assert_eq!(human_duration(secs(119)), "119s");
        assert_eq!(human_duration(secs(120)), "2m");
        assert_eq!(human_duration(secs(330)), "5m30s");
        assert_eq!(human_duration(secs(25 * 60)), "25m");
        assert_eq!(human_duration(secs(3 * 3600 + 15 * 60)), "3h15m");
        assert_eq!(human_duration(secs(5 * 3600)), "5h");
        assert_eq!(human_duration(secs(30 * 3600)), "30h");
        assert_eq!(human_duration(secs(52 * 3600)), "2d4h");
        assert_eq!(human_duration(secs(45 * 86400)), "45d");
        assert_eq!(human_duration(secs((3 * 365 + 12) * 86400)), "3y12d");
        assert_eq!(human_duration(secs(10 * 365 * 86400)), "10y");
    }
}
