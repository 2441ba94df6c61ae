//! Field extraction engine
//!
//! Every column resolves to a display string. A column whose name has a
//! registered [`ExtractFn`] gets that strategy; everything else walks the
//! column path and renders the scalar found there. Extraction never fails:
//! anything that cannot be rendered degrades to the column default.

mod common;
mod config;
mod network;
mod storage;
mod workload;

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde_json::Value;

use kubemulti_types::{ColumnDefinition, ValueExt};

use crate::registry::ColumnRegistry;

pub const NONE: &str = "<none>";
pub const UNKNOWN: &str = "<unknown>";
pub const PENDING: &str = "<pending>";

/// Everything an extractor may look at for one cell
#[derive(Clone, Copy, Debug)]
pub struct ExtractContext<'a> {
    pub record: &'a Value,
    pub column: &'a ColumnDefinition,
    /// Reference instant for elapsed-time columns
    pub now: DateTime<Utc>,
}

impl<'a> ExtractContext<'a> {
    pub fn new(record: &'a Value, column: &'a ColumnDefinition, now: DateTime<Utc>) -> Self {
        Self {
            record,
            column,
            now,
        }
    }

    /// Column path split into segments
    pub fn path(&self) -> Vec<&'a str> {
        self.column.segments()
    }

    /// Lookup at the column path
    pub fn at_path(&self) -> Option<&'a Value> {
        self.record.lookup(&self.path()).found()
    }

    pub fn default_value(&self) -> String {
        self.column.default.clone()
    }
}

/// Strategy producing one cell
pub type ExtractFn = fn(&ExtractContext<'_>) -> String;

const BUILTIN_EXTRACTORS: &[(&str, ExtractFn)] = &[
    ("READY", workload::ready),
    ("STATUS", workload::status),
    ("RESTARTS", workload::restarts),
    ("TYPE", common::path_string),
    ("CLUSTER-IP", common::path_string),
    ("EXTERNAL-IP", network::external_address),
    ("PORT(S)", network::service_ports),
    ("UP-TO-DATE", common::path_integer),
    ("AVAILABLE", common::path_integer),
    ("DESIRED", common::path_integer),
    ("CURRENT", common::path_integer),
    ("COMPLETIONS", workload::completions),
    ("DURATION", workload::duration),
    ("DATA", config::data_count),
    ("CAPACITY", storage::capacity),
    ("ACCESS MODES", storage::access_modes),
    ("CLAIM", storage::claim),
    ("STORAGE CLASS", common::path_string),
    ("HOSTS", network::ingress_hosts),
    ("ADDRESS", network::external_address),
    ("PORTS", network::ingress_ports),
    ("ENDPOINTS", network::endpoints),
    ("SECRETS", common::path_len),
    ("HARD", config::resource_amounts),
    ("USED", config::resource_amounts),
    ("POD-SELECTOR", network::pod_selector),
    ("POLICY-TYPES", network::policy_types),
    ("LAST SEEN", config::last_seen),
    ("OBJECT", config::involved_object),
    ("NODE SELECTOR", config::node_selector),
    ("ALLOWVOLUMEEXPANSION", storage::allow_volume_expansion),
    ("SCHEDULE", common::path_string),
    ("SUSPEND", workload::suspend),
    ("ACTIVE", common::path_len),
    ("LAST SCHEDULE", workload::last_schedule),
    ("CREATED AT", common::created_at),
    ("CREATED-AT", common::created_at),
    ("ROLES", workload::roles),
];

static DEFAULT_EXTRACTORS: LazyLock<ExtractorTable> = LazyLock::new(ExtractorTable::builtin);
static DEFAULT_PROJECTOR: LazyLock<Projector> = LazyLock::new(Projector::default);

/// Column name to extraction strategy
#[derive(Clone)]
pub struct ExtractorTable {
    by_column: HashMap<String, ExtractFn>,
}

impl fmt::Debug for ExtractorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut columns: Vec<&str> = self.by_column.keys().map(String::as_str).collect();
        columns.sort_unstable();
        f.debug_struct("ExtractorTable")
            .field("columns", &columns)
            .finish()
    }
}

impl ExtractorTable {
    pub fn builtin() -> Self {
        Self {
            by_column: BUILTIN_EXTRACTORS
                .iter()
                .map(|(name, f)| (name.to_string(), *f))
                .collect(),
        }
    }

    /// A table with no strategies; every column uses generic traversal
    pub fn empty() -> Self {
        Self {
            by_column: HashMap::new(),
        }
    }

    /// Add or replace the strategy for `column`
    pub fn register(mut self, column: impl Into<String>, extractor: ExtractFn) -> Self {
        self.by_column.insert(column.into(), extractor);
        self
    }

    pub fn get(&self, column: &str) -> Option<ExtractFn> {
        self.by_column.get(column).copied()
    }

    pub fn extract(&self, record: &Value, column: &ColumnDefinition) -> String {
        self.extract_at(record, column, Utc::now())
    }

    /// Extract one cell with `now` as the reference time
    pub fn extract_at(
        &self,
        record: &Value,
        column: &ColumnDefinition,
        now: DateTime<Utc>,
    ) -> String {
        if !column.has_path() {
            return column.default.clone();
        }

        let ctx = ExtractContext::new(record, column, now);
        let value = match self.get(&column.name) {
            Some(extractor) => extractor(&ctx),
            None => generic(&ctx),
        };

        if value.is_empty() {
            column.default.clone()
        } else {
            value
        }
    }
}

impl Default for ExtractorTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Walk the column path and render a scalar leaf
fn generic(ctx: &ExtractContext<'_>) -> String {
    ctx.at_path()
        .and_then(common::render_scalar)
        .unwrap_or_else(|| ctx.default_value())
}

/// Projects whole records into rows for a resource type
#[derive(Clone, Debug, Default)]
pub struct Projector {
    registry: ColumnRegistry,
    extractors: ExtractorTable,
}

impl Projector {
    pub fn new(registry: ColumnRegistry, extractors: ExtractorTable) -> Self {
        Self {
            registry,
            extractors,
        }
    }

    pub fn header(&self, resource_type: &str) -> Vec<&str> {
        self.registry.header(resource_type)
    }

    pub fn row(&self, resource_type: &str, record: &Value) -> Vec<String> {
        self.row_at(resource_type, record, Utc::now())
    }

    /// One cell per registered column, in column order
    pub fn row_at(&self, resource_type: &str, record: &Value, now: DateTime<Utc>) -> Vec<String> {
        self.registry
            .columns_for(resource_type)
            .iter()
            .map(|column| self.extractors.extract_at(record, column, now))
            .collect()
    }
}

/// Shared projector over the built-in registry and extractors
pub fn default_projector() -> &'static Projector {
    &DEFAULT_PROJECTOR
}

/// Extract one cell with the built-in strategies and the wall clock
pub fn extract(record: &Value, column: &ColumnDefinition) -> String {
    DEFAULT_EXTRACTORS.extract(record, column)
}

/// Extract one cell with the built-in strategies at a fixed `now`
pub fn extract_at(record: &Value, column: &ColumnDefinition, now: DateTime<Utc>) -> String {
    DEFAULT_EXTRACTORS.extract_at(record, column, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::columns_for;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_path_returns_default() {
        let column = ColumnDefinition::new("OBJECT", "", "<unknown>");
        let record = json!({ "involvedObject": { "kind": "Pod", "name": "web" } });
        assert_eq!(extract(&record, &column), "<unknown>");
    }

    #[test]
    fn test_generic_traversal_renders_scalars() {
        let record = json!({
            "spec": { "nodeName": "n1", "replicas": 3, "paused": true, "ratio": 0.5 },
            "status": { "conditions": [], "info": {} }
        });
        let col = |path: &str| ColumnDefinition::new("FIELD", path, "-");

        assert_eq!(extract(&record, &col("spec.nodeName")), "n1");
        assert_eq!(extract(&record, &col("spec.replicas")), "3");
        assert_eq!(extract(&record, &col("spec.paused")), "true");
        assert_eq!(extract(&record, &col("spec.ratio")), "0.5");
        assert_eq!(extract(&record, &col("status.conditions")), "-");
        assert_eq!(extract(&record, &col("status.info")), "-");
        assert_eq!(extract(&record, &col("spec.missing.deeper")), "-");
        assert_eq!(extract(&record, &col("spec.nodeName.deeper")), "-");
    }

    #[test]
    fn test_empty_result_becomes_default() {
        let record = json!({ "spec": { "clusterIP": "" } });
        let column = ColumnDefinition::new("CLUSTER-IP", "spec.clusterIP", "<none>");
        assert_eq!(extract(&record, &column), "<none>");

        let generic = ColumnDefinition::new("NOTE", "spec.clusterIP", "n/a");
        assert_eq!(extract(&record, &generic), "n/a");
    }

    #[test]
    fn test_age_renders_raw_timestamp() {
        let record = json!({ "metadata": { "creationTimestamp": "2024-05-01T10:00:00Z" } });
        let age = &columns_for("pods")[3];
        assert_eq!(extract(&record, age), "2024-05-01T10:00:00Z");
    }

    #[test]
    fn test_registered_strategy_overrides_builtin() {
        fn shout(ctx: &ExtractContext<'_>) -> String {
            ctx.column.name.to_lowercase()
        }

        let table = ExtractorTable::builtin().register("READY", shout);
        let column = ColumnDefinition::new("READY", "status.containerStatuses", "?");
        assert_eq!(table.extract_at(&json!({}), &column, now()), "ready");

        let bare = ExtractorTable::empty();
        assert!(bare.get("READY").is_none());
        assert_eq!(bare.extract_at(&json!({}), &column, now()), "?");
    }

    #[test]
    fn test_projector_row_for_pod() {
        let pod = json!({
            "metadata": { "name": "web-0", "creationTimestamp": "2024-05-01T11:00:00Z" },
            "status": {
                "phase": "Running",
                "containerStatuses": [
                    { "ready": true, "restartCount": 1 },
                    { "ready": false, "restartCount": 2 }
                ]
            }
        });

        let projector = default_projector();
        assert_eq!(projector.header("pods"), ["READY", "STATUS", "RESTARTS", "AGE"]);
        assert_eq!(
            projector.row_at("pods", &pod, now()),
            ["1/2", "Running", "3", "2024-05-01T11:00:00Z"]
        );
    }

    #[test]
    fn test_projector_unknown_type() {
        let record = json!({ "metadata": {} });
        assert_eq!(default_projector().row_at("widgets", &record, now()), ["<unknown>"]);
    }

    #[test]
    fn test_projector_with_override_columns() {
        let registry = ColumnRegistry::builtin().with_overrides([(
            "certificates",
            vec![
                ColumnDefinition::new("SECRET", "spec.secretName", "<none>"),
                ColumnDefinition::new("ISSUER", "spec.issuerRef.name", "<none>"),
            ],
        )]);
        let projector = Projector::new(registry, ExtractorTable::builtin());
        let cert = json!({ "spec": { "secretName": "web-tls" } });
        assert_eq!(projector.row_at("certificates", &cert, now()), ["web-tls", "<none>"]);
    }
}
