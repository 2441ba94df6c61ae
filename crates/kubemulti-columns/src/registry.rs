//! Column schema registry
//!
//! Maps a canonical plural resource name to the ordered columns printed for
//! it. The built-in set is plain data; config files extend or replace it
//! through [`ColumnRegistry::with_overrides`].

use std::collections::HashMap;
use std::sync::LazyLock;

use kubemulti_types::ColumnDefinition;

const CREATED: &str = "metadata.creationTimestamp";

/// (name, path, default) triple
type ColumnSpec = (&'static str, &'static str, &'static str);

const AGE: ColumnSpec = ("AGE", CREATED, "<unknown>");

/// Built-in column tables, in display order
const BUILTIN_COLUMNS: &[(&str, &[ColumnSpec])] = &[
    (
        "pods",
        &[
            ("READY", "status.containerStatuses", "<unknown>"),
            ("STATUS", "status.phase", "<unknown>"),
            ("RESTARTS", "status.containerStatuses", "<unknown>"),
            AGE,
        ],
    ),
    (
        "services",
        &[
            ("TYPE", "spec.type", "ClusterIP"),
            ("CLUSTER-IP", "spec.clusterIP", "<none>"),
            ("EXTERNAL-IP", "status.loadBalancer.ingress", "<none>"),
            ("PORT(S)", "spec.ports", "<none>"),
            AGE,
        ],
    ),
    (
        "deployments",
        &[
            ("READY", "status.readyReplicas", "0"),
            ("UP-TO-DATE", "status.updatedReplicas", "0"),
            ("AVAILABLE", "status.availableReplicas", "0"),
            AGE,
        ],
    ),
    (
        "replicasets",
        &[
            ("DESIRED", "spec.replicas", "0"),
            ("CURRENT", "status.replicas", "0"),
            ("READY", "status.readyReplicas", "0"),
            AGE,
        ],
    ),
    (
        "daemonsets",
        &[
            ("DESIRED", "status.desiredNumberScheduled", "0"),
            ("CURRENT", "status.currentNumberScheduled", "0"),
            ("READY", "status.numberReady", "0"),
            ("UP-TO-DATE", "status.updatedNumberScheduled", "0"),
            ("AVAILABLE", "status.numberAvailable", "0"),
            ("NODE SELECTOR", "spec.template.spec.nodeSelector", "<none>"),
            AGE,
        ],
    ),
    (
        "statefulsets",
        &[("READY", "status.readyReplicas", "0"), AGE],
    ),
    (
        "jobs",
        &[
            ("COMPLETIONS", "status", "<none>"),
            ("DURATION", "status.startTime", "<unknown>"),
            AGE,
        ],
    ),
    (
        "cronjobs",
        &[
            ("SCHEDULE", "spec.schedule", "<none>"),
            ("SUSPEND", "spec.suspend", "False"),
            ("ACTIVE", "status.active", "0"),
            ("LAST SCHEDULE", "status.lastScheduleTime", "<none>"),
            AGE,
        ],
    ),
    ("configmaps", &[("DATA", "data", "0"), AGE]),
    (
        "secrets",
        &[("TYPE", "type", "Opaque"), ("DATA", "data", "0"), AGE],
    ),
    (
        "persistentvolumes",
        &[
            ("CAPACITY", "spec.capacity", "<unknown>"),
            ("ACCESS MODES", "spec.accessModes", "<unknown>"),
            ("RECLAIM POLICY", "spec.persistentVolumeReclaimPolicy", "<unknown>"),
            ("STATUS", "status.phase", "<unknown>"),
            ("CLAIM", "spec.claimRef", "<none>"),
            ("STORAGE CLASS", "spec.storageClassName", "<none>"),
            ("REASON", "status.reason", "<none>"),
            AGE,
        ],
    ),
    (
        "persistentvolumeclaims",
        &[
            ("STATUS", "status.phase", "<unknown>"),
            ("VOLUME", "spec.volumeName", "<none>"),
            ("CAPACITY", "status.capacity", "<unknown>"),
            ("ACCESS MODES", "status.accessModes", "<unknown>"),
            ("STORAGE CLASS", "spec.storageClassName", "<none>"),
            AGE,
        ],
    ),
    (
        "ingresses",
        &[
            ("HOSTS", "spec.rules", "<none>"),
            ("ADDRESS", "status.loadBalancer.ingress", "<none>"),
            ("PORTS", "spec.rules", "<none>"),
            AGE,
        ],
    ),
    ("endpoints", &[("ENDPOINTS", "subsets", "<none>"), AGE]),
    ("serviceaccounts", &[("SECRETS", "secrets", "0"), AGE]),
    (
        "resourcequotas",
        &[
            AGE,
            ("HARD", "status.hard", "<none>"),
            ("USED", "status.used", "<none>"),
        ],
    ),
    ("limitranges", &[("CREATED AT", CREATED, "<unknown>")]),
    (
        "networkpolicies",
        &[
            ("POD-SELECTOR", "spec.podSelector", "<none>"),
            ("POLICY-TYPES", "spec.policyTypes", "<none>"),
            AGE,
        ],
    ),
    ("roles", &[("CREATED-AT", CREATED, "<unknown>")]),
    (
        "storageclasses",
        &[
            ("PROVISIONER", "provisioner", "<none>"),
            ("RECLAIMPOLICY", "reclaimPolicy", "Delete"),
            ("VOLUMEBINDINGMODE", "volumeBindingMode", "Immediate"),
            ("ALLOWVOLUMEEXPANSION", "allowVolumeExpansion", "false"),
            AGE,
        ],
    ),
    (
        "events",
        &[
            ("LAST SEEN", "lastTimestamp", "<unknown>"),
            ("TYPE", "type", "<unknown>"),
            ("REASON", "reason", "<unknown>"),
            ("OBJECT", "", "<unknown>"),
            ("MESSAGE", "message", "<unknown>"),
        ],
    ),
    (
        "nodes",
        &[
            ("STATUS", "status.conditions", "Unknown"),
            ("ROLES", "metadata.labels", "<none>"),
            AGE,
            ("VERSION", "status.nodeInfo.kubeletVersion", "<none>"),
        ],
    ),
    (
        "namespaces",
        &[("STATUS", "status.phase", "<unknown>"), AGE],
    ),
];

static DEFAULT_REGISTRY: LazyLock<ColumnRegistry> = LazyLock::new(ColumnRegistry::builtin);

fn to_columns(specs: &[ColumnSpec]) -> Vec<ColumnDefinition> {
    specs
        .iter()
        .map(|(name, path, default)| ColumnDefinition::new(*name, *path, *default))
        .collect()
}

/// Column sets keyed by lowercase resource type
#[derive(Clone, Debug)]
pub struct ColumnRegistry {
    by_type: HashMap<String, Vec<ColumnDefinition>>,
    fallback: Vec<ColumnDefinition>,
}

impl ColumnRegistry {
    /// Registry holding the built-in column tables
    pub fn builtin() -> Self {
        let by_type = BUILTIN_COLUMNS
            .iter()
            .map(|(resource, specs)| (resource.to_string(), to_columns(specs)))
            .collect();

        Self {
            by_type,
            fallback: to_columns(&[AGE]),
        }
    }

    /// Replace or add column sets; keys are matched case-insensitively
    pub fn with_overrides<I, K>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<ColumnDefinition>)>,
        K: AsRef<str>,
    {
        for (resource, columns) in overrides {
            let key = resource.as_ref().to_ascii_lowercase();
            tracing::debug!(resource = %key, columns = columns.len(), "Overriding column set");
            self.by_type.insert(key, columns);
        }
        self
    }

    /// Columns for `resource_type`, or the lone AGE column when unknown
    pub fn columns_for(&self, resource_type: &str) -> &[ColumnDefinition] {
        self.by_type
            .get(&resource_type.to_ascii_lowercase())
            .unwrap_or(&self.fallback)
    }

    /// Header names for `resource_type`, in column order
    pub fn header(&self, resource_type: &str) -> Vec<&str> {
        self.columns_for(resource_type)
            .iter()
            .map(|column| column.name.as_str())
            .collect()
    }

    /// Whether `resource_type` has its own column set
    pub fn contains(&self, resource_type: &str) -> bool {
        self.by_type
            .contains_key(&resource_type.to_ascii_lowercase())
    }

    /// Known resource types, sorted
    pub fn resource_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.by_type.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl Default for ColumnRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Shared built-in registry
pub fn default_registry() -> &'static ColumnRegistry {
    &DEFAULT_REGISTRY
}

/// Columns for `resource_type` from the built-in registry
pub fn columns_for(resource_type: &str) -> &'static [ColumnDefinition] {
    DEFAULT_REGISTRY.columns_for(resource_type)
}
