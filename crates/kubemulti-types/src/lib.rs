//! Shared types for kubemulti
//!
//! This crate contains data structures used across multiple kubemulti crates:
//! resource descriptors, column definitions, and the schema-less [`Record`]
//! with its typed accessors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Deref;

// ============================================================================
// Kubernetes Resource Types
// ============================================================================

/// Kubernetes context information
#[derive(Clone, Debug)]
pub struct ContextInfo {
    pub name: String,
    pub cluster: String,
    pub user: String,
    pub namespace: Option<String>,
    pub is_current: bool,
}

impl ContextInfo {
    pub fn new(
        name: String,
        cluster: String,
        user: String,
        namespace: Option<String>,
        is_current: bool,
    ) -> Self {
        Self {
            name,
            cluster,
            user,
            namespace,
            is_current,
        }
    }
}

/// Fully-qualified API resource identifier (group, version, resource) plus scope
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceDescriptor {
    /// API group, empty for the core group
    pub group: String,
    pub version: String,
    /// Plural, lowercase resource name (e.g. "deployments")
    pub resource: String,
    pub namespaced: bool,
}

impl ResourceDescriptor {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        resource: impl Into<String>,
        namespaced: bool,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            resource: resource.into(),
            namespaced,
        }
    }

    /// Whether this resource lives in the core ("") API group
    pub fn is_core(&self) -> bool {
        self.group.is_empty()
    }

    /// The apiVersion string: "v1" for core, "group/version" otherwise
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for ResourceDescriptor {
    /// kubectl-style fully qualified name: `deployments.v1.apps`, `pods.v1`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}.{}", self.resource, self.version)
        } else {
            write!(f, "{}.{}.{}", self.resource, self.version, self.group)
        }
    }
}

// ============================================================================
// Column Types
// ============================================================================

/// One cell of tabular output: display name, dotted field path, fallback value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Header text, also the dispatch key for specialised extractors
    pub name: String,

    /// Dot-separated field path; empty means the value is wholly synthesized
    #[serde(default)]
    pub path: String,

    /// Display value used whenever extraction cannot produce one
    #[serde(default = "default_display")]
    pub default: String,
}

fn default_display() -> String {
    "<none>".to_string()
}

impl ColumnDefinition {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            default: default.into(),
        }
    }

    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    /// Path split into its segments
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('.').collect()
    }
}

// ============================================================================
// Record Types
// ============================================================================

/// Outcome of a typed lookup into a [`Record`]
///
/// Keeps "not there" apart from "there, but not the type asked for" so
/// callers can choose how to degrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    Missing,
    Mismatch,
}

impl<T> Lookup<T> {
    /// Convert into an `Option`, dropping the missing/mismatch distinction
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            Self::Missing | Self::Mismatch => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(v) => Lookup::Found(f(v)),
            Self::Missing => Lookup::Missing,
            Self::Mismatch => Lookup::Mismatch,
        }
    }

    /// Narrow a found value; `None` from `f` becomes `Mismatch`
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Option<U>) -> Lookup<U> {
        match self {
            Self::Found(v) => f(v).map_or(Lookup::Mismatch, Lookup::Found),
            Self::Missing => Lookup::Missing,
            Self::Mismatch => Lookup::Mismatch,
        }
    }
}

/// Typed nested accessors over a JSON tree
///
/// `null` anywhere on the path counts as missing, matching how the API
/// server omits unset optional fields.
pub trait ValueExt {
    /// Walk `path` through nested objects
    fn lookup(&self, path: &[&str]) -> Lookup<&Value>;

    fn nested_str(&self, path: &[&str]) -> Lookup<&str> {
        self.lookup(path).and_then(Value::as_str)
    }

    /// Integers, including integer-valued floats
    fn nested_i64(&self, path: &[&str]) -> Lookup<i64> {
        self.lookup(path).and_then(as_integer)
    }

    fn nested_bool(&self, path: &[&str]) -> Lookup<bool> {
        self.lookup(path).and_then(Value::as_bool)
    }

    fn nested_slice(&self, path: &[&str]) -> Lookup<&[Value]> {
        self.lookup(path).and_then(|v| v.as_array().map(Vec::as_slice))
    }

    fn nested_map(&self, path: &[&str]) -> Lookup<&Map<String, Value>> {
        self.lookup(path).and_then(Value::as_object)
    }

    /// A sequence whose every element is a string
    fn nested_str_vec(&self, path: &[&str]) -> Lookup<Vec<&str>> {
        self.nested_slice(path).and_then(|items| items.iter().map(Value::as_str).collect())
    }
}

impl ValueExt for Value {
    fn lookup(&self, path: &[&str]) -> Lookup<&Value> {
        let mut current = self;
        for segment in path {
            current = match current {
                Value::Object(map) => match map.get(*segment) {
                    Some(Value::Null) | None => return Lookup::Missing,
                    Some(next) => next,
                },
                Value::Null => return Lookup::Missing,
                _ => return Lookup::Mismatch,
            };
        }
        match current {
            Value::Null => Lookup::Missing,
            value => Lookup::Found(value),
        }
    }
}

/// Read a JSON number as an integer, accepting whole floats
pub fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// One decoded resource instance
///
/// A schema-less tree; no two records of the same type are guaranteed to
/// carry the same fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// `metadata.name`
    pub fn name(&self) -> Option<&str> {
        self.0.nested_str(&["metadata", "name"]).found()
    }

    /// `metadata.namespace`
    pub fn namespace(&self) -> Option<&str> {
        self.0.nested_str(&["metadata", "namespace"]).found()
    }

    /// `metadata.labels` as string pairs, skipping non-string values
    pub fn labels(&self) -> Vec<(&str, &str)> {
        self.0
            .nested_map(&["metadata", "labels"])
            .found()
            .map(|labels| {
                labels
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.as_str(), v)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl Deref for Record {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.0
    }
}

impl AsRef<Value> for Record {
    fn as_ref(&self) -> &Value {
        &self.0
    }
}
