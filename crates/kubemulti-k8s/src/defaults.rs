//! Static descriptors used when discovery does not know a resource
//!
//! Built from compile-time `k8s-openapi` type metadata so group, version and
//! plural stay in sync with the API version we build against.

use std::collections::HashMap;
use std::sync::LazyLock;

use k8s_openapi::api::{
    apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet},
    batch::v1::{CronJob, Job},
    core::v1::{
        ConfigMap, Endpoints, Event, LimitRange, Namespace, Node, PersistentVolume,
        PersistentVolumeClaim, Pod, ResourceQuota, Secret, Service, ServiceAccount,
    },
    networking::v1::{Ingress, NetworkPolicy},
    rbac::v1::Role,
    storage::v1::StorageClass,
};
use kube::Resource;

use kubemulti_types::ResourceDescriptor;

static DEFAULT_DESCRIPTORS: LazyLock<DefaultDescriptors> =
    LazyLock::new(DefaultDescriptors::builtin);

/// Fallback table keyed by canonical plural name
#[derive(Clone, Debug)]
pub struct DefaultDescriptors {
    by_resource: HashMap<String, ResourceDescriptor>,
}

impl DefaultDescriptors {
    /// Every resource type the built-in column registry knows about
    pub fn builtin() -> Self {
        let mut table = Self::empty();

        // Scope is spelled out since kube::Resource exposes it only as a type
        macro_rules! add_descriptor {
            ($type:ty, namespaced) => {
                add_descriptor!(@inner $type, true)
            };
            ($type:ty, cluster) => {
                add_descriptor!(@inner $type, false)
            };
            (@inner $type:ty, $namespaced:expr) => {
                table.insert(ResourceDescriptor::new(
                    <$type>::group(&()),
                    <$type>::version(&()),
                    <$type>::plural(&()),
                    $namespaced,
                ))
            };
        }

        // Core API (v1)
        add_descriptor!(Pod, namespaced);
        add_descriptor!(Service, namespaced);
        add_descriptor!(ConfigMap, namespaced);
        add_descriptor!(Secret, namespaced);
        add_descriptor!(Endpoints, namespaced);
        add_descriptor!(ServiceAccount, namespaced);
        add_descriptor!(PersistentVolumeClaim, namespaced);
        add_descriptor!(ResourceQuota, namespaced);
        add_descriptor!(LimitRange, namespaced);
        add_descriptor!(Event, namespaced);
        add_descriptor!(Node, cluster);
        add_descriptor!(Namespace, cluster);
        add_descriptor!(PersistentVolume, cluster);

        // apps/v1
        add_descriptor!(Deployment, namespaced);
        add_descriptor!(ReplicaSet, namespaced);
        add_descriptor!(DaemonSet, namespaced);
        add_descriptor!(StatefulSet, namespaced);

        // batch/v1
        add_descriptor!(Job, namespaced);
        add_descriptor!(CronJob, namespaced);

        // networking.k8s.io/v1
        add_descriptor!(Ingress, namespaced);
        add_descriptor!(NetworkPolicy, namespaced);

        // rbac.authorization.k8s.io/v1
        add_descriptor!(Role, namespaced);

        // storage.k8s.io/v1
        add_descriptor!(StorageClass, cluster);

        table
    }

    pub fn empty() -> Self {
        Self {
            by_resource: HashMap::new(),
        }
    }

    /// Add or replace the descriptor for `descriptor.resource`
    pub fn insert(&mut self, descriptor: ResourceDescriptor) {
        self.by_resource.insert(descriptor.resource.clone(), descriptor);
    }

    /// Look up by already-normalized plural name
    pub fn get(&self, resource: &str) -> Option<&ResourceDescriptor> {
        self.by_resource.get(resource)
    }

    pub fn len(&self) -> usize {
        self.by_resource.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_resource.is_empty()
    }
}

impl Default for DefaultDescriptors {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The process-wide built-in fallback table
pub fn default_descriptors() -> &'static DefaultDescriptors {
    &DEFAULT_DESCRIPTORS
}
