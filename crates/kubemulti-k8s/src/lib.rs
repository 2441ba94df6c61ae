//! Kubernetes client and resource type resolution for kubemulti
//!
//! This crate normalizes user-supplied resource words, resolves them into
//! group/version/resource descriptors against a discovery catalog, and wraps
//! the kube client for context handling and dynamic listing.

mod alias;
mod catalog;
mod client;
mod defaults;
mod error;
mod resolve;

pub use alias::{AliasTable, default_aliases, normalize};
pub use catalog::{ClusterCatalog, DiscoveryCatalog};
pub use client::{KubeClient, api_resource};
pub use defaults::{DefaultDescriptors, default_descriptors};
pub use error::{CatalogError, ClientError};
pub use resolve::{ResourceResolver, resolve};

// Re-export types that are used in our public API
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIResource, APIResourceList};
pub use kubemulti_types::{ContextInfo, Record, ResourceDescriptor};
