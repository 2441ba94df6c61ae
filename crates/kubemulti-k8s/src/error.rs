use std::sync::Arc;

use thiserror::Error;

/// Failure to query a discovery catalog
///
/// The only error resource type resolution can surface.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to discover API resources")]
    Discovery(#[source] Arc<kube::Error>),
}

/// Errors from kubeconfig handling and API calls
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to read kubeconfig. Is kubectl configured?")]
    Kubeconfig(#[source] kube::config::KubeconfigError),

    #[error("context '{0}' not found in kubeconfig")]
    UnknownContext(String),

    #[error("failed to create config for context: {context}")]
    Config {
        context: String,
        #[source]
        source: kube::config::KubeconfigError,
    },

    #[error("failed to create client for context: {context}")]
    Client {
        context: String,
        #[source]
        source: kube::Error,
    },

    #[error("failed to list {resource}")]
    List {
        resource: String,
        #[source]
        source: kube::Error,
    },

    #[error("failed to get {resource} '{name}'")]
    Get {
        resource: String,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("failed to encode object as JSON")]
    Encode(#[from] serde_json::Error),
}
