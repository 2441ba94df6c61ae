use std::path::Path;

use kube::Api;
use kube::api::{ApiResource, DynamicObject, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};

use kubemulti_types::{ContextInfo, Record, ResourceDescriptor};

use crate::catalog::ClusterCatalog;
use crate::error::ClientError;

/// Kubernetes client wrapper
pub struct KubeClient {
    kubeconfig: Kubeconfig,
    current_context: Option<String>,
}

impl KubeClient {
    /// Create a new KubeClient by loading the default kubeconfig
    pub fn new() -> Result<Self, ClientError> {
        let kubeconfig = Kubeconfig::read().map_err(ClientError::Kubeconfig)?;
        Ok(Self::from_kubeconfig(kubeconfig))
    }

    /// Create a KubeClient from an explicit kubeconfig file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let kubeconfig = Kubeconfig::read_from(path).map_err(ClientError::Kubeconfig)?;
        Ok(Self::from_kubeconfig(kubeconfig))
    }

    pub fn from_kubeconfig(kubeconfig: Kubeconfig) -> Self {
        let current_context = kubeconfig.current_context.clone();
        Self {
            kubeconfig,
            current_context,
        }
    }

    /// Get all available contexts from kubeconfig
    pub fn get_contexts(&self) -> Vec<ContextInfo> {
        self.kubeconfig
            .contexts
            .iter()
            .map(|ctx| {
                let context = ctx.context.as_ref();
                ContextInfo::new(
                    ctx.name.clone(),
                    context.map(|c| c.cluster.clone()).unwrap_or_default(),
                    context.and_then(|c| c.user.clone()).unwrap_or_default(),
                    context.and_then(|c| c.namespace.clone()),
                    Some(&ctx.name) == self.current_context.as_ref(),
                )
            })
            .collect()
    }

    /// Get the current context name
    pub fn current_context(&self) -> Option<&str> {
        self.current_context.as_deref()
    }

    /// Create a kube::Client for a specific context
    pub async fn client_for_context(
        &self,
        context_name: &str,
    ) -> Result<kube::Client, ClientError> {
        if !self.kubeconfig.contexts.iter().any(|c| c.name == context_name) {
            return Err(ClientError::UnknownContext(context_name.to_string()));
        }

        let config = kube::Config::from_custom_kubeconfig(
            self.kubeconfig.clone(),
            &KubeConfigOptions {
                context: Some(context_name.to_string()),
                ..Default::default()
            },
        )
        .await
        .map_err(|source| ClientError::Config {
            context: context_name.to_string(),
            source,
        })?;

        kube::Client::try_from(config).map_err(|source| ClientError::Client {
            context: context_name.to_string(),
            source,
        })
    }

    /// Snapshot the discovery endpoints of the cluster behind `client`
    pub async fn discover(&self, client: &kube::Client) -> ClusterCatalog {
        ClusterCatalog::discover(client).await
    }

    /// List objects of a resolved type as records
    ///
    /// For namespaced types `namespace` narrows the listing; `None` lists
    /// across all namespaces. Cluster-scoped types ignore it.
    pub async fn list_records(
        &self,
        client: &kube::Client,
        descriptor: &ResourceDescriptor,
        namespace: Option<&str>,
        selector: Option<&str>,
    ) -> Result<Vec<Record>, ClientError> {
        let api = dynamic_api(client, descriptor, namespace);

        let mut params = ListParams::default();
        if let Some(selector) = selector {
            params = params.labels(selector);
        }

        let list = api.list(&params).await.map_err(|source| ClientError::List {
            resource: descriptor.to_string(),
            source,
        })?;

        list.items
            .into_iter()
            .map(|obj| to_record(obj, descriptor))
            .collect()
    }

    /// Fetch a single object by name
    pub async fn get_record(
        &self,
        client: &kube::Client,
        descriptor: &ResourceDescriptor,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<Record, ClientError> {
        let api = dynamic_api(client, descriptor, namespace);
        let obj = api.get(name).await.map_err(|source| ClientError::Get {
            resource: descriptor.to_string(),
            name: name.to_string(),
            source,
        })?;

        to_record(obj, descriptor)
    }
}

/// Build the dynamic API handle for a descriptor
fn dynamic_api(
    client: &kube::Client,
    descriptor: &ResourceDescriptor,
    namespace: Option<&str>,
) -> Api<DynamicObject> {
    let resource = api_resource(descriptor);
    match namespace {
        Some(ns) if descriptor.namespaced => Api::namespaced_with(client.clone(), ns, &resource),
        _ => Api::all_with(client.clone(), &resource),
    }
}

/// Convert a descriptor into kube's dynamic type information
///
/// Kind is not part of a descriptor; listing only needs group, version
/// and plural.
pub fn api_resource(descriptor: &ResourceDescriptor) -> ApiResource {
    ApiResource {
        group: descriptor.group.clone(),
        version: descriptor.version.clone(),
        api_version: descriptor.api_version(),
        kind: String::new(),
        plural: descriptor.resource.clone(),
    }
}

/// Convert a DynamicObject into a schema-less record
fn to_record(obj: DynamicObject, descriptor: &ResourceDescriptor) -> Result<Record, ClientError> {
    let mut value = serde_json::to_value(obj)?;

    // List items come back without type meta
    if let Some(map) = value.as_object_mut() {
        map.entry("apiVersion")
            .or_insert_with(|| descriptor.api_version().into());
    }

    Ok(Record::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubemulti_types::ValueExt;

    #[test]
    fn test_api_resource_from_descriptor() {
        let descriptor = ResourceDescriptor::new("apps", "v1", "deployments", true);
        let resource = api_resource(&descriptor);
        assert_eq!(resource.api_version, "apps/v1");
        assert_eq!(resource.plural, "deployments");
        assert_eq!(resource.group, "apps");
    }

    #[test]
    fn test_to_record_fills_api_version() {
        let descriptor = ResourceDescriptor::new("", "v1", "configmaps", true);
        let resource = api_resource(&descriptor);
        let obj = DynamicObject::new("settings", &resource)
            .within("default")
            .data(serde_json::json!({ "data": { "a": "1" } }));

        let record = to_record(obj, &descriptor).unwrap();
        assert_eq!(record.name(), Some("settings"));
        assert_eq!(record.namespace(), Some("default"));
        assert_eq!(record.nested_str(&["apiVersion"]).found(), Some("v1"));
        assert_eq!(record.nested_str(&["data", "a"]).found(), Some("1"));
    }

    #[test]
    fn test_contexts_from_kubeconfig() {
        let kubeconfig = Kubeconfig::from_yaml(
            r#"
apiVersion: v1
kind: Config
current-context: staging
clusters:
  - name: staging-cluster
    cluster:
      server: https://staging.example.com
  - name: prod-cluster
    cluster:
      server: https://prod.example.com
users:
  - name: admin
    user:
      token: abc
contexts:
  - name: staging
    context:
      cluster: staging-cluster
      user: admin
      namespace: web
  - name: prod
    context:
      cluster: prod-cluster
      user: admin
"#,
        )
        .unwrap();

        let client = KubeClient::from_kubeconfig(kubeconfig);
        let contexts = client.get_contexts();
        assert_eq!(contexts.len(), 2);
        assert!(contexts[0].is_current);
        assert_eq!(contexts[0].namespace.as_deref(), Some("web"));
        assert_eq!(contexts[1].cluster, "prod-cluster");
        assert_eq!(client.current_context(), Some("staging"));
    }
}
