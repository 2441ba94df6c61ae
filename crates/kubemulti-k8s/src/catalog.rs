//! Discovery catalog abstraction
//!
//! A catalog is a read-only list of `APIResourceList`s, one per served
//! group-version. Order across lists is whatever the source produced and is
//! not stable between calls.

use std::borrow::Cow;
use std::sync::Arc;

use futures::future::join_all;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResourceList;

use crate::error::CatalogError;

/// Queryable source of API resource descriptors
pub trait DiscoveryCatalog {
    /// All (group-version, resources) lists known to this catalog
    fn api_resource_lists(&self) -> Result<Cow<'_, [APIResourceList]>, CatalogError>;
}

impl DiscoveryCatalog for [APIResourceList] {
    fn api_resource_lists(&self) -> Result<Cow<'_, [APIResourceList]>, CatalogError> {
        Ok(Cow::Borrowed(self))
    }
}

impl DiscoveryCatalog for Vec<APIResourceList> {
    fn api_resource_lists(&self) -> Result<Cow<'_, [APIResourceList]>, CatalogError> {
        Ok(Cow::Borrowed(self.as_slice()))
    }
}

impl<T: DiscoveryCatalog + ?Sized> DiscoveryCatalog for &T {
    fn api_resource_lists(&self) -> Result<Cow<'_, [APIResourceList]>, CatalogError> {
        (**self).api_resource_lists()
    }
}

/// Snapshot of one cluster's discovery endpoints
///
/// Core API failures are kept and reported when the catalog is queried.
/// A single aggregated group failing (metrics-server being down is the
/// usual case) only drops that group.
#[derive(Clone, Debug)]
pub struct ClusterCatalog {
    lists: Vec<APIResourceList>,
    failure: Option<Arc<kube::Error>>,
}

impl ClusterCatalog {
    /// Walk `/api` and `/apis` for the cluster behind `client`
    ///
    /// Each group's preferred version is listed first so a first-match
    /// resolver lands on it.
    pub async fn discover(client: &kube::Client) -> Self {
        let core_versions = match client.list_core_api_versions().await {
            Ok(versions) => versions.versions,
            Err(e) => return Self::failed(e),
        };

        let mut lists = Vec::new();
        for version in &core_versions {
            match client.list_core_api_resources(version).await {
                Ok(list) => lists.push(list),
                Err(e) => return Self::failed(e),
            }
        }

        let groups = match client.list_api_groups().await {
            Ok(groups) => groups.groups,
            Err(e) => return Self::failed(e),
        };

        let mut group_versions = Vec::new();
        for group in &groups {
            let preferred = group
                .preferred_version
                .as_ref()
                .map(|v| v.group_version.clone());
            group_versions.extend(preferred.clone());
            group_versions.extend(
                group
                    .versions
                    .iter()
                    .map(|v| v.group_version.clone())
                    .filter(|gv| Some(gv) != preferred.as_ref()),
            );
        }

        let results = join_all(
            group_versions
                .iter()
                .map(|gv| client.list_api_group_resources(gv)),
        )
        .await;

        for (group_version, result) in group_versions.iter().zip(results) {
            match result {
                Ok(list) => lists.push(list),
                Err(e) => {
                    tracing::warn!(%group_version, error = %e, "Skipping API group that failed discovery")
                }
            }
        }

        tracing::debug!(lists = lists.len(), "Discovery snapshot complete");
        Self::from_lists(lists)
    }

    /// A catalog over already-fetched lists
    pub fn from_lists(lists: Vec<APIResourceList>) -> Self {
        Self {
            lists,
            failure: None,
        }
    }

    fn failed(error: kube::Error) -> Self {
        tracing::warn!(error = %error, "Discovery failed");
        Self {
            lists: Vec::new(),
            failure: Some(Arc::new(error)),
        }
    }
}

impl DiscoveryCatalog for ClusterCatalog {
    fn api_resource_lists(&self) -> Result<Cow<'_, [APIResourceList]>, CatalogError> {
        match &self.failure {
            Some(error) => Err(CatalogError::Discovery(Arc::clone(error))),
            None => Ok(Cow::Borrowed(self.lists.as_slice())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forbidden() -> kube::Error {
        kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "forbidden: cannot list resource".to_string(),
            reason: "Forbidden".to_string(),
            code: 403,
        })
    }

    fn list(group_version: &str) -> APIResourceList {
        APIResourceList {
            group_version: group_version.to_string(),
            resources: Vec::new(),
        }
    }

    #[test]
    fn test_vec_catalog_borrows_lists() {
        let lists = vec![list("v1"), list("apps/v1")];
        let queried = lists.api_resource_lists().unwrap();
        assert_eq!(queried.len(), 2);
        assert_eq!(queried[1].group_version, "apps/v1");
    }

    #[test]
    fn test_cluster_catalog_from_lists() {
        let catalog = ClusterCatalog::from_lists(vec![list("v1")]);
        assert_eq!(catalog.api_resource_lists().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_discovery_surfaces_on_query() {
        let catalog = ClusterCatalog::failed(forbidden());
        let err = catalog.api_resource_lists().unwrap_err();
        assert!(matches!(err, CatalogError::Discovery(_)));

        let err = crate::resolve(&catalog, "po").unwrap_err();
        assert!(matches!(err, CatalogError::Discovery(_)));
        assert_eq!(err.to_string(), "failed to discover API resources");
    }

    #[test]
    fn test_failed_catalog_clones_share_the_error() {
        let catalog = ClusterCatalog::failed(forbidden());
        let copy = catalog.clone();
        let (Err(CatalogError::Discovery(a)), Err(CatalogError::Discovery(b))) =
            (catalog.api_resource_lists(), copy.api_resource_lists())
        else {
            panic!("expected discovery errors");
        };
        assert!(Arc::ptr_eq(&a, &b));
    }
}
