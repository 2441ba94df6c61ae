//! Resource type resolution
//!
//! Turns a free-form resource word ("po", "deploy", "certificates") into a
//! [`ResourceDescriptor`]. Discovery is consulted first, then the static
//! default table, then a core-group guess. Resolution never comes back
//! empty; the only failure is the catalog itself being unreadable.

use std::sync::LazyLock;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResource;

use kubemulti_types::ResourceDescriptor;

use crate::alias::AliasTable;
use crate::catalog::DiscoveryCatalog;
use crate::defaults::DefaultDescriptors;
use crate::error::CatalogError;

static DEFAULT_RESOLVER: LazyLock<ResourceResolver> = LazyLock::new(ResourceResolver::default);

/// Resolver over an alias table and a fallback descriptor table
#[derive(Clone, Debug, Default)]
pub struct ResourceResolver {
    aliases: AliasTable,
    defaults: DefaultDescriptors,
}

impl ResourceResolver {
    pub fn new(aliases: AliasTable, defaults: DefaultDescriptors) -> Self {
        Self { aliases, defaults }
    }

    /// Resolve `resource_type` against `catalog`
    ///
    /// The first catalog entry whose plural, singular, or short name matches
    /// wins. Catalog order is not guaranteed, so callers that need the same
    /// answer every time must hand in a sorted catalog.
    pub fn resolve<C>(
        &self,
        catalog: &C,
        resource_type: &str,
    ) -> Result<ResourceDescriptor, CatalogError>
    where
        C: DiscoveryCatalog + ?Sized,
    {
        let lists = catalog.api_resource_lists()?;
        let normalized = self.aliases.normalize(resource_type);

        for list in lists.iter() {
            let Some((group, version)) = parse_group_version(&list.group_version) else {
                tracing::debug!(group_version = %list.group_version, "Skipping unparseable group version");
                continue;
            };

            if let Some(resource) = list
                .resources
                .iter()
                .find(|r| matches_resource(r, &normalized))
            {
                tracing::debug!(%resource_type, %group, %version, resource = %resource.name, "Resolved via discovery");
                return Ok(ResourceDescriptor::new(
                    group,
                    version,
                    resource.name.clone(),
                    resource.namespaced,
                ));
            }
        }

        if let Some(descriptor) = self.defaults.get(&normalized) {
            tracing::debug!(%resource_type, %descriptor, "Resolved via static defaults");
            return Ok(descriptor.clone());
        }

        tracing::debug!(%resource_type, %normalized, "Guessing core group resource");
        Ok(ResourceDescriptor::new("", "v1", normalized, true))
    }
}

/// Resolve with the built-in alias and default tables
pub fn resolve<C>(catalog: &C, resource_type: &str) -> Result<ResourceDescriptor, CatalogError>
where
    C: DiscoveryCatalog + ?Sized,
{
    DEFAULT_RESOLVER.resolve(catalog, resource_type)
}

/// Match on plural name, singular name, or any short name
fn matches_resource(resource: &APIResource, name: &str) -> bool {
    resource.name.eq_ignore_ascii_case(name)
        || resource.singular_name.eq_ignore_ascii_case(name)
        || resource
            .short_names
            .iter()
            .flatten()
            .any(|short| short.eq_ignore_ascii_case(name))
}

/// Split "group/version" (or bare "version" for core) into its parts
fn parse_group_version(group_version: &str) -> Option<(&str, &str)> {
    match group_version.split_once('/') {
        None if !group_version.is_empty() => Some(("", group_version)),
        None => None,
        Some((group, version))
            if !group.is_empty() && !version.is_empty() && !version.contains('/') =>
        {
            Some((group, version))
        }
        Some(_) => None,
    }
}
