//! Configuration file handling
//!
//! Optional TOML at `--config` or `<config dir>/kubemulti/config.toml`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use kubemulti_columns::ColumnRegistry;
use kubemulti_types::ColumnDefinition;

/// User configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Kubeconfig to read instead of the default
    pub kubeconfig: Option<PathBuf>,
    /// Contexts queried when none are given on the command line
    pub contexts: Vec<String>,
    /// Namespace used when neither `-n` nor `-A` is given
    pub namespace: Option<String>,
    /// Column sets keyed by resource type, replacing or adding to the built-ins
    pub columns: HashMap<String, Vec<ColumnDefinition>>,
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kubemulti").join("config.toml"))
    }

    /// Load from an explicit path, or the default location
    ///
    /// An explicit path must exist. A missing default file yields the
    /// default config.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Built-in column registry with this config's overrides applied
    pub fn column_registry(&self) -> ColumnRegistry {
        ColumnRegistry::builtin().with_overrides(
            self.columns
                .iter()
                .map(|(resource, columns)| (resource.as_str(), columns.clone())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config = Config::parse("").unwrap();
        assert!(config.kubeconfig.is_none());
        assert!(config.contexts.is_empty());
        assert!(config.columns.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
kubeconfig = "/etc/kube/config"
contexts = ["staging", "prod"]
namespace = "web"

[[columns.certificates]]
name = "READY"
path = "status.conditions"
default = "<unknown>"

[[columns.certificates]]
name = "SECRET"
path = "spec.secretName"
"#,
        )
        .unwrap();

        assert_eq!(config.kubeconfig, Some(PathBuf::from("/etc/kube/config")));
        assert_eq!(config.contexts, ["staging", "prod"]);
        assert_eq!(config.namespace.as_deref(), Some("web"));

        let certs = &config.columns["certificates"];
        assert_eq!(certs.len(), 2);
        assert_eq!(certs[1].default, "<none>");

        let registry = config.column_registry();
        assert_eq!(registry.header("certificates"), ["READY", "SECRET"]);
        assert_eq!(registry.header("pods"), ["READY", "STATUS", "RESTARTS", "AGE"]);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(Config::parse("contexts = \"not-a-list\"").is_err());
        assert!(Config::parse("colour = true").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let missing = Path::new("/nonexistent/kubemulti/config.toml");
        assert!(Config::load(Some(missing)).is_err());
    }
}
