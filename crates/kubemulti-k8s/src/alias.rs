//! Resource name normalization
//!
//! Maps short names ("po", "deploy"), singulars, and mixed-case input to the
//! canonical plural, lowercase resource name used as a lookup key everywhere
//! else.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in short-name table
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("po", "pods"),
    ("svc", "services"),
    ("no", "nodes"),
    ("ns", "namespaces"),
    ("pv", "persistentvolumes"),
    ("pvc", "persistentvolumeclaims"),
    ("cm", "configmaps"),
    ("deploy", "deployments"),
    ("rs", "replicasets"),
    ("ds", "daemonsets"),
    ("sts", "statefulsets"),
    ("job", "jobs"),
    ("cj", "cronjobs"),
    ("ing", "ingresses"),
    ("ep", "endpoints"),
    ("sa", "serviceaccounts"),
    ("netpol", "networkpolicies"),
    ("sc", "storageclasses"),
    ("ev", "events"),
    ("quota", "resourcequotas"),
    ("limits", "limitranges"),
    // Singulars the "append s" rule would get wrong
    ("ingress", "ingresses"),
    ("networkpolicy", "networkpolicies"),
    ("storageclass", "storageclasses"),
];

static DEFAULT_ALIASES: LazyLock<AliasTable> = LazyLock::new(AliasTable::builtin);

/// Immutable alias -> canonical plural mapping
#[derive(Clone, Debug)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    /// The built-in kubectl short names
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_ALIASES.iter().copied())
    }

    /// Build a table from (alias, plural) pairs; aliases are matched case-insensitively
    pub fn from_pairs<I, A, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, P)>,
        A: AsRef<str>,
        P: Into<String>,
    {
        Self {
            aliases: pairs
                .into_iter()
                .map(|(alias, plural)| (alias.as_ref().to_lowercase(), plural.into()))
                .collect(),
        }
    }

    /// Look up an alias without applying the plural heuristic
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases.get(&alias.to_lowercase()).map(String::as_str)
    }

    /// Normalize a user-supplied resource type
    ///
    /// Known aliases map to their plural. Anything else is lowercased and
    /// gets a trailing "s" unless it already ends in one. Irregular plurals
    /// ("ies", "es") are not handled.
    pub fn normalize(&self, input: &str) -> String {
        if let Some(plural) = self.get(input) {
            return plural.to_string();
        }

        let mut lower = input.to_lowercase();
        if !lower.ends_with('s') {
            lower.push('s');
        }
        lower
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Normalize using the built-in alias table
pub fn normalize(input: &str) -> String {
    DEFAULT_ALIASES.normalize(input)
}

/// The process-wide built-in alias table
pub fn default_aliases() -> &'static AliasTable {
    &DEFAULT_ALIASES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_alias_maps_to_its_plural() {
        let table = AliasTable::builtin();
        for (alias, plural) in BUILTIN_ALIASES {
            assert_eq!(table.normalize(alias), *plural, "alias {alias}");
        }
    }

    #[test]
    fn test_common_aliases() {
        assert_eq!(normalize("po"), "pods");
        assert_eq!(normalize("cm"), "configmaps");
        assert_eq!(normalize("deploy"), "deployments");
    }

    #[test]
    fn test_aliases_are_case_insensitive() {
        assert_eq!(normalize("PO"), "pods");
        assert_eq!(normalize("Deploy"), "deployments");
    }

    #[test]
    fn test_unknown_names_are_pluralized() {
        assert_eq!(normalize("widget"), "widgets");
        assert_eq!(normalize("widgets"), "widgets");
        assert_eq!(normalize("Pod"), "pods");
        assert_eq!(normalize("CronJob"), "cronjobs");
    }

    #[test]
    fn test_irregular_plurals_are_not_handled() {
        // Known simplification: only a bare "s" is appended
        assert_eq!(normalize("policy"), "policys");
        assert_eq!(normalize("status"), "status");
    }

    #[test]
    fn test_custom_table() {
        let table = AliasTable::from_pairs([("cert", "certificates")]);
        assert_eq!(table.normalize("CERT"), "certificates");
        assert_eq!(table.normalize("po"), "pos");
        assert_eq!(table.get("cert"), Some("certificates"));
    }
}
