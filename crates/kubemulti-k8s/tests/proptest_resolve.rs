//! Property-based tests using proptest
//!
//! These tests check that normalization and resolution are total and
//! consistent over randomized resource words.

use kubemulti_k8s::{APIResourceList, default_aliases, normalize, resolve};
use proptest::prelude::*;

/// Resource-like words: lowercase letters, optional dashes
fn arb_word() -> impl Strategy<Value = String> {
    "[a-z][a-z-]{0,20}"
}

proptest! {
    /// Every result is a lowercase plural
    #[test]
    fn normalized_names_end_in_s(word in arb_word()) {
        let normalized = normalize(&word);
        prop_assert!(normalized.ends_with('s'));
        prop_assert_eq!(normalized.to_lowercase(), normalized);
    }

    /// Case of the input never changes the result
    #[test]
    fn normalize_ignores_case(word in arb_word()) {
        prop_assert_eq!(normalize(&word.to_uppercase()), normalize(&word));
    }

    /// Plural words that are not aliases come back untouched
    #[test]
    fn plural_non_aliases_are_fixed_points(word in "[a-z]{1,16}s") {
        prop_assume!(default_aliases().get(&word).is_none());
        prop_assert_eq!(normalize(&word), word);
    }

    /// Resolution always produces a descriptor named after the normalized word
    #[test]
    fn empty_catalog_always_resolves(word in arb_word()) {
        let catalog: Vec<APIResourceList> = Vec::new();
        let descriptor = resolve(&catalog, &word).unwrap();
        prop_assert_eq!(descriptor.resource, normalize(&word));
        prop_assert!(!descriptor.version.is_empty());
    }
}

#[test]
fn widgets_is_idempotent() {
    assert_eq!(normalize("widget"), "widgets");
    assert_eq!(normalize(&normalize("widgets")), "widgets");
}
