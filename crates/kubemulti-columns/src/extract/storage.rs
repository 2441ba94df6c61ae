//! Persistent volume, claim, and storage class columns

use kubemulti_types::ValueExt;

use super::common::quantity;
use super::{ExtractContext, NONE};
use crate::format::abbreviate_access_mode;

/// CAPACITY: storage quantity, falling back from the column path to spec
/// then status
///
/// When the map holds no `storage` entry the lexicographically smallest
/// renderable key wins.
pub(crate) fn capacity(ctx: &ExtractContext<'_>) -> String {
    let path = ctx.path();
    let candidates: [&[&str]; 3] = [&path, &["spec", "capacity"], &["status", "capacity"]];

    let Some(capacity) = candidates
        .iter()
        .find_map(|p| ctx.record.nested_map(p).found().filter(|m| !m.is_empty()))
    else {
        return ctx.default_value();
    };

    if let Some(storage) = capacity.get("storage").and_then(quantity) {
        return storage.to_string();
    }

    let mut keys: Vec<&String> = capacity.keys().collect();
    keys.sort_unstable();
    keys.into_iter()
        .find_map(|key| capacity.get(key).and_then(quantity))
        .map(str::to_string)
        .unwrap_or_else(|| ctx.default_value())
}

/// ACCESS MODES: abbreviated, comma-joined
pub(crate) fn access_modes(ctx: &ExtractContext<'_>) -> String {
    let path = ctx.path();
    let candidates: [&[&str]; 3] = [&path, &["spec", "accessModes"], &["status", "accessModes"]];

    candidates
        .iter()
        .find_map(|p| {
            ctx.record
                .nested_str_vec(p)
                .found()
                .filter(|modes| !modes.is_empty())
        })
        .map(|modes| {
            modes
                .into_iter()
                .map(abbreviate_access_mode)
                .collect::<Vec<_>>()
                .join(",")
        })
        .unwrap_or_else(|| ctx.default_value())
}

/// CLAIM: `namespace/name` of the bound claim
pub(crate) fn claim(ctx: &ExtractContext<'_>) -> String {
    let Some(claim_ref) = ctx.at_path() else {
        return NONE.to_string();
    };

    match (
        claim_ref.nested_str(&["namespace"]).found(),
        claim_ref.nested_str(&["name"]).found(),
    ) {
        (Some(namespace), Some(name)) => format!("{namespace}/{name}"),
        (None, Some(name)) => name.to_string(),
        _ => NONE.to_string(),
    }
}

pub(crate) fn allow_volume_expansion(ctx: &ExtractContext<'_>) -> String {
    ctx.record
        .nested_bool(&ctx.path())
        .found()
        .map(|allow| allow.to_string())
        .unwrap_or_else(|| ctx.default_value())
}
