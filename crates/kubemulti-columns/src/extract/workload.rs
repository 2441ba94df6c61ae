//! Pod, controller, and node columns

use kubemulti_types::{ValueExt, as_integer};

use super::common::{ago, timestamp_at};
use super::{ExtractContext, NONE, UNKNOWN};
use crate::format::{human_duration, node_role, node_status};

/// READY: container readiness for pods, replica readiness for controllers
pub(crate) fn ready(ctx: &ExtractContext<'_>) -> String {
    let path = ctx.path();
    match path.last() {
        Some(&"containerStatuses") => {
            let Some(statuses) = ctx.record.nested_slice(&path).found() else {
                return "0/0".to_string();
            };
            let ready = statuses
                .iter()
                .filter(|s| s.nested_bool(&["ready"]).found() == Some(true))
                .count();
            format!("{ready}/{}", statuses.len())
        }
        Some(&"readyReplicas") => {
            let ready = ctx.record.nested_i64(&path).found().unwrap_or(0);
            let desired = ctx.record.nested_i64(&["spec", "replicas"]).found().unwrap_or(0);
            format!("{ready}/{desired}")
        }
        _ => ctx
            .at_path()
            .and_then(as_integer)
            .map(|n| n.to_string())
            .unwrap_or_else(|| ctx.default_value()),
    }
}

/// STATUS: node readiness for a conditions path, plain phase otherwise
pub(crate) fn status(ctx: &ExtractContext<'_>) -> String {
    let path = ctx.path();
    if path.last() == Some(&"conditions") {
        let mut status = node_status(ctx.record).to_string();
        if ctx.record.nested_bool(&["spec", "unschedulable"]).found() == Some(true) {
            status.push_str(",SchedulingDisabled");
        }
        return status;
    }

    ctx.record
        .nested_str(&path)
        .found()
        .map(str::to_string)
        .unwrap_or_else(|| ctx.default_value())
}

/// RESTARTS: summed restart counts across container statuses
///
/// The sum saturates; counts come from the record and are not trusted.
pub(crate) fn restarts(ctx: &ExtractContext<'_>) -> String {
    ctx.record
        .nested_slice(&ctx.path())
        .found()
        .unwrap_or_default()
        .iter()
        .filter_map(|s| s.nested_i64(&["restartCount"]).found())
        .fold(0i64, i64::saturating_add)
        .to_string()
}

/// COMPLETIONS: succeeded over desired completions
pub(crate) fn completions(ctx: &ExtractContext<'_>) -> String {
    let Some(succeeded) = ctx.record.nested_i64(&["status", "succeeded"]).found() else {
        return ctx.default_value();
    };
    let completions = ctx
        .record
        .nested_i64(&["spec", "completions"])
        .found()
        .unwrap_or(1);
    format!("{succeeded}/{completions}")
}

/// DURATION: start to completion, or start to now while running
pub(crate) fn duration(ctx: &ExtractContext<'_>) -> String {
    let Some(start) = timestamp_at(ctx.record, &ctx.path()) else {
        return UNKNOWN.to_string();
    };

    let end = if ctx
        .record
        .lookup(&["status", "completionTime"])
        .is_missing()
    {
        ctx.now
    } else {
        match timestamp_at(ctx.record, &["status", "completionTime"]) {
            Some(end) => end,
            None => return UNKNOWN.to_string(),
        }
    };

    human_duration(end - start)
}

/// SUSPEND: kubectl-capitalised boolean
pub(crate) fn suspend(ctx: &ExtractContext<'_>) -> String {
    match ctx.record.nested_bool(&ctx.path()).found() {
        Some(true) => "True".to_string(),
        Some(false) => "False".to_string(),
        None => ctx.default_value(),
    }
}

pub(crate) fn last_schedule(ctx: &ExtractContext<'_>) -> String {
    timestamp_at(ctx.record, &ctx.path())
        .map(|t| ago(t, ctx.now))
        .unwrap_or_else(|| NONE.to_string())
}

pub(crate) fn roles(ctx: &ExtractContext<'_>) -> String {
    node_role(ctx.record)
}
