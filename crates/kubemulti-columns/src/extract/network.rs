//! Service, ingress, endpoint, and network policy columns

use serde_json::Value;

use kubemulti_types::ValueExt;

use super::common::join_or_none;
use super::{ExtractContext, NONE, PENDING};
use crate::format::format_label_map;

/// EXTERNAL-IP and ADDRESS: load balancer ingress, then spec.externalIPs
pub(crate) fn external_address(ctx: &ExtractContext<'_>) -> String {
    if let Some(ingress) = ctx
        .record
        .nested_slice(&ctx.path())
        .found()
        .filter(|entries| !entries.is_empty())
    {
        let addresses: Vec<&str> = ingress
            .iter()
            .filter_map(|entry| {
                ["ip", "hostname"]
                    .iter()
                    .filter_map(|key| entry.nested_str(&[*key]).found())
                    .find(|address| !address.is_empty())
            })
            .collect();

        return if addresses.is_empty() {
            PENDING.to_string()
        } else {
            addresses.join(",")
        };
    }

    match ctx.record.nested_str_vec(&["spec", "externalIPs"]).found() {
        Some(ips) if !ips.is_empty() => ips.join(","),
        _ => NONE.to_string(),
    }
}

/// PORT(S): `port[:nodePort]/protocol` per service port
pub(crate) fn service_ports(ctx: &ExtractContext<'_>) -> String {
    let ports = ctx
        .record
        .nested_slice(&ctx.path())
        .found()
        .unwrap_or_default()
        .iter()
        .filter_map(format_service_port)
        .collect();
    join_or_none(ports)
}

fn format_service_port(port: &Value) -> Option<String> {
    let number = port.nested_i64(&["port"]).found()?;
    let protocol = port.nested_str(&["protocol"]).found().unwrap_or("TCP");
    Some(match port.nested_i64(&["nodePort"]).found() {
        Some(node_port) => format!("{number}:{node_port}/{protocol}"),
        None => format!("{number}/{protocol}"),
    })
}

/// HOSTS: non-empty rule hosts
pub(crate) fn ingress_hosts(ctx: &ExtractContext<'_>) -> String {
    let hosts = ctx
        .record
        .nested_slice(&ctx.path())
        .found()
        .unwrap_or_default()
        .iter()
        .filter_map(|rule| rule.nested_str(&["host"]).found())
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .collect();
    join_or_none(hosts)
}

/// PORTS: 80 when any rule routes HTTP paths, 443 when TLS is set
pub(crate) fn ingress_ports(ctx: &ExtractContext<'_>) -> String {
    let rules = ctx.record.nested_slice(&ctx.path()).found().unwrap_or_default();
    let http = rules.iter().any(|rule| {
        rule.nested_slice(&["http", "paths"])
            .found()
            .is_some_and(|paths| !paths.is_empty())
    });
    let tls = ctx
        .record
        .nested_slice(&["spec", "tls"])
        .found()
        .is_some_and(|tls| !tls.is_empty());

    let mut ports = Vec::new();
    if http {
        ports.push("80".to_string());
    }
    if tls {
        ports.push("443".to_string());
    }
    join_or_none(ports)
}

/// ENDPOINTS: every address crossed with every port, per subset
pub(crate) fn endpoints(ctx: &ExtractContext<'_>) -> String {
    let mut endpoints = Vec::new();

    for subset in ctx.record.nested_slice(&ctx.path()).found().unwrap_or_default() {
        let (Some(addresses), Some(ports)) = (
            subset.nested_slice(&["addresses"]).found(),
            subset.nested_slice(&["ports"]).found(),
        ) else {
            continue;
        };

        for ip in addresses.iter().filter_map(|a| a.nested_str(&["ip"]).found()) {
            for port in ports.iter().filter_map(|p| p.nested_i64(&["port"]).found()) {
                endpoints.push(format!("{ip}:{port}"));
            }
        }
    }

    join_or_none(endpoints)
}

/// POD-SELECTOR: match labels of the selector at the column path
pub(crate) fn pod_selector(ctx: &ExtractContext<'_>) -> String {
    let mut path = ctx.path();
    path.push("matchLabels");
    ctx.record
        .nested_map(&path)
        .found()
        .map(format_label_map)
        .unwrap_or_else(|| NONE.to_string())
}

pub(crate) fn policy_types(ctx: &ExtractContext<'_>) -> String {
    let types = ctx
        .record
        .nested_str_vec(&ctx.path())
        .found()
        .unwrap_or_default()
        .into_iter()
        .map(str::to_string)
        .collect();
    join_or_none(types)
}
