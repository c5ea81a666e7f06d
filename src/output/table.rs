use comfy_table::{Table, presets::NOTHING};
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::ResourceExt;

use super::{NONE, RenderOptions};
use crate::wider::{PodWithWider, claim_names, node_name, service_account_name};

/// Gap between columns, same as kubectl
const COLUMN_GAP: u16 = 3;

const ZONE_LABEL: &str = "topology.kubernetes.io/zone";
const INSTANCE_TYPE_LABEL: &str = "node.kubernetes.io/instance-type";

const DEFAULT_COLUMNS: &[&str] = &[
    "NAME",
    "READY",
    "STATUS",
    "RESTARTS",
    "IP",
    "NODE",
    "ZONE",
    "INSTANCE-TYPE",
    "SERVICE-ACCOUNT",
    "PVCS",
];

/// Lay out rows as a borderless, whitespace aligned table
///
/// Returns an empty string when there are no rows. Trailing padding is
/// trimmed from every line.
pub(super) fn tabulate(headers: &[&str], rows: Vec<Vec<String>>, no_headers: bool) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);

    if !no_headers {
        table.set_header(headers.to_vec());
    }
    for row in rows {
        table.add_row(row);
    }
    for column in table.column_iter_mut() {
        column.set_padding((0, COLUMN_GAP));
    }

    table
        .to_string()
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn or_none(value: Option<impl Into<String>>) -> String {
    value.map(Into::into).unwrap_or_else(|| NONE.to_string())
}

fn node_label(node: Option<&Node>, key: &str) -> String {
    or_none(node.and_then(|n| n.labels().get(key).cloned()))
}

fn ready(pod: &Pod) -> String {
    let statuses = pod
        .status
        .as_ref()
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or_default();
    let total = pod
        .spec
        .as_ref()
        .map(|s| s.containers.len())
        .filter(|n| *n > 0)
        .unwrap_or(statuses.len());
    let ready = statuses.iter().filter(|c| c.ready).count();
    format!("{}/{}", ready, total)
}

fn phase(pod: &Pod) -> String {
    if pod.metadata.deletion_timestamp.is_some() {
        return "Terminating".to_string();
    }
    let status = pod.status.as_ref();
    status
        .and_then(|s| s.reason.clone())
        .or_else(|| status.and_then(|s| s.phase.clone()))
        .unwrap_or_else(|| "Unknown".to_string())
}

fn restarts(pod: &Pod) -> String {
    pod.status
        .as_ref()
        .and_then(|s| s.container_statuses.as_ref())
        .map(|cs| cs.iter().map(|c| c.restart_count).sum::<i32>())
        .unwrap_or(0)
        .to_string()
}

/// Fixed column view
///
/// SERVICE-ACCOUNT and PVCS are taken from the pod spec, so this view never
/// needs the enriched objects.
pub struct TableFormatter;

impl TableFormatter {
    pub fn format(records: &[PodWithWider<'_>], options: &RenderOptions) -> String {
        let mut headers = Vec::with_capacity(DEFAULT_COLUMNS.len() + 1);
        if options.show_namespace {
            headers.push("NAMESPACE");
        }
        headers.extend_from_slice(DEFAULT_COLUMNS);

        let rows = records
            .iter()
            .map(|record| {
                let pod = record.pod;
                let mut row = Vec::with_capacity(headers.len());
                if options.show_namespace {
                    row.push(pod.namespace().unwrap_or_default());
                }
                let claims: Vec<&str> = claim_names(pod).collect();
                row.extend([
                    pod.name_any(),
                    ready(pod),
                    phase(pod),
                    restarts(pod),
                    or_none(pod.status.as_ref().and_then(|s| s.pod_ip.clone())),
                    or_none(node_name(pod)),
                    node_label(record.node, ZONE_LABEL),
                    node_label(record.node, INSTANCE_TYPE_LABEL),
                    or_none(service_account_name(pod)),
                    or_none((!claims.is_empty()).then(|| claims.join(","))),
                ]);
                row
            })
            .collect();

        tabulate(&headers, rows, options.no_headers)
    }
}
