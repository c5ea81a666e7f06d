// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Join pods with their node, service account and claims
//!
//! Lookups go through the bulk-list indexes first. A service account or claim
//! missing from its index is fetched directly; if that fails too the field is
//! left empty and the pod is still emitted.

use k8s_openapi::api::core::v1::{Node, PersistentVolumeClaim, Pod, ServiceAccount};
use kube::ResourceExt;
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, warn};

use crate::kubernetes::{ClusterApi, ResourceIndex};

/// A pod joined with the resources it references
///
/// Indexed resources are borrowed from the bulk lists; resources that had to
/// be fetched individually are owned.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodWithWider<'a> {
    pub pod: &'a Pod,
    pub node: Option<&'a Node>,
    pub service_account: Option<Cow<'a, ServiceAccount>>,
    pub pvcs: Vec<Cow<'a, PersistentVolumeClaim>>,
}

/// Claim names referenced by the pod's volumes, in declaration order
pub fn claim_names(pod: &Pod) -> impl Iterator<Item = &str> {
    pod.spec
        .iter()
        .flat_map(|spec| spec.volumes.iter().flatten())
        .filter_map(|vol| vol.persistent_volume_claim.as_ref())
        .map(|claim| claim.claim_name.as_str())
}

/// Service account named by the pod spec, if any
pub fn service_account_name(pod: &Pod) -> Option<&str> {
    pod.spec
        .as_ref()
        .and_then(|spec| spec.service_account_name.as_deref())
        .filter(|name| !name.is_empty())
}

/// Node the pod is scheduled on, if any
pub fn node_name(pod: &Pod) -> Option<&str> {
    pod.spec
        .as_ref()
        .and_then(|spec| spec.node_name.as_deref())
        .filter(|name| !name.is_empty())
}

/// Build one record per pod, in pod order
///
/// `service_accounts` / `pvcs` are `None` when the output never shows them;
/// no lookup or fallback fetch happens for that kind then.
pub async fn correlate<'a>(
    api: &dyn ClusterApi,
    pods: &'a [Pod],
    nodes: &ResourceIndex<'a, Node>,
    service_accounts: Option<&ResourceIndex<'a, ServiceAccount>>,
    pvcs: Option<&ResourceIndex<'a, PersistentVolumeClaim>>,
) -> Vec<PodWithWider<'a>> {
    let mut records = Vec::with_capacity(pods.len());

    for pod in pods {
        let namespace = pod.namespace().unwrap_or_default();

        let node = node_name(pod).and_then(|name| nodes.get(name));

        let service_account = match (service_accounts, service_account_name(pod)) {
            (Some(index), Some(name)) => resolve_service_account(api, index, &namespace, name).await,
            _ => None,
        };

        let mut claims = Vec::new();
        if let Some(index) = pvcs {
            for claim in claim_names(pod) {
                if let Some(found) = resolve_pvc(api, index, &namespace, claim).await {
                    claims.push(found);
                }
            }
        }

        records.push(PodWithWider {
            pod,
            node,
            service_account,
            pvcs: claims,
        });
    }

    records
}

async fn resolve_service_account<'a>(
    api: &dyn ClusterApi,
    index: &ResourceIndex<'a, ServiceAccount>,
    namespace: &str,
    name: &str,
) -> Option<Cow<'a, ServiceAccount>> {
    if let Some(sa) = index.get_namespaced(namespace, name) {
        return Some(Cow::Borrowed(sa));
    }

    match api.get_service_account(namespace, name).await {
        Ok(Some(sa)) => {
            debug!(namespace = %namespace, name = %name, "Service account fetched directly");
            Some(Cow::Owned(sa))
        }
        Ok(None) => {
            debug!(namespace = %namespace, name = %name, "Service account not found");
            None
        }
        Err(e) => {
            warn!(namespace = %namespace, name = %name, error = %e, "Failed to fetch service account");
            None
        }
    }
}

async fn resolve_pvc<'a>(
    api: &dyn ClusterApi,
    index: &ResourceIndex<'a, PersistentVolumeClaim>,
    namespace: &str,
    claim: &str,
) -> Option<Cow<'a, PersistentVolumeClaim>> {
    if let Some(pvc) = index.get_namespaced(namespace, claim) {
        return Some(Cow::Borrowed(pvc));
    }

    match api.get_pvc(namespace, claim).await {
        Ok(Some(pvc)) => {
            debug!(namespace = %namespace, claim = %claim, "PVC fetched directly");
            Some(Cow::Owned(pvc))
        }
        Ok(None) => {
            debug!(namespace = %namespace, claim = %claim, "PVC not found");
            None
        }
        Err(e) => {
            warn!(namespace = %namespace, claim = %claim, error = %e, "Failed to fetch PVC");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fixtures::{api_error, node, pod, pvc, service_account};
    use crate::kubernetes::MockClusterApi;
    use mockall::predicate::eq;

    fn pvc_names(record: &PodWithWider<'_>) -> Vec<String> {
        record.pvcs.iter().map(|p| p.name_any()).collect()
    }

    #[tokio::test]
    async fn test_node_joined_by_name() {
        let api = MockClusterApi::new();
        let pods = vec![pod("default", "web-1").node("node-a").build()];
        let nodes = vec![node("node-a", &[]), node("node-b", &[])];
        let node_index = ResourceIndex::by_name(&nodes);

        let records = correlate(&api, &pods, &node_index, None, None).await;

        assert_eq!(records.len(), 1);
        assert!(std::ptr::eq(records[0].node.unwrap(), &nodes[0]));
    }

    #[tokio::test]
    async fn test_unscheduled_and_deleted_nodes_are_empty() {
        let api = MockClusterApi::new();
        let pods = vec![
            pod("default", "pending").build(),
            pod("default", "blank").node("").build(),
            pod("default", "orphan").node("node-gone").build(),
        ];
        let nodes = vec![node("node-a", &[])];
        let node_index = ResourceIndex::by_name(&nodes);

        let records = correlate(&api, &pods, &node_index, None, None).await;

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.node.is_none()));
    }

    #[tokio::test]
    async fn test_pod_order_preserved() {
        let api = MockClusterApi::new();
        let pods = vec![
            pod("b", "zeta").build(),
            pod("a", "alpha").build(),
            pod("c", "mid").build(),
        ];
        let nodes: Vec<Node> = Vec::new();
        let node_index = ResourceIndex::by_name(&nodes);

        let records = correlate(&api, &pods, &node_index, None, None).await;
        let names: Vec<String> = records.iter().map(|r| r.pod.name_any()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[tokio::test]
    async fn test_unrequested_kinds_are_never_fetched() {
        // No expectations: any fallback call would panic
        let api = MockClusterApi::new();
        let pods = vec![
            pod("default", "db-0")
                .service_account("db")
                .claim("data", "data-db-0")
                .build(),
        ];
        let nodes: Vec<Node> = Vec::new();
        let node_index = ResourceIndex::by_name(&nodes);

        let records = correlate(&api, &pods, &node_index, None, None).await;

        assert!(records[0].service_account.is_none());
        assert!(records[0].pvcs.is_empty());
    }

    #[tokio::test]
    async fn test_service_account_from_index() {
        let api = MockClusterApi::new();
        let pods = vec![pod("default", "web-1").service_account("web").build()];
        let nodes: Vec<Node> = Vec::new();
        let sas = vec![service_account("default", "web"), service_account("other", "web")];
        let node_index = ResourceIndex::by_name(&nodes);
        let sa_index = ResourceIndex::by_namespaced_name(&sas);

        let records = correlate(&api, &pods, &node_index, Some(&sa_index), None).await;

        let sa = records[0].service_account.as_ref().unwrap();
        assert!(matches!(sa, Cow::Borrowed(_)));
        assert_eq!(sa.namespace().as_deref(), Some("default"));
    }

    #[tokio::test]
    async fn test_pod_without_service_account_skips_lookup() {
        let api = MockClusterApi::new();
        let pods = vec![pod("default", "web-1").build()];
        let nodes: Vec<Node> = Vec::new();
        let sas: Vec<ServiceAccount> = Vec::new();
        let node_index = ResourceIndex::by_name(&nodes);
        let sa_index = ResourceIndex::by_namespaced_name(&sas);

        let records = correlate(&api, &pods, &node_index, Some(&sa_index), None).await;
        assert!(records[0].service_account.is_none());
    }

    #[tokio::test]
    async fn test_service_account_fallback_fetch() {
        let mut api = MockClusterApi::new();
        api.expect_get_service_account()
            .with(eq("team-b"), eq("builder"))
            .times(1)
            .returning(|ns, name| Ok(Some(service_account(ns, name))));

        let pods = vec![pod("team-b", "build-1").service_account("builder").build()];
        let nodes: Vec<Node> = Vec::new();
        let sas = vec![service_account("team-a", "builder")];
        let node_index = ResourceIndex::by_name(&nodes);
        let sa_index = ResourceIndex::by_namespaced_name(&sas);

        let records = correlate(&api, &pods, &node_index, Some(&sa_index), None).await;

        let sa = records[0].service_account.as_ref().unwrap();
        assert!(matches!(sa, Cow::Owned(_)));
        assert_eq!(sa.namespace().as_deref(), Some("team-b"));
    }

    #[tokio::test]
    async fn test_service_account_fetch_failure_is_not_fatal() {
        let mut api = MockClusterApi::new();
        api.expect_get_service_account()
            .times(1)
            .returning(|_, _| Err(Error::Kube(api_error(403, "Forbidden"))));

        let pods = vec![
            pod("default", "web-1").service_account("web").build(),
            pod("default", "web-2").build(),
        ];
        let nodes: Vec<Node> = Vec::new();
        let sas: Vec<ServiceAccount> = Vec::new();
        let node_index = ResourceIndex::by_name(&nodes);
        let sa_index = ResourceIndex::by_namespaced_name(&sas);

        let records = correlate(&api, &pods, &node_index, Some(&sa_index), None).await;

        assert_eq!(records.len(), 2);
        assert!(records[0].service_account.is_none());
    }

    #[tokio::test]
    async fn test_pvcs_follow_volume_order() {
        let api = MockClusterApi::new();
        let pods = vec![
            pod("default", "db-0")
                .claim("logs", "logs-db-0")
                .empty_dir("scratch")
                .claim("data", "data-db-0")
                .build(),
        ];
        let nodes: Vec<Node> = Vec::new();
        let claims = vec![pvc("default", "data-db-0"), pvc("default", "logs-db-0")];
        let node_index = ResourceIndex::by_name(&nodes);
        let pvc_index = ResourceIndex::by_namespaced_name(&claims);

        let records = correlate(&api, &pods, &node_index, None, Some(&pvc_index)).await;

        assert_eq!(pvc_names(&records[0]), vec!["logs-db-0", "data-db-0"]);
    }

    #[tokio::test]
    async fn test_pvc_fallback_keeps_volume_position() {
        // data-db-0 lives outside the bulk list's namespace scope
        let mut api = MockClusterApi::new();
        api.expect_get_pvc()
            .with(eq("prod"), eq("data-db-0"))
            .times(1)
            .returning(|ns, name| Ok(Some(pvc(ns, name))));

        let pods = vec![
            pod("prod", "db-0")
                .claim("logs", "logs-db-0")
                .claim("data", "data-db-0")
                .claim("wal", "wal-db-0")
                .build(),
        ];
        let nodes: Vec<Node> = Vec::new();
        let claims = vec![pvc("prod", "logs-db-0"), pvc("prod", "wal-db-0")];
        let node_index = ResourceIndex::by_name(&nodes);
        let pvc_index = ResourceIndex::by_namespaced_name(&claims);

        let records = correlate(&api, &pods, &node_index, None, Some(&pvc_index)).await;

        assert_eq!(
            pvc_names(&records[0]),
            vec!["logs-db-0", "data-db-0", "wal-db-0"]
        );
        assert!(matches!(records[0].pvcs[1], Cow::Owned(_)));
    }

    #[tokio::test]
    async fn test_missing_pvcs_leave_no_gaps() {
        let mut api = MockClusterApi::new();
        api.expect_get_pvc()
            .with(eq("default"), eq("gone"))
            .returning(|_, _| Ok(None));
        api.expect_get_pvc()
            .with(eq("default"), eq("denied"))
            .returning(|_, _| Err(Error::Kube(api_error(403, "Forbidden"))));

        let pods = vec![
            pod("default", "app")
                .claim("a", "gone")
                .claim("b", "kept")
                .claim("c", "denied")
                .build(),
        ];
        let nodes: Vec<Node> = Vec::new();
        let claims = vec![pvc("default", "kept")];
        let node_index = ResourceIndex::by_name(&nodes);
        let pvc_index = ResourceIndex::by_namespaced_name(&claims);

        let records = correlate(&api, &pods, &node_index, None, Some(&pvc_index)).await;

        assert_eq!(pvc_names(&records[0]), vec!["kept"]);
    }

    #[test]
    fn test_claim_names_skip_other_volumes() {
        let p = pod("default", "app")
            .empty_dir("tmp")
            .claim("data", "data-0")
            .build();
        assert_eq!(claim_names(&p).collect::<Vec<_>>(), vec!["data-0"]);
    }

    #[test]
    fn test_serialized_field_names() {
        let p = pod("default", "web-1").build();
        let record = PodWithWider {
            pod: &p,
            node: None,
            service_account: None,
            pvcs: Vec::new(),
        };
        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert!(keys.contains(&"pod"));
        assert!(keys.contains(&"node"));
        assert!(keys.contains(&"serviceAccount"));
        assert!(keys.contains(&"pvcs"));
        assert!(value["node"].is_null());
    }
}
