// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Resource builders shared by unit tests

use k8s_openapi::api::core::v1::{
    ContainerStatus, EmptyDirVolumeSource, Node, PersistentVolumeClaim,
    PersistentVolumeClaimSpec, PersistentVolumeClaimVolumeSource, Pod, PodSpec, PodStatus,
    ServiceAccount, Volume,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

fn meta(namespace: Option<&str>, name: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: namespace.map(String::from),
        ..Default::default()
    }
}

pub struct PodBuilder {
    pod: Pod,
}

pub fn pod(namespace: &str, name: &str) -> PodBuilder {
    PodBuilder {
        pod: Pod {
            metadata: meta(Some(namespace), name),
            spec: Some(PodSpec::default()),
            ..Default::default()
        },
    }
}

impl PodBuilder {
    fn spec(&mut self) -> &mut PodSpec {
        self.pod.spec.get_or_insert_with(Default::default)
    }

    pub fn node(mut self, node: &str) -> Self {
        self.spec().node_name = Some(node.to_string());
        self
    }

    pub fn service_account(mut self, name: &str) -> Self {
        self.spec().service_account_name = Some(name.to_string());
        self
    }

    pub fn claim(mut self, volume: &str, claim: &str) -> Self {
        self.spec()
            .volumes
            .get_or_insert_with(Vec::new)
            .push(Volume {
                name: volume.to_string(),
                persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                    claim_name: claim.to_string(),
                    read_only: None,
                }),
                ..Default::default()
            });
        self
    }

    pub fn empty_dir(mut self, volume: &str) -> Self {
        self.spec()
            .volumes
            .get_or_insert_with(Vec::new)
            .push(Volume {
                name: volume.to_string(),
                empty_dir: Some(EmptyDirVolumeSource::default()),
                ..Default::default()
            });
        self
    }

    pub fn label(mut self, key: &str, value: &str) -> Self {
        self.pod
            .metadata
            .labels
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Set phase, pod IP and one container per `(ready, restarts)` entry
    pub fn running(mut self, ip: &str, containers: &[(bool, i32)]) -> Self {
        let statuses = containers
            .iter()
            .enumerate()
            .map(|(i, (ready, restarts))| ContainerStatus {
                name: format!("c{}", i),
                ready: *ready,
                restart_count: *restarts,
                ..Default::default()
            })
            .collect();
        self.pod.status = Some(PodStatus {
            phase: Some("Running".to_string()),
            pod_ip: Some(ip.to_string()),
            container_statuses: Some(statuses),
            ..Default::default()
        });
        self
    }

    pub fn build(self) -> Pod {
        self.pod
    }
}

pub fn node(name: &str, labels: &[(&str, &str)]) -> Node {
    let mut metadata = meta(None, name);
    if !labels.is_empty() {
        metadata.labels = Some(
            labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
    }
    Node {
        metadata,
        ..Default::default()
    }
}

pub fn service_account(namespace: &str, name: &str) -> ServiceAccount {
    ServiceAccount {
        metadata: meta(Some(namespace), name),
        ..Default::default()
    }
}

pub fn pvc(namespace: &str, name: &str) -> PersistentVolumeClaim {
    PersistentVolumeClaim {
        metadata: meta(Some(namespace), name),
        spec: Some(PersistentVolumeClaimSpec {
            storage_class_name: Some("standard".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn api_error(code: u16, reason: &str) -> kube::Error {
    kube::Error::Api(kube::error::ErrorResponse {
        status: "Failure".to_string(),
        message: format!("{} from test", reason),
        reason: reason.to_string(),
        code,
    })
}
