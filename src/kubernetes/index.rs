// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Lookup tables over bulk-listed resources
//!
//! Cluster-scoped resources (nodes) are keyed by name, namespaced resources by
//! `namespace/name`. The index borrows from the list it was built from and is
//! never modified afterwards.

use kube::ResourceExt;
use std::collections::HashMap;

/// Build the `namespace/name` key used for namespaced lookups
pub fn namespaced_key(namespace: &str, name: &str) -> String {
    format!("{}/{}", namespace, name)
}

#[derive(Debug)]
pub struct ResourceIndex<'a, K> {
    items: HashMap<String, &'a K>,
}

impl<'a, K: ResourceExt> ResourceIndex<'a, K> {
    /// Index cluster-scoped resources by name
    pub fn by_name(items: &'a [K]) -> Self {
        Self {
            items: items.iter().map(|item| (item.name_any(), item)).collect(),
        }
    }

    /// Index namespaced resources by `namespace/name`
    pub fn by_namespaced_name(items: &'a [K]) -> Self {
        Self {
            items: items
                .iter()
                .map(|item| {
                    let ns = item.namespace().unwrap_or_default();
                    (namespaced_key(&ns, &item.name_any()), item)
                })
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&'a K> {
        self.items.get(key).copied()
    }

    pub fn get_namespaced(&self, namespace: &str, name: &str) -> Option<&'a K> {
        self.get(&namespaced_key(namespace, name))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
