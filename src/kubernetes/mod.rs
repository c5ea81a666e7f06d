// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod client;
mod index;

pub use client::{ClusterApi, KubeClusterApi};
#[cfg(test)]
pub use client::MockClusterApi;
pub use index::ResourceIndex;

/// Namespace scope for namespaced list calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Namespace(String),
    AllNamespaces,
}

impl Scope {
    pub fn is_all(&self) -> bool {
        matches!(self, Scope::AllNamespaces)
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Namespace(ns) => write!(f, "{}", ns),
            Scope::AllNamespaces => write!(f, "*"),
        }
    }
}
