// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for kubectl-wider
//!
//! Only fatal conditions are represented here. A related resource that cannot
//! be fetched for a single pod, or a custom column path that matches nothing,
//! is not an error and never reaches this type.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Kubeconfig could not be loaded or the client could not be built
    #[error("configuration error: {0}")]
    Config(String),

    /// Rejected user input (output format, custom columns)
    #[error("{0}")]
    Validation(String),

    /// A bulk list call failed; there is nothing to enrich without it
    #[error("failed to list {kind}: {source}")]
    List {
        kind: &'static str,
        #[source]
        source: kube::Error,
    },

    /// Kubernetes API error
    #[error("kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// JSON/YAML rendering failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Wrap a list failure with the resource kind that was being listed
    pub fn list(kind: &'static str) -> impl FnOnce(kube::Error) -> Self {
        move |source| Self::List { kind, source }
    }
}
