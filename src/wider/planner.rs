// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Decide which optional resource kinds have to be listed
//!
//! Nodes are always listed. Service accounts and PVCs cost one extra bulk list
//! each, so they are only fetched when the output can show them: structured
//! output (json/yaml) always can, custom columns only when a path mentions
//! them. Detection is a plain substring scan over the raw format string.

/// Path fragments that reach the service account root
const SERVICE_ACCOUNT_MARKERS: &[&str] = &[".sa", ".serviceAccount"];

/// Path fragments that reach the PVC root (`.pvc` also covers `.pvcs`)
const PVC_MARKERS: &[&str] = &[".pvc", ".pvcs"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DependencyNeeds {
    pub service_account: bool,
    pub pvc: bool,
}

impl DependencyNeeds {
    pub fn plan(output: &str) -> Self {
        if output == "json" || output == "yaml" {
            return Self {
                service_account: true,
                pvc: true,
            };
        }

        Self {
            service_account: SERVICE_ACCOUNT_MARKERS.iter().any(|m| output.contains(m)),
            pvc: PVC_MARKERS.iter().any(|m| output.contains(m)),
        }
    }
}
