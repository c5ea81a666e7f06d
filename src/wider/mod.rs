// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! One kubectl-wider invocation
//!
//! Order of work: validate the output format, decide which kinds are needed,
//! run the bulk lists (any failure aborts), index them, correlate pods and
//! render. Nothing is written until the whole output string is ready.

mod correlate;
mod planner;

pub use correlate::{PodWithWider, claim_names, correlate, node_name, service_account_name};
pub use planner::DependencyNeeds;

use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::error::Error;
use crate::kubernetes::{ClusterApi, ResourceIndex, Scope};
use crate::output::{self, OutputFormat, RenderOptions};

/// Validated request for one run
#[derive(Debug, Clone)]
pub struct WiderOptions {
    pub label_selector: String,
    /// Raw `-o` value, kept for dependency planning
    pub output: String,
    pub format: OutputFormat,
    pub no_headers: bool,
}

impl WiderOptions {
    /// Validate the output format; fails before any cluster call is possible
    pub fn new(
        label_selector: impl Into<String>,
        output: impl Into<String>,
        no_headers: bool,
    ) -> Result<Self, Error> {
        let output = output.into();
        let format = output.parse::<OutputFormat>()?;
        Ok(Self {
            label_selector: label_selector.into(),
            output,
            format,
            no_headers,
        })
    }

    pub fn needs(&self) -> DependencyNeeds {
        DependencyNeeds::plan(&self.output)
    }

    fn render_options(&self, scope: &Scope) -> RenderOptions {
        RenderOptions {
            no_headers: self.no_headers,
            show_namespace: scope.is_all(),
        }
    }
}

/// Summary of a run alongside the rendered text
#[derive(Debug)]
pub struct WiderOutput {
    pub text: String,
    pub pod_count: usize,
}

pub async fn run(
    api: &dyn ClusterApi,
    scope: &Scope,
    options: &WiderOptions,
    progress: &ProgressBar,
) -> Result<WiderOutput, Error> {
    let needs = options.needs();
    debug!(
        scope = %scope,
        selector = %options.label_selector,
        needs_service_account = needs.service_account,
        needs_pvc = needs.pvc,
        "Planned dependencies"
    );

    progress.set_message("Listing pods...");
    let pods = api
        .list_pods(scope, &options.label_selector)
        .await?;

    progress.set_message("Listing nodes...");
    let nodes = api.list_nodes().await?;

    let service_accounts = if needs.service_account {
        progress.set_message("Listing service accounts...");
        Some(api.list_service_accounts(scope).await?)
    } else {
        None
    };

    let pvcs = if needs.pvc {
        progress.set_message("Listing persistent volume claims...");
        Some(api.list_pvcs(scope).await?)
    } else {
        None
    };

    let node_index = ResourceIndex::by_name(&nodes);
    let sa_index = service_accounts
        .as_deref()
        .map(ResourceIndex::by_namespaced_name);
    let pvc_index = pvcs.as_deref().map(ResourceIndex::by_namespaced_name);

    progress.set_message(format!("Correlating {} pods...", pods.len()));
    let records = correlate(
        api,
        &pods,
        &node_index,
        sa_index.as_ref(),
        pvc_index.as_ref(),
    )
    .await;

    let text = output::render(&records, &options.format, &options.render_options(scope))?;

    info!(
        pods = pods.len(),
        nodes = node_index.len(),
        service_accounts = sa_index.as_ref().map(|i| i.len()),
        pvcs = pvc_index.as_ref().map(|i| i.len()),
        "Rendered wider output"
    );

    Ok(WiderOutput {
        text,
        pod_count: pods.len(),
    })
}
