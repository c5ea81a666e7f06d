// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod cli;
pub mod config;
mod error;
#[cfg(test)]
mod fixtures;
mod kubernetes;
mod output;
pub mod progress;
mod wider;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::prelude::*;

use cli::Args;
use kubernetes::{KubeClusterApi, Scope};
use wider::WiderOptions;

/// Initialize logging with file output and optional stderr
fn init_logging(verbose: bool) {
    use tracing_rolling_file::{RollingConditionBase, RollingFileAppenderBase};
    use tracing_subscriber::fmt::format::FmtSpan;

    let log_dir = config::base_dir()
        .map(|p| p.join("log"))
        .unwrap_or_else(|_| std::path::PathBuf::from("."));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        return;
    }

    // Rotate daily or at 10MB, keep 5 files
    let log_path = log_dir.join("kubectl-wider.log");
    let condition = RollingConditionBase::new()
        .daily()
        .max_size(10 * 1024 * 1024);

    let file_appender = match RollingFileAppenderBase::new(log_path, condition, 5) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {}", e);
            return;
        }
    };

    let (non_blocking, _guard) = file_appender.get_non_blocking_appender();
    // Leak the guard to keep the background writer alive
    std::mem::forget(_guard);

    let filter = if verbose {
        "kubectl_wider=debug"
    } else {
        "kubectl_wider=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE);

    if verbose {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::NONE);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(stderr_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // kube builds its TLS stack on rustls; an already installed provider is fine
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();
    init_logging(args.verbose);

    let user_config = match config::Config::config_path() {
        Ok(path) => config::Config::load_from(&path)?,
        Err(e) => {
            warn!(error = %e, "No home directory, using default config");
            config::Config::default()
        }
    };

    // Reject a bad -o before touching the kubeconfig or the cluster
    let options = WiderOptions::new(
        args.selector.clone(),
        user_config.output_or_default(args.output.as_deref()),
        args.no_headers || user_config.no_headers,
    )?;

    let api = KubeClusterApi::connect(args.kubeconfig.as_deref(), args.context.as_deref()).await?;

    let scope = if args.all_namespaces {
        Scope::AllNamespaces
    } else {
        Scope::Namespace(
            args.namespace
                .clone()
                .unwrap_or_else(|| api.default_namespace().to_string()),
        )
    };
    debug!(scope = %scope, output = %options.output, "Resolved request");

    let spinner = progress::spinner_for("Connecting to Kubernetes...", args.verbose);
    let result = wider::run(&api, &scope, &options, &spinner).await;
    spinner.finish_and_clear();

    let output = result?;
    if output.pod_count == 0 {
        match &scope {
            Scope::Namespace(ns) => eprintln!("No resources found in {} namespace.", ns),
            Scope::AllNamespaces => eprintln!("No resources found"),
        }
    }
    if !output.text.is_empty() {
        println!("{}", output.text);
    }

    Ok(())
}
