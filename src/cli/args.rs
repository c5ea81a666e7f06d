// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use clap::Parser;
use std::path::PathBuf;

const AFTER_HELP: &str = r#"Examples:
  # List pods with node info in current namespace
  kubectl wider

  # List pods in a specific namespace, or in all namespaces
  kubectl wider -n kube-system
  kubectl wider -A

  # Filter with a label selector
  kubectl wider -l app=myapp
  kubectl wider -n default -l environment=production,tier=frontend

  # Custom columns (escape dots inside label keys with a backslash)
  kubectl wider -o custom-columns='NAME:.pod.metadata.name,NODE:.node.metadata.name,OS:.node.metadata.labels.kubernetes\.io/os'

  # Structured output, including service accounts and PVCs
  kubectl wider -o json
  kubectl wider -o yaml"#;

#[derive(Parser, Debug)]
#[command(name = "kubectl-wider")]
#[command(
    author,
    version,
    about = "Get pods with extended node, service account and PVC information",
    after_help = AFTER_HELP
)]
pub struct Args {
    /// Kubeconfig context to query (defaults to the current context)
    #[arg(long, value_name = "CONTEXT")]
    pub context: Option<String>,

    /// Path to the kubeconfig file (defaults to $KUBECONFIG or ~/.kube/config)
    #[arg(long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Namespace to query (defaults to the context namespace)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Query all namespaces
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// Output format. One of: json, yaml, custom-columns=<HEADER>:<PATH>[,...]
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<String>,

    /// Label selector to filter pods on, supports '=', '==' and '!=' (e.g. -l key1=value1,key2=value2)
    #[arg(short = 'l', long, default_value = "")]
    pub selector: String,

    /// Omit column headers in table output
    #[arg(long)]
    pub no_headers: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
