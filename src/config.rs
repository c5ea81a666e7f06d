// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! User defaults for kubectl-wider
//!
//! All kubectl-wider data lives under ~/.kubectl-wider/:
//! - ~/.kubectl-wider/config.json - user defaults
//! - ~/.kubectl-wider/log/ - rotated log files

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the base kubectl-wider directory (~/.kubectl-wider/)
pub fn base_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".kubectl-wider"))
        .context("Could not determine home directory")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Output format used when -o is not given
    #[serde(default)]
    pub default_output: Option<String>,

    /// Omit table headers unless overridden on the command line
    #[serde(default)]
    pub no_headers: bool,
}

impl Config {
    /// Load config from disk, or return default if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Get the config file path (~/.kubectl-wider/config.json)
    pub fn config_path() -> Result<PathBuf> {
        Ok(base_dir()?.join("config.json"))
    }

    /// Output format to use: the flag wins over the configured default
    pub fn output_or_default(&self, flag: Option<&str>) -> String {
        flag.or(self.default_output.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}
