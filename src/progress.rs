// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Spinner shown on stderr while cluster calls are in flight

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

/// Create a spinner with consistent styling
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Spinner for interactive use, hidden when stderr is not a terminal or
/// when verbose logs go to stderr
pub fn spinner_for(msg: &str, verbose: bool) -> ProgressBar {
    if verbose || !std::io::stderr().is_terminal() {
        ProgressBar::hidden()
    } else {
        create_spinner(msg)
    }
}
