// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod columns;
mod json;
mod path;
mod table;
mod yaml;

pub use columns::CustomColumnsFormatter;
pub use json::JsonFormatter;
pub use path::ColumnSpec;
pub use table::TableFormatter;
pub use yaml::YamlFormatter;

use std::str::FromStr;

use crate::error::Error;
use crate::wider::PodWithWider;

pub const CUSTOM_COLUMNS_PREFIX: &str = "custom-columns=";

/// Placeholder for a cell with no value
pub const NONE: &str = "<none>";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Default,
    Json,
    Yaml,
    CustomColumns(Vec<ColumnSpec>),
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(OutputFormat::Default),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => match s.strip_prefix(CUSTOM_COLUMNS_PREFIX) {
                Some(spec) => Ok(OutputFormat::CustomColumns(ColumnSpec::parse_list(spec)?)),
                None => Err(Error::validation(format!(
                    "unsupported output format: {} (supported: json, yaml, custom-columns=...)",
                    s
                ))),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub no_headers: bool,
    /// Prefix the default table with a NAMESPACE column
    pub show_namespace: bool,
}

pub fn render(
    records: &[PodWithWider<'_>],
    format: &OutputFormat,
    options: &RenderOptions,
) -> Result<String, Error> {
    match format {
        OutputFormat::Default => Ok(TableFormatter::format(records, options)),
        OutputFormat::Json => JsonFormatter::format(records),
        OutputFormat::Yaml => YamlFormatter::format(records),
        OutputFormat::CustomColumns(columns) => {
            Ok(CustomColumnsFormatter::format(records, columns, options))
        }
    }
}
