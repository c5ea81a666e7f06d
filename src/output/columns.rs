use super::table::tabulate;
use super::{ColumnSpec, RenderOptions};
use crate::wider::PodWithWider;

/// Table whose columns come from user supplied path expressions
pub struct CustomColumnsFormatter;

impl CustomColumnsFormatter {
    pub fn format(
        records: &[PodWithWider<'_>],
        columns: &[ColumnSpec],
        options: &RenderOptions,
    ) -> String {
        let headers: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        let rows = records
            .iter()
            .map(|record| columns.iter().map(|c| c.resolve(record)).collect())
            .collect();

        tabulate(&headers, rows, options.no_headers)
    }
}
