use crate::analyzers::types::Row;
use crate::analyzers::utility::{METRIC_PLACEHOLDER, is_metric_row};

/// Returns the raw value of the first metric row in `rows`.
///
/// Later metric rows are ignored. Yields [`METRIC_PLACEHOLDER`] when there is
/// no metric row, or when the first one has no value field.
pub fn extract_metric(rows: &[Row]) -> String {
    rows.iter()
        .find(|row| is_metric_row(row))
        .and_then(|row| row.get(1).cloned())
        .unwrap_or_else(|| METRIC_PLACEHOLDER.to_string())
}
