use crate::analyzers::types::Row;
use crate::analyzers::utility::{
    METRIC_MARKER, METRIC_PLACEHOLDER, format_two_decimals, is_metric_row, mean, parse_float_prefix,
};
use tracing::debug;

/// Folds several files' rows into one row sequence.
///
/// Metric rows are pulled out of every file and replaced by a single synthetic
/// metric row at the head, carrying the mean of all numeric metric values to
/// two decimals (or [`METRIC_PLACEHOLDER`] when none were numeric). All other
/// rows follow in file order, untouched and not de-duplicated.
pub fn merge_metric_and_entity_rows<'a, I>(file_sets: I) -> Vec<Row>
where
    I: IntoIterator<Item = &'a [Row]>,
{
    let mut merged = Vec::new();
    let mut metric_values = Vec::new();

    for rows in file_sets {
        for row in rows {
            if is_metric_row(row) {
                if let Some(value) = row.get(1).and_then(|v| parse_float_prefix(v)) {
                    metric_values.push(value);
                }
            } else {
                merged.push(row.clone());
            }
        }
    }

    let metric = match mean(&metric_values) {
        Some(avg) => format_two_decimals(avg),
        None => METRIC_PLACEHOLDER.to_string(),
    };
    debug!(
        samples = metric_values.len(),
        metric = %metric,
        rows = merged.len(),
        "Merged file rows"
    );

    let mut synthetic = vec![METRIC_MARKER.to_string(), metric];
    synthetic.extend(std::iter::repeat_n("0".to_string(), 5));
    merged.insert(0, synthetic);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|f| f.to_string()).collect()
    }

    fn merge(files: &[Vec<Row>]) -> Vec<Row> {
        merge_metric_and_entity_rows(files.iter().map(Vec::as_slice))
    }

    #[test]
    fn test_merge_empty_input_yields_placeholder_row() {
        let merged = merge(&[]);
        assert_eq!(merged, vec![row(&["TPS", "?", "0", "0", "0", "0", "0"])]);
    }

    #[test]
    fn test_merge_single_file_round_trip() {
        let observations = vec![
            row(&["zombie", "Zombie", "overworld", "1", "2", "3", "5"]),
            row(&["cow", "Cow", "overworld", "4", "5", "6", "2"]),
        ];
        let mut file = vec![row(&["TPS", "20.0"])];
        file.extend(observations.clone());

        let merged = merge(&[file]);
        assert_eq!(merged[0][1], "20.00");
        assert_eq!(&merged[1..], observations.as_slice());
    }

    #[test]
    fn test_merge_two_files_averages_metric() {
        let a = vec![
            row(&["TPS", "20"]),
            row(&["zombie", "Zombie", "overworld", "1", "2", "3", "5"]),
        ];
        let b = vec![
            row(&["tps", "18"]),
            row(&["zombie", "Zombie", "overworld", "1", "2", "3", "5"]),
        ];
        let merged = merge(&[a, b]);

        assert_eq!(merged[0][1], "19.00");
        // duplicates across files are kept
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[1], merged[2]);
    }

    #[test]
    fn test_merge_rounds_half_average_up() {
        let a = vec![row(&["TPS", "19.25"])];
        let b = vec![row(&["TPS", "20"])];
        assert_eq!(merge(&[a, b])[0][1], "19.63");

        let c = vec![row(&["TPS", "0.125"])];
        assert_eq!(merge(&[c])[0][1], "0.13");
    }

    #[test]
    fn test_merge_skips_non_numeric_metrics() {
        let a = vec![row(&["TPS", "?"])];
        let b = vec![row(&["TPS", "17.5"]), row(&["TPS"])];
        let merged = merge(&[a, b]);

        assert_eq!(merged[0][1], "17.50");
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_merge_keeps_file_order() {
        let a = vec![row(&["a", "A", "o", "0", "0", "0", "1"])];
        let b = vec![row(&["b", "B", "o", "0", "0", "0", "1"])];
        let merged = merge(&[b, a]);

        assert_eq!(merged[0][1], "?");
        assert_eq!(merged[1][0], "b");
        assert_eq!(merged[2][0], "a");
    }
}
