//! Time series across several timestamped log files.
//!
//! Log files are named like `EntityLog_2025-05-14_12-22.csv`; the embedded
//! date and time orders them on a timeline.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

use crate::analyzers::aggregate::group_entities;
use crate::analyzers::classify::extract_metric;
use crate::analyzers::utility::parse_float_prefix;
use crate::state::LogFile;

/// Number of entity labels charted as trends.
pub const TOP_ENTITIES: usize = 5;

const STAMP_LEN: usize = "2025-05-14_12-22".len();
const STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub name: String,
    pub timestamp: NaiveDateTime,
    /// `None` when the file's metric was missing or not numeric.
    pub metric: Option<f64>,
}

/// Totals of one entity label at every timeline point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySeries {
    pub label: String,
    pub counts: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub points: Vec<TimelinePoint>,
    pub top_entities: Vec<EntitySeries>,
}

/// Finds the first `YYYY-MM-DD_HH-MM` stamp in a file name.
pub fn parse_timestamp(name: &str) -> Option<NaiveDateTime> {
    let bytes = name.as_bytes();
    if bytes.len() < STAMP_LEN {
        return None;
    }

    (0..=bytes.len() - STAMP_LEN).find_map(|start| {
        let window = &bytes[start..start + STAMP_LEN];
        let shaped = window.iter().enumerate().all(|(i, b)| match i {
            4 | 7 | 13 => *b == b'-',
            10 => *b == b'_',
            _ => b.is_ascii_digit(),
        });
        if !shaped {
            return None;
        }
        // the window is all ASCII, so these are char boundaries
        NaiveDateTime::parse_from_str(&name[start..start + STAMP_LEN], STAMP_FORMAT).ok()
    })
}

/// Builds the timeline for `files`.
///
/// Only produced when more than one file is loaded and at least one file name
/// carries a timestamp; files without one are left off the timeline.
pub fn build_timeline(files: &[LogFile]) -> Option<Timeline> {
    if files.len() < 2 {
        return None;
    }

    let mut stamped: Vec<(&LogFile, NaiveDateTime)> = files
        .iter()
        .filter_map(|f| parse_timestamp(&f.name).map(|ts| (f, ts)))
        .collect();
    if stamped.is_empty() {
        return None;
    }
    stamped.sort_by_key(|(_, ts)| *ts);

    let mut label_order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, Vec<i64>> = HashMap::new();
    let mut points = Vec::with_capacity(stamped.len());

    for (i, (file, ts)) in stamped.iter().enumerate() {
        for group in group_entities(&file.rows) {
            let label = group.label_str().to_string();
            let series = counts.entry(label.clone()).or_insert_with(|| {
                label_order.push(label);
                vec![0; stamped.len()]
            });
            series[i] = series[i].saturating_add(group.total);
        }

        points.push(TimelinePoint {
            name: file.name.clone(),
            timestamp: *ts,
            metric: parse_float_prefix(&extract_metric(&file.rows)),
        });
    }

    let mut series: Vec<EntitySeries> = label_order
        .into_iter()
        .filter_map(|label| {
            counts
                .remove(&label)
                .map(|counts| EntitySeries { label, counts })
        })
        .collect();
    series.sort_by_key(|s| {
        std::cmp::Reverse(s.counts.iter().fold(0i64, |acc, c| acc.saturating_add(*c)))
    });
    series.truncate(TOP_ENTITIES);

    Some(Timeline {
        points,
        top_entities: series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn file(name: &str, rows: &[&[&str]]) -> LogFile {
        LogFile {
            name: name.to_string(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|f| f.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("EntityLog_2025-05-14_12-22.csv").unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 5, 14)
            .unwrap()
            .and_hms_opt(12, 22, 0)
            .unwrap();
        assert_eq!(ts, expected);
    }

    #[test]
    fn test_parse_timestamp_rejects_bad_names() {
        assert_eq!(parse_timestamp("EntityLog.csv"), None);
        assert_eq!(parse_timestamp("EntityLog_2025-13-14_12-22.csv"), None);
        assert_eq!(parse_timestamp("EntityLog_2025-05-14-12-22.csv"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_parse_timestamp_non_ascii_prefix() {
        assert!(parse_timestamp("journal_é_2025-05-14_12-22.csv").is_some());
    }

    #[test]
    fn test_build_timeline_needs_several_files() {
        let single = vec![file("EntityLog_2025-05-14_12-22.csv", &[&["TPS", "20"]])];
        assert!(build_timeline(&single).is_none());

        let unstamped = vec![file("a.csv", &[]), file("b.csv", &[])];
        assert!(build_timeline(&unstamped).is_none());
    }

    #[test]
    fn test_build_timeline_orders_points_and_series() {
        let files = vec![
            file(
                "EntityLog_2025-05-14_12-24.csv",
                &[&["TPS", "18"], &["zombie", "Zombie", "overworld", "0", "0", "0", "4"]],
            ),
            file("notes.csv", &[&["cow", "Cow", "overworld", "0", "0", "0", "99"]]),
            file(
                "EntityLog_2025-05-14_12-22.csv",
                &[
                    &["TPS", "?"],
                    &["cow", "Cow", "overworld", "0", "0", "0", "1"],
                    &["zombie", "Zombie", "overworld", "0", "0", "0", "2"],
                ],
            ),
        ];
        let timeline = build_timeline(&files).unwrap();

        assert_eq!(timeline.points.len(), 2);
        assert_eq!(timeline.points[0].name, "EntityLog_2025-05-14_12-22.csv");
        assert_eq!(timeline.points[0].metric, None);
        assert_eq!(timeline.points[1].metric, Some(18.0));

        assert_eq!(timeline.top_entities[0].label, "Zombie");
        assert_eq!(timeline.top_entities[0].counts, vec![2, 4]);
        assert_eq!(timeline.top_entities[1].label, "Cow");
        assert_eq!(timeline.top_entities[1].counts, vec![1, 0]);
    }

    #[test]
    fn test_build_timeline_huge_totals_saturate() {
        let max = i64::MAX.to_string();
        let row: &[&str] = &["cow", "Cow", "overworld", "0", "0", "0", &max];
        let files = vec![
            file("EntityLog_2025-05-14_12-22.csv", &[row, row]),
            file("EntityLog_2025-05-14_12-24.csv", &[row]),
        ];
        let timeline = build_timeline(&files).unwrap();

        assert_eq!(timeline.top_entities[0].counts, vec![i64::MAX, i64::MAX]);
    }

    #[test]
    fn test_build_timeline_keeps_top_five() {
        let rows: Vec<Vec<String>> = (1..=7)
            .map(|n| {
                vec![
                    "mob".to_string(),
                    format!("M{n}"),
                    "overworld".to_string(),
                    "0".to_string(),
                    "0".to_string(),
                    "0".to_string(),
                    n.to_string(),
                ]
            })
            .collect();
        let files = vec![
            LogFile {
                name: "EntityLog_2025-05-14_12-22.csv".into(),
                rows: rows.clone(),
            },
            LogFile {
                name: "EntityLog_2025-05-14_12-24.csv".into(),
                rows,
            },
        ];
        let timeline = build_timeline(&files).unwrap();

        let labels: Vec<_> = timeline.top_entities.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["M7", "M6", "M5", "M4", "M3"]);
    }
}
