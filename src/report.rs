//! Browsable views of the loaded files as plain text or JSON.

use serde::Serialize;
use std::io::{self, Write};

use crate::analyzers::aggregate::group_entities;
use crate::analyzers::classify::extract_metric;
use crate::analyzers::types::{EntityGroup, Location};
use crate::filter::{EntityFilter, VisibleGroup};
use crate::state::{AppState, LogFile};
use crate::timeline::{Timeline, build_timeline};

/// Ranked entities and metric of one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub name: String,
    pub metric: String,
    pub groups: Vec<EntityGroup>,
}

impl FileReport {
    pub fn from_file(file: &LogFile) -> Self {
        Self {
            name: file.name.clone(),
            metric: extract_metric(&file.rows),
            groups: group_entities(&file.rows),
        }
    }
}

/// Everything shown for an [`AppState`], recomputed from its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub files: Vec<FileReport>,
    pub timeline: Option<Timeline>,
}

impl View {
    pub fn build(state: &AppState) -> Self {
        Self {
            files: state.files.iter().map(FileReport::from_file).collect(),
            timeline: build_timeline(&state.files),
        }
    }
}

#[derive(Serialize)]
struct FileJson<'a> {
    name: &'a str,
    metric: &'a str,
    groups: Vec<VisibleGroup<'a>>,
}

#[derive(Serialize)]
struct ViewJson<'a> {
    files: Vec<FileJson<'a>>,
    timeline: Option<&'a Timeline>,
}

/// Serializes the filtered view as pretty-printed JSON.
pub fn to_json(view: &View, filter: &EntityFilter) -> serde_json::Result<String> {
    let json = ViewJson {
        files: view
            .files
            .iter()
            .map(|f| FileJson {
                name: &f.name,
                metric: &f.metric,
                groups: filter.apply(&f.groups),
            })
            .collect(),
        timeline: view.timeline.as_ref(),
    };
    serde_json::to_string_pretty(&json)
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("?")
}

fn write_location<W: Write>(out: &mut W, loc: &Location, matched: bool) -> io::Result<()> {
    let marker = if matched { "*" } else { "." };
    writeln!(
        out,
        "      {marker} {} @ ({}, {}, {}) x{}",
        field(&loc.zone_id),
        field(&loc.x),
        field(&loc.y),
        field(&loc.z),
        field(&loc.count),
    )
}

fn write_timeline<W: Write>(out: &mut W, timeline: &Timeline) -> io::Result<()> {
    writeln!(out, "Timeline")?;
    for point in &timeline.points {
        let metric = point
            .metric
            .map(|m| m.to_string())
            .unwrap_or_else(|| "?".to_string());
        writeln!(
            out,
            "  {}  TPS: {}  ({})",
            point.timestamp.format("%Y-%m-%d %H:%M"),
            metric,
            point.name
        )?;
    }
    for series in &timeline.top_entities {
        let counts: Vec<String> = series.counts.iter().map(i64::to_string).collect();
        writeln!(
            out,
            "  {}: {}",
            crate::analyzers::types::capitalize(&series.label),
            counts.join(" -> ")
        )?;
    }
    writeln!(out)
}

/// Writes the filtered view as indented text.
///
/// With `details`, each group is followed by its locations; locations outside
/// the coordinate bounds are marked `.` instead of `*`.
pub fn write_text<W: Write>(
    out: &mut W,
    view: &View,
    filter: &EntityFilter,
    details: bool,
) -> io::Result<()> {
    if let Some(timeline) = &view.timeline {
        write_timeline(out, timeline)?;
    }

    for file in &view.files {
        writeln!(out, "== {}  TPS: {}", file.name, file.metric)?;

        let visible = filter.apply(&file.groups);
        if visible.is_empty() {
            writeln!(out, "  (no matching entities)")?;
        }
        for entry in visible {
            writeln!(out, "  {}  x{}", entry.group.display_name(), entry.group.total)?;
            if details {
                for (loc, matched) in entry.group.locations.iter().zip(&entry.location_matches) {
                    write_location(out, loc, *matched)?;
                }
            }
        }
        writeln!(out)?;
    }

    Ok(())
}
