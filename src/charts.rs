//! SVG chart rendering for timelines and zone heatmaps.

use anyhow::Result;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::heatmap::ZoneHeatmap;
use crate::timeline::Timeline;

/// Line colours for the entity trend series, cycled.
pub const PALETTE: [RGBColor; 5] = [
    RGBColor(96, 165, 250),  // Blue
    RGBColor(110, 231, 183), // Green
    RGBColor(251, 191, 36),  // Amber
    RGBColor(244, 114, 182), // Pink
    RGBColor(167, 139, 250), // Violet
];

const METRIC_COLOR: RGBColor = RGBColor(110, 231, 183);
const HEATMAP_BACKGROUND: RGBColor = RGBColor(30, 37, 39);
const HEATMAP_BLOB: RGBColor = RGBColor(96, 165, 250);

const METRIC_CHART_SIZE: (u32, u32) = (600, 180);
const ENTITY_CHART_SIZE: (u32, u32) = (600, 220);
const HEATMAP_SIZE: (u32, u32) = (420, 320);

/// Upper bound of the tick-rate axis.
const METRIC_AXIS_MAX: f64 = 25.0;

/// Replaces everything but ASCII alphanumerics, `-` and `.` with `_`.
pub fn file_stem_for(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Writes the tick-rate and entity-trend charts for `timeline` into `dir`.
#[tracing::instrument(skip(timeline), fields(points = timeline.points.len()))]
pub fn render_timeline_charts(timeline: &Timeline, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let metric_path = dir.join("timeline_tps.svg");
    draw_metric_chart(timeline, &metric_path)?;

    let entity_path = dir.join("timeline_entities.svg");
    draw_entity_chart(timeline, &entity_path)?;

    info!(dir = %dir.display(), "Timeline charts written");
    Ok(vec![metric_path, entity_path])
}

fn x_range(points: usize) -> std::ops::Range<f64> {
    0f64..(points.max(2) - 1) as f64
}

fn draw_metric_chart(timeline: &Timeline, path: &Path) -> Result<()> {
    let points = &timeline.points;
    let root = SVGBackend::new(path, METRIC_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("TPS", ("sans-serif", 16))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range(points.len()), 0f64..METRIC_AXIS_MAX)?;

    let label_at = |x: &f64| tick_label(timeline, *x);
    chart
        .configure_mesh()
        .x_labels(points.len())
        .x_label_formatter(&label_at)
        .draw()?;

    chart.draw_series(LineSeries::new(
        points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.metric.map(|m| (i as f64, m))),
        &METRIC_COLOR,
    ))?;

    root.present()?;
    debug!(path = %path.display(), "Metric chart written");
    Ok(())
}

fn draw_entity_chart(timeline: &Timeline, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, ENTITY_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = timeline
        .top_entities
        .iter()
        .flat_map(|s| s.counts.iter().copied())
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption("Top entities", ("sans-serif", 16))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range(timeline.points.len()), 0f64..y_max * 1.1)?;

    let label_at = |x: &f64| tick_label(timeline, *x);
    chart
        .configure_mesh()
        .x_labels(timeline.points.len())
        .x_label_formatter(&label_at)
        .draw()?;

    for (i, series) in timeline.top_entities.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(
                series
                    .counts
                    .iter()
                    .enumerate()
                    .map(|(x, c)| (x as f64, *c as f64)),
                &color,
            ))?
            .label(crate::analyzers::types::capitalize(&series.label))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    debug!(path = %path.display(), "Entity chart written");
    Ok(())
}

/// Timestamp label for integral x positions, blank between points.
fn tick_label(timeline: &Timeline, x: f64) -> String {
    if x.fract() != 0.0 || x < 0.0 {
        return String::new();
    }
    timeline
        .points
        .get(x as usize)
        .map(|p| p.timestamp.format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Draws one zone's locations as translucent blobs scaled to the canvas.
pub fn render_heatmap(heatmap: &ZoneHeatmap, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&HEATMAP_BACKGROUND)?;

    if let Some(((min_x, max_x), (min_z, max_z))) = heatmap.extent() {
        let (width, height) = (HEATMAP_SIZE.0 as f64, HEATMAP_SIZE.1 as f64);
        let style = HEATMAP_BLOB.mix(0.35).filled();

        for p in &heatmap.points {
            let px = ((p.x - min_x) / (max_x - min_x) * width).round() as i32;
            let pz = ((p.z - min_z) / (max_z - min_z) * height).round() as i32;
            root.draw(&Circle::new((px, pz), p.radius().round() as i32, style))?;
        }
    }

    root.present()?;
    debug!(path = %path.display(), zone = %heatmap.zone, "Heatmap written");
    Ok(())
}

/// Writes one heatmap per zone for the file `file_name` into `dir`.
pub fn render_heatmaps(file_name: &str, heatmaps: &[ZoneHeatmap], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let stem = file_stem_for(file_name.trim_end_matches(".csv"));
    let mut written = Vec::with_capacity(heatmaps.len());
    for heatmap in heatmaps {
        let path = dir.join(format!("heatmap_{}_{}.svg", stem, file_stem_for(&heatmap.zone)));
        render_heatmap(heatmap, &path)?;
        written.push(path);
    }

    Ok(written)
}
