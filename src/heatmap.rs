//! Per-zone point clouds of entity locations, projected on the x/z plane.

use serde::Serialize;

use crate::analyzers::types::EntityGroup;
use crate::analyzers::utility::{DEFAULT_COUNT, parse_float_prefix, parse_or_default};

/// Zone name used for locations that carry none.
pub const UNKNOWN_ZONE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatPoint {
    pub x: f64,
    pub z: f64,
    pub label: String,
    pub category: String,
    pub quantity: i64,
}

impl HeatPoint {
    /// Blob radius in pixels, growing logarithmically with quantity.
    pub fn radius(&self) -> f64 {
        ((self.quantity.max(0).saturating_add(1) as f64).log2() * 3.0).max(3.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneHeatmap {
    pub zone: String,
    pub points: Vec<HeatPoint>,
}

impl ZoneHeatmap {
    /// Min and max of the x and z coordinates; a flat axis is padded by 10 on each side.
    pub fn extent(&self) -> Option<((f64, f64), (f64, f64))> {
        let xs = widen(self.points.iter().map(|p| p.x))?;
        let zs = widen(self.points.iter().map(|p| p.z))?;
        Some((xs, zs))
    }
}

fn widen(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })?;
    if min == max {
        Some((min - 10.0, max + 10.0))
    } else {
        Some((min, max))
    }
}

/// Collects every location of `groups` into one heatmap per zone.
///
/// Zones appear in first-seen order. Locations whose x or z is not numeric
/// cannot be placed and are left out.
pub fn zone_heatmaps(groups: &[EntityGroup]) -> Vec<ZoneHeatmap> {
    let mut zones: Vec<ZoneHeatmap> = Vec::new();

    for group in groups {
        for loc in &group.locations {
            let (Some(x), Some(z)) = (
                loc.x.as_deref().and_then(parse_float_prefix),
                loc.z.as_deref().and_then(parse_float_prefix),
            ) else {
                continue;
            };
            let zone = loc.zone_id.as_deref().unwrap_or(UNKNOWN_ZONE);
            let point = HeatPoint {
                x,
                z,
                label: group.label_str().to_string(),
                category: group.category.clone(),
                quantity: parse_or_default(loc.count.as_deref(), DEFAULT_COUNT),
            };

            match zones.iter_mut().find(|h| h.zone == zone) {
                Some(heatmap) => heatmap.points.push(point),
                None => zones.push(ZoneHeatmap {
                    zone: zone.to_string(),
                    points: vec![point],
                }),
            }
        }
    }

    zones
}
