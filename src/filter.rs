//! Entity search and coordinate-range filtering over ranked groups.

use serde::Serialize;

use crate::analyzers::types::{EntityGroup, Location};
use crate::analyzers::utility::parse_float_prefix;

/// Optional inclusive bounds on each axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoordBounds {
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub z_min: Option<f64>,
    pub z_max: Option<f64>,
}

impl CoordBounds {
    pub fn is_unbounded(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `loc` lies within every bound that is set.
    ///
    /// A coordinate that does not parse as a number never violates a bound.
    pub fn contains(&self, loc: &Location) -> bool {
        fn within(raw: Option<&str>, min: Option<f64>, max: Option<f64>) -> bool {
            let Some(v) = raw.and_then(parse_float_prefix) else {
                return true;
            };
            min.is_none_or(|m| v >= m) && max.is_none_or(|m| v <= m)
        }

        within(loc.x.as_deref(), self.x_min, self.x_max)
            && within(loc.y.as_deref(), self.y_min, self.y_max)
            && within(loc.z.as_deref(), self.z_min, self.z_max)
    }
}

/// Search text plus coordinate bounds.
#[derive(Debug, Clone, Default)]
pub struct EntityFilter {
    search: String,
    bounds: CoordBounds,
}

/// A group that passed the filter, with a match flag per location.
#[derive(Debug, Clone, Serialize)]
pub struct VisibleGroup<'a> {
    #[serde(flatten)]
    pub group: &'a EntityGroup,
    pub location_matches: Vec<bool>,
}

impl EntityFilter {
    pub fn new(search: Option<&str>, bounds: CoordBounds) -> Self {
        Self {
            search: search.unwrap_or_default().trim().to_lowercase(),
            bounds,
        }
    }

    /// Case-insensitive substring match on `"Label (category)"`.
    pub fn matches_search(&self, group: &EntityGroup) -> bool {
        self.search.is_empty() || group.display_name().to_lowercase().contains(&self.search)
    }

    /// Keeps groups matching the search with at least one location in bounds.
    pub fn apply<'a>(&self, groups: &'a [EntityGroup]) -> Vec<VisibleGroup<'a>> {
        groups
            .iter()
            .filter(|g| self.matches_search(g))
            .filter_map(|group| {
                let location_matches: Vec<bool> = group
                    .locations
                    .iter()
                    .map(|loc| self.bounds.contains(loc))
                    .collect();
                let shown = self.bounds.is_unbounded() || location_matches.iter().any(|m| *m);
                shown.then_some(VisibleGroup {
                    group,
                    location_matches,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::aggregate::group_entities;
    use crate::analyzers::types::Row;

    fn rows() -> Vec<Row> {
        [
            ["zombie", "zombie", "overworld", "10", "64", "10", "3"],
            ["zombie", "zombie", "overworld", "500", "12", "-40", "1"],
            ["item", "Diamond", "nether", "-20", "30", "5", "2"],
            ["cow", "Cow", "overworld", "?", "70", "0", "1"],
        ]
        .iter()
        .map(|r| r.iter().map(|f| f.to_string()).collect())
        .collect()
    }

    #[test]
    fn test_empty_filter_shows_everything() {
        let groups = group_entities(&rows());
        let visible = EntityFilter::default().apply(&groups);

        assert_eq!(visible.len(), 3);
        assert!(visible.iter().all(|v| v.location_matches.iter().all(|m| *m)));
    }

    #[test]
    fn test_search_matches_label_and_category() {
        let groups = group_entities(&rows());

        let by_label = EntityFilter::new(Some("  DIAM "), CoordBounds::default()).apply(&groups);
        assert_eq!(by_label.len(), 1);
        assert_eq!(by_label[0].group.category, "item");

        let by_category = EntityFilter::new(Some("(cow)"), CoordBounds::default()).apply(&groups);
        assert_eq!(by_category.len(), 1);
    }

    #[test]
    fn test_bounds_flag_locations() {
        let groups = group_entities(&rows());
        let bounds = CoordBounds {
            x_max: Some(100.0),
            y_min: Some(20.0),
            ..Default::default()
        };
        let visible = EntityFilter::new(None, bounds).apply(&groups);

        let zombie = visible.iter().find(|v| v.group.category == "zombie").unwrap();
        assert_eq!(zombie.location_matches, vec![true, false]);
        // unparseable x never violates a bound
        assert!(visible.iter().any(|v| v.group.category == "cow"));
    }

    #[test]
    fn test_bounds_hide_groups_without_matches() {
        let groups = group_entities(&rows());
        let bounds = CoordBounds {
            z_min: Some(100.0),
            ..Default::default()
        };
        let visible = EntityFilter::new(None, bounds).apply(&groups);

        assert!(visible.is_empty());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let loc = Location {
            x: Some("5".into()),
            ..Default::default()
        };
        let bounds = CoordBounds {
            x_min: Some(5.0),
            x_max: Some(5.0),
            ..Default::default()
        };
        assert!(bounds.contains(&loc));
    }
}
