use crate::analyzers::types::{EntityGroup, EntityKey, Location, Row};
use crate::analyzers::utility::{DEFAULT_COUNT, is_metric_row, parse_or_default};
use std::collections::HashMap;

/// Groups observation rows by `(category, label)` and ranks the groups.
///
/// Rows with an empty first field and metric rows are skipped. Each remaining
/// row adds its parsed `count` (default 1) to its group's total and appends a
/// [`Location`] holding the raw fields. Groups come back sorted by descending
/// total; groups with equal totals stay in first-seen order.
pub fn group_entities(rows: &[Row]) -> Vec<EntityGroup> {
    let mut index: HashMap<EntityKey, usize> = HashMap::new();
    let mut groups: Vec<EntityGroup> = Vec::new();

    for row in rows {
        let Some(category) = row.first().filter(|c| !c.is_empty()) else {
            continue;
        };
        if is_metric_row(row) {
            continue;
        }

        let field = |i: usize| row.get(i).cloned();
        let key = EntityKey {
            category: category.clone(),
            label: field(1),
        };

        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(EntityGroup::new(key));
            groups.len() - 1
        });
        let group = &mut groups[slot];

        let count = field(6);
        group.total = group
            .total
            .saturating_add(parse_or_default(count.as_deref(), DEFAULT_COUNT));
        group.locations.push(Location {
            zone_id: field(2),
            x: field(3),
            y: field(4),
            z: field(5),
            count,
        });
    }

    // sort_by is stable
    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups
}
