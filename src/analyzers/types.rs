//! Data types produced by the aggregation pipeline.

use serde::{Deserialize, Serialize};

/// One CSV row as a sequence of text fields.
pub type Row = Vec<String>;

/// Composite grouping key of an entity.
///
/// `label` is absent when the source row stopped after its first field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub category: String,
    pub label: Option<String>,
}

/// Where (and how many of) an entity was observed, fields kept as raw text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub zone_id: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub z: Option<String>,
    pub count: Option<String>,
}

/// All observations sharing one [`EntityKey`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityGroup {
    pub category: String,
    pub label: Option<String>,
    pub total: i64,
    pub locations: Vec<Location>,
}

impl EntityGroup {
    pub(crate) fn new(key: EntityKey) -> Self {
        Self {
            category: key.category,
            label: key.label,
            total: 0,
            locations: Vec::new(),
        }
    }

    /// Label or an empty string when the row carried none.
    pub fn label_str(&self) -> &str {
        self.label.as_deref().unwrap_or_default()
    }

    /// `"Label (category)"`, the text entity searches match against.
    pub fn display_name(&self) -> String {
        format!("{} ({})", capitalize(self.label_str()), self.category)
    }
}

/// Upper-cases the first character of `s`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
