//! The set of currently loaded log files.
//!
//! [`AppState`] is an explicit value: every operation that changes which files
//! are loaded returns a new state instead of mutating a shared one.

use serde::{Deserialize, Serialize};

use crate::analyzers::merge::merge_metric_and_entity_rows;
use crate::analyzers::types::Row;

/// File name given to the result of merging all loaded files.
pub const MERGED_FILE_NAME: &str = "Pegasus_Merged_Entities.csv";

/// One parsed log file, header row already removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogFile {
    pub name: String,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub files: Vec<LogFile>,
}

impl AppState {
    /// Builds a state whose files are ordered by name.
    pub fn new(files: Vec<LogFile>) -> Self {
        let mut state = Self { files };
        state.files.sort_by(|a, b| a.name.cmp(&b.name));
        state
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Appends newly loaded files to the current ones.
    pub fn with_added(self, files: Vec<LogFile>) -> Self {
        let mut all = self.files;
        all.extend(files);
        Self::new(all)
    }

    /// Collapses every loaded file into a single merged file.
    pub fn merged(&self) -> Self {
        let rows = merge_metric_and_entity_rows(self.files.iter().map(|f| f.rows.as_slice()));
        Self {
            files: vec![LogFile {
                name: MERGED_FILE_NAME.to_string(),
                rows,
            }],
        }
    }
}
