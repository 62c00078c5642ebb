//! Concurrent loading of entity log files from disk or HTTP.
//!
//! Each source is read and parsed in its own task. The batch is joined before
//! anything is returned, so callers only ever see complete results, ordered by
//! file name regardless of which task finished first.

use thiserror::Error;
use tracing::{Instrument, debug, error, info, warn};

use crate::analyzers::types::Row;
use crate::fetch::{HttpClient, fetch_bytes, is_remote};
use crate::parser::parse_rows;
use crate::state::LogFile;

/// Why a single source could not be loaded.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to fetch: {0}")]
    Fetch(String),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("load task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Files that loaded, plus the sources that did not and why.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub files: Vec<LogFile>,
    pub failures: Vec<(String, LoadError)>,
}

/// File name shown for a source: the last path or URL segment, query stripped.
pub fn source_name(source: &str) -> String {
    let path = source.split(['?', '#']).next().unwrap_or(source);
    path.rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(path)
        .to_string()
}

/// Returns `true` for sources the viewer accepts (`*.csv`).
pub fn is_csv_source(source: &str) -> bool {
    source_name(source).ends_with(".csv")
}

/// Loads every `.csv` source concurrently and waits for all of them.
///
/// Failed sources are logged by name and reported in
/// [`LoadOutcome::failures`]; they never abort the rest of the batch.
#[tracing::instrument(skip(client, sources), fields(sources = sources.len()))]
pub async fn load_files<C>(client: &C, sources: &[String]) -> LoadOutcome
where
    C: HttpClient + Clone + 'static,
{
    let mut tasks = vec![];

    for source in sources {
        if !is_csv_source(source) {
            warn!(source = %source, "Skipping non-CSV source");
            continue;
        }

        let client = client.clone();
        let source = source.clone();
        let name = source_name(&source);
        let span = tracing::info_span!("load_file", file = %name);

        let task = tokio::spawn(
            async move { load_rows(&client, &source).await }.instrument(span),
        );
        tasks.push((name, task));
    }

    // Wait for all tasks to complete
    let mut outcome = LoadOutcome::default();
    for (name, task) in tasks {
        let result = match task.await {
            Ok(rows) => rows,
            Err(e) => Err(LoadError::from(e)),
        };
        match result {
            Ok(rows) => {
                debug!(file = %name, rows = rows.len(), "File loaded");
                outcome.files.push(LogFile { name, rows });
            }
            Err(e) => {
                error!(file = %name, error = %e, "Error parsing file");
                outcome.failures.push((name, e));
            }
        }
    }

    outcome.files.sort_by(|a, b| a.name.cmp(&b.name));
    info!(
        loaded = outcome.files.len(),
        failed = outcome.failures.len(),
        "Load batch complete"
    );
    outcome
}

/// Reads one source from a local path or URL and parses its rows.
async fn load_rows<C: HttpClient>(client: &C, source: &str) -> Result<Vec<Row>, LoadError> {
    let bytes = if is_remote(source) {
        fetch_bytes(client, source)
            .await
            .map_err(|e| LoadError::Fetch(format!("{e:#}")))?
    } else {
        tokio::fs::read(source).await?
    };
    Ok(parse_rows(&bytes)?)
}
