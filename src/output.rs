//! Export of row sequences as CSV text.
//!
//! Fields are joined with `,` and rows with CRLF. Nothing is quoted, so a
//! field containing a comma or line break will not survive a round trip.

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analyzers::types::Row;

/// Joins `rows` into export text.
pub fn to_csv_text(rows: &[Row]) -> String {
    rows.iter()
        .map(|row| row.join(","))
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// Writes `rows` to `path`, gzip-compressed to `<path>.gz` when `gzip` is set.
///
/// Returns the path actually written.
#[tracing::instrument(skip(rows), fields(rows = rows.len()))]
pub fn export_rows(path: &Path, rows: &[Row], gzip: bool) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let text = to_csv_text(rows);
    let target = if gzip {
        let mut name = path.as_os_str().to_owned();
        name.push(".gz");
        PathBuf::from(name)
    } else {
        path.to_path_buf()
    };

    let file = File::create(&target)
        .with_context(|| format!("failed to create export file {}", target.display()))?;
    if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(text.as_bytes())?;
        encoder.finish()?;
    } else {
        let mut file = file;
        file.write_all(text.as_bytes())?;
        file.flush()?;
    }

    info!(path = %target.display(), gzip, "Rows exported");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::fs;
    use std::io::Read;

    fn rows() -> Vec<Row> {
        vec![
            vec!["TPS".into(), "19.00".into(), "0".into()],
            vec!["zombie".into(), "Zombie".into(), "overworld".into()],
        ]
    }

    #[test]
    fn test_to_csv_text_uses_crlf() {
        assert_eq!(to_csv_text(&rows()), "TPS,19.00,0\r\nzombie,Zombie,overworld");
        assert_eq!(to_csv_text(&[]), "");
    }

    #[test]
    fn test_to_csv_text_does_not_quote() {
        let rows = vec![vec!["a,b".to_string(), "c".to_string()]];
        assert_eq!(to_csv_text(&rows), "a,b,c");
    }

    #[test]
    fn test_export_rows_plain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/merged.csv");

        let written = export_rows(&path, &rows(), false).unwrap();

        assert_eq!(written, path);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.split("\r\n").count(), 2);
    }

    #[test]
    fn test_export_rows_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merged.csv");

        let written = export_rows(&path, &rows(), true).unwrap();
        assert!(written.to_string_lossy().ends_with("merged.csv.gz"));

        let mut decoder = GzDecoder::new(File::open(written).unwrap());
        let mut text = String::new();
        decoder.read_to_string(&mut text).unwrap();
        assert_eq!(text, to_csv_text(&rows()));
    }
}
