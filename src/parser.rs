//! CSV tokenizer for entity log files.

use csv::ReaderBuilder;

use crate::analyzers::types::Row;

/// Decodes an entity log into rows, dropping the header line.
///
/// Rows may have any number of fields. Rows with one field or fewer carry no
/// data and are dropped as well.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 CSV.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<Row>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        if idx == 0 || record.len() <= 1 {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_bytes_returns_no_rows() {
        let rows = parse_rows(&[]).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_skips_header_and_short_rows() {
        let text = "Type,Name,Dimension,X,Y,Z,Quantity\n\
                    TPS,19.8\n\
                    lonely\n\
                    zombie,Zombie,overworld,1,2,3,5\n";
        let rows = parse_rows(text.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["TPS", "19.8"]);
        assert_eq!(rows[1].len(), 7);
        assert_eq!(rows[1][6], "5");
    }

    #[test]
    fn test_parse_keeps_ragged_rows() {
        let text = "h\nzombie,Zombie,overworld\ncow,Cow,overworld,1,2,3,4,extra\n";
        let rows = parse_rows(text.as_bytes()).unwrap();

        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 8);
    }

    #[test]
    fn test_parse_invalid_utf8() {
        let invalid_bytes = vec![b'h', b'\n', 0xFF, 0xFE, b',', b'x', b'\n'];
        assert!(parse_rows(&invalid_bytes).is_err());
    }
}
