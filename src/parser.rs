//! CSV decoder for the ratings dataset.

use anyhow::{Context, Result};

use crate::grid::types::Record;

/// Decodes dataset rows from raw CSV bytes.
///
/// Columns beyond `state`, `latitude`, `longitude`, and `stars` are ignored.
/// A row whose numeric fields are empty or unparseable still decodes, with
/// those fields as `None`; the aggregator drops such records later.
///
/// # Errors
///
/// Returns an error if the CSV is structurally malformed (bad quoting,
/// missing header row, wrong field count on a row).
pub fn parse_records(bytes: &[u8]) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_reader(bytes);

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: Record = row.context("malformed CSV row")?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_rows() {
        let csv = "state,latitude,longitude,stars\n\
                   PA,39.95,-75.16,4.5\n\
                   NJ,39.95,-74.50,3.0\n";

        let records = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].state, "PA");
        assert_eq!(records[0].latitude, Some(39.95));
        assert_eq!(records[0].longitude, Some(-75.16));
        assert_eq!(records[0].stars, Some(4.5));
        assert_eq!(records[1].state, "NJ");
    }

    #[test]
    fn test_parse_ignores_extra_columns() {
        let csv = "name,state,latitude,longitude,stars,review_count\n\
                   Reading Terminal,PA,39.9534,-75.1590,4.6,2100\n";

        let records = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].stars, Some(4.6));
    }

    #[test]
    fn test_parse_empty_numeric_field_becomes_none() {
        let csv = "state,latitude,longitude,stars\n\
                   PA,39.95,-75.16,\n";

        let records = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(records[0].stars, None);
        assert_eq!(records[0].latitude, Some(39.95));
    }

    #[test]
    fn test_parse_unparseable_numeric_field_becomes_none() {
        let csv = "state,latitude,longitude,stars\n\
                   PA,not-a-number,-75.16,4.0\n";

        let records = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(records[0].latitude, None);
        assert_eq!(records[0].stars, Some(4.0));
    }

    #[test]
    fn test_parse_header_only() {
        let csv = "state,latitude,longitude,stars\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_missing_column_is_fatal() {
        let csv = "state,latitude,longitude\n\
                   PA,39.95,-75.16\n";
        assert!(parse_records(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_ragged_row_is_fatal() {
        let csv = "state,latitude,longitude,stars\n\
                   PA,39.95\n";
        assert!(parse_records(csv.as_bytes()).is_err());
    }
}
