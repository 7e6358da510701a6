/// Results table writers.
///
/// One row per (entity, source file, metric request) with the outcome in
/// the last column. Delimited output goes through the `csv` crate so quoting
/// and escaping match what spreadsheet tools expect; JSON output serializes
/// the same rows with `NotAvailable` as `null`.
///
/// `write_overlay_delimited` exports an aligned overlay (see
/// `analysis::alignment`) as one offset column plus one value column per
/// series.

use std::error::Error;
use std::fs::File;
use std::path::Path;

use crate::analysis::alignment::Overlay;
use crate::config::{Delimiter, OutputFormat};
use crate::model::ResultRow;

/// Column headers of the results table.
pub const RESULT_HEADERS: [&str; 4] = ["entity", "source_file", "metric", "outcome"];

/// Writes rows in the configured format.
pub fn write_results(
    path: &Path,
    rows: &[ResultRow],
    format: OutputFormat,
    delimiter: Delimiter,
) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Delimited => write_delimited(path, rows, delimiter.as_byte()),
        OutputFormat::Json => write_json(path, rows),
    }
}

/// Writes rows as a delimited table with a header row.
pub fn write_delimited(
    path: &Path,
    rows: &[ResultRow],
    delimiter: u8,
) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;

    writer.write_record(RESULT_HEADERS)?;
    for row in rows {
        let outcome = row.outcome.to_field();
        writer.write_record([
            row.entity.as_str(),
            row.source_file.as_str(),
            row.metric.as_str(),
            outcome.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes rows as a JSON array.
pub fn write_json(path: &Path, rows: &[ResultRow]) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, rows)?;
    Ok(())
}

/// Writes an aligned overlay: `offset` column, then one column per series.
/// Positions where a series has no sample are left blank.
pub fn write_overlay_delimited(
    path: &Path,
    overlay: &Overlay,
    delimiter: u8,
) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;

    let mut header = vec!["offset".to_string()];
    header.extend(overlay.columns.iter().map(|c| c.name.clone()));
    writer.write_record(&header)?;

    for (row_idx, offset) in overlay.offsets.iter().enumerate() {
        let mut record = vec![offset.to_string()];
        for column in &overlay.columns {
            record.push(match column.values[row_idx] {
                Some(v) => format!("{}", v),
                None => String::new(),
            });
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::alignment::OverlayColumn;
    use crate::model::Outcome;

    fn sample_rows() -> Vec<ResultRow> {
        vec![
            ResultRow {
                entity: "Hadati_13".to_string(),
                source_file: "sample1950.out".to_string(),
                metric: "total_inflow max peak 1".to_string(),
                outcome: Outcome::Value(9.0),
            },
            ResultRow {
                entity: "Hadati_13".to_string(),
                source_file: "sample1950.out".to_string(),
                metric: "total_inflow max peak 3".to_string(),
                outcome: Outcome::NotAvailable,
            },
        ]
    }

    #[test]
    fn test_write_delimited_round_trip() {
        let path = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap()
            .into_temp_path();

        write_delimited(&path, &sample_rows(), b',').expect("write should succeed");

        let mut reader = csv::Reader::from_path(&path).expect("read back");
        assert_eq!(
            reader.headers().unwrap(),
            &csv::StringRecord::from(RESULT_HEADERS.to_vec())
        );

        let records: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "Hadati_13");
        assert_eq!(&records[0][3], "9");
        assert_eq!(&records[1][3], "n/a");
    }

    #[test]
    fn test_write_tab_delimited() {
        let path = tempfile::Builder::new()
            .suffix(".txt")
            .tempfile()
            .unwrap()
            .into_temp_path();

        write_delimited(&path, &sample_rows(), b'\t').expect("write should succeed");

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("entity\tsource_file\tmetric\toutcome"));
    }

    #[test]
    fn test_write_json_not_available_is_null() {
        let path = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap()
            .into_temp_path();

        write_json(&path, &sample_rows()).expect("write should succeed");

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["outcome"], serde_json::json!(9.0));
        assert_eq!(parsed[1]["outcome"], serde_json::Value::Null);
    }

    #[test]
    fn test_write_overlay_blank_cells_for_missing_samples() {
        let overlay = Overlay {
            offsets: vec![-1, 0, 1],
            columns: vec![
                OverlayColumn {
                    name: "run_a".to_string(),
                    values: vec![Some(2.0), Some(9.0), Some(3.0)],
                },
                OverlayColumn {
                    name: "run_b".to_string(),
                    values: vec![None, Some(8.0), Some(2.5)],
                },
            ],
        };

        let path = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap()
            .into_temp_path();
        write_overlay_delimited(&path, &overlay, b',').expect("write should succeed");

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "offset,run_a,run_b");
        assert_eq!(lines[1], "-1,2,");
        assert_eq!(lines[2], "0,9,8");
    }
}
