/// Entity-name list reader.
///
/// Batch jobs can point at a tabular file instead of listing entity names
/// inline: a `.csv` or Excel `.xls`/`.xlsx` sheet with a header row, names
/// taken from a chosen column (the first column when none is named).
/// Blank cells are skipped; order and duplicates are preserved so the
/// results table matches the engineer's worksheet row for row.

use std::path::Path;

/// Loads entity names from a tabular file. `column` selects a header name;
/// `None` means the first column.
pub fn load_entity_names(path: &Path, column: Option<&str>) -> Result<Vec<String>, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "tsv" | "txt" => load_delimited(path, column, delimiter_for(&ext)),
        "xls" | "xlsx" | "xlsm" => load_excel(path, column),
        _ => Err(format!("unsupported entity list format: .{}", ext)),
    }
}

fn delimiter_for(ext: &str) -> u8 {
    match ext {
        "tsv" | "txt" => b'\t',
        _ => b',',
    }
}

fn load_delimited(path: &Path, column: Option<&str>, delimiter: u8) -> Result<Vec<String>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;

    let headers = reader
        .headers()
        .map_err(|e| format!("cannot read header row: {}", e))?
        .clone();
    let col_idx = resolve_column(headers.iter(), column)?;

    let mut names = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format!("malformed row: {}", e))?;
        if let Some(cell) = record.get(col_idx) {
            let cell = cell.trim();
            if !cell.is_empty() {
                names.push(cell.to_string());
            }
        }
    }

    Ok(names)
}

fn load_excel(path: &Path, column: Option<&str>) -> Result<Vec<String>, String> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("cannot open {}: {}", path.display(), e))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .ok_or("workbook has no sheets")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("cannot read sheet '{}': {}", sheet_name, e))?;

    let cell_text = |cell: &Data| -> String {
        match cell {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            Data::Float(f) => f.to_string(),
            Data::Int(i) => i.to_string(),
            Data::Bool(b) => b.to_string(),
            Data::DateTime(dt) => dt.to_string(),
            Data::DateTimeIso(s) => s.clone(),
            Data::DurationIso(s) => s.clone(),
            Data::Error(e) => format!("{:?}", e),
        }
    };

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or("sheet is empty")?
        .iter()
        .map(cell_text)
        .collect();
    let col_idx = resolve_column(header.iter().map(String::as_str), column)?;

    let mut names = Vec::new();
    for row in rows {
        if let Some(cell) = row.get(col_idx) {
            let text = cell_text(cell);
            let text = text.trim();
            if !text.is_empty() {
                names.push(text.to_string());
            }
        }
    }

    Ok(names)
}

/// Maps an optional column name onto its header position.
fn resolve_column<'a>(
    headers: impl Iterator<Item = &'a str>,
    column: Option<&str>,
) -> Result<usize, String> {
    match column {
        None => Ok(0),
        Some(wanted) => headers
            .enumerate()
            .find(|(_, h)| h.trim() == wanted)
            .map(|(i, _)| i)
            .ok_or_else(|| format!("entity list has no column named '{}'", wanted)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
