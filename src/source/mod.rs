// src/source/mod.rs
//! Spreadsheet reading: first sheet, first row as headers, one [`RawRow`] per
//! data row. Workbooks go through calamine, `.csv` through the csv crate, and
//! `.json` must hold an array of flat objects.

use anyhow::{anyhow, bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use serde_json::Value;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::ticket::{date::format_excel_serial, RawRow};

/// Read every data row of the sheet at `path`.
#[tracing::instrument(level = "info", skip(path), fields(file = %path.display()))]
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let rows = match ext.as_str() {
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path)?,
        other => bail!("unsupported spreadsheet format {:?} for {:?}", other, path),
    };
    info!(rows = rows.len(), "sheet read");
    Ok(rows)
}

/// [`read_rows`] on the blocking pool; resolves once with all rows or the error.
pub async fn read_rows_async(path: PathBuf) -> Result<Vec<RawRow>> {
    tokio::task::spawn_blocking(move || read_rows(&path))
        .await
        .context("spreadsheet reader task failed")?
}

fn read_workbook(path: &Path) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {:?}", path))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook {:?} has no sheets", path))?
        .with_context(|| format!("Failed to read first sheet of {:?}", path))?;

    let mut grid = range.rows();
    let headers: Vec<String> = match grid.next() {
        Some(cells) => cells.iter().map(|c| cell_text(c).unwrap_or_default()).collect(),
        None => return Ok(Vec::new()),
    };
    debug!(?headers, "workbook headers");

    Ok(rows_from_grid(
        &headers,
        grid.map(|cells| cells.iter().map(cell_text).collect()),
    ))
}

fn read_csv(path: &Path) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path))?;

    let mut records = rdr.records();
    let headers: Vec<String> = match records.next() {
        Some(first) => first
            .with_context(|| format!("CSV header parse error in {:?}", path))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect(),
        None => return Ok(Vec::new()),
    };
    debug!(?headers, "csv headers");

    let mut cells = Vec::new();
    for (idx, result) in records.enumerate() {
        let record =
            result.with_context(|| format!("CSV parse error in {:?} at record {}", path, idx + 1))?;
        cells.push(
            record
                .iter()
                .map(|s| (!s.is_empty()).then(|| s.to_string()))
                .collect::<Vec<_>>(),
        );
    }
    Ok(rows_from_grid(&headers, cells.into_iter()))
}

fn read_json(path: &Path) -> Result<Vec<RawRow>> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let objects: Vec<serde_json::Map<String, Value>> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {:?} as an array of row objects", path))?;

    Ok(objects
        .into_iter()
        .map(|obj| {
            obj.into_iter()
                .map(|(key, value)| {
                    let text = match value {
                        Value::Null => None,
                        Value::String(s) => Some(s),
                        other => Some(other.to_string()),
                    };
                    (key, text)
                })
                .collect()
        })
        .collect())
}

/// Zip data rows with `headers`. Columns with an empty header are dropped,
/// cells past the last header are ignored, and rows with no value at all are
/// skipped.
pub fn rows_from_grid<I>(headers: &[String], rows: I) -> Vec<RawRow>
where
    I: Iterator<Item = Vec<Option<String>>>,
{
    rows.filter(|cells| cells.iter().any(Option::is_some))
        .map(|cells| {
            let mut row = RawRow::new();
            for (i, header) in headers.iter().enumerate() {
                if header.is_empty() {
                    continue;
                }
                let cell = cells.get(i).cloned().flatten();
                row.insert(header.clone(), cell);
            }
            row
        })
        .filter(|row| row.values().any(Option::is_some))
        .collect()
}

/// Cell as display text. Date cells come out as ISO dates.
pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(v) => Some(v.to_string()),
        Data::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => Some(format!("{}", *v as i64)),
        Data::Float(v) => Some(v.to_string()),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => format_excel_serial(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Error(e) => Some(e.to_string()),
    }
}
