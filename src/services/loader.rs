// src/services/loader.rs
use calamine::{open_workbook_auto, Data, Reader as _};
use csv::{ReaderBuilder, Trim};
use log::{debug, error, info, warn};
use std::fmt;
use std::path::Path;

use crate::models::WideYieldTable;

/// Why a yield sheet could not be turned into a table.
#[derive(Debug)]
pub enum DataSourceError {
    NotFound(String),
    Io(std::io::Error),
    Csv(csv::Error),
    Workbook(calamine::Error),
    Unsupported(String),
    Malformed(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataSourceError::NotFound(path) => write!(f, "file not found: '{}'", path),
            DataSourceError::Io(e) => write!(f, "failed to read file: {}", e),
            DataSourceError::Csv(e) => write!(f, "failed to parse CSV: {}", e),
            DataSourceError::Workbook(e) => write!(f, "failed to parse workbook: {}", e),
            DataSourceError::Unsupported(ext) => write!(f, "unsupported file type: '{}'", ext),
            DataSourceError::Malformed(msg) => write!(f, "malformed yield sheet: {}", msg),
        }
    }
}

impl std::error::Error for DataSourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataSourceError::Io(e) => Some(e),
            DataSourceError::Csv(e) => Some(e),
            DataSourceError::Workbook(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DataSourceError {
    fn from(e: std::io::Error) -> Self {
        DataSourceError::Io(e)
    }
}

impl From<csv::Error> for DataSourceError {
    fn from(e: csv::Error) -> Self {
        DataSourceError::Csv(e)
    }
}

impl From<calamine::Error> for DataSourceError {
    fn from(e: calamine::Error) -> Self {
        DataSourceError::Workbook(e)
    }
}

/// Loads the yield sheet, substituting an empty table on any failure.
pub fn load(path: impl AsRef<Path>) -> WideYieldTable {
    let path = path.as_ref();
    match try_load(path) {
        Ok(table) => table,
        Err(e) => {
            error!("Error loading file '{}': {}", path.display(), e);
            WideYieldTable::empty()
        }
    }
}

pub fn try_load(path: impl AsRef<Path>) -> Result<WideYieldTable, DataSourceError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(DataSourceError::NotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    info!("Loading yield sheet from {}", path.display());
    let table = match ext.as_str() {
        "csv" | "txt" => read_delimited(path, b',')?,
        "tsv" => read_delimited(path, b'\t')?,
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path)?,
        other => return Err(DataSourceError::Unsupported(other.to_string())),
    };

    info!(
        "Loaded {} periods x {} tenors from {}",
        table.rows.len(),
        table.tenors.len(),
        path.display()
    );
    Ok(table)
}

fn parse_yield(raw: &str, period: &str, tenor: &str) -> Option<f64> {
    let cell = raw.trim().trim_end_matches('%').trim();
    if cell.is_empty() {
        return None;
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!("Non-numeric yield '{}' for {} / {} treated as missing", raw, period, tenor);
            None
        }
    }
}

fn table_from_headers(headers: Vec<String>) -> Result<WideYieldTable, DataSourceError> {
    let mut iter = headers.into_iter();
    let period_column = iter
        .next()
        .ok_or_else(|| DataSourceError::Malformed("missing header row".to_string()))?;
    let tenors: Vec<String> = iter.collect();
    if tenors.is_empty() {
        return Err(DataSourceError::Malformed(
            "no tenor columns after the period column".to_string(),
        ));
    }
    Ok(WideYieldTable::new(period_column, tenors))
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<WideYieldTable, DataSourceError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let mut table = table_from_headers(headers)?;

    for record in rdr.records() {
        let record = record?;
        if record.iter().all(|c| c.is_empty()) {
            debug!("Skipping blank row");
            continue;
        }
        // A blank label is kept; it simply has no timestamp.
        let period = record.get(0).unwrap_or_default().to_string();
        let yields = table
            .tenors
            .iter()
            .enumerate()
            .map(|(i, tenor)| record.get(i + 1).and_then(|c| parse_yield(c, &period, tenor)))
            .collect();
        table.push_row(period, yields);
    }
    Ok(table)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => ndt.format("%b %y").to_string(),
            None => dt.as_f64().to_string(),
        },
        other => other.to_string(),
    }
}

fn cell_yield(cell: &Data, period: &str, tenor: &str) -> Option<f64> {
    match cell {
        Data::Float(v) if v.is_finite() => Some(*v),
        Data::Int(v) => Some(*v as f64),
        Data::String(s) => parse_yield(s, period, tenor),
        Data::Empty => None,
        other => {
            warn!("Unexpected cell {:?} for {} / {} treated as missing", other, period, tenor);
            None
        }
    }
}

fn read_workbook(path: &Path) -> Result<WideYieldTable, DataSourceError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DataSourceError::Malformed("workbook has no worksheets".to_string()))??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| DataSourceError::Malformed("missing header row".to_string()))?
        .iter()
        .map(cell_text)
        .collect();
    let mut table = table_from_headers(headers)?;

    for cells in rows {
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            debug!("Skipping blank row");
            continue;
        }
        let period = cells.first().map(cell_text).unwrap_or_default();
        let yields = table
            .tenors
            .iter()
            .enumerate()
            .map(|(i, tenor)| cells.get(i + 1).and_then(|c| cell_yield(c, &period, tenor)))
            .collect();
        table.push_row(period, yields);
    }
    Ok(table)
}
