use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{debug, info};

use crate::error::{ReshapeError, Result};
use crate::table::{Cell, LongRecord, LongTable, WideTable};

/// Input boundary for wide tables. Implementations must preserve column
/// order and the stored text/numeric representation of every cell.
pub trait TableSource {
    fn exists(&self, path: &Path) -> bool;
    fn load(&self, path: &Path) -> Result<WideTable>;
}

/// The calamine-backed source used in production.
pub struct SpreadsheetSource;

impl TableSource for SpreadsheetSource {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn load(&self, path: &Path) -> Result<WideTable> {
        load_wide_table(path)
    }
}

/// In-memory source for development/testing.
#[derive(Default)]
pub struct InMemorySource {
    tables: HashMap<PathBuf, WideTable>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, table: WideTable) {
        self.tables.insert(path.into(), table);
    }
}

impl TableSource for InMemorySource {
    fn exists(&self, path: &Path) -> bool {
        self.tables.contains_key(path)
    }

    fn load(&self, path: &Path) -> Result<WideTable> {
        self.tables
            .get(path)
            .cloned()
            .ok_or_else(|| ReshapeError::MissingInput(path.display().to_string()))
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        // Formula errors (#N/A and friends) carry no data
        Data::Error(_) => Cell::Empty,
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(when) if when.time() == chrono::NaiveTime::MIN => {
                Cell::Text(when.date().format("%Y-%m-%d").to_string())
            }
            Some(when) => Cell::Text(when.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::Empty,
        },
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Load the first sheet of a workbook into a wide table: row 0 becomes the
/// column labels, everything below becomes data. Column order and the
/// stored text/numeric representation of each cell are preserved.
pub fn load_wide_table(path: &Path) -> Result<WideTable> {
    if !path.exists() {
        return Err(ReshapeError::MissingInput(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReshapeError::EmptySheet(path.display().to_string()))??;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|data| cell_from_data(data).render()).collect(),
        None => return Err(ReshapeError::EmptySheet(path.display().to_string())),
    };

    let body: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    let table = WideTable::new(columns, body);
    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "loaded wide table"
    );
    Ok(table)
}

/// Reload a previously written long-format CSV. Numeric-looking values come
/// back as numbers (CSV does not record the original storage type), which
/// is the type widening the round-trip contract allows.
pub fn load_long_csv(path: &Path) -> Result<LongTable> {
    if !path.exists() {
        return Err(ReshapeError::MissingInput(path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let value_label = headers.get(2).unwrap_or("Value").to_string();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let raw = row.get(2).unwrap_or_default();
        let value = if raw.is_empty() {
            Cell::Empty
        } else if let Ok(n) = raw.parse::<f64>() {
            Cell::Number(n)
        } else {
            Cell::Text(raw.to_string())
        };
        records.push(LongRecord {
            date: row.get(0).unwrap_or_default().to_string(),
            stock: row.get(1).unwrap_or_default().to_string(),
            value,
        });
    }

    debug!(path = %path.display(), rows = records.len(), "reloaded long CSV");
    Ok(LongTable {
        value_label,
        records,
    })
}
