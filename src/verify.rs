use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::constants::{DATE_COLUMN, STOCK_COLUMN};
use crate::error::Result;
use crate::reader;
use crate::stats::{self, DatasetSummary};
use crate::table::{LongRecord, LongTable};

/// What a reloaded output file looks like, for spot-checking conversions
/// after the fact.
#[derive(Debug, Serialize)]
pub struct VerifyReport {
    pub file: String,
    pub columns: Vec<String>,
    pub summary: DatasetSummary,
    pub sample: Vec<LongRecord>,
    pub top_stocks: Vec<(String, usize)>,
    /// Drill-down for the most data-rich stock, when the file has any rows.
    pub sample_stock: Option<(String, DatasetSummary)>,
}

/// Reload a previously produced long-format CSV and recompute its
/// descriptive statistics.
pub fn verify_output(path: &Path) -> Result<VerifyReport> {
    let table = reader::load_long_csv(path)?;
    info!(path = %path.display(), rows = table.len(), "verifying output");

    Ok(VerifyReport {
        file: path.display().to_string(),
        columns: vec![
            DATE_COLUMN.to_string(),
            STOCK_COLUMN.to_string(),
            table.value_label.clone(),
        ],
        summary: DatasetSummary::from_table(&table),
        sample: table.head(5).to_vec(),
        top_stocks: stats::top_stocks(&table, 10),
        sample_stock: sample_stock_analysis(&table),
    })
}

/// Per-stock drill-down for the most data-rich stock of a reloaded table,
/// mirroring the quick-analysis sample the converter used to print.
pub fn sample_stock_analysis(table: &LongTable) -> Option<(String, DatasetSummary)> {
    let (stock, _) = stats::top_stocks(table, 1).into_iter().next()?;
    let records: Vec<LongRecord> = stats::records_for_stock(table, &stock)
        .into_iter()
        .cloned()
        .collect();
    let narrowed = LongTable {
        value_label: table.value_label.clone(),
        records,
    };
    Some((stock, DatasetSummary::from_table(&narrowed)))
}
