use std::collections::HashSet;

use serde::Serialize;

use crate::table::{LongRecord, LongTable};

/// Min/max/mean/median over a numeric value column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl ValueStats {
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };
        Some(Self {
            min,
            max,
            mean,
            median,
        })
    }
}

/// Descriptive summary of a long table. The core supplies these numbers;
/// the console layer decides how to show them.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub total_rows: usize,
    pub unique_stocks: usize,
    pub unique_dates: usize,
    /// Lexicographic min/max of the date column.
    pub date_range: Option<(String, String)>,
    /// Present only when every surviving value is numeric.
    pub value_stats: Option<ValueStats>,
}

impl DatasetSummary {
    pub fn from_table(table: &LongTable) -> Self {
        let mut stocks = HashSet::new();
        let mut dates = HashSet::new();
        for record in &table.records {
            stocks.insert(record.stock.as_str());
            dates.insert(record.date.as_str());
        }

        let date_range = {
            let min = dates.iter().min();
            let max = dates.iter().max();
            min.zip(max).map(|(min, max)| (min.to_string(), max.to_string()))
        };

        let numeric: Vec<f64> = table
            .records
            .iter()
            .filter_map(|r| r.value.as_number())
            .collect();
        let value_stats = if !table.is_empty() && numeric.len() == table.len() {
            ValueStats::compute(&numeric)
        } else {
            None
        };

        Self {
            total_rows: table.len(),
            unique_stocks: stocks.len(),
            unique_dates: dates.len(),
            date_range,
            value_stats,
        }
    }
}

/// Render a count with thousands separators for the console layer.
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Stocks ranked by how many data points they carry, descending; ties
/// break alphabetically so the ranking is stable.
pub fn top_stocks(table: &LongTable, n: usize) -> Vec<(String, usize)> {
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for record in &table.records {
        *counts.entry(record.stock.as_str()).or_default() += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(stock, count)| (stock.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

/// Records for a single stock, in table order. Used by the verification
/// helper's per-stock breakdown.
pub fn records_for_stock<'a>(table: &'a LongTable, stock: &str) -> Vec<&'a LongRecord> {
    table
        .records
        .iter()
        .filter(|record| record.stock == stock)
        .collect()
}
