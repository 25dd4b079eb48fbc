pub mod coerce;
pub mod detect;
pub mod filter;
pub mod melt;

use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::Result;
use crate::table::{LongTable, WideTable};

pub use coerce::{CoercionMode, CoercionOutcome};
pub use detect::{ColumnRef, ColumnRoles, HeaderStrategy};

/// Everything that varies between the converter flows: what the value
/// column is called, how aggressively text becomes numeric, and where the
/// column labels come from. One pipeline, parameterized, instead of three
/// near-duplicate ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub value_label: String,
    pub coercion: CoercionMode,
    pub header: HeaderStrategy,
}

impl PipelineConfig {
    pub fn new(
        value_label: impl Into<String>,
        coercion: CoercionMode,
        header: HeaderStrategy,
    ) -> Self {
        Self {
            value_label: value_label.into(),
            coercion,
            header,
        }
    }

    /// The general converter flow: positional headers, thresholded
    /// coercion.
    pub fn thresholded(value_label: impl Into<String>) -> Self {
        Self::new(value_label, CoercionMode::Thresholded, HeaderStrategy::Positional)
    }
}

/// Counts collected along one pipeline run. The reporting layer renders
/// these; the core only supplies the numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReshapeStats {
    /// Data rows of the wide table after header handling.
    pub periods: usize,
    /// Value (stock) columns.
    pub stocks: usize,
    /// Records produced by the unpivot, before any cleaning.
    pub records_before_filter: usize,
    /// Records removed by the sentinel filter.
    pub sentinel_removed: usize,
    /// Records dropped by a committed coercion.
    pub coercion_dropped: usize,
    /// Records surviving the whole pipeline.
    pub final_rows: usize,
    /// Lexicographic min/max of the identifier column, for display.
    pub period_range: Option<(String, String)>,
    pub coercion: CoercionOutcome,
}

impl ReshapeStats {
    /// Total rows removed between unpivot and output.
    pub fn removed_total(&self) -> usize {
        self.sentinel_removed + self.coercion_dropped
    }
}

/// The reshape-and-clean pipeline: header handling, column role detection,
/// unpivot, sentinel filtering, numeric coercion.
pub struct ReshapePipeline {
    config: PipelineConfig,
}

impl ReshapePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline over a loaded wide table.
    #[instrument(skip(self, table), fields(value = %self.config.value_label))]
    pub fn run(&self, mut table: WideTable) -> Result<(LongTable, ReshapeStats)> {
        counter!("reshape_pipeline_runs_total", "value" => self.config.value_label.clone())
            .increment(1);
        let started = std::time::Instant::now();

        if self.config.header == HeaderStrategy::OffsetCorrected {
            detect::promote_first_row(&mut table)?;
        }
        let roles = detect::detect_columns(&table)?;

        let periods = table.row_count();
        let stocks = roles.value_columns.len();
        let period_range = period_range(&table, roles.identifier.index);
        info!(periods, stocks, "detected wide layout");

        let records = melt::melt(&table, &roles);
        let records_before_filter = records.len();

        let (records, sentinel_removed) = filter::drop_sentinels(records);
        let (records, coercion) = coerce::coerce_numeric(records, self.config.coercion);

        let coercion_dropped = match coercion {
            CoercionOutcome::Committed { dropped, .. } => dropped,
            _ => 0,
        };
        let final_rows = records.len();
        info!(
            records_before_filter,
            sentinel_removed, coercion_dropped, final_rows, "pipeline finished"
        );

        histogram!("reshape_pipeline_duration_seconds", "value" => self.config.value_label.clone())
            .record(started.elapsed().as_secs_f64());

        let table = LongTable {
            value_label: self.config.value_label.clone(),
            records,
        };
        let stats = ReshapeStats {
            periods,
            stocks,
            records_before_filter,
            sentinel_removed,
            coercion_dropped,
            final_rows,
            period_range,
            coercion,
        };
        Ok((table, stats))
    }
}

fn period_range(table: &WideTable, identifier: usize) -> Option<(String, String)> {
    let mut labels = table
        .rows
        .iter()
        .map(|row| row[identifier].render())
        .filter(|label| !label.is_empty());
    let first = labels.next()?;
    let (min, max) = labels.fold((first.clone(), first), |(min, max), label| {
        (
            if label < min { label.clone() } else { min },
            if label > max { label } else { max },
        )
    });
    Some((min, max))
}
