use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::{BatchConfig, FileSpec};
use crate::error::Result;
use crate::pipeline::{ReshapePipeline, ReshapeStats};
use crate::reader::TableSource;
use crate::stats::{thousands, DatasetSummary};
use crate::table::LongTable;
use crate::writer;

/// Everything a successful single-file conversion produces.
#[derive(Debug)]
pub struct ConversionOutput {
    pub table: LongTable,
    pub stats: ReshapeStats,
    pub summary: DatasetSummary,
    pub output_path: PathBuf,
}

/// Per-file outcome of a batch run. Created once, never mutated,
/// aggregated into the report and then discarded with it.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub original_file: String,
    pub output_file: Option<String>,
    pub description: String,
    pub row_count: usize,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionResult {
    fn failure(spec: &FileSpec, error: Option<String>) -> Self {
        Self {
            original_file: spec.file.clone(),
            output_file: None,
            description: spec.description.clone(),
            row_count: 0,
            success: false,
            error,
        }
    }
}

/// Aggregated outcome of one batch run.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub successful: usize,
    pub total: usize,
    pub total_rows: usize,
    pub results: Vec<ConversionResult>,
}

/// Convert a single configured file: load, reshape, write, summarize.
/// Progress is narrated to the console; counts come back structured.
pub fn convert_file(
    spec: &FileSpec,
    output_dir: &Path,
    source: &dyn TableSource,
) -> Result<ConversionOutput> {
    println!("📊 Converting {}...", spec.file);
    info!(file = %spec.file, value = %spec.value_label, "starting conversion");

    println!("📂 Reading spreadsheet...");
    let wide = source.load(Path::new(&spec.file))?;

    println!("🔄 Converting to long format...");
    let pipeline = ReshapePipeline::new(spec.pipeline_config());
    let (long, stats) = pipeline.run(wide)?;

    println!(
        "📈 Found {} rows × {} stocks",
        thousands(stats.periods),
        thousands(stats.stocks)
    );
    if let Some((min, max)) = &stats.period_range {
        println!("📅 Period range: {min} to {max}");
    }

    println!("🧹 Cleaning data...");
    println!(
        "🗑️  Removed {} empty/invalid rows",
        thousands(stats.removed_total())
    );
    println!(
        "✅ Conversion complete! {} data points created",
        thousands(stats.final_rows)
    );

    let filename = spec
        .fixed_output
        .clone()
        .unwrap_or_else(|| writer::long_format_filename(Path::new(&spec.file), &spec.suffix));
    let target = output_dir.join(filename);
    println!("💾 Saving to {}...", target.display());
    let output_path = writer::write_long_csv(&long, &target)?;
    println!("✅ CSV file saved successfully!");

    let summary = DatasetSummary::from_table(&long);
    render_conversion_summary(&long, &summary);

    if let Ok(meta) = fs::metadata(&output_path) {
        println!("\n📁 File size: {:.1} MB", meta.len() as f64 / (1024.0 * 1024.0));
    }

    Ok(ConversionOutput {
        table: long,
        stats,
        summary,
        output_path,
    })
}

fn render_conversion_summary(table: &LongTable, summary: &DatasetSummary) {
    println!("\n📊 Dataset Summary:");
    println!("   Total data points: {}", thousands(summary.total_rows));
    println!("   Unique stocks: {}", thousands(summary.unique_stocks));
    println!("   Unique dates/periods: {}", thousands(summary.unique_dates));
    if let Some((min, max)) = &summary.date_range {
        println!("   Date range: {min} to {max}");
    }

    println!("\n📋 Sample of converted data:");
    for record in table.head(5) {
        println!(
            "   {} | {} | {}",
            record.date,
            record.stock,
            record.value.render()
        );
    }

    if let Some(stats) = &summary.value_stats {
        println!("\n📈 {} Statistics:", table.value_label);
        println!("   Min: {:.2}", stats.min);
        println!("   Max: {:.2}", stats.max);
        println!("   Mean: {:.2}", stats.mean);
        println!("   Median: {:.2}", stats.median);
    }
}

/// Walk the configured conversions in order. A missing or failing file is
/// recorded and the batch moves on; one bad input never aborts the run.
pub fn run_batch(config: &BatchConfig, output_dir: &Path, source: &dyn TableSource) -> BatchReport {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    counter!("reshape_batch_runs_total").increment(1);
    info!(%run_id, files = config.entries.len(), "starting batch conversion");

    let mut results = Vec::with_capacity(config.entries.len());
    for spec in &config.entries {
        let span = tracing::info_span!("converting", file = %spec.file);
        let _enter = span.enter();

        if !source.exists(Path::new(&spec.file)) {
            warn!("input file missing");
            println!("⚠️  File not found: {}", spec.file);
            results.push(ConversionResult::failure(spec, None));
            continue;
        }

        println!("\n📁 Processing: {}", spec.description);
        println!("{}", "-".repeat(40));

        match convert_file(spec, output_dir, source) {
            Ok(output) => {
                results.push(ConversionResult {
                    original_file: spec.file.clone(),
                    output_file: Some(output.output_path.display().to_string()),
                    description: spec.description.clone(),
                    row_count: output.table.len(),
                    success: true,
                    error: None,
                });
            }
            Err(e) => {
                error!("conversion failed: {e}");
                println!("❌ Error processing {}: {}", spec.file, e);
                results.push(ConversionResult::failure(spec, Some(e.to_string())));
            }
        }
    }

    let successful = results.iter().filter(|r| r.success).count();
    let total_rows = results
        .iter()
        .filter(|r| r.success)
        .map(|r| r.row_count)
        .sum();
    counter!("reshape_files_converted_total").increment(successful as u64);

    BatchReport {
        run_id,
        started_at,
        finished_at: Utc::now(),
        successful,
        total: results.len(),
        total_rows,
        results,
    }
}

/// Render the end-of-batch summary block.
pub fn render_report(report: &BatchReport) {
    println!("\n{}", "=".repeat(60));
    println!("📋 CONVERSION SUMMARY REPORT");
    println!("{}", "=".repeat(60));

    for result in &report.results {
        let status = if result.success {
            "✅ SUCCESS"
        } else {
            "❌ FAILED "
        };
        let rows_text = if result.success {
            format!("{} rows", thousands(result.row_count))
        } else {
            "0 rows".to_string()
        };
        println!("{} | {:<25} | {}", status, result.description, rows_text);
        if let Some(output) = &result.output_file {
            println!("          📄 Output: {output}");
        }
        if let Some(error) = &result.error {
            println!("          ❌ Error: {error}");
        }
    }

    println!("{}", "-".repeat(60));
    println!(
        "📊 Summary: {}/{} files converted successfully",
        report.successful, report.total
    );
    println!(
        "📈 Total data points created: {}",
        thousands(report.total_rows)
    );
}

/// Persist the batch report as pretty JSON next to the outputs.
pub fn persist_report(report: &BatchReport, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let timestamp = report.started_at.format("%Y%m%d_%H%M%S");
    let filename = format!("conversion_report_{timestamp}.json");
    let filepath = output_dir.join(filename);

    let json_content = serde_json::to_string_pretty(report)?;
    fs::write(&filepath, json_content)?;

    info!(path = %filepath.display(), "persisted batch report");
    Ok(filepath)
}
