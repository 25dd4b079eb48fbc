use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{error, info};

use twstock_reshaper::batch;
use twstock_reshaper::config::{BatchConfig, FileSpec, DEFAULT_BATCH};
use twstock_reshaper::constants::{
    ANNOUNCEMENT_FIXED_OUTPUT, BOOK_VALUE_FIXED_OUTPUT, PRICE_FIXED_OUTPUT,
};
use twstock_reshaper::error::ReshapeError;
use twstock_reshaper::logging;
use twstock_reshaper::pipeline::{CoercionMode, HeaderStrategy};
use twstock_reshaper::reader::SpreadsheetSource;
use twstock_reshaper::stats::thousands;
use twstock_reshaper::verify::{self, VerifyReport};
use twstock_reshaper::writer;

#[derive(Parser)]
#[command(name = "twstock_reshaper")]
#[command(about = "Taiwan stock market wide-to-long data converter")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single wide-format spreadsheet to long-format CSV
    Convert {
        /// Input spreadsheet path
        file: PathBuf,
        /// Suffix added to the output filename (e.g. "_prices")
        #[arg(long, default_value = "")]
        suffix: String,
        /// Header of the value column in the output
        #[arg(long, default_value = "Value")]
        value_name: String,
        /// Directory the CSV is written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
        /// Write to the fixed taiwan_stocks_long_format.csv name instead
        #[arg(long)]
        fixed_name: bool,
    },
    /// Convert all configured stock data files and print a summary report
    Batch {
        /// TOML file listing the conversions (defaults to the built-in set)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory the CSVs and the report are written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Fix the quarterly files whose first data row is the real header
    FixQuarterly {
        /// Directory the fixed CSVs are written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Reload produced output files and print descriptive statistics
    Verify {
        /// CSV files to check (defaults to the standard outputs)
        files: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let source = SpreadsheetSource;

    match cli.command {
        Commands::Convert {
            file,
            suffix,
            value_name,
            output_dir,
            fixed_name,
        } => {
            println!("📊 Taiwan Stock Data Converter");
            println!("{}", "=".repeat(50));

            let spec = FileSpec {
                file: file.display().to_string(),
                suffix,
                value_label: value_name,
                description: file.display().to_string(),
                coercion: CoercionMode::Thresholded,
                header: HeaderStrategy::Positional,
                fixed_output: fixed_name.then(|| PRICE_FIXED_OUTPUT.to_string()),
            };
            let output = batch::convert_file(&spec, &output_dir, &source)?;
            info!(rows = output.table.len(), "conversion finished");

            println!("\n🎉 Conversion completed successfully!");
            println!("📄 Your CSV file is ready to use for analysis!");
        }
        Commands::Batch { config, output_dir } => {
            println!("🔄 Taiwan Stock Data Multi-File Converter");
            println!("{}", "=".repeat(50));

            let config = match config {
                Some(path) => BatchConfig::from_toml_file(&path)?,
                None => DEFAULT_BATCH.clone(),
            };

            println!("🚀 Starting batch conversion of all stock data files...");
            println!("{}", "=".repeat(60));

            let report = batch::run_batch(&config, &output_dir, &source);
            batch::render_report(&report);

            match batch::persist_report(&report, &output_dir) {
                Ok(path) => println!("📄 Report saved to {}", path.display()),
                Err(e) => error!("failed to persist batch report: {e}"),
            }
            println!("\n🎉 Batch conversion completed!");
        }
        Commands::FixQuarterly { output_dir } => {
            println!("🔧 Taiwan Stock Data - Fix Column Issues");
            println!("{}", "=".repeat(50));
            println!("🔧 Fixing quarterly data files...");

            let config = BatchConfig::quarterly_fix_set();
            let report = batch::run_batch(&config, &output_dir, &source);
            batch::render_report(&report);

            // Quick check that the daily files converted correctly
            println!("\n🔍 Verifying daily data files...");
            let daily: Vec<PathBuf> = DEFAULT_BATCH
                .entries
                .iter()
                .skip(1)
                .take(2)
                .map(|spec| {
                    output_dir.join(writer::long_format_filename(
                        Path::new(&spec.file),
                        &spec.suffix,
                    ))
                })
                .collect();
            verify_files(&daily);

            println!("\n🎉 All files should now be properly formatted!");
        }
        Commands::Verify { files } => {
            println!("🔍 Loading CSV outputs for quick analysis...");
            let files = if files.is_empty() {
                default_verify_set()
            } else {
                files
            };
            verify_files(&files);
        }
    }
    Ok(())
}

/// The outputs a full run of the converter leaves behind.
fn default_verify_set() -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = DEFAULT_BATCH
        .entries
        .iter()
        .map(|spec| PathBuf::from(writer::long_format_filename(Path::new(&spec.file), &spec.suffix)))
        .collect();
    files.push(PathBuf::from(ANNOUNCEMENT_FIXED_OUTPUT));
    files.push(PathBuf::from(BOOK_VALUE_FIXED_OUTPUT));
    files
}

fn verify_files(files: &[PathBuf]) {
    for file in files {
        match verify::verify_output(file) {
            Ok(report) => render_verify(&report),
            Err(ReshapeError::MissingInput(path)) => {
                println!("❌ File not found: {path}");
            }
            Err(e) => {
                error!("verification failed for {}: {e}", file.display());
                println!("❌ Error reading {}: {e}", file.display());
            }
        }
    }
}

fn render_verify(report: &VerifyReport) {
    println!("\n📊 {}:", report.file);
    println!("   Rows: {}", thousands(report.summary.total_rows));
    println!("   Columns: {:?}", report.columns);
    println!("   Unique dates: {}", thousands(report.summary.unique_dates));
    println!("   Unique stocks: {}", thousands(report.summary.unique_stocks));

    println!("   Sample:");
    for record in &report.sample {
        println!(
            "   {} | {} | {}",
            record.date,
            record.stock,
            record.value.render()
        );
    }

    if !report.top_stocks.is_empty() {
        println!("\n🏆 Top stocks by data availability:");
        for (stock, count) in &report.top_stocks {
            println!("   {}: {} data points", stock, thousands(*count));
        }
    }

    if let Some((stock, summary)) = &report.sample_stock {
        println!("\n📈 Sample analysis for {stock}:");
        if let Some((min, max)) = &summary.date_range {
            println!("   Date range: {min} to {max}");
        }
        if let Some(stats) = &summary.value_stats {
            println!("   Value range: {:.2} to {:.2}", stats.min, stats.max);
            println!("   Average value: {:.2}", stats.mean);
        }
    }
}
