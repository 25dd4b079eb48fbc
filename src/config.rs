use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ReshapeError, Result};
use crate::pipeline::{CoercionMode, HeaderStrategy, PipelineConfig};

/// One configured conversion: which file, what to call the value column,
/// and which pipeline variant to run it through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    /// Input spreadsheet path.
    pub file: String,
    /// Suffix inserted into the generated output filename.
    #[serde(default)]
    pub suffix: String,
    /// Header of the value column in the output (`Price`, `Volume`, ...).
    pub value_label: String,
    /// Human-readable name used in progress and summary lines.
    pub description: String,
    #[serde(default)]
    pub coercion: CoercionMode,
    #[serde(default)]
    pub header: HeaderStrategy,
    /// Overrides the generated `<stem><suffix>_long_format.csv` name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_output: Option<String>,
}

impl FileSpec {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new(self.value_label.clone(), self.coercion, self.header)
    }
}

/// The ordered list of conversions a batch run walks through. Passed into
/// the driver explicitly so the pipeline stays decoupled from any fixed
/// file set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(rename = "files")]
    pub entries: Vec<FileSpec>,
}

/// The five-file set the Taiwan stock exports ship with.
pub static DEFAULT_BATCH: Lazy<BatchConfig> = Lazy::new(BatchConfig::default_taiwan_set);

impl BatchConfig {
    pub fn default_taiwan_set() -> Self {
        let entry = |file: &str, suffix: &str, value_label: &str, description: &str| FileSpec {
            file: file.to_string(),
            suffix: suffix.to_string(),
            value_label: value_label.to_string(),
            description: description.to_string(),
            coercion: CoercionMode::Thresholded,
            header: HeaderStrategy::Positional,
            fixed_output: None,
        };
        Self {
            entries: vec![
                entry(PRICE_FILE, "_prices", PRICE_LABEL, "Stock Prices"),
                entry(VOLUME_FILE, "_volume", VOLUME_LABEL, "Trading Volume"),
                entry(
                    MARKET_CAP_FILE,
                    "_market_cap",
                    MARKET_CAP_LABEL,
                    "Market Capitalization",
                ),
                entry(
                    BOOK_VALUE_FILE,
                    "_book_value",
                    BOOK_VALUE_LABEL,
                    "Book Value (Quarterly)",
                ),
                entry(
                    ANNOUNCEMENT_FILE,
                    "_announcement",
                    ANNOUNCEMENT_LABEL,
                    "Announcement Dates",
                ),
            ],
        }
    }

    /// The two quarterly files whose first data row is the real header.
    /// Book values are known numeric, so their coercion skips the gate;
    /// announcement dates stay text.
    pub fn quarterly_fix_set() -> Self {
        Self {
            entries: vec![
                FileSpec {
                    file: ANNOUNCEMENT_FILE.to_string(),
                    suffix: String::new(),
                    value_label: ANNOUNCEMENT_LABEL.to_string(),
                    description: "Announcement Dates (fixed)".to_string(),
                    coercion: CoercionMode::Off,
                    header: HeaderStrategy::OffsetCorrected,
                    fixed_output: Some(ANNOUNCEMENT_FIXED_OUTPUT.to_string()),
                },
                FileSpec {
                    file: BOOK_VALUE_FILE.to_string(),
                    suffix: String::new(),
                    value_label: BOOK_VALUE_LABEL.to_string(),
                    description: "Book Values (fixed)".to_string(),
                    coercion: CoercionMode::Unconditional,
                    header: HeaderStrategy::OffsetCorrected,
                    fixed_output: Some(BOOK_VALUE_FIXED_OUTPUT.to_string()),
                },
            ],
        }
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ReshapeError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: BatchConfig = toml::from_str(&content)?;
        if config.entries.is_empty() {
            return Err(ReshapeError::Config(format!(
                "config file '{}' lists no files",
                path.display()
            )));
        }
        Ok(config)
    }
}
