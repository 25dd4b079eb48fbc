use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::constants::{DATE_COLUMN, LONG_FORMAT_TAIL, STOCK_COLUMN};
use crate::error::Result;
use crate::table::LongTable;

/// Output filename for the general flow: `<stem><suffix>_long_format.csv`.
pub fn long_format_filename(input: &Path, suffix: &str) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}{suffix}{LONG_FORMAT_TAIL}")
}

/// Write a long table as UTF-8 comma-delimited CSV with the header
/// `Date,Stock,<ValueLabel>` and no index column. Reruns overwrite.
pub fn write_long_csv(table: &LongTable, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([DATE_COLUMN, STOCK_COLUMN, table.value_label.as_str()])?;
    for record in &table.records {
        writer.write_record([
            record.date.as_str(),
            record.stock.as_str(),
            record.value.render().as_str(),
        ])?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = table.len(), "wrote long CSV");
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_keeps_stem_spaces_and_appends_tail() {
        let name = long_format_filename(Path::new("mkt cap.xlsx"), "_market_cap");
        assert_eq!(name, "mkt cap_market_cap_long_format.csv");
    }

    #[test]
    fn empty_suffix_is_allowed() {
        let name = long_format_filename(Path::new("data/stock price.xlsx"), "");
        assert_eq!(name, "stock price_long_format.csv");
    }
}
