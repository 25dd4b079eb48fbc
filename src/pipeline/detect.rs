use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ReshapeError, Result};
use crate::table::WideTable;

/// A column identified by position, with the label it carried at detection
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub index: usize,
    pub label: String,
}

/// The detected role split of a wide table: one identifier column plus the
/// ordered value columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoles {
    pub identifier: ColumnRef,
    pub value_columns: Vec<ColumnRef>,
}

/// How column labels are derived from a loaded table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStrategy {
    /// Labels come from the sheet's header row; position alone decides
    /// roles.
    #[default]
    Positional,
    /// The first data row carries the real labels (quarterly exports ship a
    /// secondary header). Promote it before detecting roles.
    OffsetCorrected,
}

/// Split a table into identifier and value columns by position. The first
/// column is always the identifier; no header-name matching.
pub fn detect_columns(table: &WideTable) -> Result<ColumnRoles> {
    let mut labels = table.columns.iter();
    let identifier = match labels.next() {
        Some(label) => ColumnRef {
            index: 0,
            label: label.clone(),
        },
        None => {
            return Err(ReshapeError::Structure(
                "table has no columns".to_string(),
            ))
        }
    };

    let value_columns = labels
        .enumerate()
        .map(|(i, label)| ColumnRef {
            index: i + 1,
            label: label.clone(),
        })
        .collect();

    debug!(identifier = %identifier.label, "detected column roles");
    Ok(ColumnRoles {
        identifier,
        value_columns,
    })
}

/// Reinterpret row 0 as the authoritative header: capture its cells as the
/// column labels and drop it from the data body.
///
/// The layout assumption is not validated; a file without the secondary
/// header comes out silently mislabeled, exactly like the permissive
/// original flow. We log a warning when row 0 smells wrong (a real header
/// starts with a period label, not a number) but still proceed.
pub fn promote_first_row(table: &mut WideTable) -> Result<()> {
    if table.rows.is_empty() {
        return Err(ReshapeError::Structure(
            "cannot promote a header row from an empty table".to_string(),
        ));
    }

    let header = table.rows.remove(0);
    let labels: Vec<String> = header.iter().map(|cell| cell.render()).collect();

    if let Some(first) = labels.first() {
        if first.trim().parse::<f64>().is_ok() {
            warn!(
                label = %first,
                "promoted row 0 starts with a numeric label; file may lack a secondary header"
            );
        }
    }

    table.columns = labels;
    Ok(())
}
