use tracing::debug;

use crate::pipeline::detect::ColumnRoles;
use crate::table::{LongRecord, WideTable};

/// Unpivot a wide table into long records: one record per
/// (period, value-column) pair, so R rows × N value columns yield exactly
/// R×N records before any filtering.
///
/// Traversal is column-major (every period of the first value column, then
/// the second, and so on). Duplicate (period, stock) pairs pass through
/// untouched, and the identifier becomes `Date` in the output no matter
/// what the sheet called it.
pub fn melt(table: &WideTable, roles: &ColumnRoles) -> Vec<LongRecord> {
    let mut records = Vec::with_capacity(table.row_count() * roles.value_columns.len());

    for column in &roles.value_columns {
        for row in &table.rows {
            records.push(LongRecord {
                date: row[roles.identifier.index].render(),
                stock: column.label.clone(),
                value: row[column.index].clone(),
            });
        }
    }

    debug!(records = records.len(), "unpivoted wide table");
    records
}
