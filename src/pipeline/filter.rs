use tracing::debug;

use crate::constants::SENTINEL_DASH;
use crate::table::{Cell, LongRecord};

fn is_sentinel(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => true,
        Cell::Text(s) => s.is_empty() || s == SENTINEL_DASH,
        Cell::Number(_) => false,
    }
}

/// Drop records whose value is missing: a blank cell, the literal `-`, or
/// the empty string. Pure row removal; returns the surviving records and
/// how many were removed.
pub fn drop_sentinels(records: Vec<LongRecord>) -> (Vec<LongRecord>, usize) {
    let before = records.len();
    let kept: Vec<LongRecord> = records
        .into_iter()
        .filter(|record| !is_sentinel(&record.value))
        .collect();
    let removed = before - kept.len();

    debug!(removed, kept = kept.len(), "dropped sentinel values");
    (kept, removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(value: Cell) -> LongRecord {
        LongRecord {
            date: "2020-01-02".into(),
            stock: "1101 台泥".into(),
            value,
        }
    }

    #[test]
    fn removes_empty_dash_and_blank_values() {
        let records = vec![
            record(Cell::Number(43.5)),
            record(Cell::Empty),
            record(Cell::Text("-".into())),
            record(Cell::Text(String::new())),
            record(Cell::Text("ok".into())),
        ];
        let (kept, removed) = drop_sentinels(records);
        assert_eq!(removed, 3);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = vec![
            record(Cell::Number(1.0)),
            record(Cell::Text("-".into())),
            record(Cell::Text("x".into())),
        ];
        let (once, removed_once) = drop_sentinels(records);
        assert_eq!(removed_once, 1);
        let (twice, removed_twice) = drop_sentinels(once.clone());
        assert_eq!(removed_twice, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn dash_inside_text_is_not_a_sentinel() {
        let (kept, removed) = drop_sentinels(vec![record(Cell::Text("2020-01-02".into()))]);
        assert_eq!(removed, 0);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn zero_is_kept() {
        let (kept, removed) = drop_sentinels(vec![record(Cell::Number(0.0))]);
        assert_eq!(removed, 0);
        assert_eq!(kept.len(), 1);
    }
}
