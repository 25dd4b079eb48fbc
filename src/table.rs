use serde::{Deserialize, Serialize};

/// A single spreadsheet cell in the representation it was stored with.
/// Text stays text and numbers stay numeric so the coercion step can tell
/// whether a value column originated as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric payload if this cell is stored numeric. No parsing happens
    /// here; text that looks like a number is still text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Render the cell the way it appears in CSV output. Integral floats
    /// print without a fractional part ("63292145", not "63292145.0").
    pub fn render(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
        }
    }
}

/// A loaded spreadsheet in wide layout: one row per period, one column per
/// stock. The first column is always the period identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WideTable {
    /// Column labels in sheet order. `columns[0]` is the identifier label.
    pub columns: Vec<String>,
    /// Row-major cells. Every row holds exactly `columns.len()` cells.
    pub rows: Vec<Vec<Cell>>,
}

impl WideTable {
    /// Build a table, padding short rows with empty cells so the width
    /// invariant holds.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, Cell::Empty);
        }
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// One date-stock-value triple of the long layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    pub date: String,
    pub stock: String,
    pub value: Cell,
}

/// An ordered sequence of long records plus the configured value label.
/// Record order follows the unpivot traversal and carries no meaning
/// beyond head-N display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTable {
    pub value_label: String,
    pub records: Vec<LongRecord>,
}

impl LongTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn head(&self, n: usize) -> &[LongRecord] {
        &self.records[..self.records.len().min(n)]
    }
}
