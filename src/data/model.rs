use std::collections::BTreeMap;
use std::fmt;

use super::error::{DataError, Stage};

// ---------------------------------------------------------------------------
// Cell – a single value in a column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a listings file carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Null => write!(f, "<null>"),
        }
    }
}

impl Cell {
    /// Interpret the cell as a number. NaN counts as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) if !v.is_nan() => Some(*v),
            Cell::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null) || matches!(self, Cell::Float(v) if v.is_nan())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// One listing as loaded: column_name → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    cells: BTreeMap<String, Cell>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }

    pub fn set(&mut self, column: &str, value: Cell) {
        self.cells.insert(column.to_string(), value);
    }

    pub fn remove(&mut self, column: &str) -> Option<Cell> {
        self.cells.remove(column)
    }

    /// Numeric value of `column`, `None` when absent, null or text.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.cells.get(column).and_then(Cell::as_f64)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.cells.get(column).and_then(Cell::as_text)
    }
}

// ---------------------------------------------------------------------------
// Frame – the table flowing through the cleaning pipeline
// ---------------------------------------------------------------------------

/// Row-oriented table with an ordered schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    column_names: Vec<String>,
    records: Vec<Record>,
}

impl Frame {
    /// Build a frame from rows laid out in `column_names` order.
    /// Rows shorter than the schema are padded with nulls.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let records = rows
            .into_iter()
            .map(|row| {
                let mut cells: BTreeMap<String, Cell> = column_names
                    .iter()
                    .map(|c| (c.clone(), Cell::Null))
                    .collect();
                for (name, cell) in column_names.iter().zip(row) {
                    cells.insert(name.clone(), cell);
                }
                Record { cells }
            })
            .collect();
        Frame {
            column_names,
            records,
        }
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    /// Fail with the column named if the schema lacks it.
    pub fn require_column(&self, column: &str, stage: Stage) -> Result<(), DataError> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(DataError::missing(column, stage))
        }
    }

    pub fn require_columns(&self, columns: &[&str], stage: Stage) -> Result<(), DataError> {
        columns
            .iter()
            .try_for_each(|c| self.require_column(c, stage))
    }

    /// Remove a column from the schema and every row. Returns whether it existed.
    pub fn drop_column(&mut self, column: &str) -> bool {
        let Some(pos) = self.column_names.iter().position(|c| c == column) else {
            return false;
        };
        self.column_names.remove(pos);
        for record in &mut self.records {
            record.remove(column);
        }
        true
    }

    /// Keep only the rows matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&Record) -> bool) {
        self.records.retain(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::from_rows(
            vec!["a".into(), "b".into()],
            vec![
                vec![Cell::Integer(1), Cell::Text("x".into())],
                vec![Cell::Float(f64::NAN)],
            ],
        )
    }

    #[test]
    fn short_rows_are_padded_with_null() {
        let f = frame();
        assert_eq!(f.records()[1].get("b"), Some(&Cell::Null));
        assert!(f.records()[1].get("a").is_some_and(Cell::is_null));
        assert_eq!(f.records()[1].number("a"), None);
        assert_eq!(f.records()[0].number("a"), Some(1.0));
    }

    #[test]
    fn drop_column_updates_schema_and_rows() {
        let mut f = frame();
        assert!(f.drop_column("a"));
        assert!(!f.drop_column("a"));
        assert_eq!(f.column_names(), ["b".to_string()]);
        assert!(f.records().iter().all(|r| r.get("a").is_none()));
    }

    #[test]
    fn require_column_names_the_missing_column() {
        let err = frame().require_column("price", Stage::Prune).unwrap_err();
        assert_eq!(err, DataError::missing("price", Stage::Prune));
        assert!(err.to_string().contains("'price'"));
    }
}
