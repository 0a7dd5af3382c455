pub mod catalog;
pub mod spreadsheet;
pub mod text;

use std::path::Path;

use crate::error::SourceError;

/// An untyped source cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Text form of the cell, or `None` for missing and not-a-number values.
    ///
    /// Integral floats drop their fractional part so spreadsheet codes like
    /// `99213.0` read back as `99213`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Int(v) => Some(v.to_string()),
            Cell::Float(v) if !v.is_finite() => None,
            Cell::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => Some((*v as i64).to_string()),
            Cell::Float(v) => Some(v.to_string()),
            Cell::Bool(v) => Some(v.to_string()),
        }
    }
}

/// One source row: cells addressed by column position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    cells: Vec<Cell>,
}

impl RawRow {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn get(&self, idx: usize) -> &Cell {
        self.cells.get(idx).unwrap_or(&Cell::Empty)
    }

    /// Cell at an optional column; an unresolved column reads as empty.
    pub fn at(&self, idx: Option<usize>) -> &Cell {
        idx.map(|i| self.get(i)).unwrap_or(&Cell::Empty)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A header row plus data rows, as produced by a format reader.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    /// Which sheet (or file) the table came from, for logging.
    pub origin: String,
}

pub(crate) fn ensure_exists(path: &Path) -> Result<(), SourceError> {
    if path.exists() {
        Ok(())
    } else {
        Err(SourceError::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_render_without_fraction() {
        assert_eq!(Cell::Float(99213.0).as_text().as_deref(), Some("99213"));
        assert_eq!(Cell::Float(1.5).as_text().as_deref(), Some("1.5"));
        assert_eq!(Cell::Int(42).as_text().as_deref(), Some("42"));
    }

    #[test]
    fn nan_and_empty_are_missing() {
        assert_eq!(Cell::Float(f64::NAN).as_text(), None);
        assert_eq!(Cell::Float(f64::INFINITY).as_text(), None);
        assert_eq!(Cell::Empty.as_text(), None);
        assert_eq!(Cell::text("").as_text().as_deref(), Some(""));
    }

    #[test]
    fn out_of_range_column_reads_empty() {
        let row = RawRow::new(vec![Cell::text("A00")]);
        assert_eq!(row.get(3), &Cell::Empty);
        assert_eq!(row.at(None), &Cell::Empty);
        assert_eq!(row.at(Some(0)), &Cell::text("A00"));
    }
}
