//! Raw worksheet grid.
//!
//! Rosters and the size reference are both read as headerless grids: header
//! positions vary between files, so nothing here assumes a header row.

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

use crate::error::SizingError;

/// A single worksheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// String form of the cell; integral numbers print without a fraction.
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => Self::Number(*i as f64),
            Data::Float(f) => Self::Number(*f),
            Data::DateTime(dt) => Self::Number(dt.as_f64()),
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Self::text(s.clone()),
            Data::Bool(b) => Self::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Data::Error(_) | Data::Empty => Self::Empty,
        }
    }
}

pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Absolutely positioned cell matrix of one worksheet (0-based coordinates).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Builds a grid from text rows; blank strings become empty cells and
    /// strings that parse as numbers become numeric cells.
    pub fn from_strings<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|value| {
                        let value = value.as_ref();
                        match value.trim().parse::<f64>() {
                            Ok(n) => Cell::Number(n),
                            Err(_) => Cell::text(value),
                        }
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Converts a calamine range, padding so cell coordinates stay absolute.
    pub fn from_range(range: &Range<Data>) -> Self {
        let (start_row, start_col) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row];
        for row in range.rows() {
            let mut cells = vec![Cell::Empty; start_col];
            cells.extend(row.iter().map(Cell::from));
            rows.push(cells);
        }
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cell at `(row, col)`; anything outside the grid reads as empty.
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn display(&self, row: usize, col: usize) -> String {
        self.get(row, col).display()
    }
}

/// Reads the first worksheet of the workbook at `path`.
pub fn load_grid(path: &Path) -> Result<Grid> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| SizingError::workbook(path.display().to_string(), e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| SizingError::workbook(path.display().to_string(), "No sheets found in workbook"))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| SizingError::workbook(path.display().to_string(), e.to_string()))
        .with_context(|| format!("Failed to read worksheet '{}'", sheet_name))?;

    let grid = Grid::from_range(&range);
    tracing::debug!(
        path = %path.display(),
        sheet = %sheet_name,
        rows = grid.height(),
        "Loaded worksheet grid"
    );
    Ok(grid)
}
