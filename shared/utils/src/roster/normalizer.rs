//! Unit Normalizer
//!
//! Turns loosely formatted measurement cells into canonical numbers.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::grid::Cell;

static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("number pattern is valid"));

const CATTY_MARKERS: &[&str] = &["斤", "catty", "catties", "jin"];

/// Unit of a roster weight column, decided by the column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kilogram,
    Catty,
}

impl WeightUnit {
    /// Reads the unit from the matched header text, never from cell values.
    pub fn from_header(header: &str) -> Self {
        let header = header.to_lowercase();
        if CATTY_MARKERS.iter().any(|m| header.contains(m)) {
            Self::Catty
        } else {
            Self::Kilogram
        }
    }

    pub fn to_kilograms(&self, value: f64) -> f64 {
        match self {
            Self::Kilogram => value,
            Self::Catty => value / 2.0,
        }
    }
}

/// First unsigned decimal in `text`, e.g. `"36.5斤"` → 36.5.
pub fn extract_number(text: &str) -> Option<f64> {
    NUMBER_PATTERN
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Numeric value of a measurement cell, or `None` when it holds no digits.
///
/// Numeric cells are taken as-is when finite and non-negative; text cells go
/// through [`extract_number`]. Missing values are never turned into zero.
pub fn normalize_measurement(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Empty => None,
        Cell::Number(n) => (n.is_finite() && *n >= 0.0).then_some(*n),
        Cell::Text(text) => extract_number(text),
    }
}

/// Weight in kilograms for a cell of a column measured in `unit`.
pub fn normalize_weight(cell: &Cell, unit: WeightUnit) -> Option<f64> {
    normalize_measurement(cell).map(|value| unit.to_kilograms(value))
}
