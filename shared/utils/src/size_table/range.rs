//! Bracket range cells such as `30-40斤`, `105-115cm` or `3-5岁`.

use sizing_models::{BracketRange, BracketRangeError};
use thiserror::Error;

use crate::grid::Cell;

pub const WEIGHT_UNITS: &[&str] = &["斤", "catties", "catty"];
pub const HEIGHT_UNITS: &[&str] = &["cm", "CM", "厘米"];
pub const AGE_UNITS: &[&str] = &["岁", "years", "year"];

const SEPARATORS: &[char] = &['-', '–', '~', '～'];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeParseError {
    #[error("range cell is empty")]
    Missing,

    #[error("no range separator in '{0}'")]
    NoSeparator(String),

    #[error("expected exactly two bounds in '{0}'")]
    WrongArity(String),

    #[error("non-numeric bound in '{0}'")]
    NotNumeric(String),

    #[error(transparent)]
    Invalid(#[from] BracketRangeError),
}

/// Parses a `min-max` cell after stripping the given unit markers.
pub fn parse_range(cell: &Cell, units: &[&str]) -> Result<BracketRange, RangeParseError> {
    if cell.is_blank() {
        return Err(RangeParseError::Missing);
    }
    let raw = cell.display();
    let stripped = units
        .iter()
        .fold(raw.clone(), |text, unit| text.replace(unit, ""));

    if !stripped.contains(SEPARATORS) {
        return Err(RangeParseError::NoSeparator(raw));
    }

    let parts: Vec<&str> = stripped.split(SEPARATORS).map(str::trim).collect();
    let [min, max] = parts.as_slice() else {
        return Err(RangeParseError::WrongArity(raw));
    };

    let (Ok(min), Ok(max)) = (min.parse::<f64>(), max.parse::<f64>()) else {
        return Err(RangeParseError::NotNumeric(raw));
    };

    Ok(BracketRange::new(min, max)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_with_units() {
        let weight = parse_range(&Cell::text("30-40斤"), WEIGHT_UNITS).unwrap();
        assert_eq!((weight.min(), weight.max()), (30.0, 40.0));

        let height = parse_range(&Cell::text("105～115cm"), HEIGHT_UNITS).unwrap();
        assert_eq!((height.min(), height.max()), (105.0, 115.0));

        let age = parse_range(&Cell::text(" 3 - 5岁 "), AGE_UNITS).unwrap();
        assert_eq!((age.min(), age.max()), (3.0, 5.0));

        let decimal = parse_range(&Cell::text("40.5-52.5斤"), WEIGHT_UNITS).unwrap();
        assert_eq!(decimal.max(), 52.5);
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(parse_range(&Cell::Empty, WEIGHT_UNITS), Err(RangeParseError::Missing));
        assert_eq!(
            parse_range(&Cell::Number(30.0), WEIGHT_UNITS),
            Err(RangeParseError::NoSeparator("30".to_string()))
        );
        assert_eq!(
            parse_range(&Cell::text("a-b斤"), WEIGHT_UNITS),
            Err(RangeParseError::NotNumeric("a-b斤".to_string()))
        );
        assert_eq!(
            parse_range(&Cell::text("1-2-3"), WEIGHT_UNITS),
            Err(RangeParseError::WrongArity("1-2-3".to_string()))
        );
    }

    #[test]
    fn test_inverted_range_is_rejected_not_swapped() {
        assert_eq!(
            parse_range(&Cell::text("50-40斤"), WEIGHT_UNITS),
            Err(RangeParseError::Invalid(BracketRangeError::Inverted { min: 50.0, max: 40.0 }))
        );
    }

    proptest! {
        #[test]
        fn prop_parsed_ranges_are_ordered(a in 0u32..400, b in 0u32..400) {
            let cell = Cell::text(format!("{}-{}斤", a, b));
            match parse_range(&cell, WEIGHT_UNITS) {
                Ok(range) => {
                    prop_assert!(range.min() <= range.max());
                    prop_assert_eq!(range.min(), a as f64);
                }
                Err(RangeParseError::Invalid(_)) => prop_assert!(a > b),
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
    }
}
