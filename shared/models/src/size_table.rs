//! Size table domain models.
//!
//! The reference workbook describes five bracket lists (children's base-layer,
//! children's coat, adult base-layer, adult coat, socks). Each bracket maps one
//! or two numeric ranges to a size label. Weight ranges are always expressed in
//! catties (斤), heights in centimetres and ages in years.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::student::Gender;

/// Inclusive numeric range with `min <= max`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawBracketRange")]
pub struct BracketRange {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct RawBracketRange {
    min: f64,
    max: f64,
}

impl TryFrom<RawBracketRange> for BracketRange {
    type Error = BracketRangeError;

    fn try_from(raw: RawBracketRange) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BracketRangeError {
    #[error("Range bounds must be finite: {min} - {max}")]
    NonFinite { min: f64, max: f64 },

    #[error("Range minimum {min} exceeds maximum {max}")]
    Inverted { min: f64, max: f64 },
}

impl BracketRange {
    /// Builds a range, rejecting inverted or non-finite bounds.
    ///
    /// Inverted bounds are never swapped: a malformed table row is reported
    /// rather than silently reinterpreted.
    pub fn new(min: f64, max: f64) -> Result<Self, BracketRangeError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(BracketRangeError::NonFinite { min, max });
        }
        if min > max {
            return Err(BracketRangeError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl fmt::Display for BracketRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SizeCategory {
    ChildrenUnderwear,
    ChildrenCoat,
    AdultUnderwear,
    AdultCoat,
    Socks,
}

impl SizeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChildrenUnderwear => "children_underwear",
            Self::ChildrenCoat => "children_coat",
            Self::AdultUnderwear => "adult_underwear",
            Self::AdultCoat => "adult_coat",
            Self::Socks => "socks",
        }
    }
}

impl fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Garment kinds that are sized from weight/height brackets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Garment {
    Coat,
    Underwear,
}

impl fmt::Display for Garment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coat => f.write_str("coat"),
            Self::Underwear => f.write_str("underwear"),
        }
    }
}

/// One row of a size table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum SizeBracket {
    ChildrenUnderwear {
        size: String,
        weight: BracketRange,
        height: BracketRange,
    },
    ChildrenCoat {
        size: String,
        weight: BracketRange,
        age: BracketRange,
        /// Reference workbooks carry no coat height column; hand-built tables may.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<BracketRange>,
    },
    AdultUnderwear {
        size: String,
        gender: Option<Gender>,
        weight: BracketRange,
    },
    AdultCoat {
        size: String,
        weight: BracketRange,
    },
    Socks {
        size: String,
        age: BracketRange,
    },
}

impl SizeBracket {
    pub fn category(&self) -> SizeCategory {
        match self {
            Self::ChildrenUnderwear { .. } => SizeCategory::ChildrenUnderwear,
            Self::ChildrenCoat { .. } => SizeCategory::ChildrenCoat,
            Self::AdultUnderwear { .. } => SizeCategory::AdultUnderwear,
            Self::AdultCoat { .. } => SizeCategory::AdultCoat,
            Self::Socks { .. } => SizeCategory::Socks,
        }
    }

    pub fn size(&self) -> &str {
        match self {
            Self::ChildrenUnderwear { size, .. }
            | Self::ChildrenCoat { size, .. }
            | Self::AdultUnderwear { size, .. }
            | Self::AdultCoat { size, .. }
            | Self::Socks { size, .. } => size,
        }
    }

    /// Weight range in catties; socks brackets have none.
    pub fn weight(&self) -> Option<&BracketRange> {
        match self {
            Self::ChildrenUnderwear { weight, .. }
            | Self::ChildrenCoat { weight, .. }
            | Self::AdultUnderwear { weight, .. }
            | Self::AdultCoat { weight, .. } => Some(weight),
            Self::Socks { .. } => None,
        }
    }

    pub fn height(&self) -> Option<&BracketRange> {
        match self {
            Self::ChildrenUnderwear { height, .. } => Some(height),
            Self::ChildrenCoat { height, .. } => height.as_ref(),
            _ => None,
        }
    }

    pub fn age(&self) -> Option<&BracketRange> {
        match self {
            Self::ChildrenCoat { age, .. } | Self::Socks { age, .. } => Some(age),
            _ => None,
        }
    }

    pub fn gender(&self) -> Option<Gender> {
        match self {
            Self::AdultUnderwear { gender, .. } => *gender,
            _ => None,
        }
    }

    /// Whether the bracket may be offered to a student of `gender`.
    pub fn admits(&self, gender: Gender) -> bool {
        self.gender().map_or(true, |g| g == gender)
    }

    pub fn ordinal(&self) -> u32 {
        size_ordinal(self.size())
    }
}

/// Relative rank of a size label, used for "largest wins" comparisons.
///
/// Purely numeric labels rank by their integer value, letter sizes by
/// S < M < L < XL < XXL < 3XL < 4XL, anything else ranks lowest.
pub fn size_ordinal(label: &str) -> u32 {
    let label = label.trim();
    if !label.is_empty() && label.chars().all(|c| c.is_ascii_digit()) {
        return label.parse().unwrap_or(u32::MAX);
    }
    match label.to_ascii_uppercase().as_str() {
        "S" => 1,
        "M" => 2,
        "L" => 3,
        "XL" => 4,
        "XXL" => 5,
        "3XL" => 6,
        "4XL" => 7,
        _ => 0,
    }
}

/// Every bracket list of the reference workbook, in source row order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SizeTable {
    pub children_underwear: Vec<SizeBracket>,
    pub children_coat: Vec<SizeBracket>,
    pub adult_underwear: Vec<SizeBracket>,
    pub adult_coat: Vec<SizeBracket>,
    pub socks: Vec<SizeBracket>,
}

impl SizeTable {
    pub fn children(&self, garment: Garment) -> &[SizeBracket] {
        match garment {
            Garment::Coat => &self.children_coat,
            Garment::Underwear => &self.children_underwear,
        }
    }

    pub fn adult(&self, garment: Garment) -> &[SizeBracket] {
        match garment {
            Garment::Coat => &self.adult_coat,
            Garment::Underwear => &self.adult_underwear,
        }
    }

    pub fn total_brackets(&self) -> usize {
        self.children_underwear.len()
            + self.children_coat.len()
            + self.adult_underwear.len()
            + self.adult_coat.len()
            + self.socks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_brackets() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: f64, max: f64) -> BracketRange {
        BracketRange::new(min, max).unwrap()
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert_eq!(
            BracketRange::new(50.0, 40.0),
            Err(BracketRangeError::Inverted { min: 50.0, max: 40.0 })
        );
        assert!(BracketRange::new(f64::NAN, 1.0).is_err());
        assert!(BracketRange::new(40.0, 40.0).is_ok());
    }

    #[test]
    fn test_range_is_inclusive() {
        let r = range(30.0, 40.0);
        assert!(r.contains(30.0));
        assert!(r.contains(40.0));
        assert!(!r.contains(40.5));
        assert!(!r.contains(29.9));
    }

    #[test]
    fn test_size_ordinal() {
        assert_eq!(size_ordinal("110"), 110);
        assert_eq!(size_ordinal(" 90 "), 90);
        assert_eq!(size_ordinal("S"), 1);
        assert_eq!(size_ordinal("xl"), 4);
        assert_eq!(size_ordinal("3XL"), 6);
        assert_eq!(size_ordinal("4XL"), 7);
        assert_eq!(size_ordinal("均码"), 0);
        assert_eq!(size_ordinal(""), 0);
    }

    #[test]
    fn test_bracket_accessors() {
        let child = SizeBracket::ChildrenUnderwear {
            size: "110".to_string(),
            weight: range(30.0, 40.0),
            height: range(105.0, 115.0),
        };
        assert_eq!(child.category(), SizeCategory::ChildrenUnderwear);
        assert_eq!(child.size(), "110");
        assert!(child.height().is_some());
        assert!(child.age().is_none());
        assert!(child.admits(Gender::Male));

        let adult = SizeBracket::AdultUnderwear {
            size: "L".to_string(),
            gender: Some(Gender::Male),
            weight: range(100.0, 120.0),
        };
        assert!(adult.admits(Gender::Male));
        assert!(!adult.admits(Gender::Female));
        assert_eq!(adult.ordinal(), 3);

        let socks = SizeBracket::Socks {
            size: "3-5岁".to_string(),
            age: range(3.0, 5.0),
        };
        assert!(socks.weight().is_none());
        assert_eq!(socks.age().map(|a| a.max()), Some(5.0));
    }

    #[test]
    fn test_table_lookup_by_garment() {
        let table = SizeTable {
            children_coat: vec![SizeBracket::ChildrenCoat {
                size: "120".to_string(),
                weight: range(40.0, 50.0),
                age: range(5.0, 6.0),
                height: None,
            }],
            adult_underwear: vec![SizeBracket::AdultUnderwear {
                size: "M".to_string(),
                gender: None,
                weight: range(90.0, 100.0),
            }],
            ..Default::default()
        };

        assert_eq!(table.children(Garment::Coat).len(), 1);
        assert!(table.children(Garment::Underwear).is_empty());
        assert_eq!(table.adult(Garment::Underwear).len(), 1);
        assert_eq!(table.total_brackets(), 2);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_bracket_serializes_with_category_tag() {
        let bracket = SizeBracket::AdultCoat {
            size: "XL".to_string(),
            weight: range(130.0, 150.0),
        };
        let json = serde_json::to_value(&bracket).unwrap();
        assert_eq!(json["category"], "adult_coat");
        assert_eq!(json["size"], "XL");
    }

    #[test]
    fn test_coat_height_is_optional() {
        let json = r#"{"category": "children_coat", "size": "110",
            "weight": {"min": 30.0, "max": 40.0}, "age": {"min": 4.0, "max": 5.0}}"#;
        let bracket: SizeBracket = serde_json::from_str(json).unwrap();
        assert!(bracket.height().is_none());

        let bracket = SizeBracket::ChildrenCoat {
            size: "110".to_string(),
            weight: range(30.0, 40.0),
            age: range(4.0, 5.0),
            height: Some(range(105.0, 115.0)),
        };
        assert_eq!(bracket.height().map(|h| (h.min(), h.max())), Some((105.0, 115.0)));
        assert!(bracket.height().unwrap().contains(110.0));
    }

    #[test]
    fn test_inverted_range_fails_to_deserialize() {
        let parsed: Result<BracketRange, _> = serde_json::from_str(r#"{"min": 5.0, "max": 1.0}"#);
        assert!(parsed.is_err());
    }
}
