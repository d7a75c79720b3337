//! Student domain models.
//!
//! A `StudentRecord` is one normalized roster row. Measurements are already in
//! canonical units (years, centimetres, kilograms) by the time a record exists;
//! rows that could not be normalized never become records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Label written to the allocation sheet.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "男",
            Self::Female => "女",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value.to_ascii_lowercase().as_str() {
            "男" | "男生" | "male" | "m" | "boy" => Ok(Self::Male),
            "女" | "女生" | "female" | "f" | "girl" => Ok(Self::Female),
            _ => Err(format!("Unrecognized gender '{}'", value)),
        }
    }
}

/// A single student taken from the roster, with normalized measurements.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct StudentRecord {
    /// 1-based worksheet row the record came from.
    pub source_row: usize,
    pub class: String,
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub gender: Gender,
    #[validate(range(min = 0.0, message = "Age must be non-negative"))]
    pub age: f64,
    #[validate(range(min = 0.0, message = "Height must be non-negative"))]
    pub height_cm: f64,
    #[validate(range(min = 0.0, message = "Weight must be non-negative"))]
    pub weight_kg: f64,
    pub school: String,
    pub remark: String,
}

impl StudentRecord {
    /// Weight in catties (斤), the unit every size-table weight range uses.
    pub fn weight_catty(&self) -> f64 {
        self.weight_kg * 2.0
    }
}
