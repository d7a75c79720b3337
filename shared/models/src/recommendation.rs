//! Recommendation and allocation output models.

use serde::{Deserialize, Serialize};

use crate::student::StudentRecord;

/// Sizes chosen for one student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub student: StudentRecord,
    pub coat_size: String,
    pub underwear_size: String,
    pub socks_size: String,
}

/// One rendered row of the allocation sheet.
///
/// Field order follows the sheet's column order; `weight_catty` fills the
/// unlabeled column between weight and school.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationRow {
    pub index: usize,
    pub class: String,
    pub name: String,
    pub gender: String,
    pub age: f64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub weight_catty: f64,
    pub school: String,
    pub coat_size: String,
    pub underwear_size: String,
    pub socks_size: String,
    pub remark: String,
}

impl AllocationRow {
    /// Builds the row for `recommendation` at 1-based position `index`.
    pub fn from_recommendation(index: usize, recommendation: &Recommendation) -> Self {
        let student = &recommendation.student;
        Self {
            index,
            class: student.class.clone(),
            name: student.name.clone(),
            gender: student.gender.label().to_string(),
            age: student.age,
            height_cm: student.height_cm,
            weight_kg: student.weight_kg,
            weight_catty: student.weight_catty(),
            school: student.school.clone(),
            coat_size: recommendation.coat_size.clone(),
            underwear_size: recommendation.underwear_size.clone(),
            socks_size: recommendation.socks_size.clone(),
            remark: student.remark.trim().to_string(),
        }
    }
}
