//! Result Assembler
//!
//! Turns parsed students into numbered allocation rows.

use serde::{Deserialize, Serialize};
use sizing_models::{AllocationRow, SizeTable, StudentRecord};

use crate::recommender::recommend;

/// A student left out of the allocation sheet because no size could be chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedStudent {
    pub source_row: usize,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    pub rows: Vec<AllocationRow>,
    pub flagged: Vec<FlaggedStudent>,
}

/// Rows in input order with a gap-free 1-based index.
pub fn assemble(students: &[StudentRecord], table: &SizeTable) -> Assembly {
    let mut assembly = Assembly::default();

    for student in students {
        match recommend(student, table) {
            Ok(recommendation) => {
                let index = assembly.rows.len() + 1;
                assembly
                    .rows
                    .push(AllocationRow::from_recommendation(index, &recommendation));
            }
            Err(e) => {
                tracing::warn!(
                    row = student.source_row,
                    name = %student.name,
                    "No size for student: {}",
                    e
                );
                assembly.flagged.push(FlaggedStudent {
                    source_row: student.source_row,
                    name: student.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        rows = assembly.rows.len(),
        flagged = assembly.flagged.len(),
        "Allocation rows assembled"
    );
    assembly
}
