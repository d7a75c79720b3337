//! # Sizing Core Domain Models
//!
//! Core domain models for the school uniform size allocation system.
//! All models implement serialization/deserialization with serde; student
//! records are validated with the validator crate.
//!
//! ## Key Models
//!
//! - **StudentRecord**: one normalized roster row (class, name, gender, age, height, weight)
//! - **SizeBracket**: one size-table row mapping weight/height/age ranges to a size label
//! - **SizeTable**: the five bracket lists of the reference workbook, in source order
//! - **Recommendation**: the coat, base-layer and socks sizes chosen for a student
//! - **AllocationRow**: a rendered row of the allocation sheet
//!
//! ## Units
//!
//! Student weights are kilograms; every bracket weight range is in catties (斤).
//! `StudentRecord::weight_catty` performs the conversion used for comparisons.

pub mod student;
pub mod size_table;
pub mod recommendation;


pub use student::*;
pub use size_table::*;
pub use recommendation::*;
