//! Roster Processing Module
//!
//! Reads a student roster whose header position, column names and weight unit
//! vary between files. Parsing is a two-stage pipeline: the locator finds the
//! school name and header row, the mapper resolves logical columns, and the
//! normalizer converts measurement cells.

pub mod locator;
pub mod mapper;
pub mod normalizer;
pub mod parser;

pub use locator::{extract_school_name, locate_header_row, locate_school_name};
pub use mapper::{ColumnMapper, ColumnMapping, FieldSpec, MappedColumn, RosterField};
pub use normalizer::{extract_number, normalize_measurement, normalize_weight, WeightUnit};
pub use parser::{ParsedRoster, RosterParser, RowIssue};
