//! Uniform size allocation.
//!
//! Reads a student roster and the size reference workbook, recommends coat,
//! base-layer and socks sizes per student and writes them into the
//! allocation template.

pub mod assembler;
pub mod recommender;
pub mod service;
pub mod writer;

pub use assembler::{assemble, Assembly, FlaggedStudent};
pub use recommender::{recommend, recommend_size, recommend_socks_size, RecommendError, DEFAULT_SOCKS_SIZE};
pub use service::{AllocationOutcome, AllocationService};
pub use writer::{output_file_name, sanitize_file_name, TemplateWriter};
