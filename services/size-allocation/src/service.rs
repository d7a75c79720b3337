//! Allocation pipeline: roster + size table → filled template.
//!
//! Everything is read and parsed before the output workbook is touched, so a
//! structural failure never leaves a file behind.

use anyhow::{Context, Result};
use serde::Serialize;
use sizing_models::SizeCategory;
use sizing_utils::{
    load_grid, validate_file_type, ReferenceConfig, RosterParser, RowIssue, SizeTableParser,
    SkippedBracket,
};
use std::path::{Path, PathBuf};

use crate::assembler::{assemble, FlaggedStudent};
use crate::writer::TemplateWriter;

pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

/// Summary of one allocation run.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationOutcome {
    pub school: String,
    pub output_path: PathBuf,
    pub rows_written: usize,
    pub roster_issues: Vec<RowIssue>,
    pub flagged: Vec<FlaggedStudent>,
    pub skipped_brackets: Vec<SkippedBracket>,
    pub missing_sections: Vec<SizeCategory>,
}

pub struct AllocationService {
    size_table_path: PathBuf,
    writer: TemplateWriter,
}

impl AllocationService {
    pub fn new(config: &ReferenceConfig) -> Self {
        Self {
            size_table_path: config.size_table_path.clone(),
            writer: TemplateWriter::from_config(config),
        }
    }

    pub fn run(
        &self,
        roster_path: &Path,
        output_dir: &Path,
        school_override: Option<String>,
    ) -> Result<AllocationOutcome> {
        validate_file_type(roster_path, WORKBOOK_EXTENSIONS)?;

        let roster_grid = load_grid(roster_path)
            .with_context(|| format!("Failed to read roster {}", roster_path.display()))?;
        let roster = RosterParser::new()
            .with_school_override(school_override)
            .parse(&roster_grid)
            .with_context(|| format!("Failed to parse roster {}", roster_path.display()))?;

        let table_grid = load_grid(&self.size_table_path).with_context(|| {
            format!("Failed to read size table {}", self.size_table_path.display())
        })?;
        let parsed_table = SizeTableParser::new().parse(&table_grid);
        if parsed_table.table.is_empty() {
            tracing::warn!(
                path = %self.size_table_path.display(),
                "Size table holds no brackets; every student will be flagged"
            );
        }

        self.writer.check_template()?;

        let assembly = assemble(&roster.students, &parsed_table.table);
        let output_path = self.writer.write(&roster.school, &assembly.rows, output_dir)?;

        Ok(AllocationOutcome {
            school: roster.school,
            output_path,
            rows_written: assembly.rows.len(),
            roster_issues: roster.issues,
            flagged: assembly.flagged,
            skipped_brackets: parsed_table.skipped,
            missing_sections: parsed_table.missing_sections,
        })
    }
}
