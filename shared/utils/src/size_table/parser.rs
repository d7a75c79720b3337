//! Size Table Parser
//!
//! The reference sheet packs five bracket tables side by side. Each is found
//! by its title cell and read independently of the others.

use serde::{Deserialize, Serialize};
use sizing_models::{BracketRange, Gender, SizeBracket, SizeCategory, SizeTable};

use super::range::{parse_range, AGE_UNITS, HEIGHT_UNITS, WEIGHT_UNITS};
use crate::grid::Grid;

const ADULT_MARKER: &str = "成人";
const MALE_MARKER: &str = "男生";
const FEMALE_MARKER: &str = "女生";
/// Size carried by the weight cell on the male marker row itself.
const MALE_MARKER_SIZE: &str = "L";
/// Infant socks label, read as 8 months (0.67 years) to 2 years.
const SOCKS_INFANT_LABELS: &[&str] = &["8个月-2岁", "8个月–2岁"];
const SOCKS_INFANT_AGE: (f64, f64) = (0.67, 2.0);

/// Where one bracket table sits in the reference sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLayout {
    pub category: SizeCategory,
    /// Substring identifying the title cell.
    pub title: &'static str,
    /// Column holding the title and the size key.
    pub column: usize,
    /// Rows between the title row and the first bracket row.
    pub data_offset: usize,
}

pub const CHILDREN_UNDERWEAR: SectionLayout = SectionLayout {
    category: SizeCategory::ChildrenUnderwear,
    title: "儿童打底码数尺寸",
    column: 0,
    data_offset: 2,
};

pub const CHILDREN_COAT: SectionLayout = SectionLayout {
    category: SizeCategory::ChildrenCoat,
    title: "儿童棉衣码数尺寸",
    column: 3,
    data_offset: 2,
};

pub const ADULT_UNDERWEAR: SectionLayout = SectionLayout {
    category: SizeCategory::AdultUnderwear,
    title: "成人打底码数",
    column: 0,
    data_offset: 1,
};

pub const ADULT_COAT: SectionLayout = SectionLayout {
    category: SizeCategory::AdultCoat,
    title: "成人棉衣尺寸",
    column: 3,
    data_offset: 1,
};

pub const SOCKS: SectionLayout = SectionLayout {
    category: SizeCategory::Socks,
    title: "袜子尺码",
    column: 6,
    data_offset: 1,
};

/// A reference row that could not become a bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedBracket {
    pub section: SizeCategory,
    /// 1-based worksheet row.
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSizeTable {
    pub table: SizeTable,
    pub skipped: Vec<SkippedBracket>,
    pub missing_sections: Vec<SizeCategory>,
}

/// Reads every bracket table out of a reference grid.
///
/// Malformed rows are skipped and reported; a missing section yields an
/// empty bracket list. Parsing itself never fails.
#[derive(Debug, Default)]
pub struct SizeTableParser;

impl SizeTableParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, grid: &Grid) -> ParsedSizeTable {
        let mut pass = SectionPass {
            grid,
            skipped: Vec::new(),
            missing_sections: Vec::new(),
        };

        let table = SizeTable {
            children_underwear: pass.children_underwear(),
            children_coat: pass.children_coat(),
            adult_underwear: pass.adult_underwear(),
            adult_coat: pass.adult_coat(),
            socks: pass.socks(),
        };

        tracing::info!(
            children_underwear = table.children_underwear.len(),
            children_coat = table.children_coat.len(),
            adult_underwear = table.adult_underwear.len(),
            adult_coat = table.adult_coat.len(),
            socks = table.socks.len(),
            skipped = pass.skipped.len(),
            "Size table parsed"
        );

        ParsedSizeTable {
            table,
            skipped: pass.skipped,
            missing_sections: pass.missing_sections,
        }
    }
}

struct SectionPass<'a> {
    grid: &'a Grid,
    skipped: Vec<SkippedBracket>,
    missing_sections: Vec<SizeCategory>,
}

impl SectionPass<'_> {
    /// First bracket row of `layout`, or `None` when its title is absent.
    fn start(&mut self, layout: &SectionLayout) -> Option<usize> {
        let title_row = (0..self.grid.height())
            .find(|&row| self.grid.display(row, layout.column).contains(layout.title));

        match title_row {
            Some(row) => {
                tracing::debug!(section = %layout.category, row = row + 1, "Located size table section");
                Some(row + layout.data_offset)
            }
            None => {
                tracing::warn!(
                    section = %layout.category,
                    title = layout.title,
                    "Size table section not found"
                );
                self.missing_sections.push(layout.category);
                None
            }
        }
    }

    /// End (exclusive) of a children's table: a blank key or an adult title.
    fn children_end(&self, start: usize, column: usize) -> usize {
        (start..self.grid.height())
            .find(|&row| {
                let key = self.grid.display(row, column);
                key.is_empty() || key.contains(ADULT_MARKER)
            })
            .unwrap_or(self.grid.height())
    }

    fn record(
        &mut self,
        brackets: &mut Vec<SizeBracket>,
        section: SizeCategory,
        row: usize,
        result: Result<SizeBracket, String>,
    ) {
        match result {
            Ok(bracket) => brackets.push(bracket),
            Err(reason) => {
                tracing::warn!(section = %section, row = row + 1, "Skipping size bracket: {}", reason);
                self.skipped.push(SkippedBracket {
                    section,
                    row: row + 1,
                    reason,
                });
            }
        }
    }

    fn children_underwear(&mut self) -> Vec<SizeBracket> {
        let layout = CHILDREN_UNDERWEAR;
        let Some(start) = self.start(&layout) else {
            return Vec::new();
        };
        let grid = self.grid;
        let col = layout.column;

        let mut brackets = Vec::new();
        for row in start..self.children_end(start, col) {
            let result = read_range(grid, row, col + 1, "weight", WEIGHT_UNITS).and_then(|weight| {
                Ok(SizeBracket::ChildrenUnderwear {
                    size: grid.display(row, col),
                    weight,
                    height: read_range(grid, row, col + 2, "height", HEIGHT_UNITS)?,
                })
            });
            self.record(&mut brackets, layout.category, row, result);
        }
        brackets
    }

    fn children_coat(&mut self) -> Vec<SizeBracket> {
        let layout = CHILDREN_COAT;
        let Some(start) = self.start(&layout) else {
            return Vec::new();
        };
        let grid = self.grid;
        let col = layout.column;

        let mut brackets = Vec::new();
        for row in start..self.children_end(start, col) {
            let result = read_range(grid, row, col + 1, "weight", WEIGHT_UNITS).and_then(|weight| {
                Ok(SizeBracket::ChildrenCoat {
                    size: grid.display(row, col),
                    weight,
                    age: read_range(grid, row, col + 2, "age", AGE_UNITS)?,
                    height: None,
                })
            });
            self.record(&mut brackets, layout.category, row, result);
        }
        brackets
    }

    fn adult_underwear(&mut self) -> Vec<SizeBracket> {
        let layout = ADULT_UNDERWEAR;
        let Some(start) = self.start(&layout) else {
            return Vec::new();
        };
        let grid = self.grid;
        let col = layout.column;

        let mut brackets = Vec::new();
        let mut gender = None;
        for row in start..grid.height() {
            let key = grid.display(row, col);

            if key.contains(MALE_MARKER) {
                gender = Some(Gender::Male);
                if !grid.get(row, col + 1).is_blank() {
                    let result = read_range(grid, row, col + 1, "weight", WEIGHT_UNITS).map(|weight| {
                        SizeBracket::AdultUnderwear {
                            size: MALE_MARKER_SIZE.to_string(),
                            gender,
                            weight,
                        }
                    });
                    self.record(&mut brackets, layout.category, row, result);
                }
                continue;
            }
            if key.contains(FEMALE_MARKER) {
                gender = Some(Gender::Female);
                continue;
            }
            if key.is_empty() {
                continue;
            }
            if key.contains(ADULT_COAT.title) {
                break;
            }

            let result = read_range(grid, row, col + 1, "weight", WEIGHT_UNITS)
                .map(|weight| SizeBracket::AdultUnderwear { size: key, gender, weight });
            self.record(&mut brackets, layout.category, row, result);
        }
        brackets
    }

    fn adult_coat(&mut self) -> Vec<SizeBracket> {
        let layout = ADULT_COAT;
        let Some(start) = self.start(&layout) else {
            return Vec::new();
        };
        let grid = self.grid;
        let col = layout.column;

        let mut brackets = Vec::new();
        for row in start..grid.height() {
            let key = grid.display(row, col);
            if key.is_empty() {
                break;
            }
            let result = read_range(grid, row, col + 1, "weight", WEIGHT_UNITS).map(|weight| {
                SizeBracket::AdultCoat {
                    size: key.to_uppercase(),
                    weight,
                }
            });
            self.record(&mut brackets, layout.category, row, result);
        }
        brackets
    }

    fn socks(&mut self) -> Vec<SizeBracket> {
        let layout = SOCKS;
        let Some(start) = self.start(&layout) else {
            return Vec::new();
        };
        let grid = self.grid;
        let col = layout.column;

        let mut brackets = Vec::new();
        for row in start..grid.height() {
            let label = grid.display(row, col);
            if label.is_empty() {
                continue;
            }

            let age = if SOCKS_INFANT_LABELS.iter().any(|infant| label.contains(infant)) {
                BracketRange::new(SOCKS_INFANT_AGE.0, SOCKS_INFANT_AGE.1).map_err(|e| e.to_string())
            } else {
                read_range(grid, row, col, "age", AGE_UNITS)
            };
            let result = age.map(|age| SizeBracket::Socks { size: label, age });
            self.record(&mut brackets, layout.category, row, result);
        }
        brackets
    }
}

fn read_range(
    grid: &Grid,
    row: usize,
    col: usize,
    field: &str,
    units: &[&str],
) -> Result<BracketRange, String> {
    parse_range(grid.get(row, col), units).map_err(|e| format!("{}: {}", field, e))
}
