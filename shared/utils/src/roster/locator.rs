//! Header Locator
//!
//! Finds the institution name and the header row in a headerless roster grid.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{SizingError, SizingResult};
use crate::grid::Grid;

/// Rows scanned (from the top) for the institution name.
pub const SCHOOL_SCAN_ROWS: usize = 5;
/// Rows scanned (from the top) for the header row.
pub const HEADER_SCAN_ROWS: usize = 10;

const SCHOOL_KEYWORDS: &[&str] = &[
    "学校", "幼儿园", "小学", "中学", "高中", "统筹点", "School", "Kindergarten",
];

const CLASS_TOKENS: &[&str] = &["班级", "class"];
const NAME_TOKENS: &[&str] = &["姓名", "name"];

static SCHOOL_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^\s：:]+(学校|幼儿园|小学|中学|高中))").expect("school name pattern is valid")
});

/// Returns the first institution name found in the top rows, row-major.
pub fn locate_school_name(grid: &Grid) -> Option<String> {
    for row in 0..SCHOOL_SCAN_ROWS.min(grid.height()) {
        for cell in grid.row(row) {
            let Some(text) = cell.as_text() else {
                continue;
            };
            if !SCHOOL_KEYWORDS.iter().any(|kw| text.contains(kw)) {
                continue;
            }
            if let Some(name) = extract_school_name(text) {
                tracing::debug!(row, school = %name, "Located school name");
                return Some(name);
            }
        }
    }
    None
}

/// Pulls the institution name out of a heading cell such as
/// `学校名称：实验小学` or `统筹点: 东区`.
pub fn extract_school_name(text: &str) -> Option<String> {
    let name = match SCHOOL_NAME_PATTERN.captures(text) {
        Some(captures) => captures[1].to_string(),
        None => match text.rfind(|c: char| c == '：' || c == ':') {
            Some(idx) => {
                let colon_len = text[idx..].chars().next().map_or(0, char::len_utf8);
                text[idx + colon_len..].trim().to_string()
            }
            None => text.trim().to_string(),
        },
    };
    (!name.is_empty()).then_some(name)
}

/// Index of the first row holding both a class and a name column header.
pub fn locate_header_row(grid: &Grid) -> SizingResult<usize> {
    let scanned_rows = HEADER_SCAN_ROWS.min(grid.height());
    (0..scanned_rows)
        .find(|&row| {
            let cells = grid.row(row);
            let has = |tokens: &[&str]| {
                cells.iter().any(|cell| {
                    let value = cell.display();
                    tokens.iter().any(|token| value.eq_ignore_ascii_case(token))
                })
            };
            has(CLASS_TOKENS) && has(NAME_TOKENS)
        })
        .inspect(|row| tracing::debug!(row, "Located header row"))
        .ok_or(SizingError::header_not_found(HEADER_SCAN_ROWS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_school_name_with_suffix() {
        assert_eq!(
            extract_school_name("学校名称：阳光实验小学").as_deref(),
            Some("阳光实验小学")
        );
        assert_eq!(
            extract_school_name("2024年 城东幼儿园 身高体重表").as_deref(),
            Some("城东幼儿园")
        );
    }

    #[test]
    fn test_extract_school_name_strips_to_last_colon() {
        assert_eq!(
            extract_school_name("统筹点：东区：第三片区").as_deref(),
            Some("第三片区")
        );
        assert_eq!(
            extract_school_name("School: Example School").as_deref(),
            Some("Example School")
        );
        assert_eq!(extract_school_name("统筹点："), None);
    }

    #[test]
    fn test_locate_school_name_row_major() {
        let grid = Grid::from_strings([
            vec!["", "身高体重登记表"],
            vec!["学校名称：红星小学", "统筹点：北区"],
            vec!["班级", "姓名"],
        ]);
        assert_eq!(locate_school_name(&grid).as_deref(), Some("红星小学"));
    }

    #[test]
    fn test_locate_school_name_ignores_rows_past_window() {
        let mut rows = vec![vec![""]; 5];
        rows.push(vec!["红星小学"]);
        let grid = Grid::from_strings(rows);
        assert_eq!(locate_school_name(&grid), None);
    }

    #[test]
    fn test_locate_header_row_exact_tokens() {
        let grid = Grid::from_strings([
            vec!["学校：红星小学", ""],
            vec!["班级名称", "学生姓名"],
            vec!["班级", "姓名"],
        ]);
        assert_eq!(locate_header_row(&grid), Ok(2));
    }

    #[test]
    fn test_locate_header_row_english_tokens() {
        let grid = Grid::from_strings([vec!["Class", "Name", "Gender"]]);
        assert_eq!(locate_header_row(&grid), Ok(0));
    }

    #[test]
    fn test_header_not_found() {
        let mut rows = vec![vec!["", ""]; 10];
        rows.push(vec!["班级", "姓名"]);
        let grid = Grid::from_strings(rows);
        assert_eq!(
            locate_header_row(&grid),
            Err(SizingError::HeaderNotFound { scanned_rows: 10 })
        );
    }
}
