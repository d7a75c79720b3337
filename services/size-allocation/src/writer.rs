//! Template Writer
//!
//! Fills the allocation sheet of the template workbook and saves the result
//! under the school's name.

use regex::Regex;
use sizing_models::AllocationRow;
use sizing_utils::{ReferenceConfig, SizingError, SizingResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Logical columns of the allocation sheet.
pub const SHEET_COLUMNS: usize = 13;

const INVALID_FILE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

static SCHOOL_STEM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\s：]+学校").expect("school stem pattern is valid"));

/// Replaces characters that are illegal in file names with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if INVALID_FILE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// `<school>.xlsx`, preferring the `…学校` part of a longer heading.
pub fn output_file_name(school: &str) -> String {
    let stem = SCHOOL_STEM_PATTERN
        .find(school)
        .map_or(school.trim(), |m| m.as_str());
    format!("{}.xlsx", sanitize_file_name(stem))
}

#[derive(Debug, Clone, PartialEq)]
enum SheetValue<'a> {
    Number(f64),
    Text(&'a str),
}

/// Size labels made only of digits are stored as numbers.
fn size_value(label: &str) -> SheetValue<'_> {
    if !label.is_empty() && label.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(n) = label.parse::<f64>() {
            return SheetValue::Number(n);
        }
    }
    SheetValue::Text(label)
}

fn row_values(row: &AllocationRow) -> [SheetValue<'_>; SHEET_COLUMNS] {
    [
        SheetValue::Number(row.index as f64),
        SheetValue::Text(&row.class),
        SheetValue::Text(&row.name),
        SheetValue::Text(&row.gender),
        SheetValue::Number(row.age),
        SheetValue::Number(row.height_cm),
        SheetValue::Number(row.weight_kg),
        SheetValue::Number(row.weight_catty),
        SheetValue::Text(&row.school),
        size_value(&row.coat_size),
        size_value(&row.underwear_size),
        size_value(&row.socks_size),
        SheetValue::Text(&row.remark),
    ]
}

#[derive(Debug, Clone)]
pub struct TemplateWriter {
    template_path: PathBuf,
    sheet_name: String,
    first_data_row: u32,
}

impl TemplateWriter {
    pub fn new(template_path: impl Into<PathBuf>, sheet_name: impl Into<String>, first_data_row: u32) -> Self {
        Self {
            template_path: template_path.into(),
            sheet_name: sheet_name.into(),
            first_data_row,
        }
    }

    pub fn from_config(config: &ReferenceConfig) -> Self {
        Self::new(
            config.template_path.clone(),
            config.template_sheet.clone(),
            config.first_data_row,
        )
    }

    /// Checks that the template opens and carries the allocation sheet.
    pub fn check_template(&self) -> SizingResult<()> {
        let book = self.open_template()?;
        book.get_sheet_by_name(&self.sheet_name)
            .map(|_| ())
            .ok_or_else(|| self.missing_sheet())
    }

    /// Writes `rows` into a copy of the template saved in `output_dir`.
    ///
    /// Returns the path of the written workbook. On failure no partial file
    /// is left behind.
    pub fn write(&self, school: &str, rows: &[AllocationRow], output_dir: &Path) -> SizingResult<PathBuf> {
        if !output_dir.is_dir() {
            return Err(SizingError::io(format!(
                "Output directory does not exist: {}",
                output_dir.display()
            )));
        }

        let mut book = self.open_template()?;
        let sheet = book
            .get_sheet_by_name_mut(&self.sheet_name)
            .ok_or_else(|| self.missing_sheet())?;

        for (offset, row) in rows.iter().enumerate() {
            let sheet_row = self.first_data_row + offset as u32;
            for (col, value) in row_values(row).into_iter().enumerate() {
                let cell = sheet.get_cell_mut((col as u32 + 1, sheet_row));
                match value {
                    SheetValue::Number(n) => {
                        cell.set_value_number(n);
                    }
                    SheetValue::Text(text) => {
                        cell.set_value(text);
                    }
                }
            }
        }

        let output_path = output_dir.join(output_file_name(school));
        if let Err(e) = umya_spreadsheet::writer::xlsx::write(&book, &output_path) {
            if output_path.exists() {
                if let Err(cleanup) = fs::remove_file(&output_path) {
                    tracing::warn!(path = %output_path.display(), "Failed to remove partial output: {}", cleanup);
                }
            }
            return Err(SizingError::io(format!(
                "Failed to write {}: {}",
                output_path.display(),
                e
            )));
        }

        tracing::info!(
            path = %output_path.display(),
            rows = rows.len(),
            sheet = %self.sheet_name,
            "Allocation workbook written"
        );
        Ok(output_path)
    }

    fn open_template(&self) -> SizingResult<umya_spreadsheet::Spreadsheet> {
        umya_spreadsheet::reader::xlsx::read(&self.template_path).map_err(|e| {
            SizingError::template(format!(
                "Failed to open template {}: {}",
                self.template_path.display(),
                e
            ))
        })
    }

    fn missing_sheet(&self) -> SizingError {
        SizingError::template(format!(
            "Sheet '{}' not found in template {}",
            self.sheet_name,
            self.template_path.display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn template(dir: &Path, sheet: &str) -> PathBuf {
        let mut book = umya_spreadsheet::new_file();
        let allocation = book.new_sheet(sheet).unwrap();
        allocation.get_cell_mut((1, 3)).set_value("序号");
        allocation.get_cell_mut((2, 3)).set_value("班级");
        let path = dir.join("template.xlsx");
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
        path
    }

    fn row(index: usize) -> AllocationRow {
        AllocationRow {
            index,
            class: "一(1)班".to_string(),
            name: "张三".to_string(),
            gender: "男".to_string(),
            age: 7.0,
            height_cm: 125.0,
            weight_kg: 25.0,
            weight_catty: 50.0,
            school: "阳光实验小学".to_string(),
            coat_size: "130".to_string(),
            underwear_size: "XL".to_string(),
            socks_size: "6-8岁".to_string(),
            remark: String::new(),
        }
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("东区/实验:学校"), "东区_实验_学校");
        assert_eq!(sanitize_file_name(r#"a\b*c?d"e<f>g|h"#), "a_b_c_d_e_f_g_h");
        assert_eq!(sanitize_file_name("阳光实验小学"), "阳光实验小学");
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("红星学校"), "红星学校.xlsx");
        assert_eq!(output_file_name("2024 第一实验学校 秋季"), "第一实验学校.xlsx");
        assert_eq!(output_file_name("城东幼儿园"), "城东幼儿园.xlsx");
        assert_eq!(output_file_name("Example School"), "Example School.xlsx");
        assert_eq!(output_file_name("A/B:C"), "A_B_C.xlsx");
    }

    #[test]
    fn test_size_values() {
        assert_eq!(size_value("110"), SheetValue::Number(110.0));
        assert_eq!(size_value("XL"), SheetValue::Text("XL"));
        assert_eq!(size_value("6-8岁"), SheetValue::Text("6-8岁"));
        assert_eq!(size_value(""), SheetValue::Text(""));
    }

    #[test]
    fn test_write_fills_rows_from_first_data_row() {
        let dir = TempDir::new().unwrap();
        let writer = TemplateWriter::new(template(dir.path(), "衣服配码"), "衣服配码", 4);

        let path = writer
            .write("阳光实验小学", &[row(1), row(2)], dir.path())
            .unwrap();
        assert_eq!(path, dir.path().join("阳光实验小学.xlsx"));

        let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
        let sheet = book.get_sheet_by_name("衣服配码").unwrap();
        assert_eq!(sheet.get_value((1, 3)), "序号");
        assert_eq!(sheet.get_value((1, 4)), "1");
        assert_eq!(sheet.get_value((3, 4)), "张三");
        assert_eq!(sheet.get_value((8, 4)), "50");
        assert_eq!(sheet.get_value((9, 4)), "阳光实验小学");
        assert_eq!(sheet.get_value((10, 4)), "130");
        assert_eq!(sheet.get_value((11, 4)), "XL");
        assert_eq!(sheet.get_value((12, 4)), "6-8岁");
        assert_eq!(sheet.get_value((1, 5)), "2");
    }

    #[test]
    fn test_missing_sheet_is_a_template_error() {
        let dir = TempDir::new().unwrap();
        let writer = TemplateWriter::new(template(dir.path(), "其他"), "衣服配码", 4);

        let error = writer.write("红星学校", &[row(1)], dir.path()).unwrap_err();
        assert_eq!(error.error_code(), "TEMPLATE_ERROR");
        assert!(!dir.path().join("红星学校.xlsx").exists());
        assert!(writer.check_template().is_err());
    }

    #[test]
    fn test_missing_output_dir_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let writer = TemplateWriter::new(template(dir.path(), "衣服配码"), "衣服配码", 4);

        let error = writer
            .write("红星学校", &[row(1)], &dir.path().join("missing"))
            .unwrap_err();
        assert_eq!(error.error_code(), "IO_ERROR");
        assert!(writer.check_template().is_ok());
    }

    proptest! {
        #[test]
        fn prop_sanitize_only_replaces_illegal_chars(name in "\\PC{0,24}") {
            let sanitized = sanitize_file_name(&name);
            prop_assert_eq!(sanitized.chars().count(), name.chars().count());
            for (before, after) in name.chars().zip(sanitized.chars()) {
                if INVALID_FILE_CHARS.contains(&before) {
                    prop_assert_eq!(after, '_');
                } else {
                    prop_assert_eq!(after, before);
                }
            }
        }
    }
}
