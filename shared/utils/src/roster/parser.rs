//! Roster Parser
//!
//! Locate → map → normalize: turns a raw roster grid into student records.

use serde::{Deserialize, Serialize};
use sizing_models::{Gender, StudentRecord};

use super::locator::{locate_header_row, locate_school_name};
use super::mapper::{ColumnMapper, ColumnMapping, RosterField};
use super::normalizer::{normalize_measurement, normalize_weight, WeightUnit};
use crate::error::{SizingError, SizingResult};
use crate::grid::Grid;
use crate::validation::validate_model;

/// A roster row that could not become a student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowIssue {
    /// 1-based worksheet row.
    pub row: usize,
    pub name: Option<String>,
    pub message: String,
}

/// Complete parsed roster with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedRoster {
    pub school: String,
    /// 0-based grid row of the header.
    pub header_row: usize,
    pub columns: ColumnMapping,
    pub weight_unit: WeightUnit,
    pub students: Vec<StudentRecord>,
    pub issues: Vec<RowIssue>,
    pub rows_read: usize,
}

/// Main roster parser
#[derive(Default)]
pub struct RosterParser {
    mapper: ColumnMapper,
    school_override: Option<String>,
}

impl RosterParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `school` instead of searching the roster heading for it.
    pub fn with_school_override(mut self, school: Option<String>) -> Self {
        self.school_override = school
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    pub fn parse(&self, grid: &Grid) -> SizingResult<ParsedRoster> {
        let school = match &self.school_override {
            Some(school) => school.clone(),
            None => locate_school_name(grid).ok_or(SizingError::SchoolNameNotFound)?,
        };

        let header_row = locate_header_row(grid)?;
        let columns = self.mapper.map(grid.row(header_row))?;
        let weight_unit = columns
            .header(RosterField::Weight)
            .map(WeightUnit::from_header)
            .unwrap_or(WeightUnit::Kilogram);

        tracing::info!(
            school = %school,
            header_row = header_row + 1,
            weight_unit = ?weight_unit,
            "Roster layout resolved"
        );

        let mut students = Vec::new();
        let mut issues = Vec::new();
        let mut rows_read = 0usize;

        for row in header_row + 1..grid.height() {
            let reader = RowReader {
                grid,
                columns: &columns,
                row,
            };
            if reader.is_blank() {
                continue;
            }
            rows_read += 1;

            match reader.student(&school, weight_unit) {
                Ok(student) => students.push(student),
                Err(message) => {
                    let issue = RowIssue {
                        row: row + 1,
                        name: reader.text(RosterField::Name).filter(|n| !n.is_empty()),
                        message,
                    };
                    tracing::warn!(
                        row = issue.row,
                        name = issue.name.as_deref().unwrap_or(""),
                        "Skipping roster row: {}",
                        issue.message
                    );
                    issues.push(issue);
                }
            }
        }

        tracing::info!(
            rows_read,
            students = students.len(),
            skipped = issues.len(),
            "Roster parsed"
        );

        Ok(ParsedRoster {
            school,
            header_row,
            columns,
            weight_unit,
            students,
            issues,
            rows_read,
        })
    }
}

struct RowReader<'a> {
    grid: &'a Grid,
    columns: &'a ColumnMapping,
    row: usize,
}

impl RowReader<'_> {
    fn text(&self, field: RosterField) -> Option<String> {
        self.columns
            .column(field)
            .map(|col| self.grid.display(self.row, col))
    }

    /// Rows without class and name are layout filler (totals, blank lines).
    fn is_blank(&self) -> bool {
        let blank = |field| self.text(field).map_or(true, |v| v.is_empty());
        blank(RosterField::Class) && blank(RosterField::Name)
    }

    fn measurement(&self, field: RosterField, unit: Option<WeightUnit>) -> Result<f64, String> {
        let col = self
            .columns
            .column(field)
            .ok_or_else(|| format!("No {} column", field))?;
        let cell = self.grid.get(self.row, col);
        let value = match unit {
            Some(unit) => normalize_weight(cell, unit),
            None => normalize_measurement(cell),
        };
        value.ok_or_else(|| format!("Missing or unreadable {}: '{}'", field, cell.display()))
    }

    fn student(&self, school: &str, weight_unit: WeightUnit) -> Result<StudentRecord, String> {
        let gender_text = self.text(RosterField::Gender).unwrap_or_default();
        let gender: Gender = gender_text.parse()?;

        let student = StudentRecord {
            source_row: self.row + 1,
            class: self.text(RosterField::Class).unwrap_or_default(),
            name: self.text(RosterField::Name).unwrap_or_default(),
            gender,
            age: self.measurement(RosterField::Age, None)?,
            height_cm: self.measurement(RosterField::Height, None)?,
            weight_kg: self.measurement(RosterField::Weight, Some(weight_unit))?,
            school: school.to_string(),
            remark: self.text(RosterField::Remark).unwrap_or_default(),
        };

        validate_model(&student).map_err(|e| match e {
            SizingError::Validation { message, .. } => message,
            other => other.to_string(),
        })?;
        Ok(student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_grid() -> Grid {
        Grid::from_strings([
            vec!["学校名称：阳光实验小学", "", "", "", "", "", "", ""],
            vec!["", "", "", "", "", "", "", ""],
            vec!["序号", "班级", "姓名", "性别", "年龄", "身高(cm)", "体重(斤)", "备注"],
            vec!["1", "一(1)班", "张三", "男", "7", "125", "50", ""],
            vec!["2", "一(1)班", "李四", "女", "7岁", "120cm", "44斤", "过敏"],
            vec!["3", "一(1)班", "王五", "男", "7", "", "48", ""],
            vec!["4", "一(1)班", "赵六", "未知", "7", "122", "46", ""],
            vec!["", "", "", "", "", "", "", ""],
            vec!["合计", "", "", "", "", "", "", ""],
        ])
    }

    #[test]
    fn test_parse_roster() {
        let roster = RosterParser::new().parse(&roster_grid()).unwrap();

        assert_eq!(roster.school, "阳光实验小学");
        assert_eq!(roster.header_row, 2);
        assert_eq!(roster.weight_unit, WeightUnit::Catty);
        assert_eq!(roster.students.len(), 2);
        assert_eq!(roster.rows_read, 4);

        let zhang = &roster.students[0];
        assert_eq!(zhang.source_row, 4);
        assert_eq!(zhang.class, "一(1)班");
        assert_eq!(zhang.gender, Gender::Male);
        assert_eq!(zhang.weight_kg, 25.0);
        assert_eq!(zhang.remark, "");

        let li = &roster.students[1];
        assert_eq!(li.age, 7.0);
        assert_eq!(li.height_cm, 120.0);
        assert_eq!(li.weight_kg, 22.0);
        assert_eq!(li.remark, "过敏");
    }

    #[test]
    fn test_rows_with_missing_data_become_issues() {
        let roster = RosterParser::new().parse(&roster_grid()).unwrap();

        assert_eq!(roster.issues.len(), 2);
        assert_eq!(roster.issues[0].row, 6);
        assert_eq!(roster.issues[0].name.as_deref(), Some("王五"));
        assert!(roster.issues[0].message.contains("height"));
        assert_eq!(roster.issues[1].name.as_deref(), Some("赵六"));
        assert!(roster.issues[1].message.contains("gender"));
        assert!(roster.students.iter().all(|s| s.height_cm > 0.0));
    }

    #[test]
    fn test_missing_school_is_structural() {
        let grid = Grid::from_strings([
            vec!["班级", "姓名", "性别", "年龄", "身高", "体重"],
            vec!["一班", "张三", "男", "7", "125", "25"],
        ]);
        assert_eq!(
            RosterParser::new().parse(&grid).unwrap_err(),
            SizingError::SchoolNameNotFound
        );

        let roster = RosterParser::new()
            .with_school_override(Some("红星小学".to_string()))
            .parse(&grid)
            .unwrap();
        assert_eq!(roster.school, "红星小学");
        assert_eq!(roster.students[0].weight_kg, 25.0);
        assert_eq!(roster.weight_unit, WeightUnit::Kilogram);
    }

    #[test]
    fn test_structural_errors_propagate() {
        let grid = Grid::from_strings([vec!["学校：红星小学"], vec!["编号", "学生"]]);
        assert!(matches!(
            RosterParser::new().parse(&grid),
            Err(SizingError::HeaderNotFound { .. })
        ));

        let grid = Grid::from_strings([vec!["学校：红星小学", ""], vec!["班级", "姓名"]]);
        assert!(matches!(
            RosterParser::new().parse(&grid),
            Err(SizingError::ColumnMapping { .. })
        ));
    }

    #[test]
    fn test_english_roster() {
        let grid = Grid::from_strings([
            vec!["School: Example School", "", "", "", "", ""],
            vec!["Class", "Name", "Gender", "Age", "Height(cm)", "Weight(kg)"],
            vec!["Class1", "Amy", "female", "5", "110", "18"],
        ]);
        let roster = RosterParser::new().parse(&grid).unwrap();
        assert_eq!(roster.school, "Example School");
        assert_eq!(roster.students.len(), 1);
        assert_eq!(roster.students[0].gender, Gender::Female);
        assert_eq!(roster.students[0].weight_catty(), 36.0);
    }
}
