//! Column Mapper
//!
//! Matches roster header cells to logical fields through substring aliases.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{SizingError, SizingResult};
use crate::grid::Cell;

/// Logical roster fields, in mapping order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterField {
    Class,
    Name,
    Gender,
    Age,
    Height,
    Weight,
    Remark,
}

impl RosterField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Name => "name",
            Self::Gender => "gender",
            Self::Age => "age",
            Self::Height => "height",
            Self::Weight => "weight",
            Self::Remark => "remark",
        }
    }
}

impl fmt::Display for RosterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aliases accepted for one logical field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub field: RosterField,
    pub aliases: Vec<String>,
    pub required: bool,
}

impl FieldSpec {
    pub fn new(field: RosterField, aliases: &[&str], required: bool) -> Self {
        Self {
            field,
            aliases: aliases.iter().map(|a| a.to_lowercase()).collect(),
            required,
        }
    }

    fn matches(&self, header: &str) -> bool {
        let header = header.to_lowercase();
        self.aliases.iter().any(|alias| header.contains(alias.as_str()))
    }
}

/// A resolved column for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedColumn {
    pub index: usize,
    /// Literal header text; the weight unit is read from it.
    pub header: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    columns: HashMap<RosterField, MappedColumn>,
}

impl ColumnMapping {
    pub fn column(&self, field: RosterField) -> Option<usize> {
        self.columns.get(&field).map(|c| c.index)
    }

    pub fn header(&self, field: RosterField) -> Option<&str> {
        self.columns.get(&field).map(|c| c.header.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Column mapper with per-field alias sets
pub struct ColumnMapper {
    fields: Vec<FieldSpec>,
}

impl Default for ColumnMapper {
    fn default() -> Self {
        Self {
            fields: vec![
                FieldSpec::new(RosterField::Class, &["班级", "班别", "class"], true),
                FieldSpec::new(RosterField::Name, &["姓名", "名字", "name"], true),
                FieldSpec::new(RosterField::Gender, &["性别", "gender", "sex"], true),
                FieldSpec::new(RosterField::Age, &["年龄", "age"], true),
                FieldSpec::new(RosterField::Height, &["身高", "height"], true),
                FieldSpec::new(RosterField::Weight, &["体重", "weight"], true),
                FieldSpec::new(RosterField::Remark, &["备注", "说明", "remark", "note"], false),
            ],
        }
    }
}

impl ColumnMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps each field to the first (leftmost) header containing one of its aliases.
    ///
    /// Every required field must resolve; the error lists all that did not.
    pub fn map(&self, header_row: &[Cell]) -> SizingResult<ColumnMapping> {
        let headers: Vec<String> = header_row.iter().map(Cell::display).collect();
        let mut columns = HashMap::new();
        let mut missing = Vec::new();

        for spec in &self.fields {
            let found = headers
                .iter()
                .enumerate()
                .find(|(_, header)| !header.is_empty() && spec.matches(header));

            match found {
                Some((index, header)) => {
                    tracing::debug!(field = %spec.field, index, header = %header, "Mapped column");
                    columns.insert(
                        spec.field,
                        MappedColumn {
                            index,
                            header: header.clone(),
                        },
                    );
                }
                None if spec.required => missing.push(spec.field.as_str()),
                None => tracing::debug!(field = %spec.field, "Optional column absent"),
            }
        }

        if !missing.is_empty() {
            tracing::warn!(headers = ?headers, missing = ?missing, "Roster columns could not be mapped");
            return Err(SizingError::column_mapping(missing));
        }

        Ok(ColumnMapping { columns })
    }
}
