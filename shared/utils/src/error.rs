use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SizingError {
    #[error("Header row not found: no row in the first {scanned_rows} rows contains both a class and a name column")]
    HeaderNotFound { scanned_rows: usize },

    #[error("Column mapping error: could not find columns for {}", .missing.join(", "))]
    ColumnMapping { missing: Vec<String> },

    #[error("School name not found in the roster heading")]
    SchoolNameNotFound,

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Workbook error: {path} - {message}")]
    Workbook { path: String, message: String },

    #[error("Template error: {message}")]
    Template { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },
}

impl SizingError {
    pub fn header_not_found(scanned_rows: usize) -> Self {
        Self::HeaderNotFound { scanned_rows }
    }

    pub fn column_mapping<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ColumnMapping {
            missing: missing.into_iter().map(Into::into).collect(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn workbook(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Workbook {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::HeaderNotFound { .. } => "HEADER_NOT_FOUND",
            Self::ColumnMapping { .. } => "COLUMN_MAPPING_ERROR",
            Self::SchoolNameNotFound => "SCHOOL_NAME_NOT_FOUND",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Workbook { .. } => "WORKBOOK_ERROR",
            Self::Template { .. } => "TEMPLATE_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Io { .. } => "IO_ERROR",
        }
    }

    /// Process exit code for the command-line front-end.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::HeaderNotFound { .. }
            | Self::ColumnMapping { .. }
            | Self::SchoolNameNotFound
            | Self::Validation { .. } => 2,
            Self::Workbook { .. } | Self::Template { .. } => 3,
            Self::Configuration { .. } => 4,
            Self::Io { .. } => 5,
        }
    }

    /// Structural failures mean the roster layout itself could not be understood.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::HeaderNotFound { .. } | Self::ColumnMapping { .. } | Self::SchoolNameNotFound
        )
    }
}

pub type SizingResult<T> = Result<T, SizingError>;

// Conversion from common error types
impl From<std::io::Error> for SizingError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<config::ConfigError> for SizingError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_mapping_lists_missing_fields() {
        let error = SizingError::column_mapping(["gender", "weight"]);
        assert_eq!(
            error.to_string(),
            "Column mapping error: could not find columns for gender, weight"
        );
        assert_eq!(error.error_code(), "COLUMN_MAPPING_ERROR");
        assert!(error.is_structural());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(SizingError::header_not_found(10).exit_code(), 2);
        assert_eq!(SizingError::workbook("a.xlsx", "bad zip").exit_code(), 3);
        assert_eq!(SizingError::configuration("bad").exit_code(), 4);
        assert_eq!(SizingError::io("denied").exit_code(), 5);
        assert!(!SizingError::template("missing sheet").is_structural());
    }

    #[test]
    fn test_io_conversion() {
        let error: SizingError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(error.error_code(), "IO_ERROR");
    }
}
