pub mod config;
pub mod error;
pub mod grid;
pub mod logging;
pub mod roster;
pub mod size_table;
pub mod validation;

pub use self::config::{AppConfig, LoggingConfig, ReferenceConfig};
pub use error::{SizingError, SizingResult};
pub use grid::{load_grid, Cell, Grid};
pub use logging::init_logging;
pub use roster::{ParsedRoster, RosterParser, RowIssue, WeightUnit};
pub use size_table::{ParsedSizeTable, SizeTableParser, SkippedBracket};
pub use validation::{format_validation_errors, validate_file_type, validate_model};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.reference.template_sheet, "衣服配码");
        assert_eq!(config.reference.first_data_row, 4);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_error_handling() {
        let error = SizingError::validation("weight", "Weight must be non-negative");
        assert_eq!(error.error_code(), "VALIDATION_ERROR");
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_roster_and_reference_share_one_grid_type() {
        let grid = Grid::from_strings([["学校：红星小学"], ["袜子尺码"]]);
        assert_eq!(grid.height(), 2);
        assert!(SizeTableParser::new().parse(&grid).table.is_empty());
    }
}
