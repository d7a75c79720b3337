use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub reference: ReferenceConfig,
    pub logging: LoggingConfig,
}

/// Reference workbooks bundled with the tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub size_table_path: PathBuf,
    pub template_path: PathBuf,
    /// Sheet of the template that receives the allocation rows.
    pub template_sheet: String,
    /// 1-based row of the first allocation row.
    pub first_data_row: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // e.g. SIZING__REFERENCE__TEMPLATE_PATH
            .add_source(Environment::with_prefix("SIZING").separator("__"));

        config.build()?.try_deserialize()
    }
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            size_table_path: PathBuf::from("码数表.xlsx"),
            template_path: PathBuf::from("格式模版.xlsx"),
            template_sheet: "衣服配码".to_string(),
            first_data_row: 4,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}
