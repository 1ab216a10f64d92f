#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::adapters::ollama::OllamaClient;
use crate::core::pipeline::OutputSettings;
use crate::core::{CodingSession, ConfigProvider};
use crate::domain::model::ColumnSchema;
use crate::utils::error::{CoderError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_positive_number,
    validate_required_field, validate_url,
};

pub const DEFAULT_MODEL: &str = "llama3.2:3b";
pub const DEFAULT_ID_COLUMN: &str = "id";
pub const DEFAULT_TEXT_COLUMN: &str = "text";

/// 共用的配置檢查，CLI 與 TOML 都走這裡
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_non_empty_string("model", config.model_id())?;
    validate_url("endpoint", config.endpoint())?;

    let input = config.input_path().map(str::to_string);
    let input = validate_required_field("input", &input)?;
    validate_path("input", input)?;
    validate_file_extension("input", input, &["csv"])?;

    validate_non_empty_string("id_column", config.id_column())?;
    validate_non_empty_string("text_column", config.text_column())?;
    if config.id_column() == config.text_column() {
        return Err(CoderError::InvalidConfigValueError {
            field: "text_column".to_string(),
            value: config.text_column().to_string(),
            reason: "id and text columns must be different".to_string(),
        });
    }

    if let Some(timeout) = config.timeout_seconds() {
        validate_positive_number("timeout_seconds", timeout, 1)?;
    }

    if let Some(output) = config.output_path() {
        validate_path("output", output)?;
    }

    Ok(())
}

pub fn build_session<C: ConfigProvider + ?Sized>(config: &C) -> Result<CodingSession> {
    let input = config
        .input_path()
        .ok_or_else(|| CoderError::MissingConfigError {
            field: "input".to_string(),
        })?;

    Ok(CodingSession::new(config.model_id(), input)
        .with_schema(ColumnSchema::new(config.id_column(), config.text_column())))
}

pub fn build_client<C: ConfigProvider + ?Sized>(config: &C) -> Result<OllamaClient> {
    match config.timeout_seconds() {
        Some(timeout) => OllamaClient::with_timeout(config.endpoint(), timeout),
        None => Ok(OllamaClient::new(config.endpoint())),
    }
}

pub fn output_settings<C: ConfigProvider + ?Sized>(config: &C) -> OutputSettings {
    OutputSettings {
        path: config.output_path().map(str::to_string),
        format: config.output_format(),
    }
}
