use crate::adapters::ollama::DEFAULT_ENDPOINT;
use crate::config::{validate_provider, TomlConfig, DEFAULT_ID_COLUMN, DEFAULT_MODEL, DEFAULT_TEXT_COLUMN};
use crate::core::ConfigProvider;
use crate::domain::model::OutputFormat;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "icd-coder")]
#[command(about = "Generate ICD-10 diagnosis codes for clinical notes with a local Ollama model")]
pub struct CliConfig {
    /// CSV file with an id column and a text column
    #[arg(short, long)]
    pub input: Option<String>,

    /// Model name on the Ollama server [default: llama3.2:3b]
    #[arg(short, long)]
    pub model: Option<String>,

    /// Ollama base URL [default: http://localhost:11434]
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Identifier column name [default: id]
    #[arg(long)]
    pub id_column: Option<String>,

    /// Clinical text column name [default: text]
    #[arg(long)]
    pub text_column: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Write collected results to this file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Format of the results file (inferred from the extension when omitted)
    #[arg(long, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    /// Validate the input and show the first prompt without calling the model
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// 命令列有指定的值優先，其餘由 TOML 補上
    pub fn merge_file(mut self, file: TomlConfig) -> Self {
        self.monitor = self.monitor || file.monitoring_enabled();
        self.input = self.input.or(file.input.path);
        self.model = self.model.or(file.model.name);
        self.endpoint = self.endpoint.or(file.model.endpoint);
        self.id_column = self.id_column.or(file.input.id_column);
        self.text_column = self.text_column.or(file.input.text_column);
        self.timeout_seconds = self.timeout_seconds.or(file.model.timeout_seconds);
        self.output = self.output.or(file.output.path);
        self.output_format = self.output_format.or(file.output.format);
        self
    }
}

impl ConfigProvider for CliConfig {
    fn model_id(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn input_path(&self) -> Option<&str> {
        self.input.as_deref()
    }

    fn id_column(&self) -> &str {
        self.id_column.as_deref().unwrap_or(DEFAULT_ID_COLUMN)
    }

    fn text_column(&self) -> &str {
        self.text_column.as_deref().unwrap_or(DEFAULT_TEXT_COLUMN)
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_deref()
    }

    fn output_format(&self) -> OutputFormat {
        self.output_format
            .or_else(|| self.output_path().map(OutputFormat::from_path))
            .unwrap_or_default()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
