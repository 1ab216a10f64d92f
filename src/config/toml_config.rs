use crate::config::{validate_provider, DEFAULT_ID_COLUMN, DEFAULT_MODEL, DEFAULT_TEXT_COLUMN};
use crate::core::ConfigProvider;
use crate::adapters::ollama::DEFAULT_ENDPOINT;
use crate::domain::model::OutputFormat;
use crate::utils::error::{CoderError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex")
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub model: ModelSection,
    #[serde(default)]
    pub input: InputSection,
    #[serde(default)]
    pub output: OutputSection,
    pub monitoring: Option<MonitoringSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSection {
    pub name: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSection {
    pub path: Option<String>,
    pub id_column: Option<String>,
    pub text_column: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub path: Option<String>,
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitoringSection {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CoderError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OLLAMA_HOST})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn model_id(&self) -> &str {
        self.model.name.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    fn endpoint(&self) -> &str {
        self.model.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn input_path(&self) -> Option<&str> {
        self.input.path.as_deref()
    }

    fn id_column(&self) -> &str {
        self.input.id_column.as_deref().unwrap_or(DEFAULT_ID_COLUMN)
    }

    fn text_column(&self) -> &str {
        self.input.text_column.as_deref().unwrap_or(DEFAULT_TEXT_COLUMN)
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.model.timeout_seconds
    }

    fn output_path(&self) -> Option<&str> {
        self.output.path.as_deref()
    }

    fn output_format(&self) -> OutputFormat {
        self.output
            .format
            .or_else(|| self.output_path().map(OutputFormat::from_path))
            .unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
