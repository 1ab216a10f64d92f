use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 模型呼叫失敗時顯示給使用者的固定訊息
pub const GENERATION_ERROR_MESSAGE: &str = "Error generating response. Please try again.";

/// Opaque row identifier, kept exactly as it appears in the input file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub id: RecordId,
    pub text: String,
}

impl InputRecord {
    pub fn new(id: impl Into<RecordId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Why a single chat call did not produce text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("could not reach model service: {0}")]
    Transport(String),

    #[error("model service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("unexpected response from model service: {0}")]
    MalformedResponse(String),
}

pub type GenerationOutcome = std::result::Result<String, GenerationError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub id: RecordId,
    pub outcome: GenerationOutcome,
}

impl GenerationResult {
    pub fn new(id: RecordId, outcome: GenerationOutcome) -> Self {
        Self { id, outcome }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// 顯示用文字：成功時為模型回覆，失敗時為固定錯誤訊息
    pub fn output(&self) -> &str {
        match &self.outcome {
            Ok(text) => text,
            Err(_) => GENERATION_ERROR_MESSAGE,
        }
    }

    pub fn error(&self) -> Option<&GenerationError> {
        self.outcome.as_ref().err()
    }
}

/// Names of the two columns a CSV must expose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub id_column: String,
    pub text_column: String,
}

impl ColumnSchema {
    pub fn new(id_column: impl Into<String>, text_column: impl Into<String>) -> Self {
        Self {
            id_column: id_column.into(),
            text_column: text_column.into(),
        }
    }

    pub fn required(&self) -> Vec<String> {
        vec![self.id_column.clone(), self.text_column.clone()]
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::new("id", "text")
    }
}

/// 單次批次執行的明確上下文，取代隱含的全域 UI 狀態
#[derive(Debug, Clone)]
pub struct CodingSession {
    pub model_id: String,
    pub input_path: String,
    pub schema: ColumnSchema,
}

impl CodingSession {
    pub fn new(model_id: impl Into<String>, input_path: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            input_path: input_path.into(),
            schema: ColumnSchema::default(),
        }
    }

    pub fn with_schema(mut self, schema: ColumnSchema) -> Self {
        self.schema = schema;
        self
    }
}

/// 結果匯出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    /// Picks the format from a file extension, falling back to CSV.
    pub fn from_path(path: &str) -> Self {
        match std::path::Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Csv,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub model_id: String,
    pub results: Vec<GenerationResult>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}
