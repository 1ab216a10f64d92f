pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{console::ConsoleProgress, ollama::OllamaClient, storage::LocalStorage};
pub use config::TomlConfig;
pub use crate::core::{
    engine::{CodingEngine, RunOutcome},
    pipeline::{CodingPipeline, OutputSettings},
    processor::RowProcessor,
    prompt::build_icd_prompt,
};
pub use domain::model::{
    BatchReport, CodingSession, ColumnSchema, GenerationError, GenerationResult, InputRecord,
    OutputFormat, RecordId, GENERATION_ERROR_MESSAGE,
};
pub use utils::error::{CoderError, Result};
