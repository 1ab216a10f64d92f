pub mod engine;
pub mod pipeline;
pub mod processor;
pub mod prompt;

pub use crate::domain::model::{
    BatchReport, CodingSession, GenerationResult, InputRecord, RecordId,
};
pub use crate::domain::ports::{ConfigProvider, ModelClient, Pipeline, Storage};
pub use crate::utils::error::Result;
