use crate::domain::model::{
    BatchReport, GenerationOutcome, GenerationResult, InputRecord, OutputFormat,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn model_id(&self) -> &str;
    fn endpoint(&self) -> &str;
    fn input_path(&self) -> Option<&str>;
    fn id_column(&self) -> &str;
    fn text_column(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
    fn output_path(&self) -> Option<&str>;
    fn output_format(&self) -> OutputFormat;
}

/// Single-turn chat call against a model service.
///
/// Implementations never fail the caller: every problem is reported through
/// the returned [`GenerationOutcome`].
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &str, model_id: &str) -> GenerationOutcome;
}

/// Receives per-row status while a batch is running.
pub trait ProgressSink: Send + Sync {
    fn row_started(&self, _index: usize, _total: usize, _record: &InputRecord) {}
    fn row_finished(&self, _index: usize, _total: usize, _result: &GenerationResult) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<InputRecord>>;
    async fn transform(&self, records: Vec<InputRecord>) -> Result<BatchReport>;
    async fn load(&self, report: &BatchReport) -> Result<Option<String>>;
}
