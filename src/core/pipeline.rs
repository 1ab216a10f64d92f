use crate::adapters::{csv_input, report};
use crate::core::processor::RowProcessor;
use crate::core::{BatchReport, CodingSession, InputRecord, ModelClient, Pipeline, Storage};
use crate::domain::model::OutputFormat;
use crate::domain::ports::ProgressSink;
use crate::utils::error::Result;
use std::sync::Arc;

/// 結果匯出設定；未指定路徑時不寫檔
#[derive(Debug, Clone, Default)]
pub struct OutputSettings {
    pub path: Option<String>,
    pub format: OutputFormat,
}

/// Load CSV → generate codes per row → optionally export.
pub struct CodingPipeline<S: Storage, M: ModelClient> {
    storage: S,
    session: CodingSession,
    processor: RowProcessor<M>,
    output: OutputSettings,
}

impl<S: Storage, M: ModelClient> CodingPipeline<S, M> {
    pub fn new(storage: S, client: M, session: CodingSession) -> Self {
        Self {
            storage,
            session,
            processor: RowProcessor::new(client),
            output: OutputSettings::default(),
        }
    }

    pub fn with_output(mut self, output: OutputSettings) -> Self {
        self.output = output;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.processor = self.processor.with_progress(progress);
        self
    }

    pub fn session(&self) -> &CodingSession {
        &self.session
    }
}

#[async_trait::async_trait]
impl<S: Storage, M: ModelClient> Pipeline for CodingPipeline<S, M> {
    async fn extract(&self) -> Result<Vec<InputRecord>> {
        tracing::debug!("Reading input file: {}", self.session.input_path);
        let data = self.storage.read_file(&self.session.input_path).await?;
        csv_input::parse_records(&data, &self.session.schema)
    }

    async fn transform(&self, records: Vec<InputRecord>) -> Result<BatchReport> {
        let results = self
            .processor
            .process(&records, &self.session.model_id)
            .await;

        Ok(BatchReport {
            model_id: self.session.model_id.clone(),
            results,
        })
    }

    async fn load(&self, batch: &BatchReport) -> Result<Option<String>> {
        let Some(path) = &self.output.path else {
            tracing::debug!("No output path configured, results are only displayed");
            return Ok(None);
        };

        let data = report::render(batch, self.output.format)?;
        tracing::debug!("Writing {:?} report ({} bytes) to {}", self.output.format, data.len(), path);
        self.storage.write_file(path, &data).await?;

        Ok(Some(path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ColumnSchema, GenerationError, GenerationOutcome};
    use crate::utils::error::CoderError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                CoderError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    /// 把提示詞最後一行（病歷內容）當成回覆，便於驗證順序
    #[derive(Default)]
    struct EchoClient {
        calls: StdMutex<usize>,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl ModelClient for EchoClient {
        async fn generate(&self, prompt: &str, _model_id: &str) -> GenerationOutcome {
            *self.calls.lock().unwrap() += 1;
            let chart = prompt.trim_end().lines().last().unwrap_or_default().to_string();
            if Some(chart.as_str()) == self.fail_on {
                return Err(GenerationError::Transport("connection reset".to_string()));
            }
            Ok(format!("codes for {}", chart))
        }
    }

    const CHARTS: &str = "id,text\n1,Patient has fever and cough.\n2,Patient reports chest pain.\n";

    #[tokio::test]
    async fn test_extract_reads_records_from_storage() {
        let storage = MockStorage::with_file("charts.csv", CHARTS);
        let pipeline = CodingPipeline::new(
            storage,
            EchoClient::default(),
            CodingSession::new("llama3.2:3b", "charts.csv"),
        );

        let records = pipeline.extract().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text, "Patient reports chest pain.");
    }

    #[tokio::test]
    async fn test_extract_rejects_missing_columns_before_any_call() {
        let storage = MockStorage::with_file("charts.csv", "id,notes\n1,fever\n");
        let session = CodingSession::new("llama3.2:3b", "charts.csv")
            .with_schema(ColumnSchema::default());
        let pipeline = CodingPipeline::new(storage, EchoClient::default(), session);

        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, CoderError::SchemaValidationError { .. }));
        assert_eq!(*pipeline.processor_calls(), 0);
    }

    #[tokio::test]
    async fn test_transform_keeps_order_and_continues_after_failure() {
        let storage = MockStorage::with_file("charts.csv", CHARTS);
        let client = EchoClient {
            fail_on: Some("Patient has fever and cough."),
            ..Default::default()
        };
        let pipeline = CodingPipeline::new(
            storage,
            client,
            CodingSession::new("llama3.2:3b", "charts.csv"),
        );

        let records = pipeline.extract().await.unwrap();
        let batch = pipeline.transform(records).await.unwrap();

        assert_eq!(batch.model_id, "llama3.2:3b");
        assert_eq!(batch.results.len(), 2);
        assert!(!batch.results[0].is_success());
        assert_eq!(batch.results[1].output(), "codes for Patient reports chest pain.");
        assert_eq!(*pipeline.processor_calls(), 2);
    }

    #[tokio::test]
    async fn test_load_without_output_path_writes_nothing() {
        let storage = MockStorage::with_file("charts.csv", CHARTS);
        let pipeline = CodingPipeline::new(
            storage.clone(),
            EchoClient::default(),
            CodingSession::new("llama3.2:3b", "charts.csv"),
        );

        let records = pipeline.extract().await.unwrap();
        let batch = pipeline.transform(records).await.unwrap();
        let written = pipeline.load(&batch).await.unwrap();

        assert!(written.is_none());
        assert_eq!(storage.files.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_load_writes_csv_report() {
        let storage = MockStorage::with_file("charts.csv", CHARTS);
        let pipeline = CodingPipeline::new(
            storage.clone(),
            EchoClient::default(),
            CodingSession::new("llama3.2:3b", "charts.csv"),
        )
        .with_output(OutputSettings {
            path: Some("out/results.csv".to_string()),
            format: OutputFormat::Csv,
        });

        let records = pipeline.extract().await.unwrap();
        let batch = pipeline.transform(records).await.unwrap();
        let written = pipeline.load(&batch).await.unwrap();

        assert_eq!(written.as_deref(), Some("out/results.csv"));
        let data = storage.get_file("out/results.csv").await.unwrap();
        let text = String::from_utf8(data).unwrap();
        assert!(text.starts_with("id,icd10_codes,status,error\n"));
        assert!(text.contains("1,codes for Patient has fever and cough.,ok,"));
    }

    impl<S: Storage> CodingPipeline<S, EchoClient> {
        fn processor_calls(&self) -> std::sync::MutexGuard<'_, usize> {
            self.processor.client().calls.lock().unwrap()
        }
    }
}
