use crate::core::prompt::build_icd_prompt;
use crate::domain::model::{GenerationResult, InputRecord};
use crate::domain::ports::{ModelClient, NoopProgress, ProgressSink};
use std::sync::Arc;

/// Runs every record through the model, one at a time, in input order.
pub struct RowProcessor<M: ModelClient> {
    client: M,
    progress: Arc<dyn ProgressSink>,
}

impl<M: ModelClient> RowProcessor<M> {
    pub fn new(client: M) -> Self {
        Self {
            client,
            progress: Arc::new(NoopProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn client(&self) -> &M {
        &self.client
    }

    pub async fn process(&self, records: &[InputRecord], model_id: &str) -> Vec<GenerationResult> {
        let total = records.len();
        let mut results = Vec::with_capacity(total);

        for (index, record) in records.iter().enumerate() {
            self.progress.row_started(index, total, record);
            tracing::debug!("Processing ID: {} ({}/{})", record.id, index + 1, total);

            let prompt = build_icd_prompt(&record.text);
            // 單筆失敗不會中斷整批
            let outcome = self.client.generate(&prompt, model_id).await;
            if let Err(e) = &outcome {
                tracing::warn!("⚠️ Generation failed for ID {}: {}", record.id, e);
            }

            let result = GenerationResult::new(record.id.clone(), outcome);
            self.progress.row_finished(index, total, &result);
            results.push(result);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GenerationError, GenerationOutcome, GENERATION_ERROR_MESSAGE};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 依照呼叫順序回傳預先設定的結果
    struct ScriptedClient {
        replies: Mutex<Vec<GenerationOutcome>>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedClient {
        fn new(mut replies: Vec<GenerationOutcome>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedClient {
        async fn generate(&self, prompt: &str, model_id: &str) -> GenerationOutcome {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), model_id.to_string()));
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(GenerationError::Transport("no reply scripted".into())))
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl ProgressSink for RecordingProgress {
        fn row_started(&self, index: usize, total: usize, record: &InputRecord) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {} {}/{}", record.id, index + 1, total));
        }

        fn row_finished(&self, _index: usize, _total: usize, result: &GenerationResult) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done {} {}", result.id, result.is_success()));
        }
    }

    fn sample_records() -> Vec<InputRecord> {
        vec![
            InputRecord::new("1", "Patient has fever and cough."),
            InputRecord::new("2", "Patient reports chest pain."),
        ]
    }

    #[tokio::test]
    async fn test_results_follow_input_order() {
        let client = ScriptedClient::new(vec![
            Ok("[R50.9, R05.9]".to_string()),
            Ok("[R07.9]".to_string()),
        ]);
        let processor = RowProcessor::new(client);

        let results = processor.process(&sample_records(), "llama3.2:3b").await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id.as_str(), "1");
        assert_eq!(results[0].output(), "[R50.9, R05.9]");
        assert_eq!(results[1].id.as_str(), "2");
        assert_eq!(results[1].output(), "[R07.9]");

        let prompts = processor.client.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].0.ends_with("Patient has fever and cough.\n"));
        assert_eq!(prompts[1].1, "llama3.2:3b");
    }

    #[tokio::test]
    async fn test_failed_row_does_not_stop_batch() {
        let client = ScriptedClient::new(vec![
            Err(GenerationError::Timeout("deadline elapsed".to_string())),
            Ok("[R07.9]".to_string()),
        ]);
        let processor = RowProcessor::new(client);

        let results = processor.process(&sample_records(), "llama3.2:3b").await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].output(), GENERATION_ERROR_MESSAGE);
        assert!(matches!(results[0].error(), Some(GenerationError::Timeout(_))));
        assert!(results[1].is_success());
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let processor = RowProcessor::new(ScriptedClient::new(vec![]));

        let results = processor.process(&[], "llama3.2:3b").await;

        assert!(results.is_empty());
        assert!(processor.client.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_progress_events_are_emitted_per_row() {
        let progress = Arc::new(RecordingProgress::default());
        let client = ScriptedClient::new(vec![
            Ok("[R50.9]".to_string()),
            Err(GenerationError::EmptyPrompt),
        ]);
        let processor = RowProcessor::new(client).with_progress(progress.clone());

        processor.process(&sample_records(), "llama3.2:3b").await;

        let events = progress.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "start 1 1/2".to_string(),
                "done 1 true".to_string(),
                "start 2 2/2".to_string(),
                "done 2 false".to_string(),
            ]
        );
    }
}
