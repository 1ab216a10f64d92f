use crate::domain::model::{GenerationError, GenerationOutcome};
use crate::domain::ports::ModelClient;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Ollama `/api/chat` 客戶端，非串流模式
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    endpoint: String,
}

impl OllamaClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.endpoint.trim_end_matches('/'))
    }
}

fn classify_transport_error(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        GenerationError::Timeout(e.to_string())
    } else if e.is_decode() {
        GenerationError::MalformedResponse(e.to_string())
    } else {
        GenerationError::Transport(e.to_string())
    }
}

#[async_trait]
impl ModelClient for OllamaClient {
    async fn generate(&self, prompt: &str, model_id: &str) -> GenerationOutcome {
        if prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let request = ChatRequest {
            model: model_id,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let url = self.chat_url();
        tracing::debug!("Making chat request to: {} (model: {})", url, model_id);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        tracing::debug!("Chat response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Ollama 錯誤格式為 {"error": "..."}
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(GenerationError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await.map_err(classify_transport_error)?;
        Ok(chat.message.content)
    }
}
