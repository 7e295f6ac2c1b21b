//! OpenAI REST adapter.
//!
//! Implements [`CompletionGateway`] against `/v1/chat/completions` and
//! [`FineTuningGateway`] against `/v1/files` and `/v1/fine_tuning/jobs`.
//! Retries are not handled here; wrap the gateway in a
//! [`RetryingGateway`](tuned_application::RetryingGateway) for that.

use super::types::{
    ApiChatRequest, ApiChatResponse, ApiCreateJob, ApiErrorResponse, ApiFile, ApiJob,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use tuned_application::ports::fine_tuning::FineTuningGateway;
use tuned_application::ports::llm_gateway::{
    CompletionGateway, CompletionRequest, CompletionResponse, GatewayError,
};
use tuned_domain::FineTuningJob;

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com";

/// Default environment variable holding the API key.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Gateway speaking the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAiGateway {
    client: Client,
    api_base: String,
    api_key: String,
}

impl OpenAiGateway {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            api_base,
            api_key: api_key.into(),
        }
    }

    /// Read the API key from the environment variable `key_env`.
    pub fn from_env(api_base: impl Into<String>, key_env: &str) -> Result<Self, GatewayError> {
        let api_key = std::env::var(key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                GatewayError::Unauthorized(format!("environment variable {} is not set", key_env))
            })?;
        Ok(Self::new(api_base, api_key))
    }

    /// Apply a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, GatewayError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Other(format!("failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.api_base, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

impl std::fmt::Debug for OpenAiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiGateway")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, GatewayError> {
        debug!(
            "POST chat/completions model={} messages={}",
            request.model,
            request.messages.len()
        );
        let body = ApiChatRequest::from(request);
        let api: ApiChatResponse = self
            .send(self.client.post(self.url("chat/completions")).json(&body))
            .await?;
        Ok(api.into())
    }
}

#[async_trait]
impl FineTuningGateway for OpenAiGateway {
    async fn upload_training_file(&self, path: &Path) -> Result<String, GatewayError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            GatewayError::Other(format!("failed to read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "train.jsonl".to_string());

        debug!("POST files {} ({} bytes)", file_name, bytes.len());
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .text("purpose", "fine-tune")
            .part("file", part);

        let file: ApiFile = self
            .send(self.client.post(self.url("files")).multipart(form))
            .await?;
        Ok(file.id)
    }

    async fn create_job(
        &self,
        training_file_id: &str,
        base_model: &str,
    ) -> Result<FineTuningJob, GatewayError> {
        let body = ApiCreateJob {
            training_file: training_file_id,
            model: base_model,
        };
        let job: ApiJob = self
            .send(self.client.post(self.url("fine_tuning/jobs")).json(&body))
            .await?;
        Ok(job.into())
    }

    async fn retrieve_job(&self, job_id: &str) -> Result<FineTuningJob, GatewayError> {
        let job: ApiJob = self
            .send(
                self.client
                    .get(self.url(&format!("fine_tuning/jobs/{}", job_id))),
            )
            .await?;
        Ok(job.into())
    }
}

fn map_transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_connect() || err.is_timeout() {
        GatewayError::Connection(err.to_string())
    } else {
        GatewayError::RequestFailed(err.to_string())
    }
}

fn map_http_error(status: StatusCode, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ApiErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized(message),
        _ => GatewayError::RequestFailed(format!("HTTP {}: {}", status.as_u16(), message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let gateway = OpenAiGateway::new("http://localhost:8080/", "key");
        assert_eq!(gateway.api_base(), "http://localhost:8080");
        assert_eq!(
            gateway.url("chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_map_http_error_extracts_api_message() {
        let body = r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(
            err,
            GatewayError::RequestFailed("HTTP 429: Rate limit reached".to_string())
        );
    }

    #[test]
    fn test_map_http_error_unauthorized() {
        let err = map_http_error(StatusCode::UNAUTHORIZED, "nope");
        assert_eq!(err, GatewayError::Unauthorized("nope".to_string()));
    }

    #[test]
    fn test_from_env_missing_key() {
        let err = OpenAiGateway::from_env(DEFAULT_API_BASE, "TUNED_TEST_SURELY_UNSET_KEY")
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let gateway = OpenAiGateway::new("http://127.0.0.1:9", "key");
        let request = CompletionRequest {
            messages: vec![tuned_domain::ChatMessage::user("hi")],
            model: "m".to_string(),
            temperature: 0.0,
            max_tokens: 1,
        };

        let err = gateway.complete(&request).await.unwrap_err();
        assert!(matches!(err, GatewayError::Connection(_)));
    }
}
