//! OpenAI wire types and conversions to the application port types.

use serde::{Deserialize, Serialize};
use tuned_application::ports::llm_gateway::{
    CompletionChoice, CompletionRequest, CompletionResponse, TokenUsage,
};
use tuned_domain::{ChatMessage, FineTuningJob, JobStatus};

#[derive(Debug, Serialize)]
pub(super) struct ApiChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
}

impl<'a> From<&'a CompletionRequest> for ApiChatRequest<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiChatResponse {
    pub id: String,
    #[serde(default)]
    pub choices: Vec<ApiChoice>,
    pub usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiChoice {
    pub message: ApiMessage,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl From<ApiChatResponse> for CompletionResponse {
    fn from(api: ApiChatResponse) -> Self {
        Self {
            id: api.id,
            choices: api
                .choices
                .into_iter()
                .map(|c| CompletionChoice {
                    text: c.message.content,
                })
                .collect(),
            usage: api.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiFile {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ApiCreateJob<'a> {
    pub training_file: &'a str,
    pub model: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiJob {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub fine_tuned_model: Option<String>,
}

impl From<ApiJob> for FineTuningJob {
    fn from(api: ApiJob) -> Self {
        Self {
            id: api.id,
            status: api.status,
            fine_tuned_model: api.fine_tuned_model,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = CompletionRequest {
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.5,
            max_tokens: 100,
        };

        let body = serde_json::to_value(ApiChatRequest::from(&request)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hi"}
                ],
                "temperature": 0.5,
                "max_tokens": 100
            })
        );
    }

    #[test]
    fn test_response_conversion() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "answer"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 200, "completion_tokens": 300, "total_tokens": 500}
        }"#;

        let api: ApiChatResponse = serde_json::from_str(json).unwrap();
        let response = CompletionResponse::from(api);

        assert_eq!(response.id, "chatcmpl-123");
        assert_eq!(response.first_text(), Some("answer"));
        assert_eq!(response.usage.unwrap().total_tokens, 500);
    }

    #[test]
    fn test_null_content_and_missing_usage() {
        let json = r#"{"id": "x", "choices": [{"message": {"role": "assistant", "content": null}}]}"#;

        let response = CompletionResponse::from(serde_json::from_str::<ApiChatResponse>(json).unwrap());

        assert_eq!(response.first_text(), None);
        assert!(response.usage.is_none());
    }

    #[test]
    fn test_job_conversion() {
        let json = r#"{
            "object": "fine_tuning.job",
            "id": "ftjob-abc",
            "model": "gpt-3.5-turbo",
            "status": "validating_files",
            "fine_tuned_model": null
        }"#;

        let job = FineTuningJob::from(serde_json::from_str::<ApiJob>(json).unwrap());

        assert_eq!(job.id, "ftjob-abc");
        assert_eq!(job.status, JobStatus::ValidatingFiles);
        assert!(job.fine_tuned_model.is_none());
    }
}
