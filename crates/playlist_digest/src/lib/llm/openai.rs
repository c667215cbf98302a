use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::{Summarizer, SummaryResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("No content in completion response")]
    EmptyResponse,
}

impl OpenAIError {
    /// Credential errors; retrying with the next video won't help.
    pub fn is_auth(&self) -> bool {
        matches!(self, OpenAIError::Api { status: 401 | 403, .. })
    }
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub async fn send_completion_request(
        &self,
        model_name: &str,
        system_prompt: &str,
        user_content: &str,
        max_tokens: u32,
    ) -> Result<CompletionResponse, OpenAIError> {
        let body = completion_body(model_name, system_prompt, user_content, max_tokens);

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        Ok(resp.json::<CompletionResponse>().await?)
    }
}

fn completion_body(model_name: &str, system_prompt: &str, user_content: &str, max_tokens: u32) -> Value {
    serde_json::json!({
        "model": model_name,
        "max_tokens": max_tokens,
        "messages": [
            {
                "role": "system",
                "content": system_prompt
            },
            {
                "role": "user",
                "content": user_content
            }
        ]
    })
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub choices: Vec<CompletionChoice>,
}

impl CompletionResponse {
    /// Text of the first choice; an absent or blank message is an error.
    pub fn into_content(self) -> Result<String, OpenAIError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or(OpenAIError::EmptyResponse)?;

        if choice.finish_reason.as_deref() == Some("length") {
            tracing::warn!("Completion stopped at the output token limit");
        }

        choice
            .message
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or(OpenAIError::EmptyResponse)
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: CompletionMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}

impl Summarizer for OpenAIClient {
    const SUMMARIZER_MODEL: &'static str = "gpt-4o-2024-05-13";
    type Error = OpenAIError;

    #[tracing::instrument(skip_all, fields(model = Self::SUMMARIZER_MODEL))]
    async fn summarize(
        &self,
        system_prompt: &str,
        content: &str,
    ) -> Result<SummaryResponse, Self::Error> {
        let summary = self
            .send_completion_request(
                Self::SUMMARIZER_MODEL,
                system_prompt,
                content,
                Self::MAX_OUTPUT_TOKENS,
            )
            .await
            .and_then(CompletionResponse::into_content)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize content"))?;

        Ok(SummaryResponse { summary })
    }

    fn is_fatal(error: &Self::Error) -> bool {
        error.is_auth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completion_body_has_fixed_shape() {
        let body = completion_body("gpt-4o-2024-05-13", "be brief", "Topic: x\nTranscript: y", 750);

        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-2024-05-13",
                "max_tokens": 750,
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "Topic: x\nTranscript: y"}
                ]
            })
        );
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_into_content_takes_first_choice() {
        let response: CompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "A summary."}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "Another."}, "finish_reason": "stop"}
            ]
        }))
        .unwrap();

        assert_eq!(response.into_content().unwrap(), "A summary.");
    }

    #[test]
    fn test_into_content_rejects_missing_content() {
        let no_choices: CompletionResponse =
            serde_json::from_value(json!({"id": "c", "choices": []})).unwrap();
        assert!(matches!(
            no_choices.into_content(),
            Err(OpenAIError::EmptyResponse)
        ));

        let blank: CompletionResponse = serde_json::from_value(json!({
            "id": "c",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "  "}, "finish_reason": null}]
        }))
        .unwrap();
        assert!(matches!(blank.into_content(), Err(OpenAIError::EmptyResponse)));
    }

    #[test]
    fn test_auth_errors_are_fatal() {
        let unauthorized = OpenAIError::Api {
            status: 401,
            message: "invalid_api_key".into(),
        };
        let rate_limited = OpenAIError::Api {
            status: 429,
            message: "slow down".into(),
        };

        assert!(OpenAIClient::is_fatal(&unauthorized));
        assert!(!OpenAIClient::is_fatal(&rate_limited));
        assert!(!OpenAIClient::is_fatal(&OpenAIError::EmptyResponse));
    }
}
