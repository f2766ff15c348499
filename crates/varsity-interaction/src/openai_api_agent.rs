//! OpenAIApiAgent - Direct REST implementation of the chat-model seam.
//!
//! Calls the OpenAI Chat Completions API. The request carries whatever
//! role-tagged messages and max_tokens cap the caller assembled; the agent
//! adds no prompt content of its own.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use varsity_core::error::{Result, VarsityError};
use varsity_core::model::{ChatModel, ChatRequest};

const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

const PROVIDER: &str = "openai";

/// Chat-model backend that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAIApiAgent {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAIApiAgent {
    /// Creates a new agent with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(BASE_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                VarsityError::backend(PROVIDER, None, format!("request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            VarsityError::backend(PROVIDER, None, format!("failed to parse response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl ChatModel for OpenAIApiAgent {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        let body = wire_request(&self.model, &request);
        self.send_request(&body).await
    }
}

fn wire_request(model: &str, request: &ChatRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: request
            .messages
            .iter()
            .map(|message| WireMessage {
                role: message.role.clone(),
                content: message.content.clone(),
            })
            .collect(),
        max_tokens: request.max_tokens,
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(VarsityError::EmptyResponse(PROVIDER))
}

fn map_http_error(status: StatusCode, body: String) -> VarsityError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    VarsityError::backend(PROVIDER, Some(status.as_u16()), message)
}
