//! Backend trait seams and the message/evidence types exchanged through them.
//!
//! The two external services the chatbot depends on, a chat-completion model
//! and a web search provider, are reached only through these traits so the
//! orchestration logic stays independent of any concrete HTTP client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single role-tagged message in a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Creates a system-role message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A chat-completion request: ordered messages plus a hard output-length cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>, max_tokens: u32) -> Self {
        Self {
            messages,
            max_tokens,
        }
    }

    /// Returns the content of the first system message, if any.
    pub fn system_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.as_str())
    }

    /// Returns the content of the first user message, if any.
    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
    }
}

/// One ranked search result: a link and the snippet the provider extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub snippet: String,
}

/// Generative text backend.
///
/// Implementations perform one blocking round-trip per call and return the
/// generated text untrimmed; callers decide how to post-process it.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String>;
}

/// Web search backend returning up to `count` relevance-ranked hits.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, count: u32) -> Result<Vec<SearchHit>>;
}
