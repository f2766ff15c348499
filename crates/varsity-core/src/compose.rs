//! Reply composition for the three intent branches.

use tracing::warn;

use crate::classify::Intent;
use crate::config::DomainConfig;
use crate::error::Result;
use crate::model::{ChatMessage, ChatModel, ChatRequest, SearchHit, SearchProvider};

/// Output cap for the greeting and scope-limitation branches.
const BRIEF_REPLY_MAX_TOKENS: u32 = 150;

/// Output cap for evidence-based answers.
const EVIDENCE_REPLY_MAX_TOKENS: u32 = 800;

/// How many search results to request for an on-topic query.
const SEARCH_RESULT_COUNT: u32 = 5;

const GREETING_REPLY_PROMPT: &str = "Generate a friendly greeting response.";

const EVIDENCE_REPLY_PROMPT: &str = "Answer the following question using the information \
     provided, include relevant links and detailed steps where applicable.";

/// Builds one of three prompt templates and invokes the chat model.
pub struct ResponseComposer {
    domain: DomainConfig,
}

impl ResponseComposer {
    pub fn new(domain: DomainConfig) -> Self {
        Self { domain }
    }

    /// Produces the final trimmed reply for the given intent.
    ///
    /// Only the on-topic branch touches the search provider; a search failure
    /// is downgraded to an empty evidence block so "no results" and "search
    /// failed" read identically to the model.
    pub async fn compose(
        &self,
        model: &dyn ChatModel,
        search: &dyn SearchProvider,
        intent: &Intent,
    ) -> Result<String> {
        let request = match intent {
            Intent::Greeting => ChatRequest::new(
                vec![
                    ChatMessage::system(GREETING_REPLY_PROMPT),
                    ChatMessage::user(""),
                ],
                BRIEF_REPLY_MAX_TOKENS,
            ),
            Intent::NotRelated => ChatRequest::new(
                vec![
                    ChatMessage::system(format!(
                        "Respond to the user by stating that you can only answer questions \
                         related to {institution}. Provide some example queries related to \
                         {institution}.",
                        institution = self.domain.institution
                    )),
                    ChatMessage::user(""),
                ],
                BRIEF_REPLY_MAX_TOKENS,
            ),
            Intent::OnTopic(query) => {
                let hits = self.fetch_evidence(search, query).await;
                ChatRequest::new(
                    vec![
                        ChatMessage::system(EVIDENCE_REPLY_PROMPT),
                        ChatMessage::user(format!(
                            "Question: {query}\n\nInformation:\n{}",
                            format_evidence(&hits)
                        )),
                    ],
                    EVIDENCE_REPLY_MAX_TOKENS,
                )
            }
        };

        let reply = model.complete(request).await?;
        Ok(reply.trim().to_string())
    }

    async fn fetch_evidence(&self, search: &dyn SearchProvider, query: &str) -> Vec<SearchHit> {
        match search.search(query, SEARCH_RESULT_COUNT).await {
            Ok(hits) => hits,
            Err(err) => {
                warn!(error = %err, "search failed, answering without evidence");
                Vec::new()
            }
        }
    }
}

/// Formats hits as `"url: snippet"` lines joined by newlines.
fn format_evidence(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| format!("{}: {}", hit.url, hit.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}
