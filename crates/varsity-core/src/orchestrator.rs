//! Conversation orchestrator: the single entry point for one user turn.
//!
//! Sequencing is strictly linear: classify, compose, append the exchange to
//! the transcript. Between one and two chat-model calls plus at most one
//! search call happen per turn, all awaited in order.

use std::sync::Arc;

use crate::classify::IntentClassifier;
use crate::compose::ResponseComposer;
use crate::config::DomainConfig;
use crate::error::Result;
use crate::model::{ChatModel, SearchProvider};
use crate::transcript::Transcript;

/// Coordinates the classifier and composer over the configured backends.
pub struct ConversationOrchestrator {
    model: Arc<dyn ChatModel>,
    search: Arc<dyn SearchProvider>,
    classifier: IntentClassifier,
    composer: ResponseComposer,
}

impl ConversationOrchestrator {
    pub fn new(
        model: Arc<dyn ChatModel>,
        search: Arc<dyn SearchProvider>,
        domain: DomainConfig,
    ) -> Self {
        Self {
            model,
            search,
            classifier: IntentClassifier::new(domain.clone()),
            composer: ResponseComposer::new(domain),
        }
    }

    /// Handles one user turn and returns the reply with the updated
    /// transcript.
    ///
    /// The transcript is taken by value; on error it is dropped and the
    /// caller's copy stays at the pre-turn state, so a failed turn leaves no
    /// trace in the conversation log.
    pub async fn handle_turn(
        &self,
        message: &str,
        mut transcript: Transcript,
    ) -> Result<(String, Transcript)> {
        let intent = self
            .classifier
            .classify(self.model.as_ref(), message, &transcript)
            .await?;

        let reply = self
            .composer
            .compose(self.model.as_ref(), self.search.as_ref(), &intent)
            .await?;

        transcript.push_exchange(message, &reply);
        Ok((reply, transcript))
    }
}
