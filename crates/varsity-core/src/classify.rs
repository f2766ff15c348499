//! Three-way intent classification: greeting, off-topic, or on-topic.
//!
//! Both probes are independent chat-model round-trips capped at a handful of
//! tokens, so the model is forced to emit one canonical answer word that is
//! compared case-insensitively against the expected literal.

use crate::config::DomainConfig;
use crate::error::Result;
use crate::model::{ChatMessage, ChatModel, ChatRequest};
use crate::transcript::Transcript;

/// Hard response-length cap for the yes/no probes.
const CLASSIFY_MAX_TOKENS: u32 = 5;

/// Queries longer than this many words never classify as greetings, even
/// when the greeting probe answers yes.
const GREETING_WORD_LIMIT: usize = 3;

const GREETING_PROBE_PROMPT: &str =
    "Determine if the following text is a greeting. Respond with 'yes' or 'no'.";

/// The classified intent of a single user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// A short greeting ("hi", "good morning").
    Greeting,
    /// The conversation drifted outside the configured institution.
    NotRelated,
    /// In-scope question carrying the original query text forward.
    OnTopic(String),
}

/// Classifies a query against the configured institution domain.
pub struct IntentClassifier {
    domain: DomainConfig,
}

impl IntentClassifier {
    pub fn new(domain: DomainConfig) -> Self {
        Self { domain }
    }

    /// Runs the greeting probe, the word-count gate, and the domain probe.
    pub async fn classify(
        &self,
        model: &dyn ChatModel,
        query: &str,
        transcript: &Transcript,
    ) -> Result<Intent> {
        if self.is_greeting(model, query).await? && word_count(query) <= GREETING_WORD_LIMIT {
            return Ok(Intent::Greeting);
        }

        if !self.is_in_scope(model, query, transcript).await? {
            return Ok(Intent::NotRelated);
        }

        Ok(Intent::OnTopic(query.to_string()))
    }

    async fn is_greeting(&self, model: &dyn ChatModel, query: &str) -> Result<bool> {
        let request = ChatRequest::new(
            vec![
                ChatMessage::system(GREETING_PROBE_PROMPT),
                ChatMessage::user(query),
            ],
            CLASSIFY_MAX_TOKENS,
        );
        let answer = model.complete(request).await?;
        Ok(answer.trim().eq_ignore_ascii_case("yes"))
    }

    async fn is_in_scope(
        &self,
        model: &dyn ChatModel,
        query: &str,
        transcript: &Transcript,
    ) -> Result<bool> {
        let prompt = format!(
            "Determine if the following conversation, considering the history and current \
             message, is talking about {} or if it is getting too general. Respond with '{}' \
             or 'general'.",
            self.domain.institution, self.domain.scope_token
        );
        let request = ChatRequest::new(
            vec![
                ChatMessage::system(prompt),
                ChatMessage::user(format!(
                    "Conversation history: {}\nCurrent message: {}",
                    transcript.as_str(),
                    query
                )),
            ],
            CLASSIFY_MAX_TOKENS,
        );
        let answer = model.complete(request).await?;
        Ok(answer.trim().eq_ignore_ascii_case(&self.domain.scope_token))
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mock::{FailingModel, ScriptedModel};

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(DomainConfig::default())
    }

    #[tokio::test]
    async fn test_short_greeting_classifies_as_greeting() {
        let model = ScriptedModel::new(&["yes"]);
        let intent = classifier()
            .classify(&model, "hi", &Transcript::new())
            .await
            .unwrap();
        assert_eq!(intent, Intent::Greeting);
        // Greeting probe short-circuits; the domain probe never runs.
        assert_eq!(model.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_greeting_answer_is_case_insensitive() {
        let model = ScriptedModel::new(&[" YES \n"]);
        let intent = classifier()
            .classify(&model, "good morning", &Transcript::new())
            .await
            .unwrap();
        assert_eq!(intent, Intent::Greeting);
    }

    #[tokio::test]
    async fn test_four_word_greeting_falls_through_to_domain_probe() {
        // The probe says yes, but the word-count gate rejects it and the
        // domain probe then decides the turn.
        let model = ScriptedModel::new(&["yes", "cgu"]);
        let intent = classifier()
            .classify(&model, "hello there my friend", &Transcript::new())
            .await
            .unwrap();
        assert_eq!(
            intent,
            Intent::OnTopic("hello there my friend".to_string())
        );
        assert_eq!(model.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_off_domain_query_classifies_as_not_related() {
        let model = ScriptedModel::new(&["no", "general"]);
        let intent = classifier()
            .classify(&model, "What's the capital of France?", &Transcript::new())
            .await
            .unwrap();
        assert_eq!(intent, Intent::NotRelated);
    }

    #[tokio::test]
    async fn test_on_topic_query_carries_original_text() {
        let model = ScriptedModel::new(&["no", "cgu"]);
        let query = "What programs does the graduate school offer?";
        let intent = classifier()
            .classify(&model, query, &Transcript::new())
            .await
            .unwrap();
        assert_eq!(intent, Intent::OnTopic(query.to_string()));
    }

    #[tokio::test]
    async fn test_scope_answer_is_trim_and_case_insensitive() {
        let model = ScriptedModel::new(&["no", "  CGU "]);
        let intent = classifier()
            .classify(&model, "tuition fees", &Transcript::new())
            .await
            .unwrap();
        assert!(matches!(intent, Intent::OnTopic(_)));
    }

    #[tokio::test]
    async fn test_probe_requests_are_capped_and_structured() {
        let model = ScriptedModel::new(&["no", "general"]);
        let mut transcript = Transcript::new();
        transcript.push_exchange("earlier question", "earlier answer");
        classifier()
            .classify(&model, "and what about Paris?", &transcript)
            .await
            .unwrap();

        let requests = model.requests();
        assert_eq!(requests.len(), 2);

        let greeting = &requests[0];
        assert_eq!(greeting.max_tokens, CLASSIFY_MAX_TOKENS);
        assert_eq!(greeting.system_content(), Some(GREETING_PROBE_PROMPT));
        assert_eq!(greeting.user_content(), Some("and what about Paris?"));

        let domain = &requests[1];
        assert_eq!(domain.max_tokens, CLASSIFY_MAX_TOKENS);
        assert!(domain.system_content().unwrap().contains("Claremont"));
        let user = domain.user_content().unwrap();
        assert!(user.contains("Conversation history: User: earlier question"));
        assert!(user.contains("Current message: and what about Paris?"));
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let err = classifier()
            .classify(&FailingModel, "hi", &Transcript::new())
            .await
            .unwrap_err();
        assert!(err.is_backend());
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("hi"), 1);
        assert_eq!(word_count("  hello   there  "), 2);
        assert_eq!(word_count("hello there my friend"), 4);
        assert_eq!(word_count(""), 0);
    }
}
