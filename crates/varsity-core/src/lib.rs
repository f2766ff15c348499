pub mod classify;
pub mod compose;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod transcript;

// Re-export common error type
pub use error::{Result, VarsityError};

pub use classify::{Intent, IntentClassifier};
pub use compose::ResponseComposer;
pub use config::{Credentials, DomainConfig, ModelConfig};
pub use model::{ChatMessage, ChatModel, ChatRequest, SearchHit, SearchProvider};
pub use orchestrator::ConversationOrchestrator;
pub use transcript::Transcript;
