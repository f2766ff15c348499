//! Concrete HTTP backends for varsity-core's trait seams.

pub mod google_search_adapter;
pub mod openai_api_agent;

pub use google_search_adapter::GoogleSearchAdapter;
pub use openai_api_agent::OpenAIApiAgent;
