//! The flat conversation transcript.

use std::fmt;

/// Append-only text log of a conversation, used only as model context.
///
/// The hosting shell owns the transcript across turns; the orchestrator takes
/// it by value and returns it with the new exchange appended. It is never
/// truncated or summarized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript(String);

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends one `"User: …\nAssistant: …\n"` exchange.
    pub fn push_exchange(&mut self, user: &str, assistant: &str) {
        self.0
            .push_str(&format!("User: {user}\nAssistant: {assistant}\n"));
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
