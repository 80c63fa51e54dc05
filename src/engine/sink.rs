//! Delivery seam for finalized suggestions
//!
//! Persistence of completed triage outcomes lives outside the engine; this
//! trait is the boundary the output is handed across once a dialogue
//! reaches terminal.

use super::Suggestion;
use crate::ruleset::AnswerValue;
use async_trait::async_trait;
use std::collections::HashMap;

/// Receiver for a completed session's outcome
#[async_trait]
pub trait SuggestionSink: Send + Sync {
    async fn deliver(
        &self,
        session_id: &str,
        answers: &HashMap<String, AnswerValue>,
        suggestions: &[Suggestion],
    ) -> Result<(), String>;
}

/// Default sink: logs the outcome and otherwise drops it
pub struct LogSink;

#[async_trait]
impl SuggestionSink for LogSink {
    async fn deliver(
        &self,
        session_id: &str,
        answers: &HashMap<String, AnswerValue>,
        suggestions: &[Suggestion],
    ) -> Result<(), String> {
        tracing::info!(
            session_id,
            answered = answers.len(),
            suggestions = suggestions.len(),
            top_urgency = ?suggestions.first().map(|s| s.urgency),
            "Triage outcome finalized"
        );
        Ok(())
    }
}
