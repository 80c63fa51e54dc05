//! Triage engine: the dialogue step processor and its entry points
//!
//! Owns the loaded rule set, the question graph built from it, and the
//! live session registry. Each dialogue step is atomic per session.

mod evaluator;
mod sink;

#[cfg(test)]
mod proptests;

pub use evaluator::{evaluate, Suggestion, MAX_SUGGESTIONS};
pub use sink::{LogSink, SuggestionSink};

use crate::graph::{NextStep, QuestionGraph};
use crate::ruleset::{AnswerValue, Question, RuleSet};
use crate::session::{Session, SessionStats, SessionStore};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Question not found: {0}")]
    QuestionNotFound(String),
    #[error("Session already complete: {0}")]
    SessionComplete(String),
    #[error("Answer for question {question} does not match its {expected} answer type")]
    AnswerShape {
        question: String,
        expected: &'static str,
    },
    /// A successor id failed to resolve even though load-time validation
    /// accepted the rule set. Indicates a bug, not bad caller input.
    #[error("Question graph is inconsistent: successor {0} does not resolve")]
    GraphInconsistent(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Outcome of one dialogue step
#[derive(Debug, Clone)]
pub enum StepOutcome {
    Continue { next_question: Question },
    Complete { suggestions: Vec<Suggestion> },
}

/// What happened inside the per-session critical section
enum StepKind {
    Advanced(String),
    Finished {
        answers: HashMap<String, AnswerValue>,
        suggestions: Vec<Suggestion>,
    },
}

pub struct TriageEngine {
    ruleset: Arc<RuleSet>,
    graph: QuestionGraph,
    store: Arc<SessionStore>,
    sink: Arc<dyn SuggestionSink>,
}

impl TriageEngine {
    pub fn new(ruleset: RuleSet, sink: Arc<dyn SuggestionSink>) -> Self {
        let graph = QuestionGraph::new(&ruleset);
        Self {
            ruleset: Arc::new(ruleset),
            graph,
            store: Arc::new(SessionStore::new()),
            sink,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Start a dialogue positioned at the rule set's entry question
    pub async fn start_session(&self) -> EngineResult<(Session, Question)> {
        let entry = self.ruleset.entry.as_str();
        let first_question = self
            .graph
            .lookup(entry)
            .ok_or_else(|| EngineError::QuestionNotFound(entry.to_string()))?
            .clone();

        let session = self.store.create(entry).await;
        tracing::info!(session_id = %session.id, "Triage session started");
        Ok((session, first_question))
    }

    /// Advance a dialogue by one answer.
    ///
    /// The whole step (record answer, resolve the next question, flip the
    /// completion flag, evaluate) runs under the session's lock; two
    /// concurrent steps on the same session cannot interleave. Delivery to
    /// the sink happens after the lock is released and never fails the
    /// step. On any caller error the session is left unchanged.
    ///
    /// Checks run in order: session, question, answer shape. An unknown
    /// session reports `SessionNotFound` even when the question or answer
    /// would also be rejected.
    pub async fn submit_answer(
        &self,
        session_id: &str,
        question_id: &str,
        answer: AnswerValue,
    ) -> EngineResult<StepOutcome> {
        let handle = self
            .store
            .get(session_id)
            .await
            .ok_or_else(|| EngineError::SessionNotFound(session_id.to_string()))?;

        let question = self
            .graph
            .lookup(question_id)
            .ok_or_else(|| EngineError::QuestionNotFound(question_id.to_string()))?;

        if !answer.matches_type(question.answer_type) {
            return Err(EngineError::AnswerShape {
                question: question_id.to_string(),
                expected: question.answer_type.as_str(),
            });
        }

        // Critical section: synchronous, nothing awaits while locked.
        let step = {
            let mut session = handle.lock().unwrap();
            if session.is_complete {
                return Err(EngineError::SessionComplete(session_id.to_string()));
            }

            // Re-answering overwrites; normal flow only re-answers the
            // current question, but past questions are not locked out.
            session
                .answers
                .insert(question_id.to_string(), answer.clone());

            match QuestionGraph::resolve_next(question, &answer) {
                NextStep::Continue(next_id) => {
                    session.current_question_id = next_id.clone();
                    StepKind::Advanced(next_id)
                }
                NextStep::Terminal => {
                    session.is_complete = true;
                    let suggestions = evaluate(&self.ruleset, &session.answers);
                    StepKind::Finished {
                        answers: session.answers.clone(),
                        suggestions,
                    }
                }
            }
        };

        match step {
            StepKind::Advanced(next_id) => {
                // Load-time validation guarantees successor ids resolve;
                // a miss here is an internal invariant violation.
                let next_question = self
                    .graph
                    .lookup(&next_id)
                    .ok_or_else(|| EngineError::GraphInconsistent(next_id.clone()))?
                    .clone();
                tracing::debug!(session_id, question_id, next = %next_id, "Dialogue advanced");
                Ok(StepOutcome::Continue { next_question })
            }
            StepKind::Finished {
                answers,
                suggestions,
            } => {
                tracing::info!(
                    session_id,
                    suggestions = suggestions.len(),
                    "Dialogue complete"
                );
                if let Err(error) = self.sink.deliver(session_id, &answers, &suggestions).await {
                    tracing::error!(session_id, error, "Suggestion delivery failed");
                }
                Ok(StepOutcome::Complete { suggestions })
            }
        }
    }

    /// Idempotent teardown; ending an unknown session is not an error
    pub async fn end_session(&self, session_id: &str) {
        if self.store.remove(session_id).await {
            tracing::debug!(session_id, "Session ended");
        }
    }

    pub async fn stats(&self) -> SessionStats {
        self.store.stats().await
    }
}
