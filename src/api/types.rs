//! API request and response types

use crate::engine::Suggestion;
use crate::ruleset::{AnswerValue, Question};
use serde::{Deserialize, Serialize};

/// Request to submit one answer
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question_id: String,
    pub answer: AnswerValue,
}

/// Response for session creation
#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub first_question: Question,
}

/// Response for one dialogue step
#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<Suggestion>>,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error body returned for failed requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
