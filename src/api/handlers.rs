//! HTTP request handlers

use super::types::{
    AnswerRequest, ErrorResponse, StartSessionResponse, StepResponse, SuccessResponse,
};
use super::AppState;
use crate::engine::{EngineError, StepOutcome};
use crate::session::SessionStats;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session lifecycle
        .route("/api/sessions/new", post(start_session))
        .route("/api/sessions/:id/answer", post(submit_answer))
        .route("/api/sessions/:id/end", post(end_session))
        // Registry reporting
        .route("/api/sessions/stats", get(session_stats))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn start_session(
    State(state): State<AppState>,
) -> Result<Json<StartSessionResponse>, AppError> {
    let (session, first_question) = state.engine.start_session().await?;

    Ok(Json(StartSessionResponse {
        session_id: session.id,
        first_question,
    }))
}

async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<StepResponse>, AppError> {
    let outcome = state
        .engine
        .submit_answer(&id, &req.question_id, req.answer)
        .await?;

    Ok(Json(match outcome {
        StepOutcome::Continue { next_question } => StepResponse {
            is_complete: false,
            next_question: Some(next_question),
            suggestions: None,
        },
        StepOutcome::Complete { suggestions } => StepResponse {
            is_complete: true,
            next_question: None,
            suggestions: Some(suggestions),
        },
    }))
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<SuccessResponse> {
    // Idempotent: ending an absent session still succeeds.
    state.engine.end_session(&id).await;
    Json(SuccessResponse { success: true })
}

// ============================================================
// Registry Reporting
// ============================================================

async fn session_stats(State(state): State<AppState>) -> Json<SessionStats> {
    Json(state.engine.stats().await)
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("triage-engine ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match &err {
            EngineError::SessionNotFound(_) => AppError::NotFound(err.to_string()),
            EngineError::QuestionNotFound(_)
            | EngineError::SessionComplete(_)
            | EngineError::AnswerShape { .. } => AppError::BadRequest(err.to_string()),
            EngineError::GraphInconsistent(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
