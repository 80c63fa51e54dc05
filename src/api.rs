//! HTTP API for the triage engine

mod handlers;
mod types;

pub use handlers::create_router;

use crate::engine::TriageEngine;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TriageEngine>,
}

impl AppState {
    pub fn new(engine: Arc<TriageEngine>) -> Self {
        Self { engine }
    }
}
