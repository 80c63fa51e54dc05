//! Concurrent session registry
//!
//! The outer lock guards the map only and is held briefly; each session
//! serializes its own mutation on an inner mutex, so steps on different
//! sessions proceed fully in parallel. A sweep that removes a session
//! mid-step leaves the in-flight step running against its own `Arc`
//! snapshot; the next lookup reports the session as gone.

use crate::ruleset::AnswerValue;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// One user's in-progress or completed triage dialogue
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: String,
    pub current_question_id: String,
    pub answers: HashMap<String, AnswerValue>,
    pub started_at: DateTime<Utc>,
    pub is_complete: bool,
}

/// Point-in-time view of the registry
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub active: usize,
    pub completed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_started_at: Option<DateTime<Utc>>,
}

/// Registry of live sessions keyed by session id
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session positioned at the entry question
    pub async fn create(&self, entry_question_id: &str) -> Session {
        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            current_question_id: entry_question_id.to_string(),
            answers: HashMap::new(),
            started_at: Utc::now(),
            is_complete: false,
        };

        self.sessions.write().await.insert(
            session.id.clone(),
            Arc::new(Mutex::new(session.clone())),
        );

        session
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Idempotent removal; reports whether the session existed
    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drop every session older than `max_age`, completed or not
    pub async fn sweep(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.lock().unwrap().started_at > cutoff);
        before - sessions.len()
    }

    pub async fn stats(&self) -> SessionStats {
        let sessions = self.sessions.read().await;
        let mut completed = 0;
        let mut oldest_started_at: Option<DateTime<Utc>> = None;

        for session in sessions.values() {
            let session = session.lock().unwrap();
            if session.is_complete {
                completed += 1;
            }
            oldest_started_at = Some(match oldest_started_at {
                Some(oldest) if oldest <= session.started_at => oldest,
                _ => session.started_at,
            });
        }

        SessionStats {
            active: sessions.len() - completed,
            completed,
            oldest_started_at,
        }
    }
}
