//! Triage Engine - conversational symptom triage service
//!
//! A Rust backend driving a branching question/answer dialogue and
//! evaluating a declarative rule set over the collected answers to produce
//! ranked, urgency-tagged suggestions.

mod api;
mod engine;
mod graph;
mod ruleset;
mod session;

use api::{create_router, AppState};
use engine::{LogSink, TriageEngine};
use ruleset::RuleSet;
use session::spawn_sweeper;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "triage_engine=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let ruleset_path =
        std::env::var("TRIAGE_RULESET_PATH").unwrap_or_else(|_| "ruleset.json".to_string());

    let port: u16 = std::env::var("TRIAGE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let session_ttl_secs: i64 = std::env::var("TRIAGE_SESSION_TTL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1800);

    let sweep_interval_secs: u64 = std::env::var("TRIAGE_SWEEP_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(60);

    // Load the rule asset; any failure here aborts startup.
    tracing::info!(path = %ruleset_path, "Loading rule set");
    let ruleset = RuleSet::load(&ruleset_path)?;
    tracing::info!(
        questions = ruleset.questions.len(),
        rules = ruleset.rules.len(),
        entry = %ruleset.entry,
        "Rule set loaded"
    );

    let engine = Arc::new(TriageEngine::new(ruleset, Arc::new(LogSink)));

    // Background sweep of stale sessions
    let shutdown = CancellationToken::new();
    let sweeper = spawn_sweeper(
        engine.store().clone(),
        Duration::from_secs(sweep_interval_secs),
        chrono::Duration::seconds(session_ttl_secs),
        shutdown.clone(),
    );

    // Create application state and router
    let state = AppState::new(engine);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Triage engine listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    // Stop the sweeper before exiting
    shutdown.cancel();
    sweeper.await?;

    Ok(())
}
