//! Proctoring Monitor API Server
//!
//! REST API over the proctoring engine: session lifecycle, per-tick
//! perception input, live status, reports and Prometheus metrics.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use monitor::{ProctorEngine, SharedEngine};
use perception::LoudnessConfig;
use serde::Serialize;
use std::sync::Arc;
use storage::{FileStore, PersistenceTracker, Repository, SessionStore, StorageError};
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod error;
mod routes;

pub use crate::config::{AppConfig, LoggingConfig};
pub use error::{ApiError, ApiResult};

/// Router state
pub type SharedState = Arc<RwLock<AppState>>;

/// Application state shared across handlers
pub struct AppState {
    /// Proctoring engine, shared with any in-process monitor loop
    pub engine: SharedEngine,
    /// Finalized sessions kept in memory
    pub repository: Arc<Repository>,
    /// Durable store written in the background on session end
    pub durable: Option<Arc<dyn SessionStore>>,
    /// Outcome of each durable save, surfaced to clients as a warning
    pub persistence: PersistenceTracker,
    /// Loudness threshold for raw audio levels
    pub loudness: LoudnessConfig,
    /// Prometheus renderer, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: &AppConfig) -> Result<Self, StorageError> {
        let durable: Option<Arc<dyn SessionStore>> = match &config.storage.data_dir {
            Some(dir) => Some(Arc::new(FileStore::open(dir)?)),
            None => None,
        };

        Ok(Self {
            engine: ProctorEngine::new(config.engine.clone()).shared(),
            repository: Arc::new(Repository::with_retention(config.storage.max_sessions)),
            durable,
            persistence: PersistenceTracker::with_capacity(config.storage.max_sessions),
            loudness: config.audio.clone(),
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        })
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub session_active: bool,
    pub ticks: u64,
    pub stored_sessions: usize,
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/sessions", post(routes::sessions::start_session))
        .route("/api/v1/sessions/end", post(routes::sessions::end_session))
        .route("/api/v1/sessions/current", get(routes::sessions::current_session))
        .route("/api/v1/sessions/current/report", get(routes::reports::text_report))
        .route("/api/v1/sessions/current/report.csv", get(routes::reports::csv_report))
        .route("/api/v1/sessions/:id", get(routes::sessions::get_session))
        .route("/api/v1/sessions/:id/persistence", get(routes::sessions::persistence_status))
        .route("/api/v1/ticks", post(routes::ticks::post_tick))
        .route("/api/v1/status", get(routes::ticks::get_status))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    let engine = state.engine.read().await;
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        session_active: engine.sessions().is_active(),
        ticks: engine.ticks(),
        stored_sessions: state.repository.count(),
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed".to_string(),
        ),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) {
    let level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder().with_max_level(level).with_target(true);

    let result = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.expect("Failed to set tracing subscriber");
}

/// Run the server
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let metrics = PrometheusBuilder::new().install_recorder()?;
    let state = AppState::new(&config)?.with_metrics(metrics);
    let app = create_router(Arc::new(RwLock::new(state)));

    let addr = config.server.addr();
    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
