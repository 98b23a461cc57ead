#![deny(missing_docs)]
//! HTTP control surface for a [`RalphLoop`].
//!
//! | Route | Effect |
//! |-------|--------|
//! | `POST /api/ralph` | start the loop |
//! | `DELETE /api/ralph` | stop the loop |
//! | `GET /api/ralph` | loop status |
//! | `GET /api/ralph/strategies` | registry rows |
//! | `PATCH /api/ralph/strategies/{name}` | toggle `enabled` |
//! | `GET /api/ralph/executions` | execution log, newest first |
//! | `GET /health` | liveness |
//!
//! The loop is passed in as state; there is no process-wide instance.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use ralph_core::error::StoreError;
use ralph_core::id::StrategyName;
use ralph_core::result::ExecutionRecord;
use ralph_core::store::{ExecutionQuery, StrategyRecord, StrategyStore, StrategyUpdate};
use ralph_loop::{LoopState, RalphLoop, StartOutcome, StopOutcome};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Upper bound on `limit` for the executions route.
pub const MAX_EXECUTIONS_LIMIT: usize = 1_000;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// The loop being controlled.
    pub ralph: Arc<RalphLoop>,
    /// The registry and execution log the agent writes to.
    pub store: Arc<dyn StrategyStore>,
}

impl AppState {
    /// Bundle a loop and its store.
    pub fn new(ralph: Arc<RalphLoop>, store: Arc<dyn StrategyStore>) -> Self {
        Self { ralph, store }
    }
}

/// Build the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/ralph",
            get(get_status).post(start_loop).delete(stop_loop),
        )
        .route("/api/ralph/strategies", get(list_strategies))
        .route("/api/ralph/strategies/{name}", patch(update_strategy))
        .route("/api/ralph/executions", get(list_executions))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "ralph.server.listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

#[derive(Debug, Serialize)]
struct ControlResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: LoopState,
    interval_ms: u64,
    cycles_completed: u64,
    last_cycle_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
}

#[derive(Debug, Deserialize)]
struct StrategyPatch {
    enabled: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ExecutionFilter {
    strategy: Option<String>,
    limit: Option<usize>,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

async fn start_loop(State(state): State<AppState>) -> Json<ControlResponse> {
    let response = match state.ralph.start().await {
        StartOutcome::Started => ControlResponse {
            status: "initiated",
            message: Some("Ralph Loop started"),
        },
        StartOutcome::AlreadyRunning => ControlResponse {
            status: "already_running",
            message: None,
        },
    };
    Json(response)
}

async fn stop_loop(State(state): State<AppState>) -> Json<ControlResponse> {
    let status = match state.ralph.stop().await {
        StopOutcome::Stopping => "stopped",
        StopOutcome::NotRunning => "not_running",
    };
    Json(ControlResponse {
        status,
        message: None,
    })
}

async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let status = state.ralph.status().await;
    Json(StatusResponse {
        status: status.state,
        interval_ms: status.interval_ms,
        cycles_completed: status.cycles_completed,
        last_cycle_at: status.last_cycle_at,
    })
}

async fn list_strategies(
    State(state): State<AppState>,
) -> Result<Json<Vec<StrategyRecord>>, (StatusCode, String)> {
    state.store.find_many().await.map(Json).map_err(store_error)
}

async fn update_strategy(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<StrategyPatch>,
) -> Result<Json<StrategyRecord>, (StatusCode, String)> {
    let name = StrategyName::new(name);
    let record = state
        .store
        .update(&name, StrategyUpdate::new().enabled(body.enabled))
        .await
        .map_err(store_error)?;
    tracing::info!(strategy = %name, enabled = body.enabled, "ralph.server.strategy_toggled");
    Ok(Json(record))
}

async fn list_executions(
    State(state): State<AppState>,
    Query(filter): Query<ExecutionFilter>,
) -> Result<Json<Vec<ExecutionRecord>>, (StatusCode, String)> {
    let mut query = ExecutionQuery::all();
    if let Some(strategy) = filter.strategy {
        query = query.strategy(strategy);
    }
    if let Some(limit) = filter.limit {
        query = query.limit(limit.min(MAX_EXECUTIONS_LIMIT));
    }
    state.store.executions(&query).await.map(Json).map_err(store_error)
}

fn store_error(e: StoreError) -> (StatusCode, String) {
    match e {
        StoreError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        other => {
            tracing::error!(error = %other, "ralph.server.store_failed");
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}
