//! Gateway HTTP server: exposes registered agents over `/agents` and `/runs`.

use crate::agents::{AgentManifest, AgentRegistry};
use crate::config::Config;
use crate::gateway::protocol::{
    ErrorBody, RunCreateRequest, RunMode, RunResponse, RunStatus, EVENT_FRAGMENT,
    EVENT_RUN_COMPLETED,
};
use crate::message::OutboundFragment;
use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use serde_json::json;
use std::sync::Arc;

/// Errors surfaced to HTTP clients. Malformed bodies are rejected by the extractors before this.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("agent not found: {0}")]
    AgentNotFound(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self {
            ServerError::AgentNotFound(_) => StatusCode::NOT_FOUND,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Shared state for the gateway (config and agent registry).
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<Config>,
    pub registry: AgentRegistry,
}

/// Build the gateway router. Exposed so callers can serve it on their own listener.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route("/ping", get(ping))
        .route("/agents", get(list_agents))
        .route("/agents/:name", get(get_agent))
        .route("/runs", post(create_run))
        .with_state(state)
}

/// Run the gateway server; binds to config.server.bind:config.server.port.
/// Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_gateway(config: Config, registry: AgentRegistry) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.bind.trim(), config.server.port);
    let state = GatewayState {
        config: Arc::new(config),
        registry,
    };
    let names: Vec<String> = state
        .registry
        .manifests()
        .await
        .into_iter()
        .map(|m| m.name)
        .collect();
    log::info!("serving {} agent(s): {}", names.len(), names.join(", "));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// GET / returns a simple liveness JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    let agents = state.registry.len().await;
    Json(json!({
        "runtime": "running",
        "port": state.config.server.port,
        "agents": agents,
    }))
}

async fn ping() -> Json<serde_json::Value> {
    Json(json!({}))
}

/// GET /agents lists the manifests of all registered agents.
async fn list_agents(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    let agents = state.registry.manifests().await;
    Json(json!({ "agents": agents }))
}

async fn get_agent(
    State(state): State<GatewayState>,
    Path(name): Path<String>,
) -> Result<Json<AgentManifest>, ServerError> {
    state
        .registry
        .manifest(&name)
        .await
        .map(Json)
        .ok_or(ServerError::AgentNotFound(name))
}

/// POST /runs runs one agent invocation. Sync mode collects the output; stream
/// mode forwards fragments as server-sent events as soon as the agent yields them.
async fn create_run(
    State(state): State<GatewayState>,
    Json(req): Json<RunCreateRequest>,
) -> Result<Response, ServerError> {
    let RunCreateRequest {
        agent_name,
        input,
        mode,
    } = req;
    let handler = state
        .registry
        .get(&agent_name)
        .await
        .ok_or_else(|| ServerError::AgentNotFound(agent_name.clone()))?;

    let run_id = format!("run-{}", uuid::Uuid::new_v4());
    let created_at = Utc::now();
    log::info!(
        "run {}: agent {} with {} message(s) ({:?})",
        run_id,
        agent_name,
        input.len(),
        mode
    );
    let fragments = handler.run(input);

    match mode {
        RunMode::Sync => {
            let output: Vec<OutboundFragment> = fragments.collect().await;
            log::debug!("run {} completed with {} fragment(s)", run_id, output.len());
            Ok(Json(RunResponse {
                run_id,
                agent_name,
                status: RunStatus::Completed,
                output,
                created_at,
                finished_at: Utc::now(),
            })
            .into_response())
        }
        RunMode::Stream => {
            let events = fragments.map(|f| Event::default().event(EVENT_FRAGMENT).json_data(&f));
            let completed = stream::once(async move {
                log::debug!("run {} stream completed", run_id);
                let done = RunResponse {
                    run_id,
                    agent_name,
                    status: RunStatus::Completed,
                    output: Vec::new(),
                    created_at,
                    finished_at: Utc::now(),
                };
                Event::default().event(EVENT_RUN_COMPLETED).json_data(&done)
            });
            Ok(Sse::new(events.chain(completed))
                .keep_alive(KeepAlive::default())
                .into_response())
        }
    }
}
