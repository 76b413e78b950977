//! Gateway HTTP wire types (run requests and responses).

use crate::message::{Message, OutboundFragment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the run's output is delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Collect all fragments and return them in one JSON response.
    #[default]
    Sync,
    /// Server-sent events: one `fragment` event per fragment, then `run.completed`.
    Stream,
}

/// `POST /runs` body: `{ "agent_name", "input": [Message], "mode" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunCreateRequest {
    pub agent_name: String,
    #[serde(default)]
    pub input: Vec<Message>,
    #[serde(default)]
    pub mode: RunMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
}

/// Result of a run. In stream mode the `run.completed` event carries this with empty output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResponse {
    pub run_id: String,
    pub agent_name: String,
    pub status: RunStatus,
    #[serde(default)]
    pub output: Vec<OutboundFragment>,
    pub created_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Error body: `{ "error": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// SSE event names used in stream mode.
pub const EVENT_FRAGMENT: &str = "fragment";
pub const EVENT_RUN_COMPLETED: &str = "run.completed";
