//! Gateway: HTTP front for registered agents.
//!
//! `POST /runs` invokes an agent by name, either collecting its output (sync)
//! or streaming it as server-sent events. `GET /agents` lists what is registered.

mod protocol;
mod server;

pub use protocol::{
    ErrorBody, RunCreateRequest, RunMode, RunResponse, RunStatus, EVENT_FRAGMENT,
    EVENT_RUN_COMPLETED,
};
pub use server::{router, run_gateway, GatewayState, ServerError};
