//! Agent handlers and the registry the gateway dispatches runs through.
//!
//! A handler turns a list of inbound messages into a fragment stream; the
//! registry maps agent names to handlers.

mod registry;

pub use registry::{AgentHandler, AgentManifest, AgentRegistry};

use crate::config::AgentConfig;
use crate::responder::EchoResponder;
use std::sync::Arc;

/// Register the built-in echo agent under the configured name.
pub async fn register_default_agents(registry: &AgentRegistry, config: &AgentConfig) {
    let responder = EchoResponder::new(config.delay());
    registry
        .register(
            AgentManifest {
                name: config.name.clone(),
                description: config.description.clone(),
            },
            Arc::new(responder),
        )
        .await;
}
