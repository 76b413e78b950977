//! Agent registry: register and look up agents by name.

use crate::message::Message;
use crate::responder::{EchoResponder, FragmentStream};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Runs one agent invocation. Each call must return an independent stream.
pub trait AgentHandler: Send + Sync {
    fn run(&self, input: Vec<Message>) -> FragmentStream;
}

impl AgentHandler for EchoResponder {
    fn run(&self, input: Vec<Message>) -> FragmentStream {
        self.respond(input)
    }
}

impl<F> AgentHandler for F
where
    F: Fn(Vec<Message>) -> FragmentStream + Send + Sync,
{
    fn run(&self, input: Vec<Message>) -> FragmentStream {
        self(input)
    }
}

/// Public description of a registered agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

struct Registered {
    manifest: AgentManifest,
    handler: Arc<dyn AgentHandler>,
}

/// Registry of agent names to handlers. Shared across the gateway.
#[derive(Clone)]
pub struct AgentRegistry {
    inner: Arc<RwLock<HashMap<String, Registered>>>,
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a handler under `manifest.name`, replacing any previous agent with that name.
    pub async fn register(&self, manifest: AgentManifest, handler: Arc<dyn AgentHandler>) {
        let name = manifest.name.clone();
        let mut g = self.inner.write().await;
        if g.insert(name.clone(), Registered { manifest, handler }).is_some() {
            log::warn!("agent {} was already registered; replaced", name);
        } else {
            log::info!("registered agent {}", name);
        }
    }

    pub async fn get(&self, name: &str) -> Option<Arc<dyn AgentHandler>> {
        let g = self.inner.read().await;
        g.get(name).map(|r| r.handler.clone())
    }

    pub async fn manifest(&self, name: &str) -> Option<AgentManifest> {
        let g = self.inner.read().await;
        g.get(name).map(|r| r.manifest.clone())
    }

    /// All manifests, sorted by name.
    pub async fn manifests(&self) -> Vec<AgentManifest> {
        let g = self.inner.read().await;
        let mut list: Vec<AgentManifest> = g.values().map(|r| r.manifest.clone()).collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::OutboundFragment;
    use futures_util::stream::{self, StreamExt};

    fn manifest(name: &str) -> AgentManifest {
        AgentManifest {
            name: name.to_string(),
            description: format!("{} agent", name),
        }
    }

    fn fixed(reply: &'static str) -> Arc<dyn AgentHandler> {
        Arc::new(move |_input: Vec<Message>| -> FragmentStream {
            stream::iter(vec![OutboundFragment::Text(reply.to_string())]).boxed()
        })
    }

    #[tokio::test]
    async fn register_and_get() {
        let registry = AgentRegistry::new();
        assert!(registry.is_empty().await);
        registry.register(manifest("echo"), Arc::new(EchoResponder::default())).await;

        let handler = registry.get("echo").await.expect("registered");
        let out: Vec<OutboundFragment> = handler.run(vec![Message::user("hi")]).collect().await;
        assert_eq!(out.len(), 2);
        assert!(registry.get("missing").await.is_none());
        assert_eq!(registry.manifest("echo").await, Some(manifest("echo")));
    }

    #[tokio::test]
    async fn register_same_name_replaces() {
        let registry = AgentRegistry::new();
        registry.register(manifest("a"), fixed("first")).await;
        registry.register(manifest("a"), fixed("second")).await;
        assert_eq!(registry.len().await, 1);

        let out: Vec<OutboundFragment> = registry.get("a").await.expect("a").run(vec![]).collect().await;
        assert_eq!(out, vec![OutboundFragment::Text("second".to_string())]);
    }

    #[tokio::test]
    async fn manifests_sorted_by_name() {
        let registry = AgentRegistry::new();
        registry.register(manifest("zeta"), fixed("z")).await;
        registry.register(manifest("alpha"), fixed("a")).await;
        let names: Vec<String> = registry.manifests().await.into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
