//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.hello-agent/config.json`) and environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// The echo agent's registration and behavior.
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Server bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// HTTP port (default 8000). Overridden by PORT env.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Echo agent settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    /// Name the agent is registered under (default "hello-world-agent").
    #[serde(default = "default_agent_name")]
    pub name: String,

    #[serde(default = "default_agent_description")]
    pub description: String,

    /// Simulated processing delay before the echoes, in milliseconds. 0 disables it.
    /// Overridden by HELLO_AGENT_DELAY_MS env.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_port() -> u16 {
    8000
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_agent_name() -> String {
    "hello-world-agent".to_string()
}

fn default_agent_description() -> String {
    "Greets the caller and echoes back the text it received".to_string()
}

fn default_delay_ms() -> u64 {
    500
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            description: default_agent_description(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl AgentConfig {
    pub fn delay(&self) -> Option<Duration> {
        (self.delay_ms > 0).then(|| Duration::from_millis(self.delay_ms))
    }
}

impl ServerConfig {
    /// Base URL clients use to reach this server.
    pub fn base_url(&self) -> String {
        let host = match self.bind.trim() {
            "0.0.0.0" | "" => "127.0.0.1",
            "::" => "[::1]",
            other => other,
        };
        format!("http://{}:{}", host, self.port)
    }
}

fn env_trimmed(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

/// Apply PORT and HELLO_AGENT_DELAY_MS env overrides. Unparseable values are ignored.
pub fn apply_env_overrides(config: &mut Config) {
    if let Some(port) = env_trimmed("PORT") {
        match port.parse::<u16>() {
            Ok(p) => config.server.port = p,
            Err(_) => log::warn!("ignoring invalid PORT value: {}", port),
        }
    }
    if let Some(delay) = env_trimmed("HELLO_AGENT_DELAY_MS") {
        match delay.parse::<u64>() {
            Ok(ms) => config.agent.delay_ms = ms,
            Err(_) => log::warn!("ignoring invalid HELLO_AGENT_DELAY_MS value: {}", delay),
        }
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("HELLO_AGENT_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".hello-agent").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Parse a config document; missing fields take their defaults.
pub fn parse_config(s: &str) -> Result<Config> {
    Ok(serde_json::from_str(s)?)
}

/// Load config from the given path (or the default). Missing file => default config.
/// Env overrides are applied on top. Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let mut config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        parse_config(&s).with_context(|| format!("parsing config from {}", path.display()))?
    };
    apply_env_overrides(&mut config);
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.server.port, 8000);
        assert_eq!(c.server.bind, "127.0.0.1");
        assert_eq!(c.agent.name, "hello-world-agent");
        assert_eq!(c.agent.delay(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn empty_document_is_default() {
        let c = parse_config("{}").expect("parse");
        assert_eq!(c.server.port, 8000);
        assert_eq!(c.agent.delay_ms, 500);
    }

    #[test]
    fn camel_case_fields() {
        let c = parse_config(r#"{"server":{"port":9100},"agent":{"name":"echo","delayMs":0}}"#)
            .expect("parse");
        assert_eq!(c.server.port, 9100);
        assert_eq!(c.server.bind, "127.0.0.1");
        assert_eq!(c.agent.name, "echo");
        assert_eq!(c.agent.delay(), None);
    }

    #[test]
    fn invalid_document_is_error() {
        assert!(parse_config(r#"{"server":{"port":"eighty"}}"#).is_err());
    }

    #[test]
    fn base_url_maps_unspecified_bind_to_loopback() {
        let mut s = ServerConfig::default();
        assert_eq!(s.base_url(), "http://127.0.0.1:8000");
        s.bind = "0.0.0.0".to_string();
        s.port = 9000;
        assert_eq!(s.base_url(), "http://127.0.0.1:9000");
    }

    // Env vars are process-wide, so every override case runs in this one test.
    #[test]
    fn env_overrides_port_and_delay() {
        std::env::set_var("PORT", "9123");
        std::env::set_var("HELLO_AGENT_DELAY_MS", "0");
        let mut c = Config::default();
        apply_env_overrides(&mut c);
        assert_eq!(c.server.port, 9123);
        assert_eq!(c.agent.delay(), None);

        std::env::set_var("PORT", "abc");
        std::env::set_var("HELLO_AGENT_DELAY_MS", "-5");
        let mut c = Config::default();
        apply_env_overrides(&mut c);
        assert_eq!(c.server.port, 8000);
        assert_eq!(c.agent.delay_ms, 500);

        std::env::remove_var("PORT");
        std::env::remove_var("HELLO_AGENT_DELAY_MS");
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join(format!("hello-agent-missing-{}.json", uuid::Uuid::new_v4()));
        let (c, used) = load_config(Some(path.clone())).expect("load");
        assert_eq!(used, path);
        assert_eq!(c.agent.name, "hello-world-agent");
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("hello-agent-config-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{"agent":{"description":"custom"}}"#).expect("write");
        let (c, _) = load_config(Some(path.clone())).expect("load");
        assert_eq!(c.agent.description, "custom");
        let _ = std::fs::remove_file(path);
    }
}
