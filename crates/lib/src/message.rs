//! Message and fragment shapes exchanged with an agent.
//!
//! Inbound: `{ "role", "parts": [{ "content_type", "content" }] }`.
//! Outbound fragments are either a bare string or a message of the same shape.

use serde::{Deserialize, Serialize};

pub const TEXT_PLAIN: &str = "text/plain";

/// One content part of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePart {
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Payload; absent for parts that only carry a reference or binary body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A chat message: role plus ordered content parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

/// A unit of agent output: plain text or a structured message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundFragment {
    Text(String),
    Message(Message),
}

fn default_content_type() -> String {
    TEXT_PLAIN.to_string()
}

fn default_role() -> String {
    "user".to_string()
}

impl MessagePart {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content_type: TEXT_PLAIN.to_string(),
            content: Some(content.into()),
        }
    }

    /// True when the content type is `text/*` (parameters like `; charset=utf-8` ignored).
    pub fn is_text(&self) -> bool {
        let essence = self
            .content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        essence.starts_with("text/")
    }
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![MessagePart::text(text)],
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            role: "agent".to_string(),
            parts: vec![MessagePart::text(text)],
        }
    }

    /// Content of the first text part that carries content, if any.
    /// Later text parts are ignored; an empty first text part is returned as-is.
    pub fn first_text(&self) -> Option<&str> {
        self.parts
            .iter()
            .filter(|p| p.is_text())
            .find_map(|p| p.content.as_deref())
    }
}

impl OutboundFragment {
    /// Text of the fragment: the string itself, or the message's first text part.
    pub fn text(&self) -> Option<&str> {
        match self {
            OutboundFragment::Text(s) => Some(s),
            OutboundFragment::Message(m) => m.first_text(),
        }
    }
}

impl From<String> for OutboundFragment {
    fn from(s: String) -> Self {
        OutboundFragment::Text(s)
    }
}

impl From<Message> for OutboundFragment {
    fn from(m: Message) -> Self {
        OutboundFragment::Message(m)
    }
}
