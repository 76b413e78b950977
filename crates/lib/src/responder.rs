//! Echo responder: greets, then echoes the text of each inbound message.
//!
//! Output order is fixed: one greeting, then one echo per input message in
//! input order. The optional delay sits between the greeting and the first echo.

use crate::message::{Message, OutboundFragment};
use futures_util::future;
use futures_util::stream::{self, BoxStream, StreamExt};
use std::time::Duration;

/// Lazy, finite stream of fragments produced by one agent run.
pub type FragmentStream = BoxStream<'static, OutboundFragment>;

pub const GREETING: &str = "Hello! I'm the hello-world agent.";
pub const ECHO_LABEL: &str = "You said: ";
/// Used when a message has no text part.
pub const TEXT_PLACEHOLDER: &str = "";

/// Stateless echo agent. Holds only the simulated processing delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoResponder {
    delay: Option<Duration>,
}

impl EchoResponder {
    pub fn new(delay: Option<Duration>) -> Self {
        Self {
            delay: delay.filter(|d| !d.is_zero()),
        }
    }

    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }

    /// Produce the response stream for `input`. Never fails: empty input yields
    /// only the greeting, and messages without text echo the placeholder.
    pub fn respond(&self, input: Vec<Message>) -> FragmentStream {
        let greeting = stream::once(future::ready(OutboundFragment::from(GREETING.to_string())));
        if input.is_empty() {
            return greeting.boxed();
        }
        let delay = self.delay;
        let echoes = stream::once(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            stream::iter(input.into_iter().map(|m| echo_fragment(&m)))
        })
        .flatten();
        greeting.chain(echoes).boxed()
    }
}

/// Echo for a single message: `ECHO_LABEL` + first text part (or the placeholder).
pub fn echo_fragment(message: &Message) -> OutboundFragment {
    let text = message.first_text().unwrap_or(TEXT_PLACEHOLDER);
    Message::agent(format!("{}{}", ECHO_LABEL, text)).into()
}
