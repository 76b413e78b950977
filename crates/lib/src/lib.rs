//! Hello-world echo agent: message shapes, the echo responder, and the
//! gateway that hosts it over HTTP. Shared by the CLI and the tests.

pub mod agents;
pub mod config;
pub mod gateway;
pub mod init;
pub mod message;
pub mod responder;
