//! Tool server exposing news search and analysis to tool-calling clients.
//!
//! Speaks newline-delimited JSON-RPC 2.0 on stdin/stdout with the subset of
//! the Model Context Protocol needed for tools: `initialize`, `ping`,
//! `tools/list` and `tools/call`.

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::ToolServer;

pub const SERVER_NAME: &str = "gdelt-gemini";
pub const PROTOCOL_VERSION: &str = "2024-11-05";
