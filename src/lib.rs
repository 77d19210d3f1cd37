#![forbid(unsafe_code)]

//! `mcp-scout` — discover the tools an MCP server advertises.
//!
//! Spawns a server process, speaks the minimal newline-delimited JSON-RPC
//! handshake (`initialize` then `tools/list`) over its stdio, and reports
//! the ordered list of tool names — or an empty list if discovery fails
//! for any reason.

pub mod config;
pub mod discovery;
pub mod errors;

pub use config::ScoutConfig;
pub use errors::{AppError, Result};
