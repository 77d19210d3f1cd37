//! Tool-discovery protocol client.
//!
//! Launches an MCP server process and speaks the minimal NDJSON JSON-RPC
//! handshake over its stdio: `initialize` (id 1) followed by `tools/list`
//! (id 2). Each discovery session owns one child process and resolves to
//! an ordered list of tool names, or an empty list on any failure.
//!
//! Submodules:
//! - `codec`: [`LinesCodec`](tokio_util::codec::LinesCodec)-based stream framing for NDJSON messages.
//! - `protocol`: request builders and inbound JSON-RPC message classification.
//! - `router`: the handshake state machine driving the two-request exchange.
//! - `gate`: single-settlement guard ensuring exactly one outcome per session.
//! - `spawner`: process spawning with stdio capture and idempotent termination.
//! - `session`: the `discover` entry point tying the pieces into one task.

pub mod codec;
pub mod gate;
pub mod protocol;
pub mod router;
pub mod session;
pub mod spawner;

pub use gate::DiscoveryOutcome;
pub use session::discover;
pub use spawner::LaunchSpec;
