//! Handshake state machine for a discovery session.
//!
//! Tracks progress through the two-request exchange as one explicit
//! [`HandshakeState`], so each outbound request can only ever be emitted
//! from the single state that precedes it. The router performs no I/O:
//! feeding it a framed line (or the startup-grace signal) yields
//! [`RouterAction`]s for the owning session to execute, which keeps every
//! transition observable in unit tests without a live process.

use tracing::debug;

use crate::discovery::protocol::{ListToolsResult, RpcMessage, INITIALIZE_ID, LIST_TOOLS_ID};

/// Handshake progress for one discovery session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HandshakeState {
    /// Waiting for any indication the server is alive enough to talk.
    #[default]
    AwaitingFirstSignal,
    /// `initialize` sent; waiting for the id-1 response.
    InitializeSent,
    /// id-1 response received; `tools/list` is being sent.
    Initialized,
    /// `tools/list` sent; waiting for the id-2 response.
    ListRequested,
    /// Terminal: success or protocol error observed.
    Completed,
}

/// Side effect the session must perform after feeding the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterAction {
    /// Write the `initialize` request to the server's stdin.
    SendInitialize,
    /// Write the `tools/list` request to the server's stdin.
    SendListTools,
    /// Settle the session successfully with the collected tool names.
    CompleteSuccess(Vec<String>),
    /// Settle the session empty: the server reported an error.
    CompleteError,
}

/// Drives the two-request handshake from classified inbound messages.
#[derive(Debug, Default)]
pub struct Router {
    state: HandshakeState,
    tools: Vec<String>,
}

impl Router {
    /// Create a router in [`HandshakeState::AwaitingFirstSignal`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current handshake state.
    #[must_use]
    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Tool names collected so far, in response order.
    ///
    /// Populated only once the `tools/list` response has been processed,
    /// which lets exit-triggered settlement preserve an already-completed
    /// list instead of forcing it to empty.
    #[must_use]
    pub fn collected_tools(&self) -> Vec<String> {
        self.tools.clone()
    }

    /// The startup grace period elapsed without any qualifying output.
    ///
    /// Races against the first classified line; the state check is the
    /// guard that keeps `initialize` a send-at-most-once operation no
    /// matter which trigger fires first (or whether both do).
    pub fn on_grace_elapsed(&mut self) -> Option<RouterAction> {
        if self.state == HandshakeState::AwaitingFirstSignal {
            self.state = HandshakeState::InitializeSent;
            Some(RouterAction::SendInitialize)
        } else {
            None
        }
    }

    /// Feed one framed line; returns the actions to perform, in order.
    ///
    /// Lines that fail to classify are discarded without touching state —
    /// servers interleave non-protocol output on the same stream. Late or
    /// duplicate responses for an already-satisfied id are ignored.
    pub fn on_line(&mut self, line: &str) -> Vec<RouterAction> {
        if self.state == HandshakeState::Completed {
            return Vec::new();
        }

        let message = RpcMessage::classify(line);
        if matches!(message, RpcMessage::Unrecognized) {
            return Vec::new();
        }

        let mut actions = Vec::new();

        // First qualifying line doubles as the liveness signal that
        // triggers `initialize`, ahead of whatever else the message says.
        if self.state == HandshakeState::AwaitingFirstSignal {
            self.state = HandshakeState::InitializeSent;
            actions.push(RouterAction::SendInitialize);
        }

        match message {
            RpcMessage::ErrorResponse { id, .. } => {
                debug!(?id, "server reported an error, aborting discovery");
                self.state = HandshakeState::Completed;
                actions.push(RouterAction::CompleteError);
            }
            RpcMessage::Response {
                id: INITIALIZE_ID, ..
            } if self.state == HandshakeState::InitializeSent => {
                // The send and the state change are one step; `Initialized`
                // is never observable between them.
                self.state = HandshakeState::Initialized;
                actions.push(RouterAction::SendListTools);
                self.state = HandshakeState::ListRequested;
            }
            RpcMessage::Response {
                id: LIST_TOOLS_ID,
                result,
            } if self.state == HandshakeState::ListRequested => {
                match serde_json::from_value::<ListToolsResult>(result) {
                    Ok(list) => {
                        self.tools = list.tools.into_iter().map(|tool| tool.name).collect();
                        self.state = HandshakeState::Completed;
                        actions.push(RouterAction::CompleteSuccess(self.tools.clone()));
                    }
                    Err(err) => {
                        debug!(%err, "tools/list response without a usable tools collection, ignoring");
                    }
                }
            }
            RpcMessage::Response { id, .. } => {
                debug!(id, "ignoring response for an already-satisfied or unknown id");
            }
            RpcMessage::Notification { method } => {
                debug!(method, "ignoring server notification");
            }
            RpcMessage::Unrecognized => {}
        }

        actions
    }
}
