//! Single-settlement guard for a discovery session.
//!
//! Several independent signals race to finish a session: a successful
//! `tools/list` response, an explicit server error, the deadline timer,
//! process exit, and launch failure. The gate accepts whichever arrives
//! first and discards the rest, so the session resolves exactly once and
//! tears the process down exactly once.

use tracing::debug;

/// Why a session settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleCause {
    /// The server answered `tools/list`.
    Success,
    /// The server reported an explicit error message.
    ProtocolError,
    /// The deadline elapsed before any terminal signal.
    Timeout,
    /// The server process exited or closed its output stream early.
    ProcessExit,
    /// The server process could not be launched.
    LaunchFailure,
}

/// Final result of one discovery session.
///
/// An empty list covers both "the server advertises no tools" and
/// "discovery failed"; callers must not read empty as an error signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryOutcome {
    /// Discovered tool names, in the server's response order.
    pub tools: Vec<String>,
}

/// Accepts the first completion signal and discards all later ones.
#[derive(Debug, Default)]
pub struct CompletionGate {
    settled: Option<(SettleCause, DiscoveryOutcome)>,
}

impl CompletionGate {
    /// Create an unsettled gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome unless an earlier signal already won.
    ///
    /// Returns `true` when this call settled the gate; `false` when a
    /// previous settlement holds, in which case `tools` is discarded and
    /// nothing changes.
    pub fn settle(&mut self, cause: SettleCause, tools: Vec<String>) -> bool {
        if self.settled.is_some() {
            debug!(?cause, "completion signal after settlement, ignoring");
            return false;
        }
        self.settled = Some((cause, DiscoveryOutcome { tools }));
        true
    }

    /// Whether a signal has already won.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settled.is_some()
    }

    /// The winning cause, if settled.
    #[must_use]
    pub fn cause(&self) -> Option<SettleCause> {
        self.settled.as_ref().map(|(cause, _)| *cause)
    }

    /// Consume the gate, yielding the recorded outcome.
    ///
    /// An unsettled gate yields the empty outcome.
    #[must_use]
    pub fn into_outcome(self) -> DiscoveryOutcome {
        self.settled
            .map_or_else(DiscoveryOutcome::default, |(_, outcome)| outcome)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
