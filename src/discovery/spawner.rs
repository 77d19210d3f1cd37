//! MCP server process spawner.
//!
//! Spawns server processes for discovery sessions with all three stdio
//! streams piped and `kill_on_drop(true)`, so a session dropped on any
//! path still reaps its child. The child's environment is the current
//! process environment overlaid with the spec's entries; stderr is
//! captured for diagnostics and never parsed as protocol data.

use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tracing::{debug, info};

use crate::{AppError, Result};

/// Default discovery deadline when a spec does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Launch parameters for one discovery session.
///
/// Immutable once the session starts.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// Executable path or name.
    pub command: String,
    /// Arguments passed to the command, in order.
    pub args: Vec<String>,
    /// Environment overrides merged over the inherited environment.
    pub env: HashMap<String, String>,
    /// Session deadline, started at launch.
    pub timeout: Duration,
}

impl LaunchSpec {
    /// A spec for `command` with no arguments and the default timeout.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            env: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Live stdio connection to a spawned server process.
#[derive(Debug)]
pub struct ServerProcess {
    /// Child process handle — kept alive so `kill_on_drop` works.
    pub child: Child,
    /// Server's stdin for sending requests.
    pub stdin: ChildStdin,
    /// Server's stdout carrying NDJSON protocol messages.
    pub stdout: ChildStdout,
    /// Server's stderr, captured for diagnostics only.
    pub stderr: ChildStderr,
}

/// Spawn the server process a spec describes.
///
/// # Errors
///
/// Returns `AppError::Spawn` if the executable cannot be launched or a
/// stdio stream cannot be captured.
pub fn spawn_server(spec: &LaunchSpec) -> Result<ServerProcess> {
    let mut cmd = Command::new(&spec.command);
    cmd.args(&spec.args);
    for (key, value) in &spec.env {
        cmd.env(key, value);
    }
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .map_err(|err| AppError::Spawn(format!("failed to spawn '{}': {err}", spec.command)))?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| AppError::Spawn("failed to capture server stdin".into()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| AppError::Spawn("failed to capture server stdout".into()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| AppError::Spawn("failed to capture server stderr".into()))?;

    info!(
        command = %spec.command,
        pid = child.id().unwrap_or(0),
        "server process spawned"
    );

    Ok(ServerProcess {
        child,
        stdin,
        stdout,
        stderr,
    })
}

/// Request the server process stop.
///
/// Safe to call repeatedly or after the child has already exited — both
/// are no-ops.
pub async fn terminate(child: &mut Child) {
    if let Ok(Some(status)) = child.try_wait() {
        debug!(?status, "terminate requested for an already-exited process");
        return;
    }
    if let Err(err) = child.start_kill() {
        debug!(%err, "kill request ignored, process already finished");
        return;
    }
    let _ = child.wait().await;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
