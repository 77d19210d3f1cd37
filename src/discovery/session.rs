//! Discovery session orchestration.
//!
//! One session is one async task: it spawns the server, then runs a single
//! `select!` loop over the framed stdout stream, the stderr reader, the
//! deadline timer, the startup-grace timer, and process exit. The loop
//! body is the only place router state and the completion gate are
//! touched, which serializes every racing signal without locks. The loop
//! runs until the gate settles; teardown (terminate, drop timers) then
//! happens exactly once on the way out.

use std::time::Duration;

use futures_util::StreamExt;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::ChildStdin;
use tokio_util::codec::FramedRead;
use tracing::{debug, info, warn};

use crate::discovery::codec::NdjsonCodec;
use crate::discovery::gate::{CompletionGate, DiscoveryOutcome, SettleCause};
use crate::discovery::protocol;
use crate::discovery::router::{Router, RouterAction};
use crate::discovery::spawner::{self, LaunchSpec, ServerProcess};
use crate::{AppError, Result};

/// Grace period after launch before `initialize` is sent unprompted.
///
/// Races against the first qualifying line of server output; whichever
/// trigger fires first sends the request, and the router's state guard
/// keeps the send at-most-once.
const STARTUP_GRACE: Duration = Duration::from_millis(500);

/// Discover the tools advertised by the server `spec` describes.
///
/// Never fails outwardly: launch failure, timeout, protocol errors, and
/// unexpected exits all degrade to an empty outcome. Tool discovery is
/// advisory — callers proceed with a reduced feature set rather than
/// abort.
pub async fn discover(spec: &LaunchSpec) -> DiscoveryOutcome {
    match run_session(spec).await {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(command = %spec.command, %err, "tool discovery failed");
            DiscoveryOutcome::default()
        }
    }
}

async fn run_session(spec: &LaunchSpec) -> Result<DiscoveryOutcome> {
    let ServerProcess {
        mut child,
        mut stdin,
        stdout,
        stderr,
    } = spawner::spawn_server(spec)?;

    let mut framed = FramedRead::new(stdout, NdjsonCodec::new());
    let mut stderr_lines = BufReader::new(stderr).lines();
    let mut stderr_open = true;
    let mut stderr_log: Vec<String> = Vec::new();

    let mut router = Router::new();
    let mut gate = CompletionGate::new();

    let deadline = tokio::time::sleep(spec.timeout);
    tokio::pin!(deadline);
    let grace = tokio::time::sleep(STARTUP_GRACE);
    tokio::pin!(grace);
    let mut grace_fired = false;

    while !gate.is_settled() {
        tokio::select! {
            () = &mut deadline => {
                debug!(timeout = ?spec.timeout, "deadline elapsed before discovery completed");
                gate.settle(SettleCause::Timeout, Vec::new());
            }

            () = &mut grace, if !grace_fired => {
                grace_fired = true;
                if let Some(action) = router.on_grace_elapsed() {
                    apply_action(&mut stdin, &mut gate, action).await;
                }
            }

            status = child.wait() => {
                debug!(exit = %describe_exit(&status), "server process exited");
                gate.settle(SettleCause::ProcessExit, router.collected_tools());
            }

            item = framed.next() => match item {
                None => {
                    debug!("server stdout closed");
                    gate.settle(SettleCause::ProcessExit, router.collected_tools());
                }
                Some(Err(AppError::Protocol(msg))) => {
                    warn!(error = %msg, "framing error on server stdout, skipping line");
                }
                Some(Err(err)) => {
                    warn!(%err, "stream error on server stdout");
                    gate.settle(SettleCause::ProcessExit, router.collected_tools());
                }
                Some(Ok(line)) => {
                    for action in router.on_line(&line) {
                        apply_action(&mut stdin, &mut gate, action).await;
                    }
                }
            },

            line = stderr_lines.next_line(), if stderr_open => match line {
                Ok(Some(text)) => {
                    debug!(stderr = %text, "server stderr");
                    stderr_log.push(text);
                }
                Ok(None) | Err(_) => stderr_open = false,
            },
        }
    }

    if gate.cause() != Some(SettleCause::Success) && !stderr_log.is_empty() {
        debug!(stderr = %stderr_log.join("\n"), "server stderr captured before termination");
    }

    spawner::terminate(&mut child).await;

    let outcome = gate.into_outcome();
    info!(
        command = %spec.command,
        tool_count = outcome.tools.len(),
        "discovery settled"
    );
    Ok(outcome)
}

/// Execute one router action against the session's resources.
async fn apply_action(stdin: &mut ChildStdin, gate: &mut CompletionGate, action: RouterAction) {
    match action {
        RouterAction::SendInitialize => {
            debug!("sending initialize request");
            send_request(stdin, &protocol::initialize_request()).await;
        }
        RouterAction::SendListTools => {
            debug!("initialize acknowledged, sending tools/list request");
            send_request(stdin, &protocol::list_tools_request()).await;
        }
        RouterAction::CompleteSuccess(tools) => {
            gate.settle(SettleCause::Success, tools);
        }
        RouterAction::CompleteError => {
            gate.settle(SettleCause::ProtocolError, Vec::new());
        }
    }
}

/// Serialize `value` to a compact JSON line and write it to the server's
/// stdin.
///
/// A failed write means the process is gone; it is logged and otherwise
/// ignored, since the exit branch of the session loop settles the outcome.
async fn send_request(stdin: &mut ChildStdin, value: &Value) {
    match serde_json::to_vec(value) {
        Ok(mut bytes) => {
            bytes.push(b'\n');
            if let Err(err) = stdin.write_all(&bytes).await {
                warn!(%err, "write to server stdin failed");
            }
        }
        Err(err) => warn!(%err, "failed to serialize outbound request"),
    }
}

/// Human-readable summary of a child exit status.
fn describe_exit(status: &std::io::Result<std::process::ExitStatus>) -> String {
    match status {
        Ok(st) => st.code().map_or_else(
            || "terminated by signal".to_owned(),
            |code| format!("exited with code {code}"),
        ),
        Err(err) => format!("wait error: {err}"),
    }
}
