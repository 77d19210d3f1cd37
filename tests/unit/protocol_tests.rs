//! Unit tests for JSON-RPC request builders and inbound classification.

use mcp_scout::discovery::protocol::{
    initialize_request, list_tools_request, RpcMessage, INITIALIZE_ID, LIST_TOOLS_ID,
    PROTOCOL_VERSION,
};

// ── Request builders ──────────────────────────────────────────────────────────

#[test]
fn initialize_request_carries_version_and_identity() {
    let request = initialize_request();

    assert_eq!(request["jsonrpc"], "2.0");
    assert_eq!(request["id"], INITIALIZE_ID);
    assert_eq!(request["method"], "initialize");
    assert_eq!(request["params"]["protocolVersion"], PROTOCOL_VERSION);
    assert_eq!(request["params"]["clientInfo"]["name"], "mcp-scout");
    assert!(
        request["params"]["clientInfo"]["version"].is_string(),
        "client version must be populated"
    );
    assert!(request["params"]["capabilities"].is_object());
}

#[test]
fn list_tools_request_is_bare() {
    let request = list_tools_request();

    assert_eq!(request["jsonrpc"], "2.0");
    assert_eq!(request["id"], LIST_TOOLS_ID);
    assert_eq!(request["method"], "tools/list");
    assert!(request.get("params").is_none());
}

// ── Inbound classification ────────────────────────────────────────────────────

#[test]
fn classifies_notification() {
    let msg = RpcMessage::classify(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#);
    match msg {
        RpcMessage::Notification { method } => assert_eq!(method, "notifications/initialized"),
        other => panic!("expected notification, got {other:?}"),
    }
}

#[test]
fn classifies_response_with_result() {
    let msg = RpcMessage::classify(r#"{"jsonrpc":"2.0","id":1,"result":{"ok":true}}"#);
    match msg {
        RpcMessage::Response { id, result } => {
            assert_eq!(id, 1);
            assert_eq!(result["ok"], true);
        }
        other => panic!("expected response, got {other:?}"),
    }
}

#[test]
fn null_result_still_counts_as_present() {
    let msg = RpcMessage::classify(r#"{"id":1,"result":null}"#);
    assert!(matches!(msg, RpcMessage::Response { id: 1, .. }));
}

#[test]
fn error_member_wins_over_other_shapes() {
    // A message carrying both a method and an error classifies as an error.
    let msg = RpcMessage::classify(
        r#"{"jsonrpc":"2.0","id":7,"method":"x","error":{"code":-32600,"message":"invalid"}}"#,
    );
    match msg {
        RpcMessage::ErrorResponse { id, error } => {
            assert_eq!(id, Some(7));
            assert_eq!(error["code"], -32600);
        }
        other => panic!("expected error response, got {other:?}"),
    }
}

#[test]
fn error_without_id_is_still_an_error() {
    let msg = RpcMessage::classify(r#"{"error":{"message":"boom"}}"#);
    assert!(matches!(msg, RpcMessage::ErrorResponse { id: None, .. }));
}

#[test]
fn noise_classifies_as_unrecognized() {
    for line in [
        "",
        "   ",
        "starting server on stdio...",
        "[2024-11-05T10:00:00Z] listening",
        "{not json",
        "42",
        r#"["an","array"]"#,
        r#"{"neither":"shape"}"#,
    ] {
        assert!(
            matches!(RpcMessage::classify(line), RpcMessage::Unrecognized),
            "line should be unrecognized: {line:?}"
        );
    }
}
