//! JSON-RPC 2.0 message classification and reply builders.

use serde_json::{Value, json};

pub const INVALID_PARAMS: i64 = -32602;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INTERNAL_ERROR: i64 = -32603;
pub const REQUEST_FAILED: i64 = -32803;

/// One classified client message.
#[derive(Debug)]
pub enum Incoming {
    Request {
        id: Value,
        method: String,
        params: Value,
    },
    Notification {
        method: String,
        params: Value,
    },
    /// A response to a server-initiated request. The server sends none, so
    /// these only arrive from confused clients and are dropped.
    Response,
}

/// Classify a decoded frame. `None` means the frame is not JSON-RPC at all.
#[must_use]
pub fn classify(frame: &Value) -> Option<Incoming> {
    let id = frame.get("id");
    let method = frame.get("method").and_then(Value::as_str);
    let params = frame.get("params").cloned().unwrap_or(Value::Null);
    match (id, method) {
        (Some(id), Some(method)) => Some(Incoming::Request {
            id: id.clone(),
            method: method.to_string(),
            params,
        }),
        (None, Some(method)) => Some(Incoming::Notification {
            method: method.to_string(),
            params,
        }),
        (Some(_), None) if frame.get("result").is_some() || frame.get("error").is_some() => {
            Some(Incoming::Response)
        }
        _ => None,
    }
}

#[must_use]
pub fn response(id: &Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

#[must_use]
pub fn error_response(id: &Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message }
    })
}

#[must_use]
pub fn notification(method: &str, params: Value) -> Value {
    json!({ "jsonrpc": "2.0", "method": method, "params": params })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_request() {
        let frame = json!({"jsonrpc": "2.0", "id": 3, "method": "shutdown"});
        match classify(&frame) {
            Some(Incoming::Request { id, method, params }) => {
                assert_eq!(id, json!(3));
                assert_eq!(method, "shutdown");
                assert!(params.is_null());
            }
            other => panic!("expected request, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_notification() {
        let frame = json!({"jsonrpc": "2.0", "method": "exit"});
        assert!(matches!(
            classify(&frame),
            Some(Incoming::Notification { .. })
        ));
    }

    #[test]
    fn test_classify_stray_response_and_garbage() {
        let frame = json!({"jsonrpc": "2.0", "id": 9, "result": null});
        assert!(matches!(classify(&frame), Some(Incoming::Response)));
        assert!(classify(&json!({"jsonrpc": "2.0"})).is_none());
        assert!(classify(&json!({"id": 1})).is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let reply = error_response(&json!(4), METHOD_NOT_FOUND, "no such method");
        assert_eq!(reply["id"], 4);
        assert_eq!(reply["error"]["code"], -32601);
        assert!(reply.get("result").is_none());
    }
}
