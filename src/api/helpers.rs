//! API Gateway proxy response builders.

use serde_json::{Value, json};

/// Returns a response whose body is `{"message": ...}`.
#[must_use]
pub fn message_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "Content-Type": "application/json" },
        "body": json!({ "message": message }).to_string()
    })
}

/// Returns a 200 with `text` as the raw body (URL verification handshake).
#[must_use]
pub fn plain_text(text: &str) -> Value {
    json!({
        "statusCode": 200,
        "headers": { "Content-Type": "text/plain" },
        "body": text
    })
}

/// Returns a bare 200 acknowledgement with an empty body.
#[must_use]
pub fn ok_empty() -> Value {
    json!({ "statusCode": 200, "body": "" })
}
