use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::errors::RelayError;

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

/// Case-insensitive header lookup; API Gateway HTTP APIs lowercase header
/// names while REST APIs keep the sender's casing.
pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// Returns the raw request body, decoding it when API Gateway delivered it base64-encoded.
///
/// `Ok(None)` means there is no body at all.
pub fn raw_body(payload: &Value) -> Result<Option<String>, RelayError> {
    let Some(body) = payload.get("body").and_then(Value::as_str) else {
        return Ok(None);
    };

    let encoded = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if !encoded {
        return Ok(Some(body.to_string()));
    }

    let bytes = STANDARD
        .decode(body)
        .map_err(|e| RelayError::ParseError(format!("Invalid base64 body: {e}")))?;
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|e| RelayError::ParseError(format!("Body is not UTF-8: {e}")))
}

/// Parses a webhook body. Anything other than a non-empty JSON object is rejected.
pub fn parse_event_body(body: &str) -> Result<Value, RelayError> {
    if body.trim().is_empty() {
        return Err(RelayError::ParseError("Empty body".to_string()));
    }

    let value: Value = serde_json::from_str(body)?;
    match value.as_object() {
        Some(map) if !map.is_empty() => Ok(value),
        _ => Err(RelayError::ParseError(
            "Body is not a JSON object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_lookup_ignores_case() {
        let headers = json!({"x-slack-retry-num": "1", "Content-Type": "application/json"});
        assert_eq!(get_header_value(&headers, "X-Slack-Retry-Num"), Some("1"));
        assert_eq!(
            get_header_value(&headers, "content-type"),
            Some("application/json")
        );
        assert_eq!(get_header_value(&headers, "X-Missing"), None);
    }

    #[test]
    fn test_header_lookup_on_null_headers() {
        assert_eq!(get_header_value(&Value::Null, "X-Slack-Retry-Num"), None);
    }

    #[test]
    fn test_v_str_walks_nested_objects() {
        let v = json!({"event": {"type": "app_mention", "n": 3}});
        assert_eq!(v_str(&v, &["event", "type"]), Some("app_mention"));
        assert_eq!(v_str(&v, &["event", "n"]), None);
        assert_eq!(v_str(&v, &["event", "missing"]), None);
    }

    #[test]
    fn test_raw_body_plain_and_base64() {
        let plain = json!({"body": "{\"a\":1}"});
        assert_eq!(raw_body(&plain).unwrap().as_deref(), Some("{\"a\":1}"));

        let encoded = json!({"body": STANDARD.encode("{\"a\":1}"), "isBase64Encoded": true});
        assert_eq!(raw_body(&encoded).unwrap().as_deref(), Some("{\"a\":1}"));

        assert_eq!(raw_body(&json!({})).unwrap(), None);
        assert_eq!(raw_body(&json!({"body": null})).unwrap(), None);
    }

    #[test]
    fn test_raw_body_rejects_bad_base64() {
        let bad = json!({"body": "%%%", "isBase64Encoded": true});
        assert!(raw_body(&bad).is_err());
    }

    #[test]
    fn test_parse_event_body_requires_non_empty_object() {
        assert!(parse_event_body("").is_err());
        assert!(parse_event_body("{}").is_err());
        assert!(parse_event_body("[1,2]").is_err());
        assert!(parse_event_body("not json").is_err());
        assert!(parse_event_body("{\"type\":\"url_verification\"}").is_ok());
    }
}
