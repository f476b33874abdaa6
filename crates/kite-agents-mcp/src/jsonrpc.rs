//! JSON-RPC 2.0 wire types per <https://www.jsonrpc.org/specification>.

use serde::{Deserialize, Serialize};

/// Request/response identifier. The spec allows String or Number; this
/// client only issues numeric ids but accepts either shape coming back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(u64),
    String(String),
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl Id {
    /// Numeric value of this id, tolerating servers that echo a numeric id
    /// back as a string.
    #[must_use]
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::String(s) => s.parse().ok(),
        }
    }
}

/// A request object. `jsonrpc` is always `"2.0"`.
#[derive(Debug, Serialize)]
pub struct Request {
    jsonrpc: &'static str,
    pub id: Id,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl Request {
    pub fn new(
        id: impl Into<Id>,
        method: impl Into<String>,
        params: Option<serde_json::Value>,
    ) -> Self {
        Self {
            jsonrpc: "2.0",
            id: id.into(),
            method: method.into(),
            params,
        }
    }
}

/// A notification: a request without an id. Servers must not reply to it.
#[derive(Debug, Serialize)]
pub struct Notification {
    jsonrpc: &'static str,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl Notification {
    pub fn new(method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
        }
    }
}

/// A response object. Exactly one of `result` or `error` is present.
#[derive(Debug, Deserialize)]
pub struct Response {
    #[allow(dead_code)]
    pub jsonrpc: Option<String>,
    pub id: Option<Id>,
    pub result: Option<serde_json::Value>,
    pub error: Option<ErrorObject>,
}

/// An error object carried by a failed response.
#[derive(Debug, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_version_tag() {
        let req = Request::new(7, "tools/list", None);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 7);
        assert_eq!(json["method"], "tools/list");
        assert!(json.get("params").is_none());
    }

    #[test]
    fn notification_has_no_id() {
        let note = Notification::new("notifications/initialized", None);
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("id").is_none());
    }

    #[test]
    fn response_parses_string_ids_as_numbers() {
        let resp: Response =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":"42","result":{}}"#).unwrap();
        assert_eq!(resp.id.unwrap().as_number(), Some(42));
    }

    #[test]
    fn error_responses_carry_code_and_message() {
        let resp: Response = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"method not found"}}"#,
        )
        .unwrap();
        let err = resp.error.unwrap();
        assert_eq!(err.code, -32601);
        assert_eq!(err.message, "method not found");
    }
}
