//! JSON-RPC 2.0 envelopes as spoken by Kodi's `/jsonrpc` endpoint.
//!
//! Requests are never pipelined, so every request carries id `1`. On the
//! response side only the `error` member matters; a missing `error` or an
//! error code of `0` both mean success.
//!
//! ```json
//! {"error":{"code":-32602,"message":"Invalid params.",
//!   "data":{"method":"GUI.ShowNotification",
//!           "stack":{"message":"Missing parameter","name":"title","type":"string"}}},
//!  "id":1,"jsonrpc":"2.0"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::params::Params;

pub const JSONRPC_VERSION: &str = "2.0";
pub const REQUEST_ID: u32 = 1;

/// One outgoing JSON-RPC call.
#[derive(Debug, Serialize)]
pub struct RequestEnvelope<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    /// Omitted entirely when empty; Kodi rejects `"params":{}` for some methods.
    #[serde(skip_serializing_if = "Params::is_empty")]
    params: Params,
    id: u32,
}

impl<'a> RequestEnvelope<'a> {
    pub fn new(method: &'a str, params: Params) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            id: REQUEST_ID,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Response body, reduced to what error reporting needs.
#[derive(Debug, Default, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub error: Option<RpcError>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub jsonrpc: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: ErrorData,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorData {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub stack: ErrorStack,
}

/// The offending parameter, as reported by Kodi's schema validator.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorStack {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

impl ResponseEnvelope {
    pub fn decode(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// The error carried by this response, if it is one.
    pub fn into_error(self) -> Option<RpcError> {
        self.error.filter(|e| e.code != 0)
    }
}

impl RpcError {
    /// Human-readable message, e.g.
    /// `Invalid params regarding parameter "title" of type "string"`.
    pub fn describe(&self) -> String {
        let stack = &self.data.stack;

        let summary = [self.data.message.as_str(), stack.message.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let mut subject = Vec::new();
        if !stack.name.is_empty() {
            subject.push(format!("parameter \"{}\"", stack.name));
        }
        if !stack.kind.is_empty() {
            subject.push(format!("of type \"{}\"", stack.kind));
        }
        let subject = subject.join(" ");

        match (summary.is_empty(), subject.is_empty()) {
            (false, false) => format!("{summary} regarding {subject}"),
            (false, true) => summary,
            (true, false) => subject,
            (true, true) if !self.message.is_empty() => self.message.clone(),
            (true, true) => format!("error code {}", self.code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn error_from(body: Value) -> RpcError {
        ResponseEnvelope::decode(&body.to_string())
            .unwrap()
            .into_error()
            .expect("expected an error")
    }

    #[test]
    fn request_with_params() {
        let mut params = Params::new();
        params.insert("playerid".into(), json!(1));
        let json = RequestEnvelope::new("Player.Stop", params).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"jsonrpc":"2.0","method":"Player.Stop","params":{"playerid":1},"id":1}"#
        );
    }

    #[test]
    fn request_without_params_omits_field() {
        let json = RequestEnvelope::new("Input.Home", Params::new())
            .to_json()
            .unwrap();
        assert_eq!(json, r#"{"jsonrpc":"2.0","method":"Input.Home","id":1}"#);
        assert!(!json.contains("params"));
    }

    #[test]
    fn request_serialization_is_stable() {
        let build = || {
            let mut params = Params::new();
            params.insert("value".into(), json!({"seconds": 3, "hours": 1}));
            params.insert("playerid".into(), json!(1));
            RequestEnvelope::new("Player.Seek", params).to_json().unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn success_without_error_field() {
        let resp = ResponseEnvelope::decode(r#"{"jsonrpc":"2.0","id":1,"result":"OK"}"#).unwrap();
        assert!(resp.into_error().is_none());
    }

    #[test]
    fn success_with_zero_code() {
        let resp = ResponseEnvelope::decode(r#"{"error":{"code":0,"message":""},"id":1}"#).unwrap();
        assert!(resp.into_error().is_none());
    }

    #[test]
    fn null_error_is_success() {
        let resp = ResponseEnvelope::decode(r#"{"error":null,"id":1}"#).unwrap();
        assert!(resp.into_error().is_none());
    }

    #[test]
    fn malformed_body_fails_to_decode() {
        assert!(ResponseEnvelope::decode("<html>401</html>").is_err());
        assert!(ResponseEnvelope::decode(r#"{"error":{"code":"x"}}"#).is_err());
    }

    #[test]
    fn describe_data_message_and_stack() {
        let err = error_from(json!({
            "error": {
                "code": 402,
                "data": {
                    "message": "Invalid params",
                    "method": "GUI.ShowNotification",
                    "stack": {"name": "title", "type": "string"}
                }
            },
            "id": 1,
            "jsonrpc": "2.0"
        }));
        assert_eq!(err.code, 402);
        assert_eq!(err.data.method, "GUI.ShowNotification");
        assert_eq!(
            err.describe(),
            r#"Invalid params regarding parameter "title" of type "string""#
        );
    }

    #[test]
    fn describe_all_segments_in_order() {
        let err = error_from(json!({
            "error": {
                "code": -32602,
                "data": {
                    "message": "Invalid params",
                    "stack": {"message": "Missing parameter", "name": "title", "type": "string"}
                }
            }
        }));
        assert_eq!(
            err.describe(),
            r#"Invalid params Missing parameter regarding parameter "title" of type "string""#
        );
    }

    #[test]
    fn describe_stack_message_only() {
        let err = error_from(json!({
            "error": {"code": -32602, "data": {"stack": {"message": "Too many parameters"}}}
        }));
        assert_eq!(err.describe(), "Too many parameters");
    }

    #[test]
    fn describe_top_level_message_only_when_details_are_empty() {
        let err = error_from(json!({"error": {"code": -32601, "message": "Method not found."}}));
        assert_eq!(err.describe(), "Method not found.");

        let err = error_from(json!({
            "error": {
                "code": -32602,
                "message": "Invalid params.",
                "data": {"stack": {"name": "title", "type": "string"}}
            }
        }));
        assert_eq!(err.describe(), r#"parameter "title" of type "string""#);
    }

    #[test]
    fn describe_bare_code() {
        let err = error_from(json!({"error": {"code": -32100}}));
        assert_eq!(err.describe(), "error code -32100");
    }
}
