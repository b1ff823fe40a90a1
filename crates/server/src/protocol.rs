//! JSON-RPC 2.0 framing
//!
//! One request per line in, one compact response per line out.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcError;

pub const JSONRPC_VERSION: &str = "2.0";

/// Tool protocol revision announced by `initialize`
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Prefix of methods that are sent without expecting a reply
const NOTIFICATION_PREFIX: &str = "notifications/";

/// A decoded request
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    /// `None` when the field was absent
    pub id: Option<Value>,
    pub method: String,
    pub params: Value,
}

impl RpcRequest {
    /// Decode one input line
    ///
    /// On failure returns the error response to send back.
    pub fn parse(line: &str) -> Result<Self, RpcResponse> {
        let value: Value =
            serde_json::from_str(line).map_err(|_| RpcResponse::failure(None, RpcError::parse_error()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, RpcResponse> {
        let Value::Object(mut obj) = value else {
            return Err(RpcResponse::failure(
                None,
                RpcError::invalid_request("expected a JSON object"),
            ));
        };

        let id = obj.remove("id");
        let method = match obj.remove("method") {
            Some(Value::String(method)) => method,
            _ => {
                return Err(RpcResponse::failure(
                    id,
                    RpcError::invalid_request("method must be a string"),
                ));
            }
        };
        let params = obj.remove("params").unwrap_or(Value::Null);

        Ok(Self { id, method, params })
    }

    /// Notifications get no response
    pub fn is_notification(&self) -> bool {
        self.id.is_none() && self.method.starts_with(NOTIFICATION_PREFIX)
    }
}

/// A response line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.unwrap_or(Value::Null),
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<Value>, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.unwrap_or(Value::Null),
            result: None,
            error: Some(error),
        }
    }

    pub fn from_result(id: Option<Value>, outcome: Result<Value, RpcError>) -> Self {
        match outcome {
            Ok(result) => Self::success(id, result),
            Err(error) => Self::failure(id, error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Compact single-line encoding
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"jsonrpc":"2.0","id":null,"error":{{"code":-32603,"message":"Response encoding failed: {}"}}}}"#,
                e.to_string().replace('"', "'")
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::codes;
    use serde_json::json;

    #[test]
    fn test_parse_request() {
        let req = RpcRequest::parse(r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#).unwrap();
        assert_eq!(req.id, Some(json!(7)));
        assert_eq!(req.method, "tools/list");
        assert_eq!(req.params, Value::Null);
        assert!(!req.is_notification());
    }

    #[test]
    fn test_malformed_json() {
        let resp = RpcRequest::parse("{not json").unwrap_err();
        assert_eq!(resp.id, Value::Null);
        assert_eq!(resp.error.unwrap().code, codes::PARSE_ERROR);
    }

    #[test]
    fn test_non_object_and_missing_method() {
        let resp = RpcRequest::parse("[1,2]").unwrap_err();
        assert_eq!(resp.error.unwrap().code, codes::INVALID_REQUEST);

        let resp = RpcRequest::parse(r#"{"id":"a","params":{}}"#).unwrap_err();
        assert_eq!(resp.id, json!("a"));
        assert_eq!(resp.error.unwrap().code, codes::INVALID_REQUEST);
    }

    #[test]
    fn test_notification_detection() {
        let req = RpcRequest::parse(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .unwrap();
        assert!(req.is_notification());

        let req = RpcRequest::parse(r#"{"jsonrpc":"2.0","method":"tools/list"}"#).unwrap();
        assert!(!req.is_notification());
    }

    #[test]
    fn test_response_line_shape() {
        let line = RpcResponse::success(Some(json!(1)), json!({})).to_line();
        assert_eq!(line, r#"{"jsonrpc":"2.0","id":1,"result":{}}"#);

        let line = RpcResponse::failure(None, RpcError::parse_error()).to_line();
        assert_eq!(
            line,
            r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"Parse error"}}"#
        );
    }
}
