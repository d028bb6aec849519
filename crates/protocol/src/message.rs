//! The request/response envelope of the control protocol.
//!
//! Every exchange with the engine is a single self-contained request and a
//! single response; there is no chunking and no out-of-band event stream.
//! A request names a member on a target object, carries encoded arguments,
//! and optionally a frame selector the engine must re-establish before
//! dispatching the member.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A call to the engine: `{target, member name, args, frame selector}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Remote object identifier; `None` addresses the engine itself
    /// (e.g. `ping`, `createWebPage`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Member name to read, write, or invoke.
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<FrameSelector>,
}

impl Request {
    /// A request addressed to the engine itself.
    pub fn engine(name: impl Into<String>) -> Self {
        Self {
            target: None,
            name: name.into(),
            args: Vec::new(),
            frame: None,
        }
    }

    /// A request addressed to a remote object.
    pub fn object(target: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            name: name.into(),
            args: Vec::new(),
            frame: None,
        }
    }

    pub fn args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn arg(mut self, arg: Value) -> Self {
        self.args.push(arg);
        self
    }

    pub fn frame(mut self, frame: Option<FrameSelector>) -> Self {
        self.frame = frame;
        self
    }
}

/// Selects a frame within the page's current frameset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "lowercase")]
pub enum FrameSelector {
    /// The named frame among the frameset's direct children.
    Name(String),
    /// Zero-based position within the frameset.
    Index(u32),
}

/// Outcome discriminant of a [`Response`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Machine-readable error class for failures the bridge must distinguish
/// from generic remote errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    FrameNotFound,
}

/// The engine's reply: `{status, encoded result}` or
/// `{status, error message}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl Response {
    pub fn ok(value: Value) -> Self {
        Self {
            status: ResponseStatus::Ok,
            value: Some(value),
            message: None,
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            value: None,
            message: Some(message.into()),
            code: None,
        }
    }

    pub fn code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_engine_request_shape() {
        let request = Request::engine("ping");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, json!({"name": "ping"}));
    }

    #[test]
    fn test_object_request_with_frame_selector() {
        let request = Request::object("page-1", "frameName")
            .frame(Some(FrameSelector::Name("FRAME2".into())));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            json!({
                "target": "page-1",
                "name": "frameName",
                "frame": {"by": "name", "value": "FRAME2"},
            })
        );

        let decoded: Request = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_index_selector_shape() {
        let selector = FrameSelector::Index(1);
        let json = serde_json::to_value(&selector).unwrap();
        assert_eq!(json, json!({"by": "index", "value": 1}));
    }

    #[test]
    fn test_response_roundtrip() {
        let ok = Response::ok(json!({"id": "page-1"}));
        let decoded: Response = serde_json::from_str(&serde_json::to_string(&ok).unwrap()).unwrap();
        assert_eq!(decoded, ok);

        let err = Response::error("no such frame").code(ErrorCode::FrameNotFound);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "frame_not_found");
        let decoded: Response = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.code, Some(ErrorCode::FrameNotFound));
    }
}
