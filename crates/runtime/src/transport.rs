//! Synchronous control-channel transport.
//!
//! One request, one response, one call in flight: the caller blocks until
//! the engine answers or the channel reports a connection fault. The
//! transport performs no retries and applies no timeout of its own beyond
//! connection-level fault detection; resilience policy belongs to callers.

use std::time::Duration;

use phantomjs_protocol::{ErrorCode, Request, Response, ResponseStatus};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Blocking HTTP client for the engine's loopback control endpoint.
///
/// Cloning is cheap (the underlying client is reference-counted) and
/// clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl Transport {
    /// Creates a transport for the control endpoint on the given loopback
    /// port.
    pub fn new(port: u16) -> Self {
        Self {
            endpoint: format!("http://127.0.0.1:{port}/"),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// The control endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one request and awaits exactly one response.
    ///
    /// A connection fault surfaces as `Error::Transport` immediately. A
    /// non-success status from the engine surfaces as `Error::Remote`
    /// carrying the engine-supplied message, or `Error::FrameNotFound`
    /// when the response is coded as a missing frame-switch target.
    pub fn call(&self, request: &Request) -> Result<Value> {
        debug!(
            target = "phantomjs",
            name = %request.name,
            object = request.target.as_deref().unwrap_or("<engine>"),
            "control call"
        );

        let http = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .map_err(|e| Error::Transport(e.to_string()))?;

        let response: Response = http.json().map_err(|e| Error::Transport(e.to_string()))?;
        match response.status {
            ResponseStatus::Ok => Ok(response.value.unwrap_or(Value::Null)),
            ResponseStatus::Error => {
                let message = response
                    .message
                    .unwrap_or_else(|| "unspecified engine error".to_string());
                match response.code {
                    Some(ErrorCode::FrameNotFound) => Err(Error::FrameNotFound(message)),
                    None => Err(Error::Remote(message)),
                }
            }
        }
    }

    /// Liveness probe. A short per-request timeout keeps the readiness
    /// poll moving while the engine is still starting up.
    pub fn ping(&self) -> Result<()> {
        let request = Request::engine("ping");
        let http = self
            .client
            .post(&self.endpoint)
            .timeout(Duration::from_secs(1))
            .json(&request)
            .send()
            .map_err(|e| Error::Transport(e.to_string()))?;
        let response: Response = http.json().map_err(|e| Error::Transport(e.to_string()))?;
        match response.status {
            ResponseStatus::Ok => Ok(()),
            ResponseStatus::Error => Err(Error::Remote(
                response
                    .message
                    .unwrap_or_else(|| "ping rejected".to_string()),
            )),
        }
    }
}
