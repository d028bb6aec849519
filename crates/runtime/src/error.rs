//! Error types for the PhantomJS bridge.

use thiserror::Error;

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the PhantomJS bridge.
///
/// Every error is returned to the immediate caller; the bridge never
/// retries and never swallows a failure.
#[derive(Debug, Error)]
pub enum Error {
    /// No runnable PhantomJS executable could be located.
    #[error("PhantomJS executable not found. Install PhantomJS or set PHANTOMJS_BIN.")]
    EngineNotFound,

    /// The engine process could not be started.
    #[error("failed to launch PhantomJS: {0}")]
    LaunchFailed(String),

    /// The local control channel could not be allocated.
    #[error("failed to allocate control channel: {0}")]
    Channel(String),

    /// Readiness or a response never arrived within the bound. Fatal to
    /// this call only; the caller may retry the whole operation.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Channel-level fault, e.g. the engine crashed mid-call. Invalidates
    /// the owning process and every handle derived from it.
    #[error("transport error: {0}")]
    Transport(String),

    /// The engine reported a failure for a well-formed request. Local to
    /// the call; the process remains usable.
    #[error("engine error: {0}")]
    Remote(String),

    /// Use of a handle whose owning process or page is no longer open.
    #[error("invalid handle: {0}")]
    InvalidHandle(String),

    /// A registry operation against a process that is not open.
    #[error("registry error: {0}")]
    Registry(String),

    /// A frame-switch target does not exist in the current frameset.
    #[error("frame not found: {0}")]
    FrameNotFound(String),

    /// Opening a process that is already open.
    #[error("process is already open")]
    AlreadyOpen,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    /// Returns true if this is a channel-level transport fault.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Returns true if a frame-switch target was missing.
    pub fn is_frame_not_found(&self) -> bool {
        matches!(self, Error::FrameNotFound(_))
    }
}
