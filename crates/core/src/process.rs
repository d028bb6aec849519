//! The supervised engine process and its page factory.

use std::sync::Arc;

use parking_lot::Mutex;
use phantomjs_protocol::Request;
use phantomjs_runtime::engine::{EngineConfig, EngineProcess};
use phantomjs_runtime::transport::Transport;
use phantomjs_runtime::{Error, Result};
use serde_json::Value;
use tracing::warn;

use crate::page::WebPage;
use crate::registry::Registry;

/// Observable liveness state of a [`Process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Unopened,
    Open,
    Closed,
}

/// A supervised PhantomJS instance and its control channel.
///
/// Exactly one engine subprocess exists per open `Process`. Every
/// `WebPage` handle derived from it is valid only while the process is
/// [`ProcessState::Open`]; `close` invalidates all of them transitively.
///
/// Calls against one process are serialized (one outstanding call at a
/// time); distinct processes are independent and may be driven
/// concurrently.
///
/// # Example
///
/// ```ignore
/// use phantomjs::Process;
///
/// let process = Process::new();
/// process.open()?;
/// let page = process.create_web_page()?;
/// page.open("http://example.com/")?;
/// println!("{}", page.title()?);
/// process.close()?;
/// ```
pub struct Process {
    inner: Arc<ProcessInner>,
    config: EngineConfig,
}

pub(crate) struct ProcessInner {
    // Lock order: call_lock, then state. The transport and engine guards
    // are never held across another acquisition or a blocking exchange.
    state: Mutex<ProcessState>,
    transport: Mutex<Option<Transport>>,
    engine: Mutex<Option<EngineProcess>>,
    call_lock: Mutex<()>,
    pub(crate) registry: Registry,
}

impl Process {
    /// Creates an unopened process with the default engine configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates an unopened process with an explicit engine configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            inner: Arc::new(ProcessInner::new(ProcessState::Unopened, None)),
            config,
        }
    }

    /// Current liveness state.
    pub fn state(&self) -> ProcessState {
        *self.inner.state.lock()
    }

    /// Spawns the engine subprocess and blocks until its control endpoint
    /// answers a liveness probe.
    ///
    /// Fails with `Error::AlreadyOpen` if the process is already open,
    /// `Error::EngineNotFound`/`Error::LaunchFailed` if the
    /// executable cannot be found or started, `Error::Channel` if the
    /// control channel cannot be allocated, and `Error::Timeout` if the
    /// endpoint never becomes reachable. A failed open leaves no
    /// subprocess behind and may be retried.
    pub fn open(&self) -> Result<()> {
        let mut state = self.inner.state.lock();
        if *state == ProcessState::Open {
            return Err(Error::AlreadyOpen);
        }
        let (engine, transport) = EngineProcess::launch(&self.config)?;
        *self.inner.transport.lock() = Some(transport);
        *self.inner.engine.lock() = Some(engine);
        *state = ProcessState::Open;
        Ok(())
    }

    /// Terminates the engine subprocess and releases the control channel.
    ///
    /// Idempotent: closing an unopened or already-closed process is a
    /// no-op returning `Ok`. Every derived `WebPage` handle becomes
    /// invalid the instant close begins. Bounded by subprocess exit: an
    /// in-flight call never delays close, it fails with a transport error
    /// once the channel is severed.
    pub fn close(&self) -> Result<()> {
        let mut state = self.inner.state.lock();
        let was_open = *state == ProcessState::Open;
        *state = ProcessState::Closed;
        drop(state);

        // Kill the subprocess before touching anything else: severing the
        // control channel fails any in-flight call instead of waiting on
        // it.
        let engine = self.inner.engine.lock().take();
        if was_open {
            if let Some(engine) = engine {
                engine.shutdown()?;
            }
        }
        *self.inner.transport.lock() = None;
        self.inner.registry.clear();
        Ok(())
    }

    /// Requests a new remote page object and returns a handle bound to it.
    ///
    /// Fails with `Error::Registry` if the process is not open.
    pub fn create_web_page(&self) -> Result<WebPage> {
        if self.state() != ProcessState::Open {
            return Err(Error::Registry("process is not open".to_string()));
        }
        let value = self.inner.call(&Request::engine("createWebPage"))?;
        let id = value["id"]
            .as_str()
            .ok_or_else(|| Error::Remote("createWebPage returned no identifier".to_string()))?
            .to_string();
        self.inner.registry.register_root(&id);
        Ok(WebPage::attached(Arc::clone(&self.inner), id))
    }

    #[cfg(test)]
    pub(crate) fn open_for_tests(transport: Transport) -> Self {
        Self {
            inner: Arc::new(ProcessInner::new(ProcessState::Open, Some(transport))),
            config: EngineConfig::default(),
        }
    }
}

impl Default for Process {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessInner {
    fn new(state: ProcessState, transport: Option<Transport>) -> Self {
        Self {
            state: Mutex::new(state),
            transport: Mutex::new(transport),
            engine: Mutex::new(None),
            call_lock: Mutex::new(()),
            registry: Registry::new(),
        }
    }

    /// Issues one synchronous call through the control channel.
    ///
    /// A transport-level fault poisons the process: state transitions to
    /// `Closed`, the engine is killed, and every handle becomes invalid,
    /// so subsequent calls fail fast instead of hanging.
    pub(crate) fn call(&self, request: &Request) -> Result<Value> {
        let _serialized = self.call_lock.lock();

        // Clone the transport out so the guard is not held across the
        // blocking exchange; `close` must be able to tear the channel
        // down while a call is in flight.
        let transport = match self.transport.lock().as_ref() {
            Some(transport) => transport.clone(),
            None => return Err(self.not_open_error()),
        };
        let result = transport.call(request);

        if matches!(result, Err(ref e) if e.is_transport()) {
            self.poison();
        }
        result
    }

    fn not_open_error(&self) -> Error {
        match *self.state.lock() {
            ProcessState::Unopened => Error::Registry("process has not been opened".to_string()),
            _ => Error::InvalidHandle("owning process is closed".to_string()),
        }
    }

    fn poison(&self) {
        warn!(
            target = "phantomjs",
            "control channel fault; closing process and invalidating handles"
        );
        *self.state.lock() = ProcessState::Closed;
        if let Some(mut engine) = self.engine.lock().take() {
            engine.kill();
        }
        *self.transport.lock() = None;
        self.registry.clear();
    }
}
