//! Engine process supervision.
//!
//! Owns the PhantomJS subprocess: spawns it against the embedded control
//! script, blocks until the control endpoint answers a liveness probe, and
//! tears it down. Exactly one subprocess per [`EngineProcess`]; every
//! failure path after a successful spawn kills the child before returning.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::driver::get_engine_executable;
use crate::error::{Error, Result};
use crate::transport::Transport;

/// The control script injected into the engine, served over a loopback
/// webserver inside the PhantomJS process.
pub const CONTROL_SCRIPT: &str = include_str!("shim.js");

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Launch parameters for the engine subprocess.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Explicit executable path; discovered via [`get_engine_executable`]
    /// when `None`.
    pub bin_path: Option<PathBuf>,
    /// Offline/local-storage directory handed to the engine verbatim.
    pub storage_dir: Option<PathBuf>,
    /// How long to wait for the control endpoint to become reachable.
    pub ready_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bin_path: None,
            storage_dir: None,
            ready_timeout: Duration::from_secs(30),
        }
    }
}

/// A supervised PhantomJS subprocess and its control-script scratch dir.
#[derive(Debug)]
pub struct EngineProcess {
    child: Child,
    port: u16,
    // Holds the on-disk control script for the lifetime of the child.
    _script_dir: tempfile::TempDir,
}

impl EngineProcess {
    /// Spawns the engine and blocks until its control endpoint answers a
    /// liveness probe or `config.ready_timeout` elapses.
    ///
    /// # Errors
    ///
    /// `Error::EngineNotFound`/`Error::LaunchFailed` if the executable is
    /// missing or unstartable, `Error::Channel` if no loopback port can be
    /// reserved, `Error::Timeout` if the endpoint never becomes reachable.
    /// No subprocess outlives a failed launch.
    pub fn launch(config: &EngineConfig) -> Result<(EngineProcess, Transport)> {
        let bin = match &config.bin_path {
            Some(path) => path.clone(),
            None => get_engine_executable()?,
        };

        let port = reserve_port()?;

        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("control.js");
        std::fs::write(&script_path, CONTROL_SCRIPT)?;

        let mut cmd = Command::new(&bin);
        if let Some(dir) = &config.storage_dir {
            cmd.arg(format!("--local-storage-path={}", dir.display()));
        }
        cmd.arg(&script_path)
            .arg(port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = cmd.spawn().map_err(|e| {
            Error::LaunchFailed(format!("failed to spawn {}: {e}", bin.display()))
        })?;

        debug!(
            target = "phantomjs",
            bin = %bin.display(),
            port,
            pid = child.id(),
            "engine spawned"
        );

        let mut engine = EngineProcess {
            child,
            port,
            _script_dir: script_dir,
        };
        let transport = Transport::new(port);

        if let Err(e) = engine.wait_until_ready(&transport, config.ready_timeout) {
            engine.kill();
            return Err(e);
        }

        Ok((engine, transport))
    }

    /// The loopback port the control endpoint listens on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Polls the liveness endpoint until it answers, the child exits, or
    /// the timeout elapses.
    fn wait_until_ready(&mut self, transport: &Transport, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = self.child.try_wait()? {
                return Err(Error::LaunchFailed(format!(
                    "engine exited during startup with status: {status}"
                )));
            }
            match transport.ping() {
                Ok(()) => return Ok(()),
                Err(e) => {
                    debug!(target = "phantomjs", error = %e, "engine not ready yet")
                }
            }
            if Instant::now() >= deadline {
                return Err(Error::Timeout(format!(
                    "engine control endpoint not reachable after {timeout:?}"
                )));
            }
            std::thread::sleep(READY_POLL_INTERVAL);
        }
    }

    /// Terminates the subprocess and waits for it to exit. Safe to call on
    /// an already-dead child.
    pub fn kill(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }

    /// Terminates the subprocess, consuming the supervisor.
    pub fn shutdown(mut self) -> Result<()> {
        self.kill();
        Ok(())
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        self.kill();
    }
}

/// Reserve a free loopback port for the control channel.
fn reserve_port() -> Result<u16> {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0))
        .map_err(|e| Error::Channel(e.to_string()))?;
    let port = listener
        .local_addr()
        .map_err(|e| Error::Channel(e.to_string()))?
        .port();
    drop(listener);
    Ok(port)
}
