//! PhantomJS Runtime - engine lifecycle and control transport.
//!
//! This crate provides the low-level infrastructure for supervising a
//! PhantomJS process and talking to the control script running inside it:
//!
//! - **Driver discovery**: Locating a runnable PhantomJS executable
//! - **Engine supervision**: Spawning, readiness probing, and tearing down
//!   the engine subprocess without leaking it
//! - **Transport**: One synchronous request/response exchange at a time
//!   over a loopback HTTP control channel
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ phantomjs-rs │  Process / WebPage handles, registry, frame context
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │   runtime    │  This crate
//! │  ┌────────┐  │
//! │  │ Engine │  │  Subprocess supervision
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Trans  │  │  Blocking HTTP control channel
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Driver │  │  Executable discovery
//! │  └────────┘  │
//! └──────────────┘
//! ```
//!
//! The wire shapes themselves live in `phantomjs-protocol`; this crate
//! only moves them across the process boundary.

pub mod driver;
pub mod engine;
pub mod error;
pub mod transport;

pub use driver::get_engine_executable;
pub use engine::{CONTROL_SCRIPT, EngineConfig, EngineProcess};
pub use error::{Error, Result};
pub use transport::Transport;
