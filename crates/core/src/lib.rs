//! Synchronous PhantomJS bridge.
//!
//! This crate drives a PhantomJS subprocess through a small JSON control
//! protocol and exposes its pages as plain Rust handles:
//!
//! - [`Process`]: one supervised engine instance per value; opening spawns
//!   the subprocess and closing tears it down without leaking it
//! - [`WebPage`]: a handle to a remote page object, covering navigation,
//!   content access, rendering, cookies, headers, and frame selection
//! - [`FrameContext`]: the per-handle frame-navigation state machine
//!
//! All calls are synchronous: each blocks until the engine answers, and
//! calls against one process are serialized. Distinct processes are fully
//! independent.
//!
//! # Example
//!
//! ```ignore
//! use phantomjs::Process;
//!
//! let process = Process::new();
//! process.open()?;
//!
//! let page = process.create_web_page()?;
//! page.open("http://example.com/")?;
//! println!("{}", page.title()?);
//!
//! process.close()?;
//! ```

pub mod frame;
pub mod page;
pub mod process;

mod registry;
#[cfg(test)]
mod testutil;

pub use frame::FrameContext;
pub use page::WebPage;
pub use process::{Process, ProcessState};

pub use phantomjs_protocol::{Cookie, Headers, PaperMargin, PaperSize, Position, Rect};
pub use phantomjs_runtime::{EngineConfig, Error, Result, get_engine_executable};
