//! Wire types for the PhantomJS control protocol.
//!
//! This crate contains the serde-serializable types exchanged with the
//! control script running inside the PhantomJS process. These types are the
//! "protocol layer" - the shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization and
//!   the conversions the wire format demands (e.g. cookie expiry strings)
//! - **The single source of truth for type fidelity**: every value that
//!   crosses the process boundary round-trips through exactly one
//!   encode/decode pass defined here
//!
//! The higher-level handle API is built on top of these types in
//! `phantomjs-rs`.

pub mod cookie;
pub mod geometry;
pub mod headers;
pub mod message;
pub mod paper;

pub use cookie::Cookie;
pub use geometry::{Position, Rect};
pub use headers::Headers;
pub use message::{ErrorCode, FrameSelector, Request, Response, ResponseStatus};
pub use paper::{PaperMargin, PaperSize};
