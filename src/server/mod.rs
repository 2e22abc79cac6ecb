//! HTTP query server over a prebuilt index
//!
//! Architecture:
//! - `protocol`: lookup semantics and the exact response bodies
//! - `http`: axum router, panic recovery and request logging
//! - `daemon`: listener lifecycle and signal-driven graceful shutdown
//!
//! The index is built before the listener binds and is shared read-only
//! through an `Arc` for the lifetime of the server.

pub mod daemon;
pub mod http;
pub mod protocol;

pub use daemon::{serve, serve_with_shutdown, shutdown_signal};
pub use http::router;
pub use protocol::{lookup, parse_ids, LookupError, LookupResponse, LookupStatus};
