//! Outbound request dispatcher library.
//!
//! Accepts a [`RequestSpec`], sends it over either a managed HTTP client or a
//! bare TCP socket, and records how it went in a [`LogSink`]. Callers never
//! receive a result: a dispatch either succeeds quietly or leaves an error
//! entry in the sink.

pub mod config;
pub mod dispatch;
pub mod observability;
pub mod transport;

pub use config::DispatcherConfig;
pub use dispatch::{Dispatcher, HttpMethod, RequestSpec, RouteContext};
pub use observability::{LogSink, MemorySink, TracingSink};
