//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher produces:
//!     → sink.rs (operational log entries: one per failure / completion)
//!     → metrics.rs (counters, histograms)
//!     → tracing spans with a per-dispatch ID
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The sink is injected, never looked up globally
//! - Sink entries are the only observable dispatch outcome
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
pub mod sink;

pub use sink::{LogEntry, LogLevel, LogSink, MemorySink, TracingSink};
