//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! PreparedRequest
//!     → raw_socket.rs (wire.rs encodes HTTP/1.1 text → TcpStream, close)
//!     → http_client.rs (tls.rs policy → reqwest::Client → RequestOutcome)
//! ```
//!
//! # Design Decisions
//! - Transports return errors; they never log failures themselves
//! - Every network operation is bounded by the request timeout

pub mod http_client;
pub mod raw_socket;
pub mod tls;
pub mod wire;

pub use http_client::{ClientSettings, HttpClientTransport};
pub use raw_socket::RawSocketTransport;
pub use tls::TlsPolicy;
pub use wire::{encode_raw_request, RawTarget};

/// Which transport handled a request; used as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    HttpClient,
    RawSocket,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::HttpClient => "http_client",
            TransportKind::RawSocket => "raw_socket",
        }
    }
}
