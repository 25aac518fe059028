//! Fire-and-forget HTTP over a bare TCP socket.
//!
//! # Responsibilities
//! - Connect to the target host with the request deadline
//! - Write one encoded HTTP/1.1 request
//! - Close without reading any response
//!
//! # Design Decisions
//! - Connect and write errors are returned, never swallowed here
//! - Only plain `http` targets; there is no TLS on this path

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};

use crate::config::RawSocketConfig;
use crate::dispatch::error::TransportError;
use crate::dispatch::request::PreparedRequest;
use crate::transport::wire::{encode_raw_request, RawTarget};

#[derive(Debug, Clone)]
pub struct RawSocketTransport {
    config: RawSocketConfig,
}

impl RawSocketTransport {
    pub fn new(config: RawSocketConfig) -> Self {
        Self { config }
    }

    /// Parse the target and encode the request without touching the network.
    pub fn encode(&self, request: &PreparedRequest) -> Result<(RawTarget, Vec<u8>), TransportError> {
        let target = RawTarget::parse(&request.full_url(), self.config.default_port)?;
        let bytes = encode_raw_request(
            &target,
            request.method,
            &request.payload,
            &request.headers,
            &self.config.user_agent,
        );
        Ok((target, bytes))
    }

    /// Write the request and close the connection.
    pub async fn send(&self, request: &PreparedRequest) -> Result<(), TransportError> {
        let (target, bytes) = self.encode(request)?;
        let deadline = request.timeout;

        let mut stream = timeout(
            deadline,
            TcpStream::connect((target.connect_host.as_str(), target.port)),
        )
        .await
        .map_err(|_| TransportError::Timeout(deadline))?
        .map_err(|source| TransportError::Connect {
            addr: target.authority(),
            source,
        })?;

        timeout(deadline, stream.write_all(&bytes))
            .await
            .map_err(|_| TransportError::Timeout(deadline))??;

        tracing::trace!(
            target_addr = %target.authority(),
            method = %request.method,
            bytes = bytes.len(),
            "Raw request written"
        );

        if self.config.linger_ms > 0 {
            sleep(Duration::from_millis(self.config.linger_ms)).await;
        }

        // The peer may already have hung up; the request is out either way.
        if let Err(e) = stream.shutdown().await {
            tracing::trace!(error = %e, "Socket shutdown after write failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::request::{HttpMethod, RequestSpec};

    fn prepare(spec: RequestSpec) -> PreparedRequest {
        spec.prepare(Duration::from_secs(30)).unwrap()
    }

    #[test]
    fn encode_uses_configured_user_agent() {
        let transport = RawSocketTransport::new(RawSocketConfig {
            user_agent: "Notifier/1.0".to_string(),
            ..RawSocketConfig::default()
        });
        let request = prepare(
            RequestSpec::new("http://example.com", "/ping")
                .method(HttpMethod::Post)
                .raw_socket(true),
        );
        let (target, bytes) = transport.encode(&request).unwrap();
        assert_eq!(target.port, 80);
        assert!(String::from_utf8(bytes)
            .unwrap()
            .contains("User-Agent: Notifier/1.0\r\n"));
    }

    #[tokio::test]
    async fn https_target_is_rejected_before_connecting() {
        let transport = RawSocketTransport::new(RawSocketConfig::default());
        let request = prepare(RequestSpec::new("https://example.com", "/ping").raw_socket(true));
        let err = transport.send(&request).await.unwrap_err();
        assert!(matches!(err, TransportError::UnsupportedScheme(_)));
    }

    #[tokio::test]
    async fn refused_connection_is_reported() {
        // Bind then drop to obtain a port with no listener.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = RawSocketTransport::new(RawSocketConfig::default());
        let request = prepare(
            RequestSpec::new(format!("http://127.0.0.1:{}", port), "/ping").raw_socket(true),
        );
        let err = transport.send(&request).await.unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }));
    }
}
