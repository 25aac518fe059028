//! Raw HTTP/1.1 request encoding for the socket transport.
//!
//! The request text is byte-exact:
//! ```text
//! <METHOD> <path> HTTP/1.1\r\n
//! Host: <host>\r\n
//! User-Agent: <agent>\r\n
//! Content-Type: application/x-www-form-urlencoded\r\n
//! Content-Length: <n>\r\n
//! <custom headers>\r\n ...
//! Connection: Close\r\n
//! \r\n
//! <body, POST only>
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use url::{Host, Url};

use crate::dispatch::error::TransportError;
use crate::dispatch::request::HttpMethod;

/// Where a raw request goes, parsed from `base_url + uri`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTarget {
    /// Value of the `Host` header (IPv6 literals keep their brackets).
    pub host: String,
    /// Host passed to the resolver.
    pub connect_host: String,
    pub port: u16,
    /// Path plus any query present in the URL, after WHATWG URL
    /// normalization (dot segments resolved, spaces percent-encoded).
    pub path: String,
}

impl RawTarget {
    pub fn parse(full_url: &str, default_port: u16) -> Result<Self, TransportError> {
        let url = Url::parse(full_url).map_err(|e| TransportError::InvalidUrl {
            url: full_url.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "http" {
            return Err(TransportError::UnsupportedScheme(url.scheme().to_string()));
        }

        let (host, connect_host) = match url.host() {
            Some(Host::Ipv6(addr)) => (format!("[{}]", addr), addr.to_string()),
            Some(other) => (other.to_string(), other.to_string()),
            None => {
                return Err(TransportError::InvalidUrl {
                    url: full_url.to_string(),
                    reason: "missing host".to_string(),
                })
            }
        };

        let mut path = url.path().to_string();
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }

        Ok(Self {
            host,
            connect_host,
            port: url.port().unwrap_or(default_port),
            path,
        })
    }

    /// `host:port` used in connect error messages.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Encode the full request text.
///
/// GET carries the payload verbatim at the end of the path with a zero
/// content length. POST sends `payload=<payload>` as the body.
pub fn encode_raw_request(
    target: &RawTarget,
    method: HttpMethod,
    payload: &str,
    headers: &BTreeMap<String, String>,
    user_agent: &str,
) -> Vec<u8> {
    let (path, body) = match method {
        HttpMethod::Get => (format!("{}{}", target.path, payload), String::new()),
        HttpMethod::Post => (target.path.clone(), format!("payload={}", payload)),
    };

    let mut out = String::with_capacity(256 + body.len());
    // Writing into a String cannot fail.
    let _ = write!(out, "{} {} HTTP/1.1\r\n", method.as_str(), path);
    let _ = write!(out, "Host: {}\r\n", target.host);
    let _ = write!(out, "User-Agent: {}\r\n", user_agent);
    out.push_str("Content-Type: application/x-www-form-urlencoded\r\n");
    let _ = write!(out, "Content-Length: {}\r\n", body.len());
    for (name, value) in headers {
        let _ = write!(out, "{}: {}\r\n", name, value);
    }
    out.push_str("Connection: Close\r\n\r\n");
    out.push_str(&body);

    out.into_bytes()
}
