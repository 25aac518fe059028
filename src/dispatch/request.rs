//! Request descriptions and their normalized form.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dispatch::error::{DispatchError, DispatchResult};

/// HTTP method accepted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            other => Err(DispatchError::InvalidRequestSpec(format!(
                "unsupported method '{}'",
                other
            ))),
        }
    }
}

/// Caller-supplied description of one outbound request.
///
/// Consumed by value on dispatch. Unset fields are normalized by
/// [`RequestSpec::prepare`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSpec {
    /// Scheme and host root, e.g. `http://example.com`.
    pub base_url: String,

    /// Path appended to `base_url`.
    pub uri: String,

    /// Defaults to GET.
    pub method: Option<HttpMethod>,

    /// Opaque, already-serialized payload. Defaults to "".
    pub payload: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    /// Write the request over a bare TCP socket and never read a response.
    pub use_raw_socket: bool,

    /// Request deadline in seconds. Defaults to the configured timeout.
    pub timeout_secs: Option<f64>,

    /// GET only: append the payload as `?payload` instead of `/payload`.
    pub query_string: bool,
}

impl RequestSpec {
    pub fn new(base_url: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            uri: uri.into(),
            ..Self::default()
        }
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn raw_socket(mut self, enabled: bool) -> Self {
        self.use_raw_socket = enabled;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs_f64());
        self
    }

    pub fn query_string(mut self, enabled: bool) -> Self {
        self.query_string = enabled;
        self
    }

    /// JSON rendering used in failure log entries.
    pub fn to_log_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }

    /// Validate required fields and fill in defaults.
    pub fn prepare(&self, default_timeout: Duration) -> DispatchResult<PreparedRequest> {
        if self.base_url.trim().is_empty() {
            return Err(DispatchError::InvalidRequestSpec(
                "base_url is required".to_string(),
            ));
        }
        if self.uri.trim().is_empty() {
            return Err(DispatchError::InvalidRequestSpec("uri is required".to_string()));
        }

        for (name, value) in &self.headers {
            if name.trim().is_empty() || has_line_break(name) || has_line_break(value) {
                return Err(DispatchError::InvalidRequestSpec(format!(
                    "header '{}' is malformed",
                    name.escape_debug()
                )));
            }
        }

        let method = self.method.unwrap_or_default();
        let payload = self.payload.clone().unwrap_or_default();
        // The raw GET payload lands on the request line.
        if self.use_raw_socket && method == HttpMethod::Get && has_line_break(&payload) {
            return Err(DispatchError::InvalidRequestSpec(
                "payload must not contain line breaks on a raw GET".to_string(),
            ));
        }

        let timeout = match self.timeout_secs {
            None => default_timeout,
            Some(secs) if secs.is_finite() && secs > 0.0 => Duration::from_secs_f64(secs),
            Some(secs) => {
                return Err(DispatchError::InvalidRequestSpec(format!(
                    "timeout must be positive, got {}",
                    secs
                )))
            }
        };

        Ok(PreparedRequest {
            base_url: self.base_url.clone(),
            uri: self.uri.clone(),
            method,
            payload,
            headers: self.headers.clone(),
            use_raw_socket: self.use_raw_socket,
            timeout,
            query_string: self.query_string,
        })
    }
}

fn has_line_break(s: &str) -> bool {
    s.contains('\r') || s.contains('\n')
}

/// A validated request with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub base_url: String,
    pub uri: String,
    pub method: HttpMethod,
    pub payload: String,
    pub headers: BTreeMap<String, String>,
    pub use_raw_socket: bool,
    pub timeout: Duration,
    pub query_string: bool,
}

impl PreparedRequest {
    /// `base_url + uri`, the full target as the raw socket path parses it.
    pub fn full_url(&self) -> String {
        format!("{}{}", self.base_url, self.uri)
    }
}
