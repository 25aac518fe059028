//! HTTP client transport built on reqwest.
//!
//! # Responsibilities
//! - Derive client settings (timeout, TLS policy) for each request
//! - Reuse clients per settings
//! - Issue the request on a spawned task and wait for it to finish
//!
//! # Design Decisions
//! - GET carries the payload in the path, POST as a `payload` form field
//! - The outcome is classified here but logged by the dispatcher

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use crate::dispatch::error::TransportError;
use crate::dispatch::outcome::RequestOutcome;
use crate::dispatch::request::{HttpMethod, PreparedRequest};
use crate::transport::tls::TlsPolicy;

/// Everything a `reqwest::Client` is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientSettings {
    pub timeout: Duration,
    pub tls: TlsPolicy,
    pub system_proxy: bool,
}

#[derive(Debug, Clone)]
pub struct HttpClientTransport {
    tls: TlsPolicy,
    system_proxy: bool,
    /// `None` disables both client reuse and idle connection pooling.
    clients: Option<Arc<DashMap<ClientSettings, reqwest::Client>>>,
}

impl HttpClientTransport {
    /// Transport that caches one client per settings combination.
    pub fn new(tls: TlsPolicy, system_proxy: bool) -> Self {
        Self {
            tls,
            system_proxy,
            clients: Some(Arc::new(DashMap::new())),
        }
    }

    /// Transport that builds a fresh client per request with no idle
    /// connections kept.
    pub fn unpooled(tls: TlsPolicy, system_proxy: bool) -> Self {
        Self {
            tls,
            system_proxy,
            clients: None,
        }
    }

    /// Same settings, no client reuse.
    pub fn detached(&self) -> Self {
        Self::unpooled(self.tls, self.system_proxy)
    }

    pub fn tls_policy(&self) -> TlsPolicy {
        self.tls
    }

    /// Settings the client for `request` is built with.
    pub fn settings(&self, request: &PreparedRequest) -> ClientSettings {
        ClientSettings {
            timeout: request.timeout,
            tls: self.tls,
            system_proxy: self.system_proxy,
        }
    }

    /// Absolute URL the request is sent to.
    pub fn target_url(&self, request: &PreparedRequest) -> String {
        let path = match request.method {
            HttpMethod::Get if request.query_string => {
                format!("{}?{}", request.uri, request.payload)
            }
            HttpMethod::Get => format!("{}/{}", request.uri, request.payload),
            HttpMethod::Post => request.uri.clone(),
        };
        join_url(&request.base_url, &path)
    }

    /// Send the request and wait for the full response body.
    pub async fn send(&self, request: &PreparedRequest) -> Result<RequestOutcome, TransportError> {
        let settings = self.settings(request);
        let client = self.client(settings)?;
        let url = self.target_url(request);

        let mut builder = match request.method {
            HttpMethod::Get => client.get(&url),
            HttpMethod::Post => client.post(&url).form(&[("payload", request.payload.as_str())]),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        tracing::debug!(url = %url, method = %request.method, tls = ?settings.tls, "Issuing request");

        let task = tokio::spawn(async move {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        });

        let (status, body) = task
            .await
            .map_err(|e| TransportError::TaskFailed(e.to_string()))?
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(settings.timeout)
                } else {
                    TransportError::Client(e)
                }
            })?;

        Ok(RequestOutcome::from_response(&request.uri, status, &body))
    }

    fn client(&self, settings: ClientSettings) -> Result<reqwest::Client, TransportError> {
        let Some(clients) = &self.clients else {
            return build_client(settings, false);
        };

        if let Some(client) = clients.get(&settings) {
            return Ok(client.clone());
        }
        let client = build_client(settings, true)?;
        clients.insert(settings, client.clone());
        Ok(client)
    }

    #[cfg(test)]
    fn cached_clients(&self) -> usize {
        self.clients.as_ref().map(|c| c.len()).unwrap_or(0)
    }
}

fn build_client(settings: ClientSettings, pooled: bool) -> Result<reqwest::Client, TransportError> {
    let mut builder = reqwest::Client::builder().timeout(settings.timeout);

    if !settings.tls.verifies() {
        builder = builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }
    if !settings.system_proxy {
        builder = builder.no_proxy();
    }
    if !pooled {
        builder = builder.pool_max_idle_per_host(0);
    }

    builder.build().map_err(TransportError::Client)
}

/// Join `base` and `path` with exactly one slash between them.
fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
