//! The request dispatcher.
//!
//! # Responsibilities
//! - Validate and normalize each `RequestSpec`
//! - Route it to the raw socket or HTTP client transport
//! - Catch every failure and record it in the log sink
//!
//! # Design Decisions
//! - Nothing is returned to the caller; the sink is the only outcome channel
//! - `dispatch` waits for the transport to finish before returning
//! - Failure entries carry the full spec as JSON for correlation

use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;
use uuid::Uuid;

use crate::config::DispatcherConfig;
use crate::dispatch::completion::{log_completion, RouteContext};
use crate::dispatch::error::DispatchError;
use crate::dispatch::outcome::RequestOutcome;
use crate::dispatch::request::{PreparedRequest, RequestSpec};
use crate::observability::{metrics, LogSink};
use crate::transport::{HttpClientTransport, RawSocketTransport, TlsPolicy, TransportKind};

/// Executes outbound requests and logs how they went.
///
/// Cheap to clone; clones share the sink and the HTTP client cache.
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<DispatcherConfig>,
    sink: Arc<dyn LogSink>,
    http: HttpClientTransport,
    raw: RawSocketTransport,
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig, sink: Arc<dyn LogSink>) -> Self {
        let tls = TlsPolicy::resolve(&config.tls, config.environment);
        let http = HttpClientTransport::new(tls, config.http_client.system_proxy);
        let raw = RawSocketTransport::new(config.raw_socket.clone());

        tracing::debug!(
            environment = %config.environment,
            tls = ?tls,
            timeout_secs = config.timeouts.request_secs,
            "Dispatcher initialized"
        );

        Self {
            config: Arc::new(config),
            sink,
            http,
            raw,
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn tls_policy(&self) -> TlsPolicy {
        self.http.tls_policy()
    }

    /// Execute `spec` and wait for it to finish. Never fails; outcomes go
    /// to the log sink.
    pub async fn dispatch(&self, spec: RequestSpec) {
        self.run(spec, None).await
    }

    /// Like [`dispatch`](Self::dispatch), naming `ctx` in error entries.
    pub async fn dispatch_with_context(&self, spec: RequestSpec, ctx: &RouteContext) {
        self.run(spec, Some(ctx)).await
    }

    /// Synchronous variant for callers without an async context.
    ///
    /// Runs on a private current-thread runtime. When called from inside a
    /// tokio runtime, that private runtime is driven from a scoped thread.
    pub fn dispatch_blocking(&self, spec: RequestSpec) {
        if tokio::runtime::Handle::try_current().is_err() {
            self.block_on_private(spec);
            return;
        }

        let spec_json = spec.to_log_json();
        std::thread::scope(|scope| {
            let worker = scope.spawn(|| self.block_on_private(spec));
            if worker.join().is_err() {
                self.sink.error(&format!(
                    "Blocking dispatch thread panicked. Spec: {}",
                    spec_json
                ));
            }
        });
    }

    fn block_on_private(&self, spec: RequestSpec) {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                self.sink.error(&format!(
                    "Failed to start runtime for request: {}. Spec: {}",
                    e,
                    spec.to_log_json()
                ));
                return;
            }
        };

        // Pooled connections are bound to the runtime that opened them.
        let detached = Self {
            http: self.http.detached(),
            ..self.clone()
        };
        runtime.block_on(detached.dispatch(spec));
    }

    async fn run(&self, spec: RequestSpec, ctx: Option<&RouteContext>) {
        let span = tracing::debug_span!(
            "dispatch",
            dispatch_id = %Uuid::new_v4(),
            uri = %spec.uri,
            raw_socket = spec.use_raw_socket,
        );

        async {
            let started = Instant::now();

            let request = match spec.prepare(self.config.timeouts.request()) {
                Ok(request) => request,
                Err(e) => {
                    self.sink.error(&format!("Rejected request: {}. Spec: {}", e, spec.to_log_json()));
                    metrics::record_rejected();
                    return;
                }
            };

            let kind = if request.use_raw_socket {
                TransportKind::RawSocket
            } else {
                TransportKind::HttpClient
            };

            match self.execute(&request, ctx).await {
                Ok(outcome) => {
                    metrics::record_dispatch(kind.as_str(), outcome.status.as_str(), started);
                }
                Err(e) => {
                    self.sink.error(&format!(
                        "Request failed: {}. Spec: {}",
                        e,
                        spec.to_log_json()
                    ));
                    metrics::record_dispatch(kind.as_str(), "error", started);
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run the chosen transport.
    async fn execute(
        &self,
        request: &PreparedRequest,
        ctx: Option<&RouteContext>,
    ) -> Result<RequestOutcome, DispatchError> {
        if request.use_raw_socket {
            self.raw.send(request).await?;
            let outcome = RequestOutcome::sent(&request.uri);
            tracing::debug!(uri = %outcome.uri, "Raw request sent");
            return Ok(outcome);
        }

        let outcome = self.http.send(request).await?;
        log_completion(self.sink.as_ref(), &outcome, ctx);
        Ok(outcome)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("environment", &self.config.environment)
            .field("tls", &self.http.tls_policy())
            .field("timeout_secs", &self.config.timeouts.request_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use crate::observability::{LogLevel, MemorySink};

    fn dispatcher(sink: &MemorySink) -> Dispatcher {
        let mut config = DispatcherConfig::default();
        config.http_client.system_proxy = false;
        Dispatcher::new(config, Arc::new(sink.clone()))
    }

    #[tokio::test]
    async fn invalid_spec_logs_once() {
        let sink = MemorySink::new();
        dispatcher(&sink).dispatch(RequestSpec::new("", "/ping")).await;

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Error);
        assert!(entries[0].message.contains("base_url is required"));
        assert!(entries[0].message.contains("\"uri\":\"/ping\""));
    }

    #[tokio::test]
    async fn repeated_invalid_specs_log_independently() {
        let sink = MemorySink::new();
        let d = dispatcher(&sink);
        let spec = RequestSpec::new("http://example.com", "");

        d.dispatch(spec.clone()).await;
        d.dispatch(spec).await;

        let errors = sink.at_level(LogLevel::Error);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], errors[1]);
        assert_eq!(sink.len(), 2);
    }

    #[tokio::test]
    async fn unsupported_scheme_on_raw_socket_is_logged() {
        let sink = MemorySink::new();
        dispatcher(&sink)
            .dispatch(RequestSpec::new("ftp://example.com", "/x").raw_socket(true))
            .await;

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].message.contains("Unsupported scheme 'ftp'"));
    }

    #[test]
    fn tls_policy_follows_environment() {
        let sink = MemorySink::new();
        let mut config = DispatcherConfig::default();
        config.environment = Environment::Production;
        let d = Dispatcher::new(config, Arc::new(sink.clone()));
        assert_eq!(d.tls_policy(), TlsPolicy::Strict);

        assert_eq!(dispatcher(&sink).tls_policy(), TlsPolicy::Disabled);
    }

    #[test]
    fn blocking_dispatch_outside_runtime() {
        let sink = MemorySink::new();
        dispatcher(&sink).dispatch_blocking(RequestSpec::new("http://example.com", ""));
        assert_eq!(sink.at_level(LogLevel::Error).len(), 1);
    }

    #[tokio::test]
    async fn blocking_dispatch_inside_runtime() {
        let sink = MemorySink::new();
        dispatcher(&sink).dispatch_blocking(RequestSpec::new("", "/x"));

        let errors = sink.at_level(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("base_url is required"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn blocking_dispatch_inside_multi_thread_runtime() {
        let sink = MemorySink::new();
        dispatcher(&sink).dispatch_blocking(RequestSpec::new("http://example.com", ""));
        assert_eq!(sink.at_level(LogLevel::Error).len(), 1);
    }
}
