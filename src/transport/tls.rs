//! TLS verification policy for the HTTP client path.

use crate::config::{Environment, TlsConfig};

/// Certificate verification applied to outbound HTTPS requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TlsPolicy {
    /// Verify both the peer certificate chain and the hostname.
    Strict,
    /// Accept any certificate and hostname.
    Disabled,
}

impl TlsPolicy {
    /// An explicit `tls.verify` wins; otherwise only production verifies.
    pub fn resolve(tls: &TlsConfig, environment: Environment) -> Self {
        let verify = tls.verify.unwrap_or_else(|| environment.is_production());
        let policy = if verify { TlsPolicy::Strict } else { TlsPolicy::Disabled };

        if policy == TlsPolicy::Disabled {
            tracing::warn!(
                environment = %environment,
                explicit = tls.verify.is_some(),
                "TLS certificate verification is disabled for outbound requests"
            );
        }
        policy
    }

    pub fn verifies(&self) -> bool {
        matches!(self, TlsPolicy::Strict)
    }
}
