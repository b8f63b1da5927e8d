//! HTTP transport construction
//!
//! Builds the reqwest client shared by every request of a service.

use crate::error::Result;
use reqwest::{Client, ClientBuilder};
use std::sync::Once;
use std::time::Duration;

static CRYPTO_PROVIDER: Once = Once::new();

/// Install the ring crypto provider for rustls.
///
/// reqwest is built without a bundled provider, so one has to be installed
/// before the first client is built. Later calls are no-ops.
pub fn ensure_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        // Another library may have installed a provider already
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Overall request timeout enforced by the client
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Enable `TCP_NODELAY` (disable Nagle's algorithm)
    pub tcp_nodelay: bool,

    /// TCP keep-alive duration
    pub tcp_keepalive: Option<Duration>,

    /// Transparently decode gzip, brotli and deflate responses
    pub enable_compression: bool,

    /// Accept invalid TLS certificates. Only meant for test environments.
    pub disable_ssl_verification: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            tcp_nodelay: true,
            tcp_keepalive: Some(Duration::from_secs(60)),
            enable_compression: true,
            disable_ssl_verification: false,
        }
    }
}

impl HttpConfig {
    /// Configuration for callers issuing many concurrent setting updates
    pub fn high_performance() -> Self {
        Self {
            pool_idle_timeout: Duration::from_secs(120),
            pool_max_idle_per_host: 50,
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(5),
            tcp_keepalive: Some(Duration::from_secs(30)),
            ..Self::default()
        }
    }

    /// Configuration for memory-constrained environments
    pub fn memory_optimized() -> Self {
        Self {
            pool_idle_timeout: Duration::from_secs(15),
            pool_max_idle_per_host: 2,
            timeout: Duration::from_secs(30),
            tcp_nodelay: false,
            tcp_keepalive: None,
            ..Self::default()
        }
    }

    /// Build a reqwest client for this configuration
    pub fn build_client(&self, user_agent: &str) -> Result<Client> {
        ensure_crypto_provider();

        let mut builder = ClientBuilder::new()
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .tcp_nodelay(self.tcp_nodelay)
            .tcp_keepalive(self.tcp_keepalive)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(user_agent);

        builder = builder
            .gzip(self.enable_compression)
            .brotli(self.enable_compression)
            .deflate(self.enable_compression);

        if self.disable_ssl_verification {
            tracing::warn!("TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder.build().map_err(Into::into)
    }
}
