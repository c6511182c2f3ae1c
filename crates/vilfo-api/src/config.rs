// Client configuration and HTTP transport construction.
//
// Connection parameters are fixed at construction time: host (no scheme),
// API token, transport scheme, and timeout/TLS knobs for routers reachable
// only through self-signed certificates.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::Error;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Connection parameters for a [`VilfoClient`](crate::VilfoClient).
///
/// `host` is a bare hostname or IP address (no scheme); the scheme is
/// selected by `use_tls`. The token is kept as a [`SecretString`] so it
/// never shows up in `Debug` output.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub token: SecretString,
    pub use_tls: bool,
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    /// Create a config for `host` with the given API token and defaults:
    /// plain HTTP, 20 second timeout, strict certificate validation.
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: SecretString::from(token.into()),
            use_tls: false,
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }

    /// Talk to the router over HTTPS instead of plain HTTP.
    pub fn with_tls(mut self) -> Self {
        self.use_tls = true;
        self
    }

    /// Override the default per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept self-signed certificates (routers on a LAN rarely carry a
    /// publicly trusted chain).
    pub fn with_accept_invalid_certs(mut self) -> Self {
        self.accept_invalid_certs = true;
        self
    }

    /// The API root this config points at: `http(s)://{host}/api/v1`.
    pub fn base_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{scheme}://{}/api/v1", self.host)
    }

    /// Build a `reqwest::Client` from this config.
    pub(crate) fn build_http_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("vilfo-api/0.1.0");

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder.build().map_err(|e| Error::Client {
            message: format!("failed to build HTTP client: {e}"),
        })
    }
}
