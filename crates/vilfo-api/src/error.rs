use thiserror::Error;

/// Top-level error type for the `vilfo-api` crate.
///
/// Covers every failure mode the client can classify: authentication
/// rejections (explicit or disguised as a login page), missing resources,
/// transport failures, and undecodable bodies.
#[derive(Debug, Error)]
pub enum Error {
    // ── Client ──────────────────────────────────────────────────────
    /// Client-detected failure with no more specific classification
    /// (e.g. MAC address resolution failed).
    #[error("Client error: {message}")]
    Client { message: String },

    // ── Authentication ──────────────────────────────────────────────
    /// HTTP 403, or a body that looks like the router's login page
    /// (an implicit auth redirect served with HTTP 200).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Resources ───────────────────────────────────────────────────
    /// HTTP 404 for the requested endpoint.
    #[error("Not found: {endpoint}")]
    NotFound { endpoint: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates rejected or missing
    /// credentials and a fresh token might resolve it.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
