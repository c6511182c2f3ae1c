// Vilfo API HTTP client
//
// Wraps `reqwest::Client` with base-URL construction, default auth headers,
// and response classification. All endpoint modules (devices, system,
// dashboard) are implemented as inherent methods via separate files to keep
// this module focused on transport mechanics.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::capability::CapabilityState;
use crate::config::ClientConfig;
use crate::detect::looks_like_login_page;
use crate::error::Error;

/// Per-request overrides for [`VilfoClient::request_json`].
///
/// Leaving `headers` unset attaches the default header pair
/// (`Content-Type: application/json` plus the bearer token); supplying a
/// map -- even an empty one -- replaces the defaults entirely.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub headers: Option<HeaderMap>,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    /// Overrides the configured timeout for this request only.
    pub timeout: Option<Duration>,
}

/// Async client for the Vilfo router REST API.
///
/// Construction is cheap and performs no I/O; call
/// [`connect`](VilfoClient::connect) afterwards to run the best-effort
/// firmware and MAC detection, or skip it and live with the defaults.
/// Every accessor performs exactly one HTTP round trip and classifies the
/// outcome before handing the decoded JSON back.
pub struct VilfoClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
    capabilities: CapabilityState,
}

impl VilfoClient {
    // ── Constructor ──────────────────────────────────────────────────

    /// Build a client from a [`ClientConfig`].
    ///
    /// Fails only on a malformed host or an unbuildable HTTP client;
    /// the router does not need to be reachable.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = config.build_http_client()?;
        let base_url = Url::parse(&config.base_url())?;

        Ok(Self {
            http,
            base_url,
            token: config.token,
            capabilities: CapabilityState::default(),
        })
    }

    /// The API root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The detected capabilities (defaults until resolved).
    pub fn capabilities(&self) -> &CapabilityState {
        &self.capabilities
    }

    pub(crate) fn capabilities_mut(&mut self) -> &mut CapabilityState {
        &mut self.capabilities
    }

    // ── URL and header builders ──────────────────────────────────────

    /// Build a full URL for an endpoint path below `/api/v1`
    /// (e.g. `"/devices"`).
    fn endpoint_url(&self, endpoint: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}{endpoint}");
        Ok(Url::parse(&full)?)
    }

    /// The default header pair attached when a request supplies none:
    /// JSON content type plus the bearer token.
    fn default_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut bearer =
            HeaderValue::from_str(&format!("Bearer {}", self.token.expose_secret())).map_err(
                |e| Error::Authentication {
                    message: format!("invalid token header value: {e}"),
                },
            )?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        Ok(headers)
    }

    // ── Request execution ────────────────────────────────────────────

    /// Perform one HTTP call against `endpoint` and classify the outcome.
    ///
    /// Classification order: transport failures surface as
    /// [`Error::Transport`]; HTTP 404 as [`Error::NotFound`]; HTTP 403 or a
    /// body that looks like the login page as [`Error::Authentication`];
    /// anything else is decoded as JSON regardless of status code.
    ///
    /// This is the escape hatch for endpoints the typed accessors do not
    /// cover; the accessors all route through it.
    pub async fn request_json(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Value, Error> {
        let url = self.endpoint_url(endpoint)?;
        debug!("{method} {url}");

        let headers = match options.headers {
            Some(headers) => headers,
            None => self.default_headers()?,
        };

        let mut builder = self.http.request(method, url).headers(headers);
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        self.classify_response(endpoint, resp).await
    }

    /// Send a GET request with the default headers.
    pub(crate) async fn get(&self, endpoint: &str) -> Result<Value, Error> {
        self.request_json(Method::GET, endpoint, RequestOptions::default())
            .await
    }

    /// Send a POST request with per-request options.
    pub(crate) async fn post(&self, endpoint: &str, options: RequestOptions) -> Result<Value, Error> {
        self.request_json(Method::POST, endpoint, options).await
    }

    // ── Response classification ──────────────────────────────────────

    async fn classify_response(
        &self,
        endpoint: &str,
        resp: reqwest::Response,
    ) -> Result<Value, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                endpoint: endpoint.to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        // Some firmware builds answer unauthenticated requests with the
        // HTML login page and HTTP 200 instead of a 403.
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: "request rejected with HTTP 403".into(),
            });
        }
        if looks_like_login_page(&body) {
            return Err(Error::Authentication {
                message: "response redirected to the login page".into(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            // char-wise so the cutoff never lands inside a multi-byte char
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}
