// System endpoints
//
// Health check and reboot. The reboot endpoint is the one call sent with
// no headers at all -- the current server contract takes it unauthenticated.

use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::debug;

use crate::client::{RequestOptions, VilfoClient};
use crate::error::Error;

impl VilfoClient {
    /// Check that the router's API is responding.
    ///
    /// `GET /system/ping` -- the server answers even without valid
    /// credentials, though the default headers are still attached.
    pub async fn ping(&self) -> Result<Value, Error> {
        debug!("pinging router");
        self.get("/system/ping").await
    }

    /// Reboot the router.
    ///
    /// `POST /system/reboot`, sent with an empty header map so no auth
    /// header is attached, per the current server contract.
    pub async fn reboot_router(&self) -> Result<Value, Error> {
        debug!("rebooting router");
        self.post(
            "/system/reboot",
            RequestOptions {
                headers: Some(HeaderMap::new()),
                ..RequestOptions::default()
            },
        )
        .await
    }
}
