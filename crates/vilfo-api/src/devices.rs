// Device endpoints
//
// Device inventory and lookup. `get_device` is the dialect-dependent path:
// firmware 1.1.0+ indexes `/devices/{idOrIp}` by IP, so a MAC lookup scans
// the device list first and re-fetches by the matched IP; older firmware
// takes the MAC straight in the path.

use serde_json::Value;
use tracing::debug;

use crate::client::VilfoClient;
use crate::error::Error;
use crate::mac::normalize_mac;
use crate::models::DeviceRecord;

impl VilfoClient {
    /// List all devices known to the router.
    ///
    /// `GET /devices`
    pub async fn get_devices(&self) -> Result<Value, Error> {
        debug!("listing devices");
        self.get("/devices").await
    }

    /// Get a single device addressed by its current IP.
    ///
    /// `GET /devices/{ip}` -- same endpoint shape as the by-MAC lookup;
    /// what the path segment means depends on the firmware dialect.
    pub async fn get_device_by_ip(&self, ip: &str) -> Result<Value, Error> {
        debug!(ip, "fetching device by ip");
        self.get(&format!("/devices/{ip}")).await
    }

    /// Get a single device addressed by its stable MAC identity.
    ///
    /// On pre-1.1.0 firmware this is one `GET /devices/{mac}`, and a
    /// missing device surfaces as [`Error::NotFound`]. On 1.1.0 and newer
    /// the endpoint is indexed by IP, so the device list is scanned for
    /// the MAC first and the match re-fetched by IP; no match, or a match
    /// without a usable IP, yields `Ok(None)` instead of an error.
    pub async fn get_device(&self, mac: &str) -> Result<Option<Value>, Error> {
        if !self.capabilities().supports_v1_device_lookup() {
            debug!(mac, "fetching device by mac (legacy dialect)");
            return self.get(&format!("/devices/{mac}")).await.map(Some);
        }

        debug!(mac, "fetching device via list scan (v1 dialect)");
        let devices = self.get_devices().await?;
        let Some(ip) = find_device_ip(&devices, mac) else {
            return Ok(None);
        };
        self.get_device_by_ip(&ip).await.map(Some)
    }

    /// Whether the device with this MAC is currently online.
    ///
    /// Never fails: any error, missing device, or malformed payload reads
    /// as offline.
    pub async fn is_device_online(&self, mac: &str) -> bool {
        match self.get_device(mac).await {
            Ok(Some(device)) => device
                .get("data")
                .and_then(|data| data.get("status"))
                .and_then(|status| status.get("online"))
                .and_then(Value::as_bool)
                .unwrap_or(false),
            Ok(None) | Err(_) => false,
        }
    }
}

/// Scan a `/devices` payload for `mac` and return the match's IP.
///
/// First match wins; a first match with a missing or empty IP counts as
/// no match at all. Entries that are not device-shaped are skipped.
fn find_device_ip(devices: &Value, mac: &str) -> Option<String> {
    let wanted = normalize_mac(mac);
    devices
        .get("data")?
        .as_array()?
        .iter()
        .filter_map(|entry| serde_json::from_value::<DeviceRecord>(entry.clone()).ok())
        .find(|record| {
            record
                .mac_address
                .as_deref()
                .is_some_and(|candidate| normalize_mac(candidate) == wanted)
        })
        .and_then(|record| record.ipv4)
        .filter(|ip| !ip.is_empty())
}
