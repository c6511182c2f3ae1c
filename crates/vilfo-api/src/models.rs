// Device response types
//
// Typed view of the `/devices` payloads. The router is inconsistent about
// field presence across firmware versions, so everything is optional with
// `#[serde(default)]` and unmodeled fields land in `extra`. Accessors hand
// back raw JSON; these types are for callers (and the v1 device scan) that
// want structure over defensive `Value` digging.

use serde::{Deserialize, Serialize};

/// One device from the `/devices` list or a `/devices/{idOrIp}` lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub ipv4: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub vilfo_group: Option<i64>,
    #[serde(default)]
    pub blocked: Option<bool>,
    #[serde(default)]
    pub bypass: Option<bool>,
    #[serde(default)]
    pub first_seen_at: Option<String>,
    #[serde(default)]
    pub status: Option<DeviceStatus>,
    #[serde(default)]
    pub bandwidth: Option<BandwidthUsage>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DeviceRecord {
    /// Whether the device is currently online; `false` when the status
    /// block is missing.
    pub fn is_online(&self) -> bool {
        self.status.as_ref().is_some_and(|status| status.online)
    }
}

/// Online state nested inside [`DeviceRecord`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceStatus {
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub online_from: Option<String>,
}

/// Current bandwidth usage in Mbit/s, nested inside [`DeviceRecord`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BandwidthUsage {
    #[serde(default)]
    pub download: Option<f64>,
    #[serde(default)]
    pub upload: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
}
