// Capability detection
//
// The router speaks one of two device-lookup dialects depending on its
// firmware: 1.1.0 and newer index `/devices/{idOrIp}` by IP, older builds
// by MAC. Detection is best-effort -- `connect()` never fails, so an
// unreachable router still yields a usable client running on defaults.

use semver::Version;
use serde_json::Value;
use tracing::debug;

use crate::client::VilfoClient;
use crate::error::Error;
use crate::mac::lookup_router_mac;

/// Firmware version assumed until resolution succeeds.
pub const DEFAULT_FIRMWARE_VERSION: Version = Version::new(1, 1, 0);

/// Firmware from which `/devices/{idOrIp}` is indexed by IP instead of MAC.
const V1_DEVICE_LOOKUP_THRESHOLD: Version = Version::new(1, 1, 0);

/// Detected router capabilities, cached for the client's lifetime.
///
/// Defaults apply until [`VilfoClient::connect`] (or one of the resolve
/// methods) has run. The failure flags record which probes went wrong, so
/// callers can tell "resolved to the default" apart from "defaulted".
#[derive(Debug, Clone)]
pub struct CapabilityState {
    firmware_version: Version,
    supports_v1_device_lookup: bool,
    mac_address: Option<String>,
    firmware_resolution_failed: bool,
    mac_resolution_failed: bool,
}

impl Default for CapabilityState {
    fn default() -> Self {
        Self {
            supports_v1_device_lookup: supports_v1(&DEFAULT_FIRMWARE_VERSION),
            firmware_version: DEFAULT_FIRMWARE_VERSION,
            mac_address: None,
            firmware_resolution_failed: false,
            mac_resolution_failed: false,
        }
    }
}

impl CapabilityState {
    /// The resolved firmware version (the `1.1.0` default if unresolved).
    pub fn firmware_version(&self) -> &Version {
        &self.firmware_version
    }

    /// Whether device lookup goes through the v1 (by-IP) dialect.
    pub fn supports_v1_device_lookup(&self) -> bool {
        self.supports_v1_device_lookup
    }

    /// The router's own MAC address, if a probe has succeeded.
    pub fn mac_address(&self) -> Option<&str> {
        self.mac_address.as_deref()
    }

    pub fn firmware_resolution_failed(&self) -> bool {
        self.firmware_resolution_failed
    }

    pub fn mac_resolution_failed(&self) -> bool {
        self.mac_resolution_failed
    }

    /// Store a resolved version. The dialect flag is derived here and
    /// nowhere else, so it is computed exactly once per resolved version.
    pub(crate) fn set_firmware_version(&mut self, version: Version) {
        self.supports_v1_device_lookup = supports_v1(&version);
        self.firmware_version = version;
        self.firmware_resolution_failed = false;
    }

    pub(crate) fn mark_firmware_resolution_failed(&mut self) {
        self.firmware_resolution_failed = true;
    }

    pub(crate) fn cache_mac_address(&mut self, mac: String) {
        self.mac_address = Some(mac);
        self.mac_resolution_failed = false;
    }

    pub(crate) fn mark_mac_resolution_failed(&mut self) {
        self.mac_resolution_failed = true;
    }
}

fn supports_v1(version: &Version) -> bool {
    *version >= V1_DEVICE_LOOKUP_THRESHOLD
}

/// The version field moved between firmware generations: newer builds
/// report it at the top level of the board payload, older ones nest it
/// under `data`.
fn extract_version(board: &Value) -> Option<&str> {
    board
        .get("version")
        .or_else(|| board.get("data").and_then(|data| data.get("version")))
        .and_then(Value::as_str)
}

impl VilfoClient {
    // ── Capability resolution ────────────────────────────────────────

    /// Run both best-effort capability probes.
    ///
    /// Never fails: an unreachable router leaves the defaults in place
    /// (firmware `1.1.0`, no MAC) and sets the matching failure flags.
    pub async fn connect(&mut self) {
        if let Err(e) = self.resolve_firmware_version().await {
            debug!(error = %e, "firmware version resolution failed (non-fatal)");
        }
        if let Err(e) = self.resolve_mac_address(false).await {
            debug!(error = %e, "MAC address resolution failed (non-fatal)");
        }
    }

    /// Fetch the board information and store the firmware version.
    ///
    /// On any failure (unreachable router, missing or unparseable version
    /// field) the failure flag is set and the previous version -- the
    /// `1.1.0` default on a fresh client -- stays in place.
    pub async fn resolve_firmware_version(&mut self) -> Result<Version, Error> {
        match self.fetch_firmware_version().await {
            Ok(version) => {
                self.capabilities_mut().set_firmware_version(version.clone());
                Ok(version)
            }
            Err(e) => {
                self.capabilities_mut().mark_firmware_resolution_failed();
                Err(e)
            }
        }
    }

    async fn fetch_firmware_version(&self) -> Result<Version, Error> {
        let board = self.get("/dashboard/board").await?;
        let raw = extract_version(&board).ok_or_else(|| Error::Client {
            message: "board information carries no version field".into(),
        })?;
        Version::parse(raw).map_err(|e| Error::Client {
            message: format!("unparseable firmware version {raw:?}: {e}"),
        })
    }

    /// Resolve the router's own MAC address via a local-network probe.
    ///
    /// A cached address is returned as-is unless `force_retry` is set.
    /// Success overwrites the cache and clears the failure flag; failure
    /// sets the flag and surfaces as [`Error::Client`].
    pub async fn resolve_mac_address(&mut self, force_retry: bool) -> Result<String, Error> {
        if !force_retry {
            if let Some(mac) = self.capabilities().mac_address() {
                return Ok(mac.to_owned());
            }
        }

        match lookup_router_mac(self.base_url()).await {
            Ok(mac) => {
                self.capabilities_mut().cache_mac_address(mac.clone());
                Ok(mac)
            }
            Err(e) => {
                self.capabilities_mut().mark_mac_resolution_failed();
                Err(e)
            }
        }
    }
}
