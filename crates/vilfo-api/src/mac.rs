// Router MAC address discovery
//
// The router's own MAC is looked up on the local network, not over HTTP:
// a literal IPv4 host is matched against the kernel ARP table, a literal
// IPv6 host against the neighbour table, and a hostname is resolved via DNS
// first and then probed per address family. Linux-oriented; elsewhere the
// probes fail cleanly and capability detection keeps its defaults.

use std::net::IpAddr;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;
use url::{Host, Url};

use crate::error::Error;

const DNS_TIMEOUT: Duration = Duration::from_secs(5);

/// Look up the MAC address for the host in `base_url`.
pub(crate) async fn lookup_router_mac(base_url: &Url) -> Result<String, Error> {
    let host = base_url.host().ok_or_else(|| Error::Client {
        message: "base URL has no host".into(),
    })?;

    match host {
        Host::Ipv4(addr) => arp_lookup(IpAddr::V4(addr)).await,
        Host::Ipv6(addr) => neigh_lookup(IpAddr::V6(addr)).await,
        Host::Domain(name) => {
            let port = base_url.port_or_known_default().unwrap_or(80);
            let addrs = resolve_host(name, port).await?;
            if addrs.is_empty() {
                return Err(Error::Client {
                    message: format!("{name} did not resolve to any address"),
                });
            }
            for addr in addrs {
                let result = match addr {
                    IpAddr::V4(_) => arp_lookup(addr).await,
                    IpAddr::V6(_) => neigh_lookup(addr).await,
                };
                match result {
                    Ok(mac) => return Ok(mac),
                    Err(e) => debug!("neighbour probe for {addr} failed: {e}"),
                }
            }
            Err(Error::Client {
                message: format!("no neighbour entry for any address of {name}"),
            })
        }
    }
}

/// Normalize a MAC to lowercase colon-separated form (aa:bb:cc:dd:ee:ff).
pub(crate) fn normalize_mac(raw: &str) -> String {
    raw.to_lowercase().replace('-', ":")
}

/// Resolve `name` via DNS, bounded by [`DNS_TIMEOUT`].
async fn resolve_host(name: &str, port: u16) -> Result<Vec<IpAddr>, Error> {
    let lookup = tokio::net::lookup_host((name, port));
    let addrs = tokio::time::timeout(DNS_TIMEOUT, lookup)
        .await
        .map_err(|_| Error::Client {
            message: format!("DNS lookup for {name} timed out"),
        })?
        .map_err(|e| Error::Client {
            message: format!("DNS lookup for {name} failed: {e}"),
        })?;
    Ok(addrs.map(|sock| sock.ip()).collect())
}

/// Match `addr` against the kernel ARP table.
async fn arp_lookup(addr: IpAddr) -> Result<String, Error> {
    let table = tokio::fs::read_to_string("/proc/net/arp")
        .await
        .map_err(|e| Error::Client {
            message: format!("failed to read ARP table: {e}"),
        })?;
    parse_arp_table(&table, &addr.to_string()).ok_or_else(|| Error::Client {
        message: format!("no ARP entry for {addr}"),
    })
}

/// Match `addr` against the neighbour table via `ip neigh show`.
async fn neigh_lookup(addr: IpAddr) -> Result<String, Error> {
    let output = Command::new("ip")
        .arg("neigh")
        .arg("show")
        .arg(addr.to_string())
        .output()
        .await
        .map_err(|e| Error::Client {
            message: format!("failed to run `ip neigh`: {e}"),
        })?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_neigh_output(&stdout).ok_or_else(|| Error::Client {
        message: format!("no neighbour entry for {addr}"),
    })
}

/// ARP table format: `IP address HW type Flags HW address Mask Device`,
/// one header line first. Incomplete entries carry an all-zero MAC.
fn parse_arp_table(table: &str, ip: &str) -> Option<String> {
    for line in table.lines().skip(1) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() >= 4 && parts[0] == ip && parts[3] != "00:00:00:00:00:00" {
            return Some(normalize_mac(parts[3]));
        }
    }
    None
}

/// `ip neigh show` lines look like
/// `fe80::1 dev eth0 lladdr aa:bb:cc:dd:ee:ff router REACHABLE`;
/// unreachable entries have no `lladdr` token at all.
fn parse_neigh_output(output: &str) -> Option<String> {
    for line in output.lines() {
        let mut parts = line.split_whitespace();
        while let Some(token) = parts.next() {
            if token == "lladdr" {
                return parts.next().map(normalize_mac);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARP_TABLE: &str = "\
IP address       HW type     Flags       HW address            Mask     Device
192.168.0.1      0x1         0x2         08:00:27:8E:AC:31     *        eth0
192.168.0.17     0x1         0x0         00:00:00:00:00:00     *        eth0
192.168.0.42     0x1         0x2         AA-BB-CC-DD-EE-FF     *        eth0
";

    #[test]
    fn arp_table_finds_and_normalizes_entry() {
        assert_eq!(
            parse_arp_table(ARP_TABLE, "192.168.0.1"),
            Some("08:00:27:8e:ac:31".to_owned())
        );
        assert_eq!(
            parse_arp_table(ARP_TABLE, "192.168.0.42"),
            Some("aa:bb:cc:dd:ee:ff".to_owned())
        );
    }

    #[test]
    fn arp_table_skips_incomplete_entries() {
        assert_eq!(parse_arp_table(ARP_TABLE, "192.168.0.17"), None);
    }

    #[test]
    fn arp_table_misses_unknown_ip() {
        assert_eq!(parse_arp_table(ARP_TABLE, "192.168.0.99"), None);
    }

    #[test]
    fn arp_table_header_is_not_an_entry() {
        assert_eq!(parse_arp_table(ARP_TABLE, "IP"), None);
    }

    #[test]
    fn neigh_output_extracts_lladdr() {
        let output = "fe80::1 dev eth0 lladdr 08:00:27:8E:AC:31 router REACHABLE\n";
        assert_eq!(
            parse_neigh_output(output),
            Some("08:00:27:8e:ac:31".to_owned())
        );
    }

    #[test]
    fn neigh_output_without_lladdr_misses() {
        assert_eq!(parse_neigh_output("fe80::2 dev eth0 FAILED\n"), None);
        assert_eq!(parse_neigh_output(""), None);
    }

    #[test]
    fn normalize_mac_lowercases_and_colonizes() {
        assert_eq!(normalize_mac("AA-BB-CC-DD-EE-FF"), "aa:bb:cc:dd:ee:ff");
        assert_eq!(normalize_mac("08:00:27:8E:AC:31"), "08:00:27:8e:ac:31");
    }
}
