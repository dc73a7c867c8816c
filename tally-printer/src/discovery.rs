//! Network printer discovery
//!
//! Probes every host of a /24 subnet on the usual printer ports and
//! reports the endpoints that accept a TCP connection.
//!
//! Presence is proven purely by a successful handshake: no bytes are
//! exchanged, so anything listening on a candidate port is reported as a
//! printer. That heuristic is inherited from how RAW-port printing works
//! in practice and is kept as documented behavior.
//!
//! The scan is fan-out, settle-all: each of the 254 × |ports| attempts
//! either succeeds or silently times out, and the scan returns only after
//! every attempt has settled. A fixed-size semaphore bounds how many
//! sockets are in flight at once so a full-subnet sweep cannot exhaust
//! file descriptors.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, info, instrument};

use crate::error::{PrintError, PrintResult};

/// RAW printing port (HP JetDirect convention)
pub const RAW_PRINT_PORT: u16 = 9100;

/// Line Printer Daemon port
pub const LPD_PORT: u16 = 515;

/// A printer-like endpoint found by a scan
///
/// Ephemeral: a later scan may return a different set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredPrinter {
    pub ip_address: String,
    pub port: u16,
    /// Synthesized label, derived from the address
    pub name: String,
}

/// Scan parameters
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Ports tried on every host
    pub candidate_ports: Vec<u16>,
    /// Deadline per connection attempt
    pub attempt_timeout: Duration,
    /// Maximum simultaneous connection attempts
    pub max_concurrent: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            candidate_ports: vec![RAW_PRINT_PORT, LPD_PORT],
            attempt_timeout: Duration::from_millis(500),
            max_concurrent: 128,
        }
    }
}

/// Scan a /24 subnet for listening printer endpoints
///
/// `base_prefix` is the first three octets, e.g. "192.168.1". Individual
/// probe failures are silent; the only top-level error is a malformed
/// prefix.
#[instrument(skip(config))]
pub async fn discover(
    base_prefix: &str,
    config: &ScanConfig,
) -> PrintResult<Vec<DiscoveredPrinter>> {
    let [a, b, c] = parse_prefix(base_prefix)?;
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent));

    let mut probes = Vec::with_capacity(254 * config.candidate_ports.len());
    for suffix in 1..=254u8 {
        let ip = Ipv4Addr::new(a, b, c, suffix);
        for &port in &config.candidate_ports {
            let semaphore = Arc::clone(&semaphore);
            let attempt_timeout = config.attempt_timeout;
            probes.push(async move {
                // Never fails: the semaphore is not closed while probes run
                let _permit = semaphore.acquire_owned().await.ok()?;
                probe(SocketAddr::from((ip, port)), attempt_timeout).await
            });
        }
    }

    let found: Vec<DiscoveredPrinter> = join_all(probes).await.into_iter().flatten().collect();

    info!(count = found.len(), "Discovery scan settled");
    Ok(found)
}

/// One connection attempt; success closes the socket immediately
async fn probe(addr: SocketAddr, attempt_timeout: Duration) -> Option<DiscoveredPrinter> {
    match timeout(attempt_timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            debug!(%addr, "Printer endpoint found");
            Some(DiscoveredPrinter {
                ip_address: addr.ip().to_string(),
                port: addr.port(),
                name: format!("Network Printer ({})", addr.ip()),
            })
        }
        // Refused, unreachable or timed out: not present
        _ => None,
    }
}

fn parse_prefix(base: &str) -> PrintResult<[u8; 3]> {
    let invalid = || PrintError::InvalidConfig(format!("Invalid subnet prefix: {}", base));

    let octets: Vec<u8> = base
        .trim_end_matches('.')
        .split('.')
        .map(|part| part.parse().map_err(|_| invalid()))
        .collect::<PrintResult<_>>()?;

    match octets[..] {
        [a, b, c] => Ok([a, b, c]),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    fn scan_config(port: u16) -> ScanConfig {
        ScanConfig {
            candidate_ports: vec![port],
            ..ScanConfig::default()
        }
    }

    #[tokio::test]
    async fn test_discover_finds_local_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let found = discover("127.0.0", &scan_config(port)).await.unwrap();

        let expected = DiscoveredPrinter {
            ip_address: "127.0.0.1".to_string(),
            port,
            name: "Network Printer (127.0.0.1)".to_string(),
        };
        assert!(found.contains(&expected));

        // Only configured candidate ports may ever be reported
        assert!(found.iter().all(|p| p.port == port));
    }

    #[tokio::test]
    async fn test_discover_empty_when_nothing_listens() {
        // Bind then drop to obtain a port that is very likely free
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let found = discover("127.0.0", &scan_config(port)).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_discover_accepts_trailing_dot() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let found = discover("127.0.0.", &scan_config(port)).await.unwrap();
        assert!(found.iter().any(|p| p.ip_address == "127.0.0.1"));
    }

    #[tokio::test]
    async fn test_discover_rejects_bad_prefix() {
        for bad in ["999.168.1", "192.168", "192.168.1.5", "printers"] {
            let err = discover(bad, &ScanConfig::default()).await.unwrap_err();
            assert!(matches!(err, PrintError::InvalidConfig(_)), "{}", bad);
        }
    }
}
