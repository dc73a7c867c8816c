//! Printer API Handlers
//!
//! The request/response contract consumed by the operator UI. Every
//! operation answers HTTP 200 with a success flag; failures travel in the
//! body as `{success: false, error}` and never raise past this boundary.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::ServerState;
use crate::printing::{ConnectionInfo, PrintJob};
use tally_printer::{DEFAULT_BAUD_RATE, DiscoveredPrinter, ScanConfig, SerialPortDescriptor};

// ========== Requests ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectSerialRequest {
    #[serde(default)]
    pub port_path: Option<String>,
    /// Defaults to 19200 when omitted
    #[serde(default)]
    pub baud_rate: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverRequest {
    /// /24 prefix to scan; falls back to the configured default
    #[serde(default)]
    pub base_ip: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectNetworkRequest {
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub custom_text: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

// ========== Responses ==========

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPortsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub ports: Vec<SerialPortDescriptor>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectResponse {
    fn connected(kind: &str) -> Self {
        Self {
            success: true,
            connection_type: Some(kind.to_string()),
            error: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            connection_type: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub printers: Vec<DiscoveredPrinter>,
}

#[derive(Debug, Serialize)]
pub struct DisconnectResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<ConnectionInfo>,
}

// ========== Handlers ==========

/// GET /api/printer/ports
///
/// Enumerates serial ports fresh on every call; nothing is cached.
pub async fn list_ports() -> Json<ListPortsResponse> {
    match tally_printer::list_serial_ports() {
        Ok(ports) => Json(ListPortsResponse {
            success: true,
            error: None,
            ports,
        }),
        Err(e) => {
            warn!(error = %e, "Serial port enumeration failed");
            Json(ListPortsResponse {
                success: false,
                error: Some(e.to_string()),
                ports: Vec::new(),
            })
        }
    }
}

/// POST /api/printer/connect/serial
pub async fn connect_serial(
    State(state): State<ServerState>,
    Json(req): Json<ConnectSerialRequest>,
) -> Json<ConnectResponse> {
    let Some(path) = req.port_path.filter(|p| !p.trim().is_empty()) else {
        return Json(ConnectResponse::error("portPath is required"));
    };
    let baud_rate = req.baud_rate.unwrap_or(DEFAULT_BAUD_RATE);

    match state.printer.connect_serial(&path, baud_rate).await {
        Ok(()) => Json(ConnectResponse::connected("serial")),
        Err(e) => Json(ConnectResponse::error(e.to_string())),
    }
}

/// POST /api/printer/discover
///
/// Scans the requested /24 prefix on the RAW (9100) and LPD (515) ports.
/// Unreachable hosts are silent; only a malformed prefix fails the call.
pub async fn discover(
    State(state): State<ServerState>,
    Json(req): Json<DiscoverRequest>,
) -> Json<DiscoverResponse> {
    let base_ip = req
        .base_ip
        .filter(|ip| !ip.trim().is_empty())
        .unwrap_or_else(|| state.config.discovery_base_ip.clone());

    match tally_printer::discover(&base_ip, &ScanConfig::default()).await {
        Ok(printers) => Json(DiscoverResponse {
            success: true,
            error: None,
            printers,
        }),
        Err(e) => Json(DiscoverResponse {
            success: false,
            error: Some(e.to_string()),
            printers: Vec::new(),
        }),
    }
}

/// POST /api/printer/connect/network
pub async fn connect_network(
    State(state): State<ServerState>,
    Json(req): Json<ConnectNetworkRequest>,
) -> Json<ConnectResponse> {
    let Some(ip) = req.ip_address.filter(|ip| !ip.trim().is_empty()) else {
        return Json(ConnectResponse::error("ipAddress is required"));
    };
    let Some(port) = req.port else {
        return Json(ConnectResponse::error("port is required"));
    };

    match state.printer.connect_network(&ip, port).await {
        Ok(()) => Json(ConnectResponse::connected("network")),
        Err(e) => Json(ConnectResponse::error(e.to_string())),
    }
}

/// POST /api/printer/disconnect
///
/// Always succeeds; disconnecting twice is a no-op.
pub async fn disconnect(State(state): State<ServerState>) -> Json<DisconnectResponse> {
    state.printer.disconnect().await;
    Json(DisconnectResponse { success: true })
}

/// POST /api/printer/print
pub async fn print(
    State(state): State<ServerState>,
    Json(req): Json<PrintRequest>,
) -> Json<ConnectResponse> {
    let Some(text) = req.text.filter(|t| !t.trim().is_empty()) else {
        return Json(ConnectResponse::error("text is required"));
    };

    let job = PrintJob {
        text,
        custom_text: req.custom_text,
        timestamp: req.timestamp,
    };

    match state.printer.print(&job).await {
        Ok(kind) => Json(ConnectResponse::connected(&kind)),
        Err(e) => Json(ConnectResponse::error(e.to_string())),
    }
}

/// GET /api/printer/status
pub async fn status(State(state): State<ServerState>) -> Json<StatusResponse> {
    let status = state.printer.status().await;
    Json(StatusResponse {
        success: true,
        connected: status.connected,
        connection_type: status.connection_type,
        info: status.info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use tokio::net::TcpListener;

    fn test_state() -> ServerState {
        let config = Config {
            http_port: 0,
            paper_width: 48,
            brand_header: "TALLY".into(),
            discovery_base_ip: "192.168.1".into(),
            log_dir: None,
            environment: "development".into(),
        };
        ServerState::initialize(&config)
    }

    #[tokio::test]
    async fn test_print_without_connection_reports_error() {
        let state = test_state();
        let Json(resp) = print(
            State(state),
            Json(PrintRequest {
                text: Some("Dona".into()),
                custom_text: None,
                timestamp: None,
            }),
        )
        .await;

        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("Not connected to a printer"));
    }

    #[tokio::test]
    async fn test_print_requires_text() {
        let state = test_state();
        let Json(resp) = print(
            State(state),
            Json(PrintRequest {
                text: Some("   ".into()),
                custom_text: None,
                timestamp: None,
            }),
        )
        .await;

        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("text is required"));
    }

    #[tokio::test]
    async fn test_connect_serial_requires_port_path() {
        let state = test_state();
        let Json(resp) = connect_serial(
            State(state),
            Json(ConnectSerialRequest {
                port_path: None,
                baud_rate: None,
            }),
        )
        .await;

        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("portPath is required"));
    }

    #[tokio::test]
    async fn test_connect_network_requires_fields() {
        let state = test_state();

        let Json(resp) = connect_network(
            State(state.clone()),
            Json(ConnectNetworkRequest {
                ip_address: None,
                port: Some(9100),
            }),
        )
        .await;
        assert_eq!(resp.error.as_deref(), Some("ipAddress is required"));

        let Json(resp) = connect_network(
            State(state),
            Json(ConnectNetworkRequest {
                ip_address: Some("192.168.1.50".into()),
                port: None,
            }),
        )
        .await;
        assert_eq!(resp.error.as_deref(), Some("port is required"));
    }

    #[tokio::test]
    async fn test_discover_rejects_bad_prefix() {
        let state = test_state();
        let Json(resp) = discover(
            State(state),
            Json(DiscoverRequest {
                base_ip: Some("999.999.999".into()),
            }),
        )
        .await;

        assert!(!resp.success);
        assert!(resp.printers.is_empty());
        assert!(resp.error.unwrap().contains("Invalid subnet prefix"));
    }

    #[tokio::test]
    async fn test_status_starts_disconnected() {
        let state = test_state();
        let Json(resp) = status(State(state)).await;

        assert!(resp.success);
        assert!(!resp.connected);
        assert!(resp.connection_type.is_none());
        assert!(resp.info.is_none());
    }

    #[tokio::test]
    async fn test_response_wire_shape_is_camel_case() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _socket = listener.accept().await;
            std::future::pending::<()>().await;
        });

        let state = test_state();
        state
            .printer
            .connect_network("127.0.0.1", addr.port())
            .await
            .unwrap();

        let Json(resp) = status(State(state)).await;
        let value = serde_json::to_value(&resp).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["connected"], true);
        assert_eq!(value["connectionType"], "network");
        assert_eq!(value["info"]["ipAddress"], "127.0.0.1");
        assert_eq!(value["info"]["port"], addr.port());
        assert!(value["info"]["connectedAt"].is_string());
    }

    #[tokio::test]
    async fn test_full_network_contract() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and hold sockets open so connect and print both succeed
            let mut sockets = Vec::new();
            loop {
                if let Ok((socket, _)) = listener.accept().await {
                    sockets.push(socket);
                }
            }
        });

        let state = test_state();

        let Json(resp) = connect_network(
            State(state.clone()),
            Json(ConnectNetworkRequest {
                ip_address: Some("127.0.0.1".into()),
                port: Some(addr.port()),
            }),
        )
        .await;
        assert!(resp.success);
        assert_eq!(resp.connection_type.as_deref(), Some("network"));

        let Json(resp) = status(State(state.clone())).await;
        assert!(resp.connected);
        assert_eq!(resp.connection_type.as_deref(), Some("network"));

        let Json(resp) = print(
            State(state.clone()),
            Json(PrintRequest {
                text: Some("Dona".into()),
                custom_text: Some("Welcome!".into()),
                timestamp: Some("2024-01-01 10:00".into()),
            }),
        )
        .await;
        assert!(resp.success);
        assert_eq!(resp.connection_type.as_deref(), Some("network"));

        let Json(resp) = disconnect(State(state.clone())).await;
        assert!(resp.success);

        let Json(resp) = status(State(state)).await;
        assert!(!resp.connected);
    }
}
