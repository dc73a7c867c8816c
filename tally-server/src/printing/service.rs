//! Printer connection registry
//!
//! Owns the single active transport and serializes every operation on it.
//! Connect, disconnect, status and print all take the same mutex, so two
//! concurrent connects can never race and leak a handle, and observers can
//! never see a half-open state.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use tally_printer::{
    DEFAULT_CONNECT_TIMEOUT, NetworkTransport, PrintError, SerialConfig, SerialTransport,
    Transport,
};

use super::renderer::ReceiptRenderer;
use super::types::PrintJob;

#[derive(Debug, Error)]
pub enum PrinterServiceError {
    /// Print attempted with no active connection
    #[error("Not connected to a printer")]
    NotConnected,

    /// Transport-level failure
    #[error(transparent)]
    Transport(#[from] PrintError),
}

pub type PrinterServiceResult<T> = Result<T, PrinterServiceError>;

/// Kind-specific metadata of the active connection
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ConnectionInfo {
    #[serde(rename_all = "camelCase")]
    Serial {
        port_path: String,
        baud_rate: u32,
        connected_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Network {
        ip_address: String,
        port: u16,
        connected_at: DateTime<Utc>,
    },
}

/// Snapshot returned by [`PrinterService::status`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<ConnectionInfo>,
}

/// The one active connection: transport plus its identifying metadata
struct ActiveConnection {
    transport: Transport,
    info: ConnectionInfo,
}

/// Printer connection registry / print dispatcher
///
/// Cheap to clone; all clones share the same active connection. Tests can
/// instantiate independent services, each with its own registry.
#[derive(Clone)]
pub struct PrinterService {
    active: Arc<Mutex<Option<ActiveConnection>>>,
    renderer: Arc<ReceiptRenderer>,
    connect_timeout: Duration,
}

impl PrinterService {
    /// Create a registry that renders jobs with the given renderer
    pub fn new(renderer: ReceiptRenderer) -> Self {
        Self {
            active: Arc::new(Mutex::new(None)),
            renderer: Arc::new(renderer),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Override the network connect deadline
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Connect to a serial printer, replacing any existing connection
    ///
    /// The previous transport is fully released before the new open is
    /// attempted; on failure the registry is left disconnected, never
    /// half-open.
    #[instrument(skip(self))]
    pub async fn connect_serial(&self, path: &str, baud_rate: u32) -> PrinterServiceResult<()> {
        let mut active = self.active.lock().await;
        Self::teardown(&mut active).await;

        let config = SerialConfig::with_baud_rate(baud_rate);
        let transport = SerialTransport::open(path, &config).await?;

        *active = Some(ActiveConnection {
            transport: Transport::Serial(transport),
            info: ConnectionInfo::Serial {
                port_path: path.to_string(),
                baud_rate,
                connected_at: Utc::now(),
            },
        });
        info!("Serial printer connected");
        Ok(())
    }

    /// Connect to a network printer, replacing any existing connection
    #[instrument(skip(self))]
    pub async fn connect_network(&self, ip: &str, port: u16) -> PrinterServiceResult<()> {
        let mut active = self.active.lock().await;
        Self::teardown(&mut active).await;

        let transport = NetworkTransport::open(ip, port, self.connect_timeout).await?;

        *active = Some(ActiveConnection {
            transport: Transport::Network(transport),
            info: ConnectionInfo::Network {
                ip_address: ip.to_string(),
                port,
                connected_at: Utc::now(),
            },
        });
        info!("Network printer connected");
        Ok(())
    }

    /// Release the active transport
    ///
    /// Calling with no active connection is a no-op success.
    pub async fn disconnect(&self) {
        let mut active = self.active.lock().await;
        Self::teardown(&mut active).await;
    }

    /// Current connection state, without side effects
    pub async fn status(&self) -> ConnectionStatus {
        let active = self.active.lock().await;
        match active.as_ref() {
            Some(conn) => ConnectionStatus {
                connected: true,
                connection_type: Some(conn.transport.kind().to_string()),
                info: Some(conn.info.clone()),
            },
            None => ConnectionStatus {
                connected: false,
                connection_type: None,
                info: None,
            },
        }
    }

    /// Render a job and write it through the active transport
    ///
    /// Returns the connection kind on success. A write failure tears the
    /// connection down before surfacing, so the registry never reports
    /// "connected" while holding a broken handle.
    #[instrument(skip(self, job))]
    pub async fn print(&self, job: &PrintJob) -> PrinterServiceResult<String> {
        let mut active = self.active.lock().await;
        let conn = active.as_mut().ok_or(PrinterServiceError::NotConnected)?;

        let data = self.renderer.render(job);
        match conn.transport.write(&data).await {
            Ok(()) => {
                let kind = conn.transport.kind().to_string();
                info!(bytes = data.len(), kind = %kind, "Print job sent");
                Ok(kind)
            }
            Err(e) => {
                warn!(error = %e, "Write failed, dropping connection");
                Self::teardown(&mut active).await;
                Err(e.into())
            }
        }
    }

    async fn teardown(active: &mut Option<ActiveConnection>) {
        if let Some(conn) = active.take() {
            conn.transport.close().await;
            info!("Printer connection released");
        }
    }
}

impl std::fmt::Debug for PrinterService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrinterService")
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
