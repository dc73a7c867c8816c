//! Printer transports
//!
//! Two ways for bytes to reach a thermal printer:
//! - Serial devices (RS-232 or USB-serial), via `tokio-serial`
//! - Network printers speaking raw TCP (ports 9100/515)
//!
//! Both variants share the same contract: `open` writes the ESC/POS INIT
//! sequence before resolving, `write` completes only after the underlying
//! write and flush succeed, and `close` is best-effort teardown whose
//! errors are logged rather than propagated.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_serial::{DataBits, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::{info, instrument, warn};

use crate::error::{PrintError, PrintResult};
use crate::escpos;

/// Default baud rate for serial thermal printers
pub const DEFAULT_BAUD_RATE: u32 = 19200;

/// Default deadline for establishing a network connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Serial line parameters
///
/// Thermal printers almost universally run 8N1; only the baud rate varies
/// between models.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
        }
    }
}

impl SerialConfig {
    /// 8N1 at the given baud rate
    pub fn with_baud_rate(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Self::default()
        }
    }
}

/// The active transport to a printer
///
/// An explicit tagged union rather than a trait object: there are exactly
/// two backends and callers dispatch on the kind for status reporting.
#[derive(Debug)]
pub enum Transport {
    Serial(SerialTransport),
    Network(NetworkTransport),
}

impl Transport {
    /// Connection kind as it appears on the wire ("serial" / "network")
    pub fn kind(&self) -> &'static str {
        match self {
            Transport::Serial(_) => "serial",
            Transport::Network(_) => "network",
        }
    }

    /// Send raw ESC/POS data through the transport
    pub async fn write(&mut self, data: &[u8]) -> PrintResult<()> {
        match self {
            Transport::Serial(t) => t.write(data).await,
            Transport::Network(t) => t.write(data).await,
        }
    }

    /// Release the transport
    ///
    /// Errors during close are logged, not propagated.
    pub async fn close(self) {
        match self {
            Transport::Serial(t) => t.close(),
            Transport::Network(t) => t.close().await,
        }
    }
}

/// A printer on a local serial port
#[derive(Debug)]
pub struct SerialTransport {
    port: SerialStream,
    path: String,
}

impl SerialTransport {
    /// Open a serial device and initialize the printer
    ///
    /// Any open error, and any write error while sending INIT, maps to
    /// [`PrintError::OpenFailed`]; the handle is dropped and never handed
    /// out half-initialized.
    #[instrument(skip(config), fields(baud_rate = config.baud_rate))]
    pub async fn open(path: &str, config: &SerialConfig) -> PrintResult<Self> {
        let mut port = tokio_serial::new(path, config.baud_rate)
            .data_bits(config.data_bits)
            .stop_bits(config.stop_bits)
            .parity(config.parity)
            .open_native_async()
            .map_err(|e| PrintError::OpenFailed(format!("{}: {}", path, e)))?;

        #[cfg(unix)]
        port.set_exclusive(false)
            .map_err(|e| PrintError::OpenFailed(format!("{}: {}", path, e)))?;

        let init = async {
            port.write_all(&escpos::INIT).await?;
            port.flush().await
        };
        init.await
            .map_err(|e| PrintError::OpenFailed(format!("{}: init write failed: {}", path, e)))?;

        info!("Serial port opened");
        Ok(Self {
            port,
            path: path.to_string(),
        })
    }

    /// The device path this transport was opened on
    pub fn path(&self) -> &str {
        &self.path
    }

    async fn write(&mut self, data: &[u8]) -> PrintResult<()> {
        self.port.write_all(data).await.map_err(|e| {
            PrintError::Io(std::io::Error::new(
                e.kind(),
                format!("Write failed: {}", e),
            ))
        })?;
        self.port.flush().await?;
        Ok(())
    }

    fn close(self) {
        // The underlying device closes on drop
        info!(path = %self.path, "Serial port closed");
    }
}

/// A printer reachable over raw TCP
#[derive(Debug)]
pub struct NetworkTransport {
    stream: TcpStream,
    addr: SocketAddr,
}

impl NetworkTransport {
    /// Connect to a network printer and initialize it
    ///
    /// The connect attempt is capped by `connect_timeout`; when the
    /// deadline fires the pending socket is dropped and
    /// [`PrintError::Timeout`] is returned.
    #[instrument]
    pub async fn open(ip: &str, port: u16, connect_timeout: Duration) -> PrintResult<Self> {
        let addr: SocketAddr = format!("{}:{}", ip, port)
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}:{}", ip, port)))?;

        let mut stream = tokio::time::timeout(connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| {
                warn!(%addr, "connect timed out");
                PrintError::Timeout
            })?
            .map_err(|e| PrintError::Connection(format!("{}: {}", addr, e)))?;

        let init = async {
            stream.write_all(&escpos::INIT).await?;
            stream.flush().await
        };
        init.await
            .map_err(|e| PrintError::Connection(format!("{}: init write failed: {}", addr, e)))?;

        info!("Connected to network printer");
        Ok(Self { stream, addr })
    }

    /// The remote address this transport is connected to
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    async fn write(&mut self, data: &[u8]) -> PrintResult<()> {
        self.stream.write_all(data).await.map_err(|e| {
            PrintError::Io(std::io::Error::new(
                e.kind(),
                format!("Write failed: {}", e),
            ))
        })?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            warn!(addr = %self.addr, error = %e, "Socket shutdown failed");
        }
    }
}
