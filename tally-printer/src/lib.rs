//! # tally-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW bytes reach a printer:
//! - ESC/POS command building
//! - Serial transport (RS-232 / USB-serial)
//! - Network transport (raw TCP, port 9100)
//! - Serial port enumeration
//! - Subnet discovery of network printers
//!
//! Business logic (WHAT to print, and who owns the single active
//! connection) stays in application code: receipt rendering and the
//! connection registry live in tally-server.
//!
//! ## Example
//!
//! ```ignore
//! use std::time::Duration;
//! use tally_printer::{EscPosBuilder, NetworkTransport, Transport};
//!
//! // Build ESC/POS content
//! let mut builder = EscPosBuilder::new(48);
//! builder.center();
//! builder.double_size();
//! builder.line("TALLY");
//! builder.reset_size();
//! builder.cut_feed(3);
//!
//! // Send it to a network printer
//! let net = NetworkTransport::open("192.168.1.100", 9100, Duration::from_secs(5)).await?;
//! let mut transport = Transport::Network(net);
//! transport.write(&builder.build()).await?;
//! transport.close().await;
//! ```

mod discovery;
mod error;
mod escpos;
mod ports;
mod transport;

// Re-exports
pub use discovery::{discover, DiscoveredPrinter, ScanConfig, LPD_PORT, RAW_PRINT_PORT};
pub use error::{PrintError, PrintResult};
pub use escpos::{EscPosBuilder, INIT};
pub use ports::{list_serial_ports, SerialPortDescriptor};
pub use transport::{
    NetworkTransport, SerialConfig, SerialTransport, Transport, DEFAULT_BAUD_RATE,
    DEFAULT_CONNECT_TIMEOUT,
};
