//! Receipt Printing Module
//!
//! Rendering of print jobs into ESC/POS data and ownership of the single
//! active printer connection:
//! - Renderer: deterministic PrintJob -> byte buffer
//! - Service: connection registry and print dispatcher

pub mod renderer;
pub mod service;
pub mod types;

pub use renderer::ReceiptRenderer;
pub use service::{
    ConnectionInfo, ConnectionStatus, PrinterService, PrinterServiceError, PrinterServiceResult,
};
pub use types::PrintJob;
