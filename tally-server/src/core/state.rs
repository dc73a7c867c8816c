use crate::core::Config;
use crate::printing::{PrinterService, ReceiptRenderer};

/// Server state - shared handles to every service
///
/// Cloned into each request handler; all clones share the same printer
/// registry, so the process holds at most one active printer connection.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Immutable configuration
    pub config: Config,
    /// Printer connection registry and print dispatcher
    pub printer: PrinterService,
}

impl ServerState {
    /// Build the state and its services from configuration
    pub fn initialize(config: &Config) -> Self {
        let renderer = ReceiptRenderer::new(config.paper_width, config.brand_header.clone());
        Self {
            config: config.clone(),
            printer: PrinterService::new(renderer),
        }
    }
}
