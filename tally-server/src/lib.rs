//! Tally Server - thermal receipt printing service
//!
//! # Architecture overview
//!
//! The service owns exactly one printer connection at a time and exposes a
//! small JSON contract to the operator UI:
//!
//! - **Printing** (`printing`): receipt rendering and the connection
//!   registry that serializes connect/disconnect/print
//! - **HTTP API** (`api`): the request/response contract (ports, discover,
//!   connect, print, status)
//! - **Core** (`core`): configuration, state and server lifecycle
//!
//! # Module structure
//!
//! ```text
//! tally-server/src/
//! ├── core/          # config, state, server
//! ├── printing/      # renderer, registry, job types
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging
//! ```

pub mod api;
pub mod core;
pub mod printing;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use printing::{PrintJob, PrinterService, ReceiptRenderer};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the process environment: .env file and logging
///
/// Must run before configuration is read.
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}
