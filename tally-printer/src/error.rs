//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection attempt exceeded its deadline
    ///
    /// The display string is part of the UI contract: clients match on
    /// "Connection timeout".
    #[error("Connection timeout")]
    Timeout,

    /// Serial device unavailable or misconfigured
    #[error("Failed to open device: {0}")]
    OpenFailed(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
