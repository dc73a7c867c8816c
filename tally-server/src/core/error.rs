//! Server-level errors

use thiserror::Error;

/// Fatal errors during server startup and shutdown
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
