//! Error types for the bastion tracker client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The requested bastion does not exist on the server
    #[error("Bastion '{0}' not found")]
    RoomNotFound(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The server answered an HTTP request with an error
    #[error("Server error: {0}")]
    ServerError(String),
}
