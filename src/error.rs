//! Error types shared by the gateway and the playback controller.

use thiserror::Error;

/// Errors returned by the remote catalog gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// HTTP request failed before a response arrived (connect, timeout, TLS...).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Response body could not be decoded.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Base URL is empty or not http(s).
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Caller passed arguments the endpoint cannot accept.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl GatewayError {
    /// True when the failure happened on the network rather than on the server.
    pub fn is_network(&self) -> bool {
        matches!(self, GatewayError::Request(_))
    }
}

/// Errors reported by the playback controller.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// Track carries no usable audio location.
    #[error("File path is invalid: {0}")]
    InvalidSource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("Failed to fetch audio: {0}")]
    Fetch(String),

    #[error("No audio output device: {0}")]
    NoOutputDevice(String),

    #[error("Seek failed: {0}")]
    Seek(String),

    /// The audio thread has exited; commands can no longer be delivered.
    #[error("Audio thread is not running")]
    Disconnected,
}

/// Result alias for gateway calls.
pub type Result<T> = std::result::Result<T, GatewayError>;
