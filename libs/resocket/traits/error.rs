use thiserror::Error;

/// Main error type for resocket
#[derive(Error, Debug)]
pub enum ResocketError {
    /// WebSocket transport error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Connection closed unexpectedly
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    /// Command channel error (link driver has exited)
    #[error("Channel send error: {0}")]
    ChannelSend(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for resocket operations
pub type Result<T> = std::result::Result<T, ResocketError>;
