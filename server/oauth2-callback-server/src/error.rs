use std::net::SocketAddr;

/// Startup failures of the callback server. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Port {0} is already in use. Please try a different port.")]
    PortUnavailable(u16),

    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("{0:#}")]
    Unexpected(#[from] anyhow::Error),
}

impl CallbackError {
    pub fn invalid_port() -> Self {
        Self::InvalidArgument("Invalid port number. Port must be between 1 and 65535.".to_string())
    }
}
