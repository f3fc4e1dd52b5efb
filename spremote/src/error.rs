//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] spremote_core::Error),
    
    #[error("Transport error: {0}")]
    Transport(#[from] spremote_transport::Error),
    
    #[error("Type error: {0}")]
    Types(#[from] spremote_types::Error),
    
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Check if the exchange failed on the network
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
    
    /// Check if the terminal answered with something unexpected
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_protocol())
    }
}
