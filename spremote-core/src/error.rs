//! Error types for spremote-core

/// Result type alias for spremote operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request cannot be rendered into its command template
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    
    /// Tag block is not a valid hex string
    #[error("Invalid tag block: {0}")]
    InvalidTagBlock(#[from] hex::FromHexError),
    
    /// Command text does not fit the 2-byte length prefix
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },
    
    /// Response is too short for the offsets a message type requires
    #[error("Response too short for {field}: expected at least {expected} bytes, got {actual} bytes")]
    ResponseTooShort {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    
    /// Failure code is missing from the negative-response table
    #[error("Unknown error: processing failed, check the terminal for details (response: {0:?})")]
    UnknownResponseCode(String),
}

impl Error {
    /// Check if the error came from a malformed or unexpected response
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Self::ResponseTooShort { .. } | Self::UnknownResponseCode(_)
        )
    }
    
    /// Check if the error was caused by the caller's request
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Self::InvalidCommand(_)
                | Self::InvalidTagBlock(_)
                | Self::PayloadTooLarge { .. }
        )
    }
}
