//! Transport layer for the SP Remote protocol
//!
//! One TCP connection per exchange: connect, write the frame, read until the
//! terminal closes the stream.

pub mod tcp;
pub mod error;

pub use error::{Error, Result};
pub use tcp::{CommandObserver, TcpTransport};

use async_trait::async_trait;
use bytes::BytesMut;
use spremote_core::Frame;

/// Transport trait for request/response exchanges with a terminal
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one frame and return every byte received until end-of-stream
    async fn exchange(&mut self, frame: &Frame) -> Result<BytesMut>;
    
    /// Get remote address
    fn remote_addr(&self) -> String;
}
