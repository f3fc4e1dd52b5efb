//! # spremote-core
//!
//! Core protocol implementation for SP Remote payment terminals.
//!
//! This crate provides the low-level protocol primitives:
//! - Command templates for the five terminal operations
//! - Frame encoding and response decoding
//! - Response classification
//! - Receipt text extraction
//! - Protocol constants

pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod receipt;
pub mod response;

pub use command::{CommandRequest, Operation};
pub use error::{Error, Result};
pub use frame::{Frame, RawResponse};
pub use receipt::{ReceiptExtract, ReceiptParser};
pub use response::{Classification, classify};

/// Default terminal port
pub const DEFAULT_PORT: u16 = 15200;

/// Maximum command size representable by the length prefix
pub const MAX_COMMAND_SIZE: usize = u16::MAX as usize;

/// Length prefix size
pub const LENGTH_PREFIX_SIZE: usize = 2;
