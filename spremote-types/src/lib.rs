//! Type definitions for spremote

pub mod error;
pub mod receipt;
pub mod result;

pub use error::{Error, Result};
pub use receipt::{ReceiptData, ReceiptWidth};
pub use result::{OperationResult, PurchaseResult, RefundResult, TerminalStatus};
