//! # spremote
//!
//! Rust client for SP Remote payment terminals.
//!
//! ## Features
//!
//! - Type-safe command templates for the five terminal operations
//! - Async/await API using Tokio, one connection per exchange
//! - Response classification with negative-response descriptions
//! - Receipt recovery across the known receipt layouts
//!
//! ## Quick Start
//!
//! ```no_run
//! use spremote::{ReceiptWidth, Terminal};
//!
//! #[tokio::main]
//! async fn main() -> spremote::Result<()> {
//!     let mut terminal = Terminal::new("192.168.1.252", 15200);
//!     
//!     // Charge 3.60
//!     let purchase = terminal.purchase(1, 360, false, ReceiptWidth::Twenty).await?;
//!     println!("{}", purchase);
//!     
//!     // And give it back
//!     if purchase.success {
//!         let refund = terminal.refund_purchase(&purchase.payload).await?;
//!         println!("{}", refund);
//!     }
//!     
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod terminal;

// Re-exports
pub use config::TerminalConfig;
pub use error::{Error, Result};
pub use terminal::Terminal;

// Re-export types
pub use spremote_core::{Classification, CommandRequest, Operation, ReceiptParser};
pub use spremote_transport::{TcpTransport, Transport};
pub use spremote_types::{
    OperationResult, PurchaseResult, ReceiptData, ReceiptWidth, RefundResult, TerminalStatus,
};
