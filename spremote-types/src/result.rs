//! Per-call operation results

use std::fmt;

use chrono::NaiveDateTime;

use crate::receipt::ReceiptData;

/// Outcome of one request/response exchange with the terminal
///
/// `message` holds the raw response text when the terminal accepted the
/// command, or the translated negative-response description when it did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult<T> {
    /// Terminal accepted the command
    pub success: bool,

    /// Raw response text or translated error description
    pub message: String,

    /// Sub-status text for accepted commands (e.g. "In service")
    pub detail: Option<String>,

    /// Response text exactly as decoded, status echo removed
    pub raw: String,

    /// Operation-specific payload
    pub payload: T,
}

impl<T> OperationResult<T> {
    /// Map the payload, keeping the classification fields
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationResult<U> {
        OperationResult {
            success: self.success,
            message: self.message,
            detail: self.detail,
            raw: self.raw,
            payload: f(self.payload),
        }
    }
}

impl<T> fmt::Display for OperationResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.success { "OK" } else { "FAILED" };
        match &self.detail {
            Some(detail) => write!(f, "{} ({}): {}", outcome, detail, self.message),
            None => write!(f, "{}: {}", outcome, self.message),
        }
    }
}

/// Terminal status payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalStatus {
    /// Terminal identification reported by an initialised terminal
    pub terminal_id: Option<String>,
}

/// Purchase payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseResult {
    pub transaction_id: u32,

    /// Amount in minor currency units
    pub amount: u64,

    /// Terminal identification printed on the receipt
    pub terminal_id: Option<String>,

    /// Receipt timestamp; `None` means unknown
    pub timestamp: Option<NaiveDateTime>,

    /// Receipt text, present only for receipts not printed on the terminal
    pub receipt: Option<ReceiptData>,
}

impl PurchaseResult {
    pub fn new(transaction_id: u32, amount: u64) -> Self {
        Self {
            transaction_id,
            amount,
            ..Self::default()
        }
    }
}

impl fmt::Display for PurchaseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Purchase[id: {:04}, amount: {}, terminal: {}]",
            self.transaction_id,
            self.amount,
            self.terminal_id.as_deref().unwrap_or("unknown")
        )
    }
}

/// Refund payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefundResult {
    pub transaction_id: u32,

    /// Amount in minor currency units
    pub amount: u64,
}

impl From<&PurchaseResult> for RefundResult {
    fn from(purchase: &PurchaseResult) -> Self {
        Self {
            transaction_id: purchase.transaction_id,
            amount: purchase.amount,
        }
    }
}
