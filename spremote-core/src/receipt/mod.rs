//! Receipt text extraction
//!
//! Successful purchases carry the receipt inside the response, in one of
//! several layouts depending on terminal firmware. Extraction never fails the
//! operation: anything that cannot be recovered is reported as absent or
//! empty.
//!
//! # Pipeline
//!
//! ```text
//! response text
//!     │
//!     ├─> header (terminal id + timestamp) ── no match ──> no receipt
//!     │
//!     └─> strategies, in order
//!            1. DelimiterSplit  (0x01 / 0x02 / 0x1C separated copies)
//!            2. LegacyLayout    (free text with copy footers)
//!                 │
//!                 └─ all fail ──> empty receipt
//! ```

pub mod header;
pub mod reflow;
pub mod strategy;

use chrono::NaiveDateTime;
use spremote_types::{ReceiptData, ReceiptWidth};
use tracing::{debug, warn};

pub use header::ReceiptHeader;
pub use strategy::{DelimiterSplit, LegacyLayout, ReceiptStrategy, split_on_delimiters};

/// Receipt parsing failures
///
/// Absorbed by [`ReceiptParser`]; they only show up in logs.
#[derive(Debug, thiserror::Error)]
pub enum ReceiptParseError {
    #[error("receipt body too short: expected more than {expected} characters, got {actual}")]
    BodyTooShort { expected: usize, actual: usize },

    #[error("receipt copies split on {delimiter:?} are empty")]
    EmptyCopies { delimiter: char },

    #[error("merchant/client copy headers not found")]
    CopyHeadersNotFound,
}

/// Data recovered from a purchase response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptExtract {
    pub terminal_id: Option<String>,

    /// `None` means unknown
    pub timestamp: Option<NaiveDateTime>,

    /// Receipt copies; `None` when the response carries no text receipt
    pub receipt: Option<ReceiptData>,
}

/// Ordered list of receipt strategies
pub struct ReceiptParser {
    strategies: Vec<Box<dyn ReceiptStrategy>>,
}

impl ReceiptParser {
    /// Create a parser with a custom strategy order
    pub fn new(strategies: Vec<Box<dyn ReceiptStrategy>>) -> Self {
        Self { strategies }
    }

    /// Extract receipt data from a successful purchase response
    ///
    /// With `print_on_device` the terminal printed the receipt itself, so
    /// only the terminal id and timestamp are recovered.
    pub fn parse(&self, text: &str, print_on_device: bool, width: ReceiptWidth) -> ReceiptExtract {
        if print_on_device {
            self.parse_printed(text)
        } else {
            self.parse_text(text, width)
        }
    }

    /// Extract a text receipt
    pub fn parse_text(&self, text: &str, width: ReceiptWidth) -> ReceiptExtract {
        let Some(header) = header::text_header(text) else {
            debug!("No text receipt in response");
            return ReceiptExtract::default();
        };

        ReceiptExtract {
            terminal_id: Some(header.terminal_id),
            timestamp: header.timestamp,
            receipt: Some(self.copies(text, width)),
        }
    }

    /// Extract terminal id and timestamp from a device-printed purchase
    pub fn parse_printed(&self, text: &str) -> ReceiptExtract {
        match header::printed_header(text) {
            Some(header) => ReceiptExtract {
                terminal_id: Some(header.terminal_id),
                timestamp: header.timestamp,
                receipt: None,
            },
            None => ReceiptExtract::default(),
        }
    }

    fn copies(&self, text: &str, width: ReceiptWidth) -> ReceiptData {
        for strategy in &self.strategies {
            match strategy.parse(text, width) {
                Ok(Some(receipt)) => {
                    debug!(strategy = strategy.name(), "Parsed receipt copies");
                    return receipt;
                }
                Ok(None) => {}
                Err(e) => warn!(strategy = strategy.name(), error = %e, "Receipt strategy failed"),
            }
        }

        warn!("No receipt strategy matched, returning empty copies");
        ReceiptData::default()
    }
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new(vec![Box::new(DelimiterSplit), Box::new(LegacyLayout)])
    }
}

impl std::fmt::Debug for ReceiptParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.strategies.iter().map(|s| s.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "C00010000PAGAM. EFECTUADO Ident. TPA: 12345678 24-03-15 10:20:30";

    #[test]
    fn test_no_header_no_receipt() {
        let extract = ReceiptParser::default().parse_text("C00010000\u{1}#A\u{1}#B", ReceiptWidth::Twenty);
        assert_eq!(extract, ReceiptExtract::default());
    }

    #[test]
    fn test_delimited_receipt() {
        let text = format!("{}\u{1}#MERCHANT COPY\u{1}#CLIENT COPY", HEADER);
        let extract = ReceiptParser::default().parse_text(&text, ReceiptWidth::Twenty);

        assert_eq!(extract.terminal_id.as_deref(), Some("12345678"));
        assert!(extract.timestamp.is_some());

        let receipt = extract.receipt.unwrap();
        assert_eq!(receipt.merchant_copy, "MERCHANT COPY\n");
        assert_eq!(receipt.client_copy, "CLIENT COPY\n");
    }

    #[test]
    fn test_falls_back_to_legacy() {
        let text = format!("{} LOJA COPIA COMERCIANTE   CLIENTE COPIA CLIENTE", HEADER);
        let receipt = ReceiptParser::default()
            .parse_text(&text, ReceiptWidth::Twenty)
            .receipt
            .unwrap();

        assert!(receipt.merchant_copy.ends_with("COPIA COMERCIANTE"));
        assert_eq!(receipt.client_copy, "CLIENTE COPIA CLIENTE");
    }

    #[test]
    fn test_stray_field_separator_falls_back_to_legacy() {
        let text = "C00010000PAGAM. EFECTUADO\u{1C}99 Ident. TPA: 12345678 24-03-15 10:20:30 LOJA COPIA COMERCIANTE   CLIENTE COPIA CLIENTE";
        let extract = ReceiptParser::default().parse_text(text, ReceiptWidth::Twenty);

        assert_eq!(extract.terminal_id.as_deref(), Some("12345678"));

        let receipt = extract.receipt.unwrap();
        assert!(receipt.merchant_copy.ends_with("COPIA COMERCIANTE"));
        assert_eq!(receipt.client_copy, "CLIENTE COPIA CLIENTE");
    }

    #[test]
    fn test_unparseable_body_degrades_to_empty() {
        let extract = ReceiptParser::default().parse_text(HEADER, ReceiptWidth::Twenty);

        assert_eq!(extract.terminal_id.as_deref(), Some("12345678"));
        assert_eq!(extract.receipt, Some(ReceiptData::default()));
    }

    #[test]
    fn test_printed_receipt_has_no_copies() {
        let text = "C00010000\u{1C}87654321 20240315 102030";
        let extract = ReceiptParser::default().parse(text, true, ReceiptWidth::Twenty);

        assert_eq!(extract.terminal_id.as_deref(), Some("87654321"));
        assert!(extract.timestamp.is_some());
        assert_eq!(extract.receipt, None);
    }

    #[test]
    fn test_custom_strategy_order() {
        let parser = ReceiptParser::new(vec![Box::new(LegacyLayout)]);
        let text = format!("{}\u{1}#MERCHANT\u{1}#CLIENT", HEADER);

        // Legacy layout cannot find copy headers, so the result is empty
        let extract = parser.parse_text(&text, ReceiptWidth::Twenty);
        assert_eq!(extract.receipt, Some(ReceiptData::default()));
        assert_eq!(format!("{:?}", parser), "[\"legacy-layout\"]");
    }
}
