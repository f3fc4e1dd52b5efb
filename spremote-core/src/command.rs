//! SP Remote command templates

use std::fmt;

use spremote_types::ReceiptWidth;
use tracing::trace;

use crate::{
    constants::templates,
    error::{Error, Result},
};

/// Terminal operations
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    TerminalStatus,
    OpenPeriod,
    ClosePeriod,
    Purchase,
    Refund,
}

impl Operation {
    /// Get operation name
    pub fn name(self) -> &'static str {
        match self {
            Self::TerminalStatus => "TERMINAL_STATUS",
            Self::OpenPeriod => "OPEN_PERIOD",
            Self::ClosePeriod => "CLOSE_PERIOD",
            Self::Purchase => "PURCHASE",
            Self::Refund => "REFUND",
        }
    }

    /// Check if the operation moves money
    pub fn is_financial(self) -> bool {
        matches!(self, Self::Purchase | Self::Refund)
    }

    /// Fixed length of the rendered command text
    pub fn command_len(self) -> usize {
        match self {
            Self::TerminalStatus => templates::TERMINAL_STATUS.len(),
            // Supervisor card, print and width flags
            Self::OpenPeriod => {
                templates::OPEN_PERIOD_PREFIX.len()
                    + templates::TRANSACTION_ID_WIDTH
                    + 3 * templates::FLAG_WIDTH
            }
            Self::ClosePeriod => {
                templates::CLOSE_PERIOD_PREFIX.len()
                    + templates::TRANSACTION_ID_WIDTH
                    + 3 * templates::FLAG_WIDTH
            }
            // Print and width flags
            Self::Purchase => {
                templates::PURCHASE_PREFIX.len()
                    + templates::TRANSACTION_ID_WIDTH
                    + templates::AMOUNT_WIDTH
                    + templates::PURCHASE_FILLER.len()
                    + 2 * templates::FLAG_WIDTH
                    + templates::PURCHASE_TRAILER.len()
            }
            Self::Refund => {
                templates::REFUND_PREFIX.len()
                    + templates::TRANSACTION_ID_WIDTH
                    + templates::AMOUNT_WIDTH
                    + templates::REFUND_TRAILER.len()
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single request to the terminal
///
/// Built once per call and rendered into the fixed-layout ASCII command.
///
/// # Examples
///
/// ```
/// use spremote_core::CommandRequest;
///
/// let command = CommandRequest::open_period(1).render().unwrap();
/// assert_eq!(command, "S00010001100");
///
/// let command = CommandRequest::purchase(1, 360).render().unwrap();
/// assert_eq!(command, "C000100010000036000000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub operation: Operation,
    pub transaction_id: u32,

    /// Amount in minor currency units
    pub amount: Option<u64>,

    /// Authorise the operation with the supervisor card
    pub use_supervisor_card: bool,

    /// Let the terminal print the receipt itself
    pub print_on_device: bool,

    pub receipt_width: ReceiptWidth,
}

impl CommandRequest {
    fn new(operation: Operation, transaction_id: u32, amount: Option<u64>) -> Self {
        Self {
            operation,
            transaction_id,
            amount,
            use_supervisor_card: false,
            print_on_device: false,
            receipt_width: ReceiptWidth::Twenty,
        }
    }

    pub fn terminal_status() -> Self {
        Self::new(Operation::TerminalStatus, 0, None)
    }

    pub fn open_period(transaction_id: u32) -> Self {
        Self::new(Operation::OpenPeriod, transaction_id, None)
    }

    pub fn close_period(transaction_id: u32) -> Self {
        Self::new(Operation::ClosePeriod, transaction_id, None)
    }

    pub fn purchase(transaction_id: u32, amount: u64) -> Self {
        Self::new(Operation::Purchase, transaction_id, Some(amount))
    }

    pub fn refund(transaction_id: u32, amount: u64) -> Self {
        Self::new(Operation::Refund, transaction_id, Some(amount))
    }

    /// Set supervisor-card flag
    pub fn with_supervisor_card(mut self, use_supervisor_card: bool) -> Self {
        self.use_supervisor_card = use_supervisor_card;
        self
    }

    /// Set print-on-device flag
    pub fn with_print_on_device(mut self, print_on_device: bool) -> Self {
        self.print_on_device = print_on_device;
        self
    }

    /// Set receipt width
    pub fn with_receipt_width(mut self, receipt_width: ReceiptWidth) -> Self {
        self.receipt_width = receipt_width;
        self
    }

    /// Raw tag block (hex) sent after the command, if the operation has one
    pub fn tag_block(&self) -> Option<&'static str> {
        match self.operation {
            Operation::Purchase => Some(templates::PURCHASE_TAGS),
            _ => None,
        }
    }

    /// Render the ASCII command text
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCommand`] if the transaction id or amount does
    /// not fit its field, or a financial operation has no amount.
    pub fn render(&self) -> Result<String> {
        let command = match self.operation {
            Operation::TerminalStatus => templates::TERMINAL_STATUS.to_string(),
            Operation::OpenPeriod => self.render_period(templates::OPEN_PERIOD_PREFIX)?,
            Operation::ClosePeriod => self.render_period(templates::CLOSE_PERIOD_PREFIX)?,
            Operation::Purchase => format!(
                "{}{}{}{}{}{}{}",
                templates::PURCHASE_PREFIX,
                self.transaction_id_field()?,
                self.amount_field()?,
                templates::PURCHASE_FILLER,
                flag(self.print_on_device),
                self.receipt_width.code(),
                templates::PURCHASE_TRAILER,
            ),
            Operation::Refund => format!(
                "{}{}{}{}",
                templates::REFUND_PREFIX,
                self.transaction_id_field()?,
                self.amount_field()?,
                templates::REFUND_TRAILER,
            ),
        };

        trace!(operation = %self.operation, command = %command, "Rendered command");

        Ok(command)
    }

    fn render_period(&self, prefix: &str) -> Result<String> {
        // The terminal reads 0 as "use the supervisor card"
        Ok(format!(
            "{}{}{}{}{}",
            prefix,
            self.transaction_id_field()?,
            flag(!self.use_supervisor_card),
            flag(self.print_on_device),
            self.receipt_width.code(),
        ))
    }

    fn transaction_id_field(&self) -> Result<String> {
        pad_field("transaction id", u64::from(self.transaction_id), templates::TRANSACTION_ID_WIDTH)
    }

    fn amount_field(&self) -> Result<String> {
        let amount = self.amount.ok_or_else(|| {
            Error::InvalidCommand(format!("{} requires an amount", self.operation))
        })?;
        pad_field("amount", amount, templates::AMOUNT_WIDTH)
    }
}

fn flag(value: bool) -> u8 {
    u8::from(value)
}

fn pad_field(field: &str, value: u64, width: usize) -> Result<String> {
    let rendered = format!("{:0width$}", value, width = width);

    if rendered.len() > width {
        return Err(Error::InvalidCommand(format!(
            "{} {} exceeds {} digits",
            field, value, width
        )));
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_terminal_status_literal() {
        let command = CommandRequest::terminal_status().render().unwrap();
        assert_eq!(command, templates::TERMINAL_STATUS);
        assert_eq!(command.len(), Operation::TerminalStatus.command_len());
    }

    #[test]
    fn test_open_period_defaults() {
        let command = CommandRequest::open_period(1).render().unwrap();
        assert_eq!(command, "S00010001100");
    }

    #[test]
    fn test_close_period_flags() {
        let command = CommandRequest::close_period(42)
            .with_supervisor_card(true)
            .with_print_on_device(true)
            .with_receipt_width(ReceiptWidth::Forty)
            .render()
            .unwrap();
        assert_eq!(command, "S00110042011");
    }

    #[test]
    fn test_purchase_layout() {
        let command = CommandRequest::purchase(7, 1250)
            .with_print_on_device(true)
            .render()
            .unwrap();
        assert_eq!(command, "C000100070000125001000");
        assert_eq!(command.len(), 22);
    }

    #[test]
    fn test_refund_layout() {
        let command = CommandRequest::refund(1, 9).render().unwrap();
        assert_eq!(command, "C002100010000000900000000");
        assert_eq!(command.len(), Operation::Refund.command_len());
    }

    #[test]
    fn test_purchase_tag_block() {
        assert_eq!(CommandRequest::purchase(1, 1).tag_block(), Some(templates::PURCHASE_TAGS));
        assert_eq!(CommandRequest::refund(1, 1).tag_block(), None);
        assert_eq!(CommandRequest::terminal_status().tag_block(), None);
    }

    #[test]
    fn test_transaction_id_too_wide() {
        let result = CommandRequest::open_period(10_000).render();
        assert!(matches!(result, Err(Error::InvalidCommand(_))));
    }

    #[test]
    fn test_amount_too_wide() {
        let result = CommandRequest::purchase(1, 100_000_000).render();
        assert!(matches!(result, Err(Error::InvalidCommand(_))));
    }

    #[test]
    fn test_missing_amount() {
        let mut request = CommandRequest::refund(1, 1);
        request.amount = None;
        assert!(matches!(request.render(), Err(Error::InvalidCommand(_))));
    }

    #[test]
    fn test_operation_lengths() {
        assert_eq!(Operation::TerminalStatus.command_len(), 5);
        assert_eq!(Operation::OpenPeriod.command_len(), 12);
        assert_eq!(Operation::ClosePeriod.command_len(), 12);
        assert_eq!(Operation::Purchase.command_len(), 22);
        assert_eq!(Operation::Refund.command_len(), 25);
    }

    fn any_request() -> impl Strategy<Value = CommandRequest> {
        (0u32..=9_999, 0u64..=99_999_999, any::<bool>(), any::<bool>(), any::<bool>()).prop_flat_map(
            |(id, amount, supervisor, print, wide)| {
                let width = if wide { ReceiptWidth::Forty } else { ReceiptWidth::Twenty };
                prop_oneof![
                    Just(CommandRequest::terminal_status()),
                    Just(CommandRequest::open_period(id)),
                    Just(CommandRequest::close_period(id)),
                    Just(CommandRequest::purchase(id, amount)),
                    Just(CommandRequest::refund(id, amount)),
                ]
                .prop_map(move |request| {
                    request
                        .with_supervisor_card(supervisor)
                        .with_print_on_device(print)
                        .with_receipt_width(width)
                })
            },
        )
    }

    proptest! {
        #[test]
        fn prop_rendered_length_is_fixed(request in any_request()) {
            let command = request.render().unwrap();
            prop_assert_eq!(command.len(), request.operation.command_len());
            prop_assert!(command.is_ascii());
        }
    }
}
