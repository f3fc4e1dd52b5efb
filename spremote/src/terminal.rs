//! High-level terminal interface

use tracing::{debug, info, trace};

use spremote_core::{
    Classification, CommandRequest, Frame, Operation, RawResponse, ReceiptParser, classify,
};
use spremote_transport::{TcpTransport, Transport};
use spremote_types::{
    OperationResult, PurchaseResult, ReceiptWidth, RefundResult, TerminalStatus,
};

use crate::config::TerminalConfig;
use crate::error::Result;

/// SP Remote payment terminal
///
/// Every call is one complete exchange on a fresh connection. Calls take
/// `&mut self`, so one instance never has two exchanges in flight.
///
/// # Examples
///
/// ```no_run
/// use spremote::Terminal;
///
/// #[tokio::main]
/// async fn main() -> spremote::Result<()> {
///     let mut terminal = Terminal::new("192.168.1.252", 15200);
///
///     let status = terminal.terminal_status().await?;
///     println!("{}", status);
///
///     let purchase = terminal.purchase(1, 360, false, Default::default()).await?;
///     if let Some(receipt) = &purchase.payload.receipt {
///         println!("{}", receipt.client_copy);
///     }
///
///     Ok(())
/// }
/// ```
pub struct Terminal {
    transport: Box<dyn Transport>,
    receipts: ReceiptParser,
}

impl Terminal {
    /// Create a terminal reached over TCP, without timeouts
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_transport(TcpTransport::new(host, port))
    }

    /// Create a terminal from validated settings
    pub fn from_config(config: &TerminalConfig) -> Result<Self> {
        Ok(Self::with_transport(tcp_transport(config)?))
    }

    /// Create a terminal that reports every outgoing command to `observer`
    pub fn from_config_with_observer(
        config: &TerminalConfig,
        observer: impl Fn(&str) + Send + Sync + 'static,
    ) -> Result<Self> {
        Ok(Self::with_transport(
            tcp_transport(config)?.with_command_observer(observer),
        ))
    }

    /// Create a terminal on top of any transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            receipts: ReceiptParser::default(),
        }
    }

    /// Replace the receipt strategies
    pub fn with_receipt_parser(mut self, receipts: ReceiptParser) -> Self {
        self.receipts = receipts;
        self
    }

    /// Remote address of the terminal
    pub fn remote_addr(&self) -> String {
        self.transport.remote_addr()
    }

    /// Send a request and classify the answer
    ///
    /// A negative response from the terminal is a failed result, not an
    /// error. Errors are reserved for transport faults, malformed responses
    /// and codes missing from the negative-response table.
    pub async fn execute(
        &mut self,
        request: &CommandRequest,
    ) -> Result<OperationResult<Classification>> {
        let frame = Frame::from_request(request)?;

        debug!(operation = %request.operation, "Sending {}", frame);

        let bytes = self.transport.exchange(&frame).await?;
        let response = RawResponse::decode(&bytes)?;

        trace!(operation = %request.operation, response = %response, "Received response");

        let classification = classify(request.operation, &response)?;
        let raw = response.into_string();

        let message = match classification.description {
            Some(description) if !classification.success => description.to_string(),
            _ => raw.clone(),
        };

        info!(
            operation = %request.operation,
            success = classification.success,
            code = ?classification.code,
            "{} finished",
            request.operation
        );

        Ok(OperationResult {
            success: classification.success,
            message,
            detail: classification.positive_text.map(str::to_string),
            raw,
            payload: classification,
        })
    }

    /// Query terminal status
    pub async fn terminal_status(&mut self) -> Result<OperationResult<TerminalStatus>> {
        let result = self.execute(&CommandRequest::terminal_status()).await?;

        Ok(result.map(|classification| TerminalStatus {
            terminal_id: classification.terminal_id,
        }))
    }

    /// Open the accounting period
    pub async fn open_period(&mut self, transaction_id: u32) -> Result<OperationResult<()>> {
        self.period(CommandRequest::open_period(transaction_id)).await
    }

    /// Close the accounting period
    pub async fn close_period(&mut self, transaction_id: u32) -> Result<OperationResult<()>> {
        self.period(CommandRequest::close_period(transaction_id)).await
    }

    /// Open or close the period with explicit flags
    ///
    /// `request` must be built with [`CommandRequest::open_period`] or
    /// [`CommandRequest::close_period`].
    pub async fn period(&mut self, request: CommandRequest) -> Result<OperationResult<()>> {
        if !matches!(request.operation, Operation::OpenPeriod | Operation::ClosePeriod) {
            return Err(spremote_core::Error::InvalidCommand(format!(
                "{} is not a period operation",
                request.operation
            ))
            .into());
        }

        Ok(self.execute(&request).await?.map(|_| ()))
    }

    /// Charge `amount` minor currency units
    ///
    /// With `print_on_device` the terminal prints the receipt and only the
    /// terminal id and timestamp are recovered; otherwise the receipt copies
    /// are returned in the payload, reflowed to `width`.
    pub async fn purchase(
        &mut self,
        transaction_id: u32,
        amount: u64,
        print_on_device: bool,
        width: ReceiptWidth,
    ) -> Result<OperationResult<PurchaseResult>> {
        let request = CommandRequest::purchase(transaction_id, amount)
            .with_print_on_device(print_on_device)
            .with_receipt_width(width);

        let result = self.execute(&request).await?;
        let mut purchase = PurchaseResult::new(transaction_id, amount);

        if result.success {
            let extract = self.receipts.parse(&result.raw, print_on_device, width);

            purchase.terminal_id = extract.terminal_id;
            purchase.timestamp = extract.timestamp;
            purchase.receipt = extract.receipt;
        }

        Ok(result.map(|_| purchase))
    }

    /// Refund `amount` minor currency units
    pub async fn refund(
        &mut self,
        transaction_id: u32,
        amount: u64,
    ) -> Result<OperationResult<RefundResult>> {
        let result = self
            .execute(&CommandRequest::refund(transaction_id, amount))
            .await?;

        Ok(result.map(|_| RefundResult {
            transaction_id,
            amount,
        }))
    }

    /// Refund a previous purchase in full
    pub async fn refund_purchase(
        &mut self,
        purchase: &PurchaseResult,
    ) -> Result<OperationResult<RefundResult>> {
        self.refund(purchase.transaction_id, purchase.amount).await
    }
}

fn tcp_transport(config: &TerminalConfig) -> Result<TcpTransport> {
    config.validate()?;

    let mut transport = TcpTransport::new(config.host.clone(), config.port);
    if let Some(timeout) = config.connect_timeout {
        transport = transport.with_connect_timeout(timeout);
    }
    if let Some(timeout) = config.read_timeout {
        transport = transport.with_read_timeout(timeout);
    }

    Ok(transport)
}
