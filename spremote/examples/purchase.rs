//! Purchase and refund example

use std::time::Duration;

use spremote::{ReceiptWidth, Terminal, TerminalConfig};

#[tokio::main]
async fn main() -> spremote::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();
    
    let config = TerminalConfig::from_env()?.with_connect_timeout(Duration::from_secs(5));
    let mut terminal = Terminal::from_config(&config)?;
    
    let opened = terminal.open_period(1).await?;
    println!("Open period: {}", opened);
    
    // 3.60, receipt returned as text
    let purchase = terminal.purchase(1, 360, false, ReceiptWidth::Twenty).await?;
    println!("Purchase: {}", purchase.payload);
    
    if !purchase.success {
        println!("Declined: {}", purchase.message);
        return Ok(());
    }
    
    match &purchase.payload.receipt {
        Some(receipt) => {
            println!("--- merchant copy ---\n{}", receipt.merchant_copy);
            println!("--- client copy ---\n{}", receipt.client_copy);
        }
        None => println!("No receipt text in response"),
    }
    
    let refund = terminal.refund_purchase(&purchase.payload).await?;
    println!("Refund: {}", refund);
    
    let closed = terminal.close_period(1).await?;
    println!("Close period: {}", closed);
    
    Ok(())
}
