//! Terminal status example

use tracing_subscriber::EnvFilter;
use spremote::{Terminal, TerminalConfig};

#[tokio::main]
async fn main() -> spremote::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // SPREMOTE_HOST=192.168.1.252 SPREMOTE_PORT=15200
    let config = TerminalConfig::from_env()?;

    println!("Querying {}:{}...", config.host, config.port);

    let mut terminal = Terminal::from_config_with_observer(&config, |command| {
        println!("→ Sent: {}", command);
    })?;

    let status = terminal.terminal_status().await?;
    println!("✓ {}", status);

    if let Some(terminal_id) = &status.payload.terminal_id {
        println!("✓ Terminal: {}", terminal_id);
    }

    Ok(())
}
