//! Terminal connection settings

use std::str::FromStr;
use std::time::Duration;

use spremote_core::DEFAULT_PORT;

use crate::error::{Error, Result};

/// Environment variable holding the terminal host
pub const HOST_ENV: &str = "SPREMOTE_HOST";

/// Environment variable holding the terminal port
pub const PORT_ENV: &str = "SPREMOTE_PORT";

/// Where and how to reach the terminal
///
/// # Examples
///
/// ```
/// use spremote::TerminalConfig;
///
/// let config: TerminalConfig = "192.168.1.252:15200".parse().unwrap();
/// assert_eq!(config.port, 15200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalConfig {
    pub host: String,
    pub port: u16,

    /// No limit when `None`
    pub connect_timeout: Option<Duration>,

    /// No limit when `None`
    pub read_timeout: Option<Duration>,
}

impl TerminalConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: None,
            read_timeout: None,
        }
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Read `SPREMOTE_HOST` and `SPREMOTE_PORT` (default 15200)
    pub fn from_env() -> Result<Self> {
        let host = std::env::var(HOST_ENV)
            .map_err(|_| Error::Configuration(format!("{} is not set", HOST_ENV)))?;

        let port = match std::env::var(PORT_ENV) {
            Ok(port) => parse_port(&port)?,
            Err(_) => DEFAULT_PORT,
        };

        let config = Self::new(host, port);
        config.validate()?;
        Ok(config)
    }

    /// Check host and port
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Configuration("host is empty".into()));
        }

        if self.port == 0 {
            return Err(Error::Configuration("port must be between 1 and 65535".into()));
        }

        Ok(())
    }
}

impl FromStr for TerminalConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (host, port) = match s.trim().rsplit_once(':') {
            Some((host, port)) => (host, parse_port(port)?),
            None => (s.trim(), DEFAULT_PORT),
        };

        let config = Self::new(host, port);
        config.validate()?;
        Ok(config)
    }
}

fn parse_port(value: &str) -> Result<u16> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|e| Error::Configuration(format!("invalid port '{}': {}", value, e)))
}
