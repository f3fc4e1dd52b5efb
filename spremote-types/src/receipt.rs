//! Receipt structures

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Column width the terminal lays receipt text out for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ReceiptWidth {
    /// 20-column roll (canonical)
    #[default]
    Twenty = 20,

    /// 40-column roll
    Forty = 40,
}

impl ReceiptWidth {
    /// Number of characters per receipt line
    pub fn columns(self) -> usize {
        self as usize
    }

    /// Single-digit code used in command templates (20 → 0, 40 → 1)
    pub fn code(self) -> u8 {
        match self {
            Self::Twenty => 0,
            Self::Forty => 1,
        }
    }

    /// Look up a width by its column count
    pub fn from_columns(columns: usize) -> Result<Self> {
        match columns {
            20 => Ok(Self::Twenty),
            40 => Ok(Self::Forty),
            other => Err(Error::Validation(format!(
                "unsupported receipt width: {} columns (expected 20 or 40)",
                other
            ))),
        }
    }
}

impl FromStr for ReceiptWidth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let columns = s
            .trim()
            .parse::<usize>()
            .map_err(|e| Error::Parse(format!("receipt width '{}': {}", s, e)))?;
        Self::from_columns(columns)
    }
}

impl fmt::Display for ReceiptWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} columns", self.columns())
    }
}

/// Text renderings of a receipt recovered from a purchase response
///
/// Both copies are already reflowed: one receipt line per `\n`-terminated
/// line. An empty string means that copy could not be recovered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptData {
    /// Copy retained by the merchant
    pub merchant_copy: String,

    /// Copy handed to the client
    pub client_copy: String,
}

impl ReceiptData {
    pub fn new(merchant_copy: impl Into<String>, client_copy: impl Into<String>) -> Self {
        Self {
            merchant_copy: merchant_copy.into(),
            client_copy: client_copy.into(),
        }
    }

    /// True when neither copy carries any text
    pub fn is_empty(&self) -> bool {
        self.merchant_copy.is_empty() && self.client_copy.is_empty()
    }

    /// Merchant copy split into its receipt lines
    pub fn merchant_lines(&self) -> impl Iterator<Item = &str> {
        self.merchant_copy.lines()
    }

    /// Client copy split into its receipt lines
    pub fn client_lines(&self) -> impl Iterator<Item = &str> {
        self.client_copy.lines()
    }
}

impl fmt::Display for ReceiptData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Receipt[merchant: {} lines, client: {} lines]",
            self.merchant_lines().count(),
            self.client_lines().count()
        )
    }
}
