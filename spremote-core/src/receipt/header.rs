//! Terminal id and timestamp extraction

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::trace;

use crate::constants::receipt;

/// Label printed on current firmware
static TEXT_HEADER_SHORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Ident\. TPA:\s*(\d+)\s*(\d{2}-\d{2}-\d{2})\s*(\d{2}:\d{2}:\d{2})")
        .expect("short receipt header pattern is valid")
});

/// Label printed on older firmware
static TEXT_HEADER_LONG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Terminal Pagamento Automático:\s*(\d+)\s*(\d{2}-\d{2}-\d{2})\s*(\d{2}:\d{2}:\d{2})")
        .expect("long receipt header pattern is valid")
});

/// Terminal id following a field separator or backspace
static PRINTED_TERMINAL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x1C\x08](\d{8})").expect("terminal id pattern is valid"));

static PRINTED_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{8})").expect("date pattern is valid"));

static PRINTED_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{6})").expect("time pattern is valid"));

/// Terminal id and timestamp recovered from a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptHeader {
    pub terminal_id: String,

    /// `None` when the printed timestamp could not be parsed
    pub timestamp: Option<NaiveDateTime>,
}

/// Find the header of a text receipt
///
/// Tries the short label first, then the long one. `None` means the response
/// carries no text receipt.
pub fn text_header(text: &str) -> Option<ReceiptHeader> {
    let captures = TEXT_HEADER_SHORT
        .captures(text)
        .or_else(|| TEXT_HEADER_LONG.captures(text))?;

    let terminal_id = captures[1].to_string();
    let timestamp = parse_timestamp(
        &format!("{} {}", &captures[2], &captures[3]),
        receipt::TEXT_TIMESTAMP_FORMAT,
    );

    trace!(terminal_id = %terminal_id, ?timestamp, "Matched text receipt header");

    Some(ReceiptHeader {
        terminal_id,
        timestamp,
    })
}

/// Find terminal id and timestamp in a response whose receipt the terminal printed
///
/// The date is the first 8-digit run after the terminal id and the time the
/// first 6-digit run after the date.
pub fn printed_header(text: &str) -> Option<ReceiptHeader> {
    let terminal_match = PRINTED_TERMINAL_ID.captures(text)?;
    let terminal_id = terminal_match[1].to_string();

    let after_terminal = &text[terminal_match.get(0).map_or(text.len(), |m| m.end())..];

    let timestamp = PRINTED_DATE.find(after_terminal).and_then(|date| {
        let after_date = &after_terminal[date.end()..];
        PRINTED_TIME.find(after_date).and_then(|time| {
            parse_timestamp(
                &format!("{} {}", date.as_str(), time.as_str()),
                receipt::PRINTED_TIMESTAMP_FORMAT,
            )
        })
    });

    trace!(terminal_id = %terminal_id, ?timestamp, "Matched printed receipt header");

    Some(ReceiptHeader {
        terminal_id,
        timestamp,
    })
}

fn parse_timestamp(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, format).ok()
}
