//! Receipt body strategies
//!
//! Terminals have shipped several receipt layouts over time. Each layout is
//! handled by one [`ReceiptStrategy`]; the parser tries them in order until
//! one produces a receipt.

use std::sync::LazyLock;

use regex::Regex;
use spremote_types::{ReceiptData, ReceiptWidth};

use super::{ReceiptParseError, reflow};
use crate::constants::{delimiters, offsets, receipt};

/// Date at the start of a legacy receipt line
static LEGACY_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2}-\d{2}-\d{2})").expect("legacy date pattern is valid"));

/// Merchant/client copy headers, accented or not
static LEGACY_COPY_HEADERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "{}|{}|{}|{}",
        receipt::MERCHANT_COPY_HEADER,
        receipt::CLIENT_COPY_HEADER,
        receipt::MERCHANT_COPY_HEADER_PLAIN,
        receipt::CLIENT_COPY_HEADER_PLAIN,
    ))
    .expect("copy header pattern is valid")
});

/// Text substitutions that put legacy receipt fields on their own line
const LEGACY_LINE_BREAKS: &[(&str, &str)] = &[
    ("             ", "\n"),
    ("      ", "\n"),
    ("TC:", "\nTC:"),
    ("Id.Estab:", "\nId.Estab:"),
    ("Per:", "\nPer:"),
    ("AUT:", "\nAUT:"),
    ("Mg", "\nMg"),
    ("COMPRA\n   ", "COMPRA         "),
];

/// A pure parser for one receipt layout
pub trait ReceiptStrategy: Send + Sync {
    /// Strategy name for logs
    fn name(&self) -> &'static str;

    /// Parse the receipt copies out of the response text
    ///
    /// `Ok(None)` means the layout does not apply and the next strategy
    /// should be tried.
    fn parse(
        &self,
        text: &str,
        width: ReceiptWidth,
    ) -> Result<Option<ReceiptData>, ReceiptParseError>;
}

/// Split `text` on the first reserved delimiter that yields more than one segment
///
/// # Examples
///
/// ```
/// use spremote_core::receipt::split_on_delimiters;
///
/// let (delimiter, segments) = split_on_delimiters("ABC\u{1}DEF\u{1}GHI").unwrap();
/// assert_eq!(delimiter, '\u{1}');
/// assert_eq!(segments, vec!["ABC", "DEF", "GHI"]);
/// ```
pub fn split_on_delimiters(text: &str) -> Option<(char, Vec<&str>)> {
    delimiters::FALLBACK_ORDER.iter().find_map(|&delimiter| {
        let segments: Vec<&str> = text.split(delimiter).collect();
        (segments.len() > 1).then_some((delimiter, segments))
    })
}

/// Receipt copies separated by reserved delimiter bytes
///
/// Segment 1 is the merchant copy, segment 2 the client copy. Each copy
/// starts with one control byte that is dropped. A split without a client
/// copy does not apply.
#[derive(Debug, Default, Clone, Copy)]
pub struct DelimiterSplit;

impl DelimiterSplit {
    fn strip_leading(segment: &str) -> &str {
        let mut chars = segment.chars();
        chars.next();
        chars.as_str()
    }

    fn trim_vendor_trailer(copy: &str) -> &str {
        match copy.find(receipt::VENDOR_TRAILER) {
            Some(index) => &copy[..index],
            None => copy,
        }
    }
}

impl ReceiptStrategy for DelimiterSplit {
    fn name(&self) -> &'static str {
        "delimiter-split"
    }

    fn parse(
        &self,
        text: &str,
        width: ReceiptWidth,
    ) -> Result<Option<ReceiptData>, ReceiptParseError> {
        let Some((delimiter, segments)) = split_on_delimiters(text) else {
            return Ok(None);
        };

        // Without a client copy the delimiter is a stray field separator
        let [_, merchant, client, ..] = segments.as_slice() else {
            return Ok(None);
        };

        let merchant = Self::strip_leading(merchant);
        let client = Self::trim_vendor_trailer(Self::strip_leading(client));

        if merchant.trim().is_empty() && client.trim().is_empty() {
            return Err(ReceiptParseError::EmptyCopies { delimiter });
        }

        Ok(Some(ReceiptData::new(
            reflow::format(merchant, width.columns()),
            reflow::format(client, width.columns()),
        )))
    }
}

/// Free-text receipts from older firmware
///
/// The body has no delimiters: fields are separated by runs of padding and
/// the two copies end with a "COPIA COMERCIANTE" / "COPIA CLIENTE" footer.
/// Line breaks are reinserted before known field labels; the width is not
/// applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyLayout;

impl LegacyLayout {
    fn insert_line_breaks(body: &str) -> String {
        let broken = LEGACY_LINE_BREAKS
            .iter()
            .fold(body.to_string(), |acc, (from, to)| acc.replace(from, to));

        LEGACY_DATE
            .replace_all(&broken, "\n$1")
            .replace('€', "")
    }
}

impl ReceiptStrategy for LegacyLayout {
    fn name(&self) -> &'static str {
        "legacy-layout"
    }

    fn parse(
        &self,
        text: &str,
        _width: ReceiptWidth,
    ) -> Result<Option<ReceiptData>, ReceiptParseError> {
        let body: String = text.chars().skip(offsets::LEGACY_RECEIPT_BODY).collect();
        if body.is_empty() {
            return Err(ReceiptParseError::BodyTooShort {
                expected: offsets::LEGACY_RECEIPT_BODY,
                actual: text.chars().count(),
            });
        }

        let formatted = Self::insert_line_breaks(&body);
        let halves: Vec<&str> = LEGACY_COPY_HEADERS.split(&formatted).collect();

        if halves.len() < 2 {
            return Err(ReceiptParseError::CopyHeadersNotFound);
        }

        let merchant = format!("{}{}", halves[0], receipt::MERCHANT_COPY_HEADER_PLAIN);
        let client_body: String = halves[1].chars().skip(receipt::LEGACY_CLIENT_SKIP).collect();
        let client = format!("{}{}", client_body, receipt::CLIENT_COPY_HEADER_PLAIN);

        Ok(Some(ReceiptData::new(merchant, client)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_primary_delimiter() {
        let (delimiter, segments) = split_on_delimiters("ABC\u{1}DEF\u{1}GHI").unwrap();
        assert_eq!(delimiter, delimiters::BREAK_20_COLUMNS);
        assert_eq!(segments, vec!["ABC", "DEF", "GHI"]);
    }

    #[test]
    fn test_split_falls_back_in_order() {
        let (delimiter, segments) = split_on_delimiters("ABC\u{2}DEF").unwrap();
        assert_eq!(delimiter, delimiters::BREAK_40_COLUMNS);
        assert_eq!(segments, vec!["ABC", "DEF"]);

        let (delimiter, _) = split_on_delimiters("ABC\u{1C}DEF\u{2}GHI").unwrap();
        assert_eq!(delimiter, delimiters::BREAK_40_COLUMNS);

        let (delimiter, segments) = split_on_delimiters("ABC\u{1C}DEF").unwrap();
        assert_eq!(delimiter, delimiters::FIELD_SEPARATOR);
        assert_eq!(segments, vec!["ABC", "DEF"]);
    }

    #[test]
    fn test_split_without_delimiters() {
        assert_eq!(split_on_delimiters("PLAIN TEXT"), None);
    }

    #[test]
    fn test_delimiter_split_copies() {
        let text = format!(
            "HEADER\u{1}#{}\u{1}#{}NEWNOTE\u{3}",
            "M".repeat(25),
            "C".repeat(20)
        );

        let receipt = DelimiterSplit
            .parse(&text, ReceiptWidth::Twenty)
            .unwrap()
            .unwrap();

        assert_eq!(receipt.merchant_copy, format!("{}\n{}\n", "M".repeat(20), "M".repeat(5)));
        assert_eq!(receipt.client_copy, format!("{}\n", "C".repeat(20)));
    }

    #[test]
    fn test_delimiter_split_forty_columns() {
        let receipt = DelimiterSplit
            .parse("HEADER\u{2}#MERCHANT\u{2}#CLIENT", ReceiptWidth::Forty)
            .unwrap()
            .unwrap();

        assert_eq!(receipt.merchant_copy, "MERCHANT\n");
        assert_eq!(receipt.client_copy, "CLIENT\n");
    }

    #[test]
    fn test_delimiter_split_without_client_copy() {
        assert_eq!(
            DelimiterSplit.parse("HEADER\u{2}#MERCHANT", ReceiptWidth::Forty).unwrap(),
            None
        );
        assert_eq!(
            DelimiterSplit.parse("C00010000\u{1C}99 LOJA", ReceiptWidth::Twenty).unwrap(),
            None
        );
    }

    #[test]
    fn test_delimiter_split_not_applicable() {
        assert_eq!(DelimiterSplit.parse("NO DELIMITERS", ReceiptWidth::Twenty).unwrap(), None);
    }

    #[test]
    fn test_delimiter_split_empty_copies() {
        let result = DelimiterSplit.parse("HEADER\u{1}#\u{1}#", ReceiptWidth::Twenty);
        assert!(matches!(result, Err(ReceiptParseError::EmptyCopies { .. })));
    }

    #[test]
    fn test_legacy_layout() {
        let prefix = "0".repeat(offsets::LEGACY_RECEIPT_BODY);
        let text = format!(
            "{}LOJA TESTE      COMPRA 3,60€ AUT:123456 CÓPIA COMERCIANTE\r\nXLOJA TESTE TC:99 COPIA CLIENTE",
            prefix
        );

        let receipt = LegacyLayout
            .parse(&text, ReceiptWidth::Twenty)
            .unwrap()
            .unwrap();

        assert_eq!(
            receipt.merchant_copy,
            "LOJA TESTE\nCOMPRA 3,60 \nAUT:123456 COPIA COMERCIANTE"
        );
        assert_eq!(receipt.client_copy, "LOJA TESTE \nTC:99 COPIA CLIENTE");
    }

    #[test]
    fn test_legacy_layout_breaks_before_dates() {
        let formatted = LegacyLayout::insert_line_breaks("DATA 24-03-15 HORA");
        assert_eq!(formatted, "DATA \n24-03-15 HORA");
    }

    #[test]
    fn test_legacy_layout_without_headers() {
        let text = format!("{}SOME TEXT", "0".repeat(offsets::LEGACY_RECEIPT_BODY));
        let result = LegacyLayout.parse(&text, ReceiptWidth::Twenty);
        assert!(matches!(result, Err(ReceiptParseError::CopyHeadersNotFound)));
    }

    #[test]
    fn test_legacy_layout_short_body() {
        let result = LegacyLayout.parse("SHORT", ReceiptWidth::Twenty);
        assert!(matches!(result, Err(ReceiptParseError::BodyTooShort { .. })));
    }
}
