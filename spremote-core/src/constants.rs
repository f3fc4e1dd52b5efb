//! Protocol constants

/// Command template prefixes and literals
pub mod templates {
    /// Terminal status request (no parameters)
    pub const TERMINAL_STATUS: &str = "M0011";

    /// Open accounting period
    pub const OPEN_PERIOD_PREFIX: &str = "S0001";

    /// Close accounting period
    pub const CLOSE_PERIOD_PREFIX: &str = "S0011";

    /// Purchase
    pub const PURCHASE_PREFIX: &str = "C0001";

    /// Refund
    pub const REFUND_PREFIX: &str = "C0021";

    /// Filler between the amount and the purchase flags
    pub const PURCHASE_FILLER: &str = "0";

    /// Trailer after the purchase flags
    pub const PURCHASE_TRAILER: &str = "00";

    /// Trailer after the refund amount
    pub const REFUND_TRAILER: &str = "00000000";

    /// Width of the zero-padded transaction id field
    pub const TRANSACTION_ID_WIDTH: usize = 4;

    /// Width of the zero-padded amount field
    pub const AMOUNT_WIDTH: usize = 8;

    /// Width of each single-digit flag (supervisor card, print, receipt width)
    pub const FLAG_WIDTH: usize = 1;

    /// EMV tag request appended raw after the purchase command
    pub const PURCHASE_TAGS: &str = "0B9F1C009A009F21009F4100";
}

/// Byte offsets into the decoded response (status echo already removed)
pub mod offsets {
    /// Start of the 3-digit status code
    pub const STATUS_CODE: usize = 6;

    /// Length of the status code
    pub const STATUS_CODE_LEN: usize = 3;

    /// Start of the terminal status marker
    pub const TERMINAL_STATUS_MARKER: usize = 9;

    /// Start of the terminal identification in a status response
    pub const TERMINAL_STATUS_ID: usize = 26;

    /// Start of the positive response text
    pub const POSITIVE_TEXT: usize = 9;

    /// Length of the positive response text
    pub const POSITIVE_TEXT_LEN: usize = 16;

    /// Start of the receipt body in legacy layouts (characters)
    pub const LEGACY_RECEIPT_BODY: usize = 32;
}

/// Response literals
pub mod markers {
    /// Status code of an accepted command
    pub const SUCCESS_CODE: &str = "000";

    /// Terminal status marker of an initialised terminal
    pub const TERMINAL_STATUS_OK: &str = "INIT OK";

    /// Number of characters discarded from every response
    pub const STATUS_ECHO_LEN: usize = 2;
}

/// Reserved single-byte receipt delimiters, in fallback order
pub mod delimiters {
    /// Line break for 20-column receipts
    pub const BREAK_20_COLUMNS: char = '\u{01}';

    /// Line break for 40-column receipts
    pub const BREAK_40_COLUMNS: char = '\u{02}';

    /// Field separator
    pub const FIELD_SEPARATOR: char = '\u{1C}';

    /// Order in which delimiters are tried
    pub const FALLBACK_ORDER: [char; 3] = [BREAK_20_COLUMNS, BREAK_40_COLUMNS, FIELD_SEPARATOR];
}

/// Receipt text literals
pub mod receipt {
    /// Vendor keyword after which a client copy only carries control text
    pub const VENDOR_TRAILER: &str = "NEWNOTE";

    pub const MERCHANT_COPY_HEADER: &str = "CÓPIA COMERCIANTE";
    pub const CLIENT_COPY_HEADER: &str = "CÓPIA CLIENTE";
    pub const MERCHANT_COPY_HEADER_PLAIN: &str = "COPIA COMERCIANTE";
    pub const CLIENT_COPY_HEADER_PLAIN: &str = "COPIA CLIENTE";

    /// Characters dropped from the start of the legacy client half
    pub const LEGACY_CLIENT_SKIP: usize = 3;

    /// Timestamp layout printed on text receipts
    pub const TEXT_TIMESTAMP_FORMAT: &str = "%y-%m-%d %H:%M:%S";

    /// Timestamp layout embedded in device-printed responses
    pub const PRINTED_TIMESTAMP_FORMAT: &str = "%Y%m%d %H%M%S";
}
