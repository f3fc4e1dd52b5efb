//! Response classification
//!
//! The terminal reports the outcome of a command as a 3-digit status code at
//! a fixed offset of the response text. Terminal status requests are the
//! exception: they carry a text marker instead.

use tracing::debug;

use crate::{
    command::Operation,
    constants::{markers, offsets},
    error::{Error, Result},
    frame::RawResponse,
};

/// Negative response codes and their descriptions
pub const NEGATIVE_RESPONSES: &[(u16, &str)] = &[
    (1, "invalid length"),
    (2, "invalid command"),
    (3, "invalid version"),
    (4, "out of context"),
    (5, "operation cancelled"),
    (6, "out of service"),
    (7, "register the terminal"),
    (8, "invalid model"),
    (12, "generic error"),
];

/// Positive response labels and their sub-status text
pub const POSITIVE_RESPONSES: &[(&str, &str)] = &[
    ("EM SERVIÇO", "In service"),
    ("EM SERVICO", "In service"),
    ("PAGAM. EFECTUADO", "Payment successful"),
    ("DEVOL EFECTUADA", "Refund successful"),
    ("DEVOL. EFECTUADA", "Refund successful"),
    ("VERIF ASSINATURA", "Payment successful - verify signature"),
    ("IDENTIF. CLIENTE", "Payment successful - identify client"),
    ("IDENTIF+ASSINAT.", "Payment successful - verify signature and identify client"),
];

/// Description for a negative response code
pub fn negative_response(code: u16) -> Option<&'static str> {
    NEGATIVE_RESPONSES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, description)| *description)
}

/// Sub-status text for a positive response label
pub fn positive_response(label: &str) -> Option<&'static str> {
    POSITIVE_RESPONSES
        .iter()
        .find(|(known, _)| label.starts_with(known))
        .map(|(_, text)| *text)
}

/// Outcome of a single response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub operation: Operation,

    /// Terminal accepted the command
    pub success: bool,

    /// Negative response code (failures only)
    pub code: Option<u16>,

    /// Negative response description (failures only)
    pub description: Option<&'static str>,

    /// Sub-status text (successes only, when recognised)
    pub positive_text: Option<&'static str>,

    /// Terminal identification (successful status requests only)
    pub terminal_id: Option<String>,
}

/// Classify a response to `operation`
///
/// Pure function of its input: the same response always yields the same
/// classification.
///
/// # Errors
///
/// - [`Error::ResponseTooShort`] if the response ends before the status field
/// - [`Error::UnknownResponseCode`] if the command failed with a code missing
///   from [`NEGATIVE_RESPONSES`]
pub fn classify(operation: Operation, response: &RawResponse) -> Result<Classification> {
    let success = match operation {
        Operation::TerminalStatus => response
            .tail("terminal status marker", offsets::TERMINAL_STATUS_MARKER)?
            .starts_with(markers::TERMINAL_STATUS_OK),
        _ => status_code(response)? == markers::SUCCESS_CODE,
    };

    if success {
        let classification = Classification {
            operation,
            success,
            code: None,
            description: None,
            positive_text: positive_text(response),
            terminal_id: terminal_id(operation, response),
        };

        debug!(
            operation = %operation,
            positive_text = ?classification.positive_text,
            "Command accepted"
        );

        return Ok(classification);
    }

    let code = status_code(response)?;

    // Status replies can carry the success code without the ready marker
    if code == markers::SUCCESS_CODE {
        debug!(operation = %operation, "Terminal not ready");

        return Ok(Classification {
            operation,
            success,
            code: None,
            description: None,
            positive_text: None,
            terminal_id: None,
        });
    }

    let (code, description) = code
        .parse::<u16>()
        .ok()
        .filter(|_| code.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|code| negative_response(code).map(|description| (code, description)))
        .ok_or_else(|| Error::UnknownResponseCode(response.as_str().to_string()))?;

    debug!(operation = %operation, code, description, "Command rejected");

    Ok(Classification {
        operation,
        success,
        code: Some(code),
        description: Some(description),
        positive_text: None,
        terminal_id: None,
    })
}

fn status_code(response: &RawResponse) -> Result<&str> {
    response.field("status code", offsets::STATUS_CODE, offsets::STATUS_CODE_LEN)
}

fn positive_text(response: &RawResponse) -> Option<&'static str> {
    // Labels may contain multi-byte characters, so the window is counted in chars
    let window: String = response
        .as_str()
        .get(offsets::POSITIVE_TEXT..)?
        .chars()
        .take(offsets::POSITIVE_TEXT_LEN)
        .collect();

    positive_response(&window)
}

fn terminal_id(operation: Operation, response: &RawResponse) -> Option<String> {
    if operation != Operation::TerminalStatus {
        return None;
    }

    response
        .tail("terminal id", offsets::TERMINAL_STATUS_ID)
        .ok()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn response(text: &str) -> RawResponse {
        RawResponse::from_text(text)
    }

    #[test]
    fn test_success_code() {
        let classification = classify(Operation::Purchase, &response("C00010000PAGAM. EFECTUADO")).unwrap();
        assert!(classification.success);
        assert_eq!(classification.code, None);
        assert_eq!(classification.positive_text, Some("Payment successful"));
    }

    #[test]
    fn test_success_for_each_standard_operation() {
        for operation in [
            Operation::OpenPeriod,
            Operation::ClosePeriod,
            Operation::Purchase,
            Operation::Refund,
        ] {
            let classification = classify(operation, &response("S00010000")).unwrap();
            assert!(classification.success, "{} should succeed", operation);
            assert_eq!(classification.positive_text, None);
        }
    }

    #[test]
    fn test_negative_codes_map_to_descriptions() {
        for (code, description) in NEGATIVE_RESPONSES {
            let text = format!("C00010{:03}", code);
            let classification = classify(Operation::Purchase, &response(&text)).unwrap();

            assert!(!classification.success);
            assert_eq!(classification.code, Some(*code));
            assert_eq!(classification.description, Some(*description));
        }
    }

    #[test]
    fn test_unknown_code() {
        let text = "C00010099 SOMETHING";
        let result = classify(Operation::Refund, &response(text));

        match result {
            Err(Error::UnknownResponseCode(raw)) => assert_eq!(raw, text),
            other => panic!("Expected UnknownResponseCode, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_code() {
        let result = classify(Operation::OpenPeriod, &response("S00010ABC"));
        assert!(matches!(result, Err(Error::UnknownResponseCode(_))));

        let result = classify(Operation::OpenPeriod, &response("S00010+12"));
        assert!(matches!(result, Err(Error::UnknownResponseCode(_))));
    }

    #[test]
    fn test_short_response() {
        let result = classify(Operation::Purchase, &response("C0001"));
        assert!(matches!(result, Err(Error::ResponseTooShort { .. })));

        let result = classify(Operation::TerminalStatus, &response("M0011"));
        assert!(matches!(result, Err(Error::ResponseTooShort { .. })));
    }

    #[test]
    fn test_terminal_status_ok() {
        let text = "M00110000INIT OK          12345678";
        let classification = classify(Operation::TerminalStatus, &response(text)).unwrap();

        assert!(classification.success);
        assert_eq!(classification.terminal_id.as_deref(), Some("12345678"));
    }

    #[test]
    fn test_terminal_status_without_id() {
        let classification = classify(Operation::TerminalStatus, &response("M00110000INIT OK")).unwrap();
        assert!(classification.success);
        assert_eq!(classification.terminal_id, None);
    }

    #[test]
    fn test_terminal_status_rejected() {
        let classification = classify(Operation::TerminalStatus, &response("M00110006FORA DE SERVICO")).unwrap();
        assert!(!classification.success);
        assert_eq!(classification.description, Some("out of service"));
    }

    #[test]
    fn test_terminal_status_not_ready() {
        let classification = classify(Operation::TerminalStatus, &response("M00110000EM SERVIÇO      ")).unwrap();
        assert!(!classification.success);
        assert_eq!(classification.code, None);
        assert_eq!(classification.description, None);
        assert_eq!(classification.terminal_id, None);
    }

    #[test]
    fn test_positive_text_with_accents() {
        let classification = classify(Operation::OpenPeriod, &response("S00010000EM SERVIÇO      ")).unwrap();
        assert_eq!(classification.positive_text, Some("In service"));
    }

    #[test]
    fn test_classifier_is_pure() {
        let input = response("C00010000VERIF ASSINATURA");
        let first = classify(Operation::Purchase, &input).unwrap();
        let second = classify(Operation::Purchase, &input).unwrap();

        assert_eq!(first, second);
        assert_eq!(input.as_str(), "C00010000VERIF ASSINATURA");
    }
}
