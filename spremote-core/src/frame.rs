//! SP Remote frame encoding and response decoding

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use tracing::trace;

use crate::{
    LENGTH_PREFIX_SIZE, MAX_COMMAND_SIZE,
    command::CommandRequest,
    constants::markers,
    error::{Error, Result},
};

/// Request frame written to the terminal socket
///
/// # Frame Structure
///
/// ```text
/// ┌─────────────┬─────────────────────┬─────────────────────┐
/// │   Length    │       Command       │      Tag block      │
/// │   2 bytes   │       N bytes       │   M bytes (opt.)    │
/// │  (BE u16)   │       (ASCII)       │       (raw)         │
/// └─────────────┴─────────────────────┴─────────────────────┘
/// ```
///
/// The length prefix covers the command only; the tag block follows it
/// directly with no prefix of its own.
///
/// # Examples
///
/// ```
/// use spremote_core::Frame;
///
/// let frame = Frame::new("S00010001100").unwrap();
/// let bytes = frame.encode();
/// assert_eq!(&bytes[..2], &[0x00, 0x0C]);
/// assert_eq!(bytes.len(), 2 + 12);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// ASCII command text
    pub command: String,

    /// Raw bytes appended after the command
    pub tag_block: Bytes,
}

impl Frame {
    /// Create a frame with no tag block
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the command does not fit the
    /// 16-bit length prefix, or [`Error::InvalidCommand`] if it is not ASCII.
    pub fn new(command: impl Into<String>) -> Result<Self> {
        let command = command.into();

        if command.len() > MAX_COMMAND_SIZE {
            return Err(Error::PayloadTooLarge {
                size: command.len(),
                max: MAX_COMMAND_SIZE,
            });
        }

        if !command.is_ascii() {
            return Err(Error::InvalidCommand(format!(
                "command must be ASCII: {:?}",
                command
            )));
        }

        Ok(Self {
            command,
            tag_block: Bytes::new(),
        })
    }

    /// Append a hex-encoded tag block
    ///
    /// An empty string leaves the frame without a tag block.
    pub fn with_tag_hex(mut self, tag_hex: &str) -> Result<Self> {
        self.tag_block = Bytes::from(hex::decode(tag_hex)?);
        Ok(self)
    }

    /// Build the frame for a request
    pub fn from_request(request: &CommandRequest) -> Result<Self> {
        let frame = Self::new(request.render()?)?;

        match request.tag_block() {
            Some(tags) => frame.with_tag_hex(tags),
            None => Ok(frame),
        }
    }

    /// Length prefix value (command byte length)
    pub fn length_prefix(&self) -> u16 {
        // Bounded by MAX_COMMAND_SIZE in `new`
        self.command.len() as u16
    }

    /// Encode frame to bytes
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_u16(self.length_prefix());
        buf.put_slice(self.command.as_bytes());
        buf.put_slice(&self.tag_block);

        trace!(
            command_len = self.command.len(),
            tag_len = self.tag_block.len(),
            "Encoded frame"
        );

        buf
    }

    /// Get total frame size
    pub fn size(&self) -> usize {
        LENGTH_PREFIX_SIZE + self.command.len() + self.tag_block.len()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("length", &format!("0x{:04X}", self.length_prefix()))
            .field("command", &self.command)
            .field("tag_block", &hex::encode_upper(&self.tag_block))
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame[{}](tags={})", self.command, self.tag_block.len())
    }
}

/// Response text with the status echo removed
///
/// The terminal answers with free-form text whose fields sit at fixed byte
/// offsets. Every accessor is bounds-checked and reports
/// [`Error::ResponseTooShort`] instead of slicing past the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    text: String,
}

impl RawResponse {
    /// Decode the bytes read until the terminal closed the stream
    ///
    /// Invalid UTF-8 sequences are replaced, then the first two characters
    /// (the status echo) are discarded.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let decoded = String::from_utf8_lossy(bytes);

        let start = decoded
            .char_indices()
            .nth(markers::STATUS_ECHO_LEN)
            .map(|(index, _)| index)
            .or_else(|| (decoded.chars().count() == markers::STATUS_ECHO_LEN).then_some(decoded.len()))
            .ok_or(Error::ResponseTooShort {
                field: "status echo",
                expected: markers::STATUS_ECHO_LEN,
                actual: bytes.len(),
            })?;

        Ok(Self {
            text: decoded[start..].to_string(),
        })
    }

    /// Wrap text that already has its status echo removed
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Fixed-width field at a byte offset
    pub fn field(&self, name: &'static str, offset: usize, len: usize) -> Result<&str> {
        self.text.get(offset..offset + len).ok_or(Error::ResponseTooShort {
            field: name,
            expected: offset + len,
            actual: self.text.len(),
        })
    }

    /// Text from a byte offset to the end
    pub fn tail(&self, name: &'static str, offset: usize) -> Result<&str> {
        self.text.get(offset..).ok_or(Error::ResponseTooShort {
            field: name,
            expected: offset,
            actual: self.text.len(),
        })
    }
}

impl fmt::Display for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
