//! Module: codec
//! Responsibility: opaque cursor token byte layout and base64 wrapping.
//! Does not own: cursor shapes, bound defaults, or paging semantics.
//! Boundary: shapes append/read typed fields in a fixed order; no type tags
//! are written, so the shape alone defines how a payload is read back.

mod field;
mod varint;

#[cfg(test)]
mod tests;

pub use field::CursorField;

use crate::types::{Id, Timestamp};
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error as ThisError;

/// Upper bound on accepted and issued token length, in base64 characters.
pub const MAX_CURSOR_TOKEN_LEN: usize = 64 * 1024;

// Encoded timestamp width: unix seconds, subsecond nanos, utc offset seconds.
const TIME_LEN: usize = 16;

///
/// CursorDecodeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CursorDecodeError {
    #[error("cursor token is empty")]
    Empty,

    #[error("cursor token exceeds max length: {len} chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("cursor token is not valid base64: {reason}")]
    InvalidBase64 { reason: String },

    #[error("cursor payload truncated: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },

    #[error("cursor length prefix {declared} exceeds remaining {remaining} bytes")]
    LengthOverrun { declared: u64, remaining: usize },

    #[error("cursor varint overflows 64 bits")]
    VarintOverflow,

    #[error("cursor bool must be 0 or 1, found {value}")]
    InvalidBool { value: u64 },

    #[error("cursor timestamp is invalid: {reason}")]
    InvalidTime { reason: String },

    #[error("cursor string is not valid utf-8")]
    InvalidUtf8,

    #[error("cursor payload has {count} trailing bytes")]
    TrailingBytes { count: usize },
}

///
/// CursorEncodeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CursorEncodeError {
    #[error("encoded cursor exceeds max length: {len} chars (max {max})")]
    TooLong { len: usize, max: usize },
}

///
/// CursorEncoder
///
/// Append-only buffer for one cursor payload.
///

#[derive(Debug, Default)]
pub struct CursorEncoder {
    buffer: Vec<u8>,
}

impl CursorEncoder {
    #[must_use]
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Bools are a one-byte unsigned varint (0 or 1).
    pub fn append_bool(&mut self, value: bool) {
        self.append_u64(u64::from(value));
    }

    pub fn append_u64(&mut self, value: u64) {
        varint::put_uvarint(&mut self.buffer, value);
    }

    pub fn append_i64(&mut self, value: i64) {
        varint::put_uvarint(&mut self.buffer, varint::zigzag(value));
    }

    pub fn append_str(&mut self, value: &str) {
        self.append_bytes(value.as_bytes());
    }

    pub fn append_id(&mut self, id: &Id) {
        self.append_str(id.as_str());
    }

    pub fn append_time(&mut self, time: &Timestamp) {
        let mut raw = [0u8; TIME_LEN];
        raw[..8].copy_from_slice(&time.timestamp().to_be_bytes());
        raw[8..12].copy_from_slice(&time.timestamp_subsec_nanos().to_be_bytes());
        raw[12..].copy_from_slice(&time.offset().local_minus_utc().to_be_bytes());

        self.append_bytes(&raw);
    }

    /// Lists are an element count followed by each element in order.
    pub fn append_list<T: CursorField>(&mut self, items: &[T]) {
        self.append_u64(items.len() as u64);
        for item in items {
            item.encode(self);
        }
    }

    // Length-prefixed raw bytes.
    fn append_bytes(&mut self, bytes: &[u8]) {
        self.append_u64(bytes.len() as u64);
        self.buffer.extend_from_slice(bytes);
    }

    /// Consume the encoder and return the unpadded base64 token.
    pub fn finish(self) -> Result<String, CursorEncodeError> {
        let token = STANDARD_NO_PAD.encode(&self.buffer);
        if token.len() > MAX_CURSOR_TOKEN_LEN {
            return Err(CursorEncodeError::TooLong {
                len: token.len(),
                max: MAX_CURSOR_TOKEN_LEN,
            });
        }

        Ok(token)
    }
}

///
/// CursorDecoder
///
/// Cursor payload reader. Every read checks the remaining byte count first,
/// so malformed input surfaces as an error instead of a short read.
///

#[derive(Debug)]
pub struct CursorDecoder {
    bytes: Vec<u8>,
    pos: usize,
}

impl CursorDecoder {
    /// Decode an opaque token into a payload reader.
    pub fn from_token(token: &str) -> Result<Self, CursorDecodeError> {
        if token.is_empty() {
            return Err(CursorDecodeError::Empty);
        }

        if token.len() > MAX_CURSOR_TOKEN_LEN {
            return Err(CursorDecodeError::TooLong {
                len: token.len(),
                max: MAX_CURSOR_TOKEN_LEN,
            });
        }

        let bytes = STANDARD_NO_PAD.decode(token).map_err(|err| {
            let reason = err.to_string();
            CursorDecodeError::InvalidBase64 { reason }
        })?;

        Ok(Self { bytes, pos: 0 })
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn read_u64(&mut self) -> Result<u64, CursorDecodeError> {
        let (value, used) = varint::read_uvarint(&self.bytes[self.pos..])?;
        self.pos += used;

        Ok(value)
    }

    pub fn read_i64(&mut self) -> Result<i64, CursorDecodeError> {
        self.read_u64().map(varint::unzigzag)
    }

    pub fn read_bool(&mut self) -> Result<bool, CursorDecodeError> {
        match self.read_u64()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(CursorDecodeError::InvalidBool { value }),
        }
    }

    pub fn read_string(&mut self) -> Result<String, CursorDecodeError> {
        let bytes = self.read_bytes()?;

        String::from_utf8(bytes.to_vec()).map_err(|_| CursorDecodeError::InvalidUtf8)
    }

    pub fn read_id(&mut self) -> Result<Id, CursorDecodeError> {
        self.read_string().map(Id::from)
    }

    pub fn read_time(&mut self) -> Result<Timestamp, CursorDecodeError> {
        let bytes = self.read_bytes()?;
        if bytes.len() != TIME_LEN {
            return Err(CursorDecodeError::InvalidTime {
                reason: format!("expected {TIME_LEN} bytes, found {}", bytes.len()),
            });
        }

        let secs = i64::from_be_bytes(fixed(&bytes[..8]));
        let nanos = u32::from_be_bytes(fixed(&bytes[8..12]));
        let offset_secs = i32::from_be_bytes(fixed(&bytes[12..]));

        let Some(utc) = DateTime::<Utc>::from_timestamp(secs, nanos) else {
            let reason = format!("instant out of range: {secs}s {nanos}ns");
            return Err(CursorDecodeError::InvalidTime { reason });
        };
        let Some(offset) = FixedOffset::east_opt(offset_secs) else {
            let reason = format!("utc offset out of range: {offset_secs}s");
            return Err(CursorDecodeError::InvalidTime { reason });
        };

        Ok(utc.with_timezone(&offset))
    }

    /// Read a count-prefixed list of elements.
    pub fn read_list<T: CursorField>(&mut self) -> Result<Vec<T>, CursorDecodeError> {
        // Every element occupies at least one byte, so the count is bounded
        // by what is left before anything is allocated.
        let count = self.read_len()?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(T::decode(self)?);
        }

        Ok(items)
    }

    /// Finish decoding; a payload with unread bytes belongs to another shape.
    pub fn finish(self) -> Result<(), CursorDecodeError> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(CursorDecodeError::TrailingBytes { count }),
        }
    }

    // Read a length prefix that must fit in the remaining payload.
    fn read_len(&mut self) -> Result<usize, CursorDecodeError> {
        let declared = self.read_u64()?;
        let remaining = self.remaining();

        match usize::try_from(declared) {
            Ok(len) if len <= remaining => Ok(len),
            _ => Err(CursorDecodeError::LengthOverrun {
                declared,
                remaining,
            }),
        }
    }

    fn read_bytes(&mut self) -> Result<&[u8], CursorDecodeError> {
        let len = self.read_len()?;
        let start = self.pos;
        self.pos += len;

        Ok(&self.bytes[start..self.pos])
    }
}

// Copy an exactly-sized slice into a fixed array.
fn fixed<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}
