//! Redis Serialization Protocol (RESP) values.
//!
//! [`RespValue`] is both the decoded form of a client request and the typed
//! reply handed back to the connection. Decoding is incremental: a buffer that
//! holds only part of a frame yields `Ok(None)` and is left untouched, so the
//! caller can read more bytes and try again.

use bytes::{Buf, Bytes, BytesMut};
use thiserror::Error;

const CRLF: &[u8] = b"\r\n";

/// Longest bulk string a client may send.
const MAX_BULK_LENGTH: i64 = 512 * 1024 * 1024;
/// Largest number of elements accepted in a single array header.
const MAX_ARRAY_LENGTH: i64 = 1024 * 1024;
/// Longest header line (`*<n>`, `$<n>`, `+...`) before the frame is rejected.
const MAX_LINE_LENGTH: usize = 64 * 1024;
/// Arrays nested deeper than this are rejected.
const MAX_NESTING_DEPTH: usize = 32;

/// Framing errors. Any of these leaves the byte stream out of sync, so the
/// connection that produced it is closed.
#[derive(Error, Debug, PartialEq)]
pub enum RespError {
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
    #[error("unknown RESP type '{0}'")]
    UnknownRespType(char),
    #[error("expected '*', got '{0}'")]
    ExpectedArray(char),
    #[error("failed to parse integer")]
    FailedToParseInteger,
    #[error("invalid bulk length")]
    InvalidBulkLength,
    #[error("invalid multibulk length")]
    InvalidArrayLength,
    #[error("bulk string not terminated by CRLF")]
    UnterminatedBulkString,
    #[error("line too long")]
    LineTooLong,
    #[error("arrays nested too deeply")]
    NestingTooDeep,
}

impl RespError {
    pub fn as_resp(&self) -> RespValue {
        RespValue::Error(format!("ERR Protocol error: {}", self))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    SimpleString(String),
    Error(String),
    Integer(i64),
    BulkString(Bytes),
    /// The null bulk string, `$-1`.
    Null,
    Array(Vec<RespValue>),
    /// The null array, `*-1`.
    NullArray,
}

impl RespValue {
    pub fn simple_string(value: &str) -> Self {
        RespValue::SimpleString(value.to_string())
    }

    pub fn bulk_string(value: impl Into<Bytes>) -> Self {
        RespValue::BulkString(value.into())
    }

    /// Builds an array of bulk strings, the shape most multi-value replies take.
    pub fn bulk_string_array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
    {
        RespValue::Array(items.into_iter().map(RespValue::BulkString).collect())
    }

    pub fn encode(&self) -> Bytes {
        let mut out = BytesMut::new();
        self.encode_to(&mut out);
        out.freeze()
    }

    pub fn encode_to(&self, out: &mut BytesMut) {
        match self {
            RespValue::SimpleString(value) => {
                out.extend_from_slice(b"+");
                out.extend_from_slice(value.as_bytes());
                out.extend_from_slice(CRLF);
            }
            RespValue::Error(message) => {
                out.extend_from_slice(b"-");
                out.extend_from_slice(message.as_bytes());
                out.extend_from_slice(CRLF);
            }
            RespValue::Integer(value) => {
                out.extend_from_slice(format!(":{}\r\n", value).as_bytes());
            }
            RespValue::BulkString(data) => {
                out.extend_from_slice(format!("${}\r\n", data.len()).as_bytes());
                out.extend_from_slice(data);
                out.extend_from_slice(CRLF);
            }
            RespValue::Null => out.extend_from_slice(b"$-1\r\n"),
            RespValue::Array(elements) => {
                out.extend_from_slice(format!("*{}\r\n", elements.len()).as_bytes());

                for element in elements {
                    element.encode_to(out);
                }
            }
            RespValue::NullArray => out.extend_from_slice(b"*-1\r\n"),
        }
    }

    /// Decodes exactly one value from the front of `buffer`.
    ///
    /// On success the consumed bytes are removed from the buffer and anything
    /// after the frame stays in place for the next call. When the buffer holds
    /// only a prefix of a frame, returns `Ok(None)` without consuming anything.
    pub fn decode(buffer: &mut BytesMut) -> Result<Option<RespValue>, RespError> {
        match parse_value(buffer, 0, 0)? {
            Some((value, consumed)) => {
                buffer.advance(consumed);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

/// Finds the line starting at `start`. Returns its content without the CRLF
/// and the offset right after the terminator.
fn read_line(buffer: &[u8], start: usize) -> Result<Option<(&[u8], usize)>, RespError> {
    let rest = &buffer[start.min(buffer.len())..];

    match rest.windows(2).position(|window| window == CRLF) {
        Some(position) => Ok(Some((&rest[..position], start + position + 2))),
        None if rest.len() > MAX_LINE_LENGTH => Err(RespError::LineTooLong),
        None => Ok(None),
    }
}

fn parse_utf8(line: &[u8]) -> Result<String, RespError> {
    std::str::from_utf8(line)
        .map(|s| s.to_string())
        .map_err(|_| RespError::InvalidUtf8)
}

fn parse_integer(line: &[u8]) -> Result<i64, RespError> {
    std::str::from_utf8(line)
        .map_err(|_| RespError::InvalidUtf8)?
        .parse::<i64>()
        .map_err(|_| RespError::FailedToParseInteger)
}

fn parse_value(
    buffer: &[u8],
    start: usize,
    depth: usize,
) -> Result<Option<(RespValue, usize)>, RespError> {
    let Some(&prefix) = buffer.get(start) else {
        return Ok(None);
    };

    if !matches!(prefix, b'+' | b'-' | b':' | b'$' | b'*') {
        return Err(RespError::UnknownRespType(char::from(prefix)));
    }

    let Some((line, next)) = read_line(buffer, start + 1)? else {
        return Ok(None);
    };

    match prefix {
        b'+' => Ok(Some((RespValue::SimpleString(parse_utf8(line)?), next))),
        b'-' => Ok(Some((RespValue::Error(parse_utf8(line)?), next))),
        b':' => Ok(Some((RespValue::Integer(parse_integer(line)?), next))),
        b'$' => {
            let length = parse_integer(line).map_err(|_| RespError::InvalidBulkLength)?;

            if length == -1 {
                return Ok(Some((RespValue::Null, next)));
            }

            if !(0..=MAX_BULK_LENGTH).contains(&length) {
                return Err(RespError::InvalidBulkLength);
            }

            let end = next + length as usize;

            if buffer.len() < end + CRLF.len() {
                return Ok(None);
            }

            if &buffer[end..end + CRLF.len()] != CRLF {
                return Err(RespError::UnterminatedBulkString);
            }

            let data = Bytes::copy_from_slice(&buffer[next..end]);
            Ok(Some((RespValue::BulkString(data), end + CRLF.len())))
        }
        _ => {
            let length = parse_integer(line).map_err(|_| RespError::InvalidArrayLength)?;

            if length == -1 {
                return Ok(Some((RespValue::NullArray, next)));
            }

            if !(0..=MAX_ARRAY_LENGTH).contains(&length) {
                return Err(RespError::InvalidArrayLength);
            }

            if depth >= MAX_NESTING_DEPTH {
                return Err(RespError::NestingTooDeep);
            }

            let length = length as usize;
            let mut elements = Vec::with_capacity(length.min(64));
            let mut cursor = next;

            while elements.len() < length {
                let Some((element, after)) = parse_value(buffer, cursor, depth + 1)? else {
                    return Ok(None);
                };

                elements.push(element);
                cursor = after;
            }

            Ok(Some((RespValue::Array(elements), cursor)))
        }
    }
}
