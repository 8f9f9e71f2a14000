//! Reading client requests off a connection.
//!
//! Bytes are accumulated in a per-connection [`BytesMut`] so that a request split
//! across several reads, or several requests delivered in one read, are both
//! handled: each call hands back exactly one complete request.

use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::resp::{RespError, RespValue};

/// Errors that can occur while reading requests from a connection.
#[derive(Error, Debug, PartialEq)]
pub enum CommandReadError {
    #[error("I/O error: {0}")]
    IoError(String),
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Protocol error: {0}")]
    ProtocolError(#[from] RespError),
}

impl CommandReadError {
    pub fn as_resp(&self) -> RespValue {
        match self {
            CommandReadError::IoError(msg) => RespValue::Error(format!("ERR {}", msg)),
            CommandReadError::ConnectionClosed => {
                RespValue::Error("ERR connection closed".to_string())
            }
            CommandReadError::ProtocolError(err) => err.as_resp(),
        }
    }
}

/// Takes one complete request off the front of `buffer`.
///
/// Requests must be RESP arrays. Returns `Ok(None)` when the buffer is empty or
/// holds only the beginning of a request.
pub fn parse_request(buffer: &mut BytesMut) -> Result<Option<RespValue>, RespError> {
    match buffer.first() {
        None => Ok(None),
        Some(b'*') => RespValue::decode(buffer),
        Some(&other) => Err(RespError::ExpectedArray(char::from(other))),
    }
}

/// Reads from `stream` until `buffer` holds a complete request and returns it.
///
/// Bytes that belong to later requests stay in `buffer`.
///
/// # Returns
///
/// * `Ok(RespValue)` - The next request, always a [`RespValue::Array`]
/// * `Err(CommandReadError::ConnectionClosed)` - The peer closed the stream
/// * `Err(CommandReadError::IoError)` - Reading from the stream failed
/// * `Err(CommandReadError::ProtocolError)` - The bytes are not valid RESP framing
pub async fn read_request<R>(
    stream: &mut R,
    buffer: &mut BytesMut,
) -> Result<RespValue, CommandReadError>
where
    R: AsyncRead + Unpin,
{
    loop {
        if let Some(request) = parse_request(buffer)? {
            return Ok(request);
        }

        let number_of_bytes = stream
            .read_buf(buffer)
            .await
            .map_err(|e| CommandReadError::IoError(e.to_string()))?;

        if number_of_bytes == 0 {
            return Err(CommandReadError::ConnectionClosed);
        }
    }
}
