use std::time::Duration;

use bytes::Bytes;

use crate::{commands::command_error::CommandError, key_value_store::parse_i64};

/// Parses a base-10 signed integer argument.
pub fn parse_integer(argument: &[u8]) -> Result<i64, CommandError> {
    parse_i64(argument).ok_or(CommandError::InvalidInteger)
}

/// Parses a blocking timeout given in (possibly fractional) seconds.
///
/// `0` means block forever and is returned as `None`.
pub fn parse_timeout(argument: &[u8]) -> Result<Option<Duration>, CommandError> {
    let seconds = std::str::from_utf8(argument)
        .ok()
        .and_then(|text| text.parse::<f64>().ok())
        .filter(|seconds| seconds.is_finite())
        .ok_or(CommandError::InvalidTimeout)?;

    if seconds < 0.0 {
        return Err(CommandError::NegativeTimeout);
    }

    if seconds == 0.0 {
        return Ok(None);
    }

    Duration::try_from_secs_f64(seconds)
        .map(Some)
        .map_err(|_| CommandError::InvalidTimeout)
}

/// Case-insensitive comparison of an argument against an ASCII keyword.
pub fn is_keyword(argument: &Bytes, keyword: &str) -> bool {
    argument.eq_ignore_ascii_case(keyword.as_bytes())
}
