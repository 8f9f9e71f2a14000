use bytes::Bytes;

use crate::{commands::command_error::CommandError, resp::RespValue};

pub struct PingArguments {
    message: Option<Bytes>,
}

impl PingArguments {
    pub fn parse(arguments: Vec<Bytes>) -> Result<Self, CommandError> {
        Ok(Self {
            message: arguments.into_iter().next(),
        })
    }
}

/// Handles the Redis PING command.
///
/// Replies `+PONG`, or echoes the optional message back as a bulk string.
pub fn ping(arguments: Vec<Bytes>) -> Result<RespValue, CommandError> {
    let ping_arguments = PingArguments::parse(arguments)?;

    match ping_arguments.message {
        Some(message) => Ok(RespValue::BulkString(message)),
        None => Ok(RespValue::simple_string("PONG")),
    }
}
