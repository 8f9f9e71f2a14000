use bytes::Bytes;

use crate::{commands::command_error::CommandError, resp::RespValue};

pub struct EchoArguments {
    message: Bytes,
}

impl EchoArguments {
    pub fn parse(arguments: Vec<Bytes>) -> Result<Self, CommandError> {
        let Some(message) = arguments.into_iter().next() else {
            return Err(CommandError::WrongNumberOfArguments("echo"));
        };

        Ok(Self { message })
    }
}

/// Handles the Redis ECHO command.
///
/// The ECHO command returns the exact bytes provided as an argument. This is
/// commonly used for testing connectivity and ensuring the server is
/// responding correctly.
///
/// # Arguments
///
/// * `arguments` - The command arguments; the first one is echoed back
///
/// # Returns
///
/// * `Ok(RespValue::BulkString)` - The echoed argument
/// * `Err(CommandError::WrongNumberOfArguments)` - If no argument was given
///
/// # Examples
///
/// ```ignore
/// // ECHO "hello world"
/// let result = echo(vec![Bytes::from("hello world")]);
/// // Encodes as: "$11\r\nhello world\r\n"
/// ```
pub fn echo(arguments: Vec<Bytes>) -> Result<RespValue, CommandError> {
    let echo_arguments = EchoArguments::parse(arguments)?;

    Ok(RespValue::BulkString(echo_arguments.message))
}
