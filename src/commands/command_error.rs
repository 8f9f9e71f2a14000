use thiserror::Error;

use crate::{key_value_store::StoreError, resp::RespValue};

/// Broad class of a command failure. Decides the prefix of the error reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownCommand,
    Arity,
    Validation,
    WrongType,
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    EmptyCommand,
    #[error("invalid command argument")]
    InvalidCommandArgument,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("wrong number of arguments for '{0}' command")]
    WrongNumberOfArguments(&'static str),
    #[error("syntax error")]
    SyntaxError,
    #[error("value is not an integer or out of range")]
    InvalidInteger,
    #[error("value is out of range, must be positive")]
    CountOutOfRange,
    #[error("invalid expire time in '{0}' command")]
    InvalidExpireTime(&'static str),
    #[error("timeout is not a float or out of range")]
    InvalidTimeout,
    #[error("timeout is negative")]
    NegativeTimeout,
    #[error("wrong number of arguments for 'xadd' command")]
    UnpairedStreamFields,
    #[error("Invalid stream ID specified as stream command argument")]
    InvalidStreamId,
    #[error("The ID specified in XADD must be greater than 0-0")]
    StreamIdZero,
    #[error("The ID specified in XADD is equal or smaller than the target stream top item")]
    StreamIdTooSmall,
    #[error("Operation against a key holding the wrong kind of value")]
    WrongType,
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::UnknownCommand(_) => ErrorKind::UnknownCommand,
            CommandError::WrongNumberOfArguments(_) => ErrorKind::Arity,
            CommandError::WrongType => ErrorKind::WrongType,
            _ => ErrorKind::Validation,
        }
    }

    pub fn as_resp(&self) -> RespValue {
        let prefix = match self.kind() {
            ErrorKind::WrongType => "WRONGTYPE",
            _ => "ERR",
        };

        RespValue::Error(format!("{} {}", prefix, self))
    }
}

impl From<StoreError> for CommandError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::WrongType => CommandError::WrongType,
            StoreError::StreamIdZero => CommandError::StreamIdZero,
            StoreError::StreamIdTooSmall => CommandError::StreamIdTooSmall,
            StoreError::InvalidStreamId => CommandError::InvalidStreamId,
            StoreError::NotAnInteger => CommandError::InvalidInteger,
        }
    }
}
