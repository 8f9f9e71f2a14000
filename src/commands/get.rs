use bytes::Bytes;

use crate::{commands::command_error::CommandError, database::SharedDatabase, resp::RespValue};

/// Represents the parsed arguments for GET command
pub struct GetArguments {
    /// The key name to retrieve from the store
    key: Bytes,
}

impl GetArguments {
    pub fn parse(arguments: Vec<Bytes>) -> Result<Self, CommandError> {
        let Some(key) = arguments.into_iter().next() else {
            return Err(CommandError::WrongNumberOfArguments("get"));
        };

        Ok(Self { key })
    }
}

/// Handles the Redis GET command.
///
/// Retrieves the string stored at the given key. Keys whose expiry has
/// passed are removed and reported as missing.
///
/// # Returns
///
/// * `Ok(RespValue::BulkString)` - The stored value
/// * `Ok(RespValue::Null)` - If the key does not exist or has expired
/// * `Err(CommandError::WrongType)` - If the key holds a list or a stream
pub async fn get(database: SharedDatabase, arguments: Vec<Bytes>) -> Result<RespValue, CommandError> {
    let get_arguments = GetArguments::parse(arguments)?;

    let mut database_guard = database.lock().await;

    match database_guard.store.get_string(&get_arguments.key)? {
        Some(value) => Ok(RespValue::BulkString(value)),
        None => Ok(RespValue::Null),
    }
}
