use bytes::Bytes;

use crate::{commands::command_error::CommandError, database::SharedDatabase, resp::RespValue};

pub struct IncrArguments {
    key: Bytes,
}

impl IncrArguments {
    pub fn parse(arguments: Vec<Bytes>) -> Result<Self, CommandError> {
        let Some(key) = arguments.into_iter().next() else {
            return Err(CommandError::WrongNumberOfArguments("incr"));
        };

        Ok(Self { key })
    }
}

/// Handles the Redis INCR command.
///
/// Increments the integer stored at the key by one. A missing key is treated
/// as `0`, so the first INCR stores and returns `1`. The key keeps its expiry.
///
/// # Returns
///
/// * `Ok(RespValue::Integer)` - The value after the increment
/// * `Err(CommandError::InvalidInteger)` - If the stored value is not a base-10
///   64-bit integer, or incrementing it would overflow
/// * `Err(CommandError::WrongType)` - If the key holds a list or a stream
pub async fn incr(database: SharedDatabase, arguments: Vec<Bytes>) -> Result<RespValue, CommandError> {
    let incr_arguments = IncrArguments::parse(arguments)?;

    let mut database_guard = database.lock().await;
    let value = database_guard.store.increment(incr_arguments.key)?;

    Ok(RespValue::Integer(value))
}
