use bytes::Bytes;

use crate::{commands::command_error::CommandError, database::SharedDatabase, resp::RespValue};

pub struct LlenArguments {
    key: Bytes,
}

impl LlenArguments {
    pub fn parse(arguments: Vec<Bytes>) -> Result<Self, CommandError> {
        let Some(key) = arguments.into_iter().next() else {
            return Err(CommandError::WrongNumberOfArguments("llen"));
        };

        Ok(Self { key })
    }
}

/// Handles the Redis LLEN command.
///
/// Replies with the length of the list at the key, `0` if the key is missing.
pub async fn llen(database: SharedDatabase, arguments: Vec<Bytes>) -> Result<RespValue, CommandError> {
    let llen_arguments = LlenArguments::parse(arguments)?;

    let mut database_guard = database.lock().await;
    let length = database_guard.store.list_len(&llen_arguments.key)?;

    Ok(RespValue::Integer(length as i64))
}
