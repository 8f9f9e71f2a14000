use bytes::Bytes;

use crate::{commands::command_error::CommandError, database::SharedDatabase, resp::RespValue};

pub struct DelArguments {
    keys: Vec<Bytes>,
}

impl DelArguments {
    pub fn parse(arguments: Vec<Bytes>) -> Result<Self, CommandError> {
        if arguments.is_empty() {
            return Err(CommandError::WrongNumberOfArguments("del"));
        }

        Ok(Self { keys: arguments })
    }
}

/// Handles the Redis DEL command. Replies with the number of keys removed.
pub async fn del(database: SharedDatabase, arguments: Vec<Bytes>) -> Result<RespValue, CommandError> {
    let del_arguments = DelArguments::parse(arguments)?;

    let mut database_guard = database.lock().await;
    let removed = del_arguments
        .keys
        .iter()
        .filter(|key| database_guard.store.delete(key))
        .count();

    Ok(RespValue::Integer(removed as i64))
}
