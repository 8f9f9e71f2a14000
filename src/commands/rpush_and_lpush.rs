use bytes::Bytes;

use crate::{
    commands::command_error::CommandError, database::SharedDatabase, key_value_store::ListEnd,
    resp::RespValue,
};

/// Parsed arguments shared by RPUSH and LPUSH.
pub struct PushArrayOperations {
    key: Bytes,
    values: Vec<Bytes>,
    end: ListEnd,
}

impl PushArrayOperations {
    pub fn parse(arguments: Vec<Bytes>, end: ListEnd) -> Result<Self, CommandError> {
        if arguments.len() < 2 {
            let name = match end {
                ListEnd::Head => "lpush",
                ListEnd::Tail => "rpush",
            };

            return Err(CommandError::WrongNumberOfArguments(name));
        }

        let mut arguments = arguments.into_iter();
        let key = arguments.next().unwrap_or_default();

        Ok(Self {
            key,
            values: arguments.collect(),
            end,
        })
    }
}

/// Handles the Redis RPUSH command.
///
/// Appends each value to the tail of the list in argument order, creating
/// the list when the key is missing. Clients blocked on the key are served
/// right after the push.
///
/// # Returns
///
/// * `Ok(RespValue::Integer)` - The list length after the push
/// * `Err(CommandError::WrongType)` - If the key holds a string or a stream
pub async fn rpush(database: SharedDatabase, arguments: Vec<Bytes>) -> Result<RespValue, CommandError> {
    push(database, PushArrayOperations::parse(arguments, ListEnd::Tail)?).await
}

/// Handles the Redis LPUSH command.
///
/// Inserts each value at the head of the list in argument order, so the last
/// argument ends up first. Otherwise behaves like [`rpush`].
pub async fn lpush(database: SharedDatabase, arguments: Vec<Bytes>) -> Result<RespValue, CommandError> {
    push(database, PushArrayOperations::parse(arguments, ListEnd::Head)?).await
}

async fn push(database: SharedDatabase, operation: PushArrayOperations) -> Result<RespValue, CommandError> {
    let mut database_guard = database.lock().await;
    let length = database_guard.push(operation.key, operation.values, operation.end)?;

    Ok(RespValue::Integer(length as i64))
}
