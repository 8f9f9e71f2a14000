use bytes::Bytes;

use crate::{commands::command_error::CommandError, database::SharedDatabase, resp::RespValue};

pub struct TypeArguments {
    key: Bytes,
}

impl TypeArguments {
    pub fn parse(arguments: Vec<Bytes>) -> Result<Self, CommandError> {
        let Some(key) = arguments.into_iter().next() else {
            return Err(CommandError::WrongNumberOfArguments("type"));
        };

        Ok(Self { key })
    }
}

/// Handles the Redis TYPE command.
///
/// Replies with `string`, `list`, `stream`, or `none` for a missing key.
pub async fn type_command(
    database: SharedDatabase,
    arguments: Vec<Bytes>,
) -> Result<RespValue, CommandError> {
    let type_arguments = TypeArguments::parse(arguments)?;

    let mut database_guard = database.lock().await;
    let type_name = database_guard.store.type_of(&type_arguments.key);

    Ok(RespValue::simple_string(type_name))
}
