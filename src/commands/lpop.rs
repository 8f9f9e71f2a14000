use bytes::Bytes;

use crate::{
    commands::{command_error::CommandError, command_utils::parse_integer},
    database::SharedDatabase,
    resp::RespValue,
};

pub struct LpopArguments {
    key: Bytes,
    count: Option<usize>,
}

impl LpopArguments {
    pub fn parse(arguments: Vec<Bytes>) -> Result<Self, CommandError> {
        let Some(key) = arguments.first() else {
            return Err(CommandError::WrongNumberOfArguments("lpop"));
        };

        let count = match arguments.get(1) {
            Some(count) => {
                let count = parse_integer(count)?;

                if count < 1 {
                    return Err(CommandError::CountOutOfRange);
                }

                Some(usize::try_from(count).map_err(|_| CommandError::CountOutOfRange)?)
            }
            None => None,
        };

        Ok(Self {
            key: key.clone(),
            count,
        })
    }
}

/// Handles the Redis LPOP command.
///
/// Without a count, pops and returns the head element as a bulk string. With
/// a count, pops up to that many elements and returns them as an array. A
/// missing or empty list replies with a null bulk string in both forms.
pub async fn lpop(database: SharedDatabase, arguments: Vec<Bytes>) -> Result<RespValue, CommandError> {
    let lpop_arguments = LpopArguments::parse(arguments)?;

    let mut database_guard = database.lock().await;

    let Some(count) = lpop_arguments.count else {
        return match database_guard.store.pop_front(&lpop_arguments.key)? {
            Some(element) => Ok(RespValue::BulkString(element)),
            None => Ok(RespValue::Null),
        };
    };

    let elements = database_guard
        .store
        .pop_front_many(&lpop_arguments.key, count)?;

    if elements.is_empty() {
        return Ok(RespValue::Null);
    }

    Ok(RespValue::bulk_string_array(elements))
}
