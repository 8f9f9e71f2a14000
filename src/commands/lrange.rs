use bytes::Bytes;

use crate::{
    commands::{command_error::CommandError, command_utils::parse_integer},
    database::SharedDatabase,
    resp::RespValue,
};

/// Represents the parsed arguments for the LRANGE command.
///
/// The LRANGE command returns a range of elements from a list stored at the
/// given key. Both indices are inclusive and may be negative to count from
/// the end of the list.
pub struct LrangeArguments {
    /// The key name to retrieve from the store
    key: Bytes,
    /// The starting index for the range (can be negative to count from the end)
    start_index: i64,
    /// The ending index for the range (can be negative to count from the end)
    end_index: i64,
}

impl LrangeArguments {
    /// Parses and validates the arguments for the LRANGE command.
    ///
    /// # Arguments
    ///
    /// * `arguments` - The command arguments: [key, start_index, end_index]
    ///
    /// # Returns
    ///
    /// * `Ok(LrangeArguments)` - If the arguments are valid
    /// * `Err(CommandError::WrongNumberOfArguments)` - If fewer than 3 arguments were given
    /// * `Err(CommandError::InvalidInteger)` - If start or end index is not a valid integer
    pub fn parse(arguments: Vec<Bytes>) -> Result<Self, CommandError> {
        if arguments.len() < 3 {
            return Err(CommandError::WrongNumberOfArguments("lrange"));
        }

        let start_index = parse_integer(&arguments[1])?;
        let end_index = parse_integer(&arguments[2])?;

        Ok(Self {
            key: arguments[0].clone(),
            start_index,
            end_index,
        })
    }
}

/// Handles the Redis LRANGE command.
///
/// Returns a range of elements from a list stored at the given key. If the
/// key doesn't exist or the range selects nothing, returns an empty array.
///
/// # Examples
///
/// ```ignore
/// // LRANGE mylist 0 2  (get first 3 elements)
/// // Encodes as: "*3\r\n$4\r\nval1\r\n$4\r\nval2\r\n$4\r\nval3\r\n"
///
/// // LRANGE mylist -2 -1  (get last 2 elements)
/// // Encodes as: "*2\r\n$4\r\nval4\r\n$4\r\nval5\r\n"
/// ```
pub async fn lrange(database: SharedDatabase, arguments: Vec<Bytes>) -> Result<RespValue, CommandError> {
    let lrange_arguments = LrangeArguments::parse(arguments)?;

    let mut database_guard = database.lock().await;
    let range = database_guard.store.list_range(
        &lrange_arguments.key,
        lrange_arguments.start_index,
        lrange_arguments.end_index,
    )?;

    Ok(RespValue::bulk_string_array(range))
}
