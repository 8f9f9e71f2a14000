use bytes::Bytes;

use crate::{
    commands::{
        command_error::CommandError,
        command_utils::{is_keyword, parse_integer},
    },
    database::SharedDatabase,
    key_value_store::{now_millis, DataType, Value},
    resp::RespValue,
};

/// Represents the parsed arguments for SET command
pub struct SetArguments {
    /// The key name to store the value under
    key: Bytes,
    /// The value to be stored under the given key
    value: Bytes,
    /// Time to live in milliseconds, from `PX` or `EX`
    time_to_live: Option<u64>,
}

impl SetArguments {
    /// Parses command arguments into a SetArguments structure.
    ///
    /// # Arguments
    ///
    /// * `arguments` - The command arguments:
    ///   - `[key, value]` - For permanent storage
    ///   - `[key, value, "PX", milliseconds, ...]` - Expires after the given milliseconds
    ///   - `[key, value, "EX", seconds, ...]` - Expires after the given seconds
    ///
    /// Only the first `PX`/`EX` option is honored and anything after it is
    /// ignored. Options are matched case-insensitively.
    ///
    /// # Returns
    ///
    /// * `Ok(SetArguments)` - Successfully parsed arguments
    /// * `Err(CommandError::WrongNumberOfArguments)` - If key or value is missing
    /// * `Err(CommandError::SyntaxError)` - If `PX`/`EX` is not followed by a value
    /// * `Err(CommandError::InvalidInteger)` - If the expiry is not an integer
    /// * `Err(CommandError::InvalidExpireTime)` - If the expiry is not positive or too large
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // SET mykey hello PX 1000
    /// let result = SetArguments::parse(vec![
    ///     Bytes::from("mykey"),
    ///     Bytes::from("hello"),
    ///     Bytes::from("PX"),
    ///     Bytes::from("1000"),
    /// ]);
    /// // Returns: Ok(SetArguments { key: "mykey", value: "hello", time_to_live: Some(1000) })
    /// ```
    pub fn parse(arguments: Vec<Bytes>) -> Result<Self, CommandError> {
        if arguments.len() < 2 {
            return Err(CommandError::WrongNumberOfArguments("set"));
        }

        let mut time_to_live = None;
        let mut index = 2;

        while index < arguments.len() {
            let option = &arguments[index];

            let multiplier = if is_keyword(option, "PX") {
                1
            } else if is_keyword(option, "EX") {
                1000
            } else {
                index += 1;
                continue;
            };

            let Some(amount) = arguments.get(index + 1) else {
                return Err(CommandError::SyntaxError);
            };

            let amount = parse_integer(amount)?;

            if amount <= 0 {
                return Err(CommandError::InvalidExpireTime("set"));
            }

            let milliseconds = (amount as u64)
                .checked_mul(multiplier)
                .ok_or(CommandError::InvalidExpireTime("set"))?;

            time_to_live = Some(milliseconds);
            break;
        }

        Ok(Self {
            key: arguments[0].clone(),
            value: arguments[1].clone(),
            time_to_live,
        })
    }
}

/// Handles the Redis SET command.
///
/// Stores a string under the key, replacing any existing value whatever its
/// type. With `PX`/`EX` the entry expires at now plus the given offset.
///
/// # Returns
///
/// * `Ok(RespValue::SimpleString)` - `OK` on success
/// * `Err(CommandError)` - If the arguments are invalid, see [`SetArguments::parse`]
pub async fn set(database: SharedDatabase, arguments: Vec<Bytes>) -> Result<RespValue, CommandError> {
    let set_arguments = SetArguments::parse(arguments)?;

    let expiration = match set_arguments.time_to_live {
        Some(time_to_live) => Some(
            now_millis()
                .checked_add(time_to_live)
                .ok_or(CommandError::InvalidExpireTime("set"))?,
        ),
        None => None,
    };

    let mut database_guard = database.lock().await;
    database_guard.store.set(
        set_arguments.key,
        Value::with_expiration(DataType::String(set_arguments.value), expiration),
    );

    Ok(RespValue::simple_string("OK"))
}
