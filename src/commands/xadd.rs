use bytes::Bytes;

use crate::{
    commands::command_error::CommandError,
    database::SharedDatabase,
    key_value_store::StreamIdRequest,
    resp::RespValue,
};

pub struct XaddArguments {
    key: Bytes,
    id: StreamIdRequest,
    fields: Vec<(Bytes, Bytes)>,
}

impl XaddArguments {
    /// Parses `key id field value [field value ...]`.
    ///
    /// The id is `*`, `<millis>-*`, `<millis>-<sequence>` or a bare `<millis>`
    /// (sequence `0`).
    pub fn parse(arguments: Vec<Bytes>) -> Result<Self, CommandError> {
        if arguments.len() < 4 {
            return Err(CommandError::WrongNumberOfArguments("xadd"));
        }

        if arguments.len() % 2 != 0 {
            return Err(CommandError::UnpairedStreamFields);
        }

        let id = StreamIdRequest::parse(&arguments[1])?;

        let fields = arguments[2..]
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();

        Ok(Self {
            key: arguments[0].clone(),
            id,
            fields,
        })
    }
}

/// Handles the Redis XADD command.
///
/// Appends an entry to the stream at the key, creating the stream if needed.
/// The new id must be greater than the id of the stream's last entry.
///
/// # Returns
///
/// * `Ok(RespValue::BulkString)` - The id of the new entry
/// * `Err(CommandError::StreamIdZero)` - If the id is `0-0`
/// * `Err(CommandError::StreamIdTooSmall)` - If the id does not increase
/// * `Err(CommandError::InvalidStreamId)` - If the id is malformed
/// * `Err(CommandError::WrongType)` - If the key holds a string or a list
pub async fn xadd(database: SharedDatabase, arguments: Vec<Bytes>) -> Result<RespValue, CommandError> {
    let xadd_arguments = XaddArguments::parse(arguments)?;

    let mut database_guard = database.lock().await;
    let id = database_guard.store.append_stream(
        xadd_arguments.key,
        xadd_arguments.id,
        xadd_arguments.fields,
    )?;

    Ok(RespValue::bulk_string(id.to_string()))
}
