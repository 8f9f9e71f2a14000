use bytes::Bytes;

use crate::{
    commands::{
        command_error::CommandError,
        command_utils::{is_keyword, parse_integer},
        stream_utils::stream_entries_to_resp,
    },
    database::SharedDatabase,
    key_value_store::StreamId,
    resp::RespValue,
};

pub struct XrangeArguments {
    key: Bytes,
    start: StreamId,
    end: StreamId,
    count: Option<usize>,
}

impl XrangeArguments {
    /// Parses `key start end [COUNT n]`.
    ///
    /// `-` and `+` stand for the smallest and largest possible ids. A bound
    /// without a sequence covers the whole millisecond: `5` means `5-0` as a
    /// start and `5-<max>` as an end.
    pub fn parse(arguments: Vec<Bytes>) -> Result<Self, CommandError> {
        if arguments.len() < 3 {
            return Err(CommandError::WrongNumberOfArguments("xrange"));
        }

        let start = parse_bound(&arguments[1], "-", StreamId::MIN, 0)?;
        let end = parse_bound(&arguments[2], "+", StreamId::MAX, u64::MAX)?;

        let count = match arguments.get(3) {
            None => None,
            Some(option) if is_keyword(option, "COUNT") => {
                let Some(count) = arguments.get(4) else {
                    return Err(CommandError::SyntaxError);
                };

                Some(usize::try_from(parse_integer(count)?).unwrap_or(0))
            }
            Some(_) => return Err(CommandError::SyntaxError),
        };

        Ok(Self {
            key: arguments[0].clone(),
            start,
            end,
            count,
        })
    }
}

fn parse_bound(
    argument: &[u8],
    open: &str,
    open_id: StreamId,
    default_sequence: u64,
) -> Result<StreamId, CommandError> {
    let argument = std::str::from_utf8(argument).map_err(|_| CommandError::InvalidStreamId)?;

    if argument == open {
        return Ok(open_id);
    }

    StreamId::parse_with_default_sequence(argument, default_sequence)
        .ok_or(CommandError::InvalidStreamId)
}

/// Handles the Redis XRANGE command.
///
/// Returns the entries whose ids fall between start and end, both inclusive,
/// in id order. A missing key yields an empty array.
pub async fn xrange(database: SharedDatabase, arguments: Vec<Bytes>) -> Result<RespValue, CommandError> {
    let xrange_arguments = XrangeArguments::parse(arguments)?;

    let mut database_guard = database.lock().await;

    let Some(stream) = database_guard.store.stream(&xrange_arguments.key)? else {
        return Ok(RespValue::Array(Vec::new()));
    };

    let entries = stream.range(xrange_arguments.start, xrange_arguments.end);
    let limit = xrange_arguments.count.unwrap_or(entries.len()).min(entries.len());

    Ok(stream_entries_to_resp(&entries[..limit]))
}
