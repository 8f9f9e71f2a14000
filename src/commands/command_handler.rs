use bytes::Bytes;
use tracing::debug;

use crate::{
    commands::{
        blpop::blpop,
        command_error::CommandError,
        del::del,
        echo::echo,
        get::get,
        incr::incr,
        llen::llen,
        lpop::lpop,
        lrange::lrange,
        ping::ping,
        rpush_and_lpush::{lpush, rpush},
        set::set,
        type_command::type_command,
        xadd::xadd,
        xrange::xrange,
    },
    database::SharedDatabase,
    resp::RespValue,
};

/// A decoded request: the upper-cased command name and its raw arguments.
#[derive(Debug, PartialEq, Clone)]
pub struct CommandHandler {
    pub name: String,
    pub arguments: Vec<Bytes>,
}

impl CommandHandler {
    /// Builds a handler from a request array of bulk strings.
    ///
    /// # Returns
    ///
    /// * `Ok(CommandHandler)` - The command name and its arguments
    /// * `Err(CommandError::EmptyCommand)` - If the array has no elements
    /// * `Err(CommandError::InvalidCommandArgument)` - If the request is not an
    ///   array or one of its elements is not a bulk string
    pub fn new(input: RespValue) -> Result<Self, CommandError> {
        let RespValue::Array(elements) = input else {
            return Err(CommandError::InvalidCommandArgument);
        };

        let mut arguments = Vec::with_capacity(elements.len());

        for element in elements {
            match element {
                RespValue::BulkString(argument) => arguments.push(argument),
                _ => return Err(CommandError::InvalidCommandArgument),
            }
        }

        if arguments.is_empty() {
            return Err(CommandError::EmptyCommand);
        }

        let name = String::from_utf8_lossy(&arguments.remove(0)).to_uppercase();

        Ok(Self { name, arguments })
    }

    /// Runs the command against the shared database.
    ///
    /// Only BLPOP may suspend; every other command completes while holding
    /// the database lock once.
    pub async fn handle_command(&self, database: SharedDatabase) -> Result<RespValue, CommandError> {
        debug!(command = %self.name, arguments = self.arguments.len(), "executing command");

        let arguments = self.arguments.clone();

        match self.name.as_str() {
            "PING" => ping(arguments),
            "ECHO" => echo(arguments),
            "GET" => get(database, arguments).await,
            "SET" => set(database, arguments).await,
            "DEL" => del(database, arguments).await,
            "INCR" => incr(database, arguments).await,
            "RPUSH" => rpush(database, arguments).await,
            "LPUSH" => lpush(database, arguments).await,
            "LRANGE" => lrange(database, arguments).await,
            "LLEN" => llen(database, arguments).await,
            "LPOP" => lpop(database, arguments).await,
            "BLPOP" => blpop(database, arguments).await,
            "TYPE" => type_command(database, arguments).await,
            "XADD" => xadd(database, arguments).await,
            "XRANGE" => xrange(database, arguments).await,
            _ => Err(CommandError::UnknownCommand(self.name.clone())),
        }
    }
}
