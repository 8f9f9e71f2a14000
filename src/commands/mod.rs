mod blpop;
mod command_error;
mod command_handler;
mod command_utils;
mod del;
mod echo;
mod get;
mod incr;
mod llen;
mod lpop;
mod lrange;
mod ping;
mod rpush_and_lpush;
mod set;
mod stream_utils;
mod type_command;
mod xadd;
mod xrange;

pub use command_error::{CommandError, ErrorKind};
pub use command_handler::CommandHandler;
