use std::sync::Arc;

use bytes::BytesMut;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
};
use tracing::{info, warn};

use crate::{
    commands::{CommandError, CommandHandler},
    database::SharedDatabase,
    input::{read_request, CommandReadError},
    resp::RespValue,
};

pub async fn handle_client_connection(
    stream: TcpStream,
    client_address: String,
    database: SharedDatabase,
) {
    let (reader, writer) = stream.into_split();

    handle_connection(reader, writer, &client_address, database).await;
}

/// Drives one client: read a request, run it, write the reply, until the
/// client goes away or sends bytes that are not valid RESP.
///
/// Command errors are written back and the connection carries on. A framing
/// error is answered with a protocol error reply, then the connection closes.
pub async fn handle_connection<R, W>(
    mut reader: R,
    mut writer: W,
    client_address: &str,
    database: SharedDatabase,
) where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = BytesMut::with_capacity(4096);

    loop {
        let request = match read_request(&mut reader, &mut buffer).await {
            Ok(request) => request,
            Err(CommandReadError::ConnectionClosed) => break,
            Err(CommandReadError::ProtocolError(e)) => {
                warn!(client = client_address, error = %e, "protocol error");

                if let Err(e) = write_to_stream(&mut writer, &e.as_resp()).await {
                    warn!(client = client_address, error = %e, "error writing to stream");
                }
                break;
            }
            Err(e) => {
                warn!(client = client_address, error = %e, "error reading from stream");
                break;
            }
        };

        let response = match CommandHandler::new(request) {
            Ok(command_handler) => {
                match run_until_disconnect(&command_handler, &database, &mut reader, &mut buffer)
                    .await
                {
                    Some(Ok(response)) => response,
                    Some(Err(e)) => e.as_resp(),
                    None => {
                        info!(
                            client = client_address,
                            command = %command_handler.name,
                            "client disconnected while command was running"
                        );
                        break;
                    }
                }
            }
            Err(e) => e.as_resp(),
        };

        if let Err(e) = write_to_stream(&mut writer, &response).await {
            warn!(client = client_address, error = %e, "error writing to stream");
            break;
        }
    }

    info!(client = client_address, "connection closed");
}

/// Runs the command while watching the connection for a hang-up.
///
/// Bytes that arrive in the meantime are kept in `buffer` for the next
/// request. Returns `None` if the client disconnected first, in which case
/// the command future is dropped; a blocked BLPOP thereby gives up its place
/// in the queue without consuming an element.
async fn run_until_disconnect<R>(
    command_handler: &CommandHandler,
    database: &SharedDatabase,
    reader: &mut R,
    buffer: &mut BytesMut,
) -> Option<Result<RespValue, CommandError>>
where
    R: AsyncRead + Unpin,
{
    let command = command_handler.handle_command(Arc::clone(database));
    tokio::pin!(command);

    loop {
        tokio::select! {
            biased;
            result = &mut command => return Some(result),
            read = reader.read_buf(buffer) => match read {
                Ok(0) | Err(_) => return None,
                Ok(_) => continue,
            },
        }
    }
}

async fn write_to_stream<W>(writer: &mut W, response: &RespValue) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&response.encode()).await?;
    writer.flush().await
}
