use std::{
    ffi::OsString,
    future::Future,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use clap::Parser;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    connection::handle_client_connection,
    database::{Database, SharedDatabase},
};

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    InvalidArguments(#[from] clap::Error),
}

impl CliError {
    /// Prints the error (or the help text) and exits the process.
    pub fn exit(&self) -> ! {
        match self {
            CliError::InvalidArguments(e) => e.exit(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "redis-lite", version, about = "An in-memory Redis-compatible server")]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 6379, value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,
    /// Address to bind to
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    bind: IpAddr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RedisServer {
    pub port: u16,
    pub bind: IpAddr,
}

impl RedisServer {
    /// Builds the server configuration from command line arguments, the first
    /// of which is the program name.
    pub fn new<I, T>(command_line_args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Cli::try_parse_from(command_line_args)?;

        Ok(RedisServer {
            port: cli.port,
            bind: cli.bind,
        })
    }

    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Binds the listener and serves clients until Ctrl-C.
    pub async fn run(&self) -> anyhow::Result<()> {
        let address = self.address();
        let listener = TcpListener::bind(address)
            .await
            .with_context(|| format!("failed to bind to {}", address))?;

        info!(%address, "listening for connections");

        serve(listener, Database::shared(), shutdown_signal()).await;

        Ok(())
    }
}

/// Accepts connections on `listener`, one task each, until `shutdown`
/// resolves. Every connection shares `database`.
pub async fn serve<F>(listener: TcpListener, database: SharedDatabase, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutting down");
                return;
            }
            accepted = listener.accept() => {
                let (stream, client_address) = match accepted {
                    Ok(connection) => connection,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                info!(client = %client_address, "accepted connection");

                let database = Arc::clone(&database);
                tokio::spawn(async move {
                    handle_client_connection(stream, client_address.to_string(), database).await;
                });
            }
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
}
