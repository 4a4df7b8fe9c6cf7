use anyhow::Context;
use base::cli::TimestampServerCli;
use clap::Parser;
use prometheus::Registry;
use tokio::{net::TcpListener, select, spawn};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Level};

use timestamp_server::{
    client::SampleClient,
    server::{serve, shutdown_signal},
};

/// HTTP service storing a single UNIX timestamp.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    server: TimestampServerCli,

    /// Maximum level of emitted logs.
    #[clap(env, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .init();

    let (router, _store) = backend::setup(&cli.server, Registry::new())?;

    let listener = TcpListener::bind(cli.server.timestamp_server_listen)
        .await
        .with_context(|| {
            format!(
                "unable to listen on {}",
                cli.server.timestamp_server_listen
            )
        })?;
    let addr = listener
        .local_addr()
        .context("unable to get listener address")?;
    info!(%addr, "starting timestamp server");

    let token = CancellationToken::new();
    let mut server = spawn(serve(
        listener,
        router,
        token.clone(),
        cli.server.timestamp_server_shutdown_timeout,
    ));

    if !cli.server.timestamp_server_skip_sample_client {
        match SampleClient::for_listen_addr(addr, cli.server.timestamp_server_request_timeout) {
            Ok(client) => {
                client
                    .run_sample(&cli.server.timestamp_server_sample_timestamp)
                    .await;
            }
            Err(err) => error!(error = %err, "unable to create sample client"),
        }
    }

    select! {
        result = &mut server => {
            return result.context("server task panicked")?;
        }
        result = shutdown_signal() => {
            result.context("unable to listen for shutdown signals")?;
        }
    }

    token.cancel();
    server.await.context("server task panicked")?
}
