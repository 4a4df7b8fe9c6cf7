use std::{io, time::Duration};

use anyhow::Context;
use axum::Router;
use tokio::{net::TcpListener, select, signal, spawn, time::timeout};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Serves `router` on `listener` until `token` is cancelled.
///
/// After cancellation no new connections are accepted and in-flight requests get
/// up to `shutdown_timeout` to finish before this returns anyway.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    token: CancellationToken,
    shutdown_timeout: Duration,
) -> anyhow::Result<()> {
    let shutdown = token.clone();
    let mut server = spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
    });

    select! {
        result = &mut server => {
            return result.context("server task panicked")?.context("error while serving HTTP");
        }
        _ = token.cancelled() => {}
    }

    info!("shutting down server");
    match timeout(shutdown_timeout, &mut server).await {
        Ok(result) => result
            .context("server task panicked")?
            .context("error while shutting down server"),
        Err(_) => {
            warn!(
                timeout_ms = shutdown_timeout.as_millis(),
                "in-flight requests did not finish in time, no longer waiting for them"
            );
            server.abort();
            Ok(())
        }
    }
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() -> io::Result<()> {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())?
            .recv()
            .await;
        Ok::<_, io::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<io::Result<()>>();

    select! {
        result = signal::ctrl_c() => result,
        result = terminate => result,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::routing::get;
    use tokio::{sync::Notify, time::sleep};

    use super::*;

    const SERVE_DEADLINE: Duration = Duration::from_secs(5);

    async fn start(
        router: Router,
        shutdown_timeout: Duration,
    ) -> (String, CancellationToken, tokio::task::JoinHandle<anyhow::Result<()>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let token = CancellationToken::new();
        let handle = spawn(serve(listener, router, token.clone(), shutdown_timeout));
        (url, token, handle)
    }

    #[tokio::test]
    async fn test_idle_server_stops_on_cancel() {
        let router = Router::new().route("/", get(|| async { "ok" }));
        let (url, token, handle) = start(router, Duration::from_secs(1)).await;

        let body = reqwest::get(&url).await.unwrap().text().await.unwrap();
        assert_eq!(body, "ok");

        token.cancel();
        let result = timeout(SERVE_DEADLINE, handle).await.unwrap().unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_is_bounded_by_timeout() {
        // Arrange
        let entered = Arc::new(Notify::new());
        let router = {
            let entered = entered.clone();
            Router::new().route(
                "/slow",
                get(move || {
                    let entered = entered.clone();
                    async move {
                        entered.notify_one();
                        sleep(Duration::from_secs(60)).await;
                        "late"
                    }
                }),
            )
        };
        let (url, token, handle) = start(router, Duration::from_millis(100)).await;

        let in_flight = spawn(async move { reqwest::get(format!("{url}/slow")).await });
        timeout(SERVE_DEADLINE, entered.notified())
            .await
            .expect("slow request never reached the handler");

        // Act
        token.cancel();
        let result = timeout(SERVE_DEADLINE, handle)
            .await
            .expect("serve did not return after the shutdown timeout")
            .unwrap();

        // Assert
        assert!(result.is_ok());
        assert!(!in_flight.is_finished());
    }
}
