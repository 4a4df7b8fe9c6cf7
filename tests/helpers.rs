use std::{net::SocketAddr, sync::Arc, sync::Once, time::Duration};

use backend::router::{create_router, RouterConfig};
use base::types::store::AtomicTimestampStore;
use prometheus::Registry;
use timestamp_server::server::serve;
use tokio::{net::TcpListener, spawn, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::info;

static INIT_LOGGING: Once = Once::new();

pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_test_writer()
            .try_init()
            .expect("failed to init logger")
    });
}

#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<AtomicTimestampStore>,
    pub token: CancellationToken,
    pub handle: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    /// Starts a server on an ephemeral loopback port.
    pub async fn start(shutdown_timeout: Duration) -> anyhow::Result<Self> {
        init_logging();

        let store = Arc::new(AtomicTimestampStore::default());
        let router = create_router(store.clone(), Registry::new(), RouterConfig::default())?;
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let token = CancellationToken::new();

        info!(%addr, "test server starting");
        let handle = spawn(serve(listener, router, token.clone(), shutdown_timeout));

        Ok(Self {
            addr,
            store,
            token,
            handle,
        })
    }

    /// Cancels the server and waits for it to stop.
    pub async fn stop(self) -> anyhow::Result<()> {
        self.token.cancel();
        self.handle.await?
    }
}
