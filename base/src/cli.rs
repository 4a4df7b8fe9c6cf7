use std::{net::SocketAddr, time::Duration};

use clap::Args;
use humantime::parse_duration;

/// Largest accepted `PUT /update` body, in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024;

#[derive(Debug, Clone, Args)]
pub struct TimestampServerCli {
    /// Address for the HTTP server to listen on.
    #[clap(env, long, default_value = "0.0.0.0:8080")]
    pub timestamp_server_listen: SocketAddr,

    /// Time allowed for a single request to complete.
    /// Also used as the timeout of the bundled sample client.
    #[clap(env, long, value_parser = parse_duration, default_value = "5s")]
    pub timestamp_server_request_timeout: Duration,

    /// How long in-flight requests may run after a shutdown signal before the server stops anyway.
    #[clap(env, long, value_parser = parse_duration, default_value = "10s")]
    pub timestamp_server_shutdown_timeout: Duration,

    /// Maximum size of the update request body.
    #[clap(env, long, default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub timestamp_server_max_body_bytes: usize,

    /// Timestamp sent by the sample client right after startup.
    #[clap(env, long, default_value = "123456789")]
    pub timestamp_server_sample_timestamp: String,

    /// Do not run the sample update-then-read cycle at startup.
    #[clap(env, long)]
    pub timestamp_server_skip_sample_client: bool,

    /// Expose Prometheus metrics at /metrics.
    #[clap(env, long)]
    pub timestamp_server_metrics: bool,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        server: TimestampServerCli,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::try_parse_from(["test"]).unwrap().server;

        assert_eq!(cli.timestamp_server_listen, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(cli.timestamp_server_request_timeout, Duration::from_secs(5));
        assert_eq!(cli.timestamp_server_shutdown_timeout, Duration::from_secs(10));
        assert_eq!(cli.timestamp_server_max_body_bytes, 1024);
        assert_eq!(cli.timestamp_server_sample_timestamp, "123456789");
        assert!(!cli.timestamp_server_skip_sample_client);
        assert!(!cli.timestamp_server_metrics);
    }

    #[test]
    fn test_overrides() {
        let cli = TestCli::try_parse_from([
            "test",
            "--timestamp-server-listen",
            "127.0.0.1:9000",
            "--timestamp-server-request-timeout",
            "250ms",
            "--timestamp-server-shutdown-timeout",
            "1m",
            "--timestamp-server-max-body-bytes",
            "64",
            "--timestamp-server-skip-sample-client",
            "--timestamp-server-metrics",
        ])
        .unwrap()
        .server;

        assert_eq!(cli.timestamp_server_listen.port(), 9000);
        assert_eq!(cli.timestamp_server_request_timeout, Duration::from_millis(250));
        assert_eq!(cli.timestamp_server_shutdown_timeout, Duration::from_secs(60));
        assert_eq!(cli.timestamp_server_max_body_bytes, 64);
        assert!(cli.timestamp_server_skip_sample_client);
        assert!(cli.timestamp_server_metrics);
    }

    #[test]
    fn test_rejects_bad_duration() {
        let result =
            TestCli::try_parse_from(["test", "--timestamp-server-request-timeout", "soon"]);
        assert!(result.is_err());
    }
}
