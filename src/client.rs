use std::{
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    time::Duration,
};

use backend::router::{RETRIEVE_PATH, UPDATE_PATH};
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use strum::IntoStaticStr;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ClientError {
    #[error("unable to build HTTP client")]
    Build(#[source] reqwest::Error),
    #[error("error while making {method} request")]
    Request {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("received non 200 status code from server: {status}: {message}")]
    UnexpectedStatus { status: StatusCode, message: String },
}

/// Client for the timestamp endpoints, used for the startup sample cycle.
#[derive(Debug, Clone)]
pub struct SampleClient {
    http: Client,
    base_url: String,
}

impl SampleClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Client for a server listening on `addr`. Wildcard addresses are reached over loopback.
    pub fn for_listen_addr(addr: SocketAddr, timeout: Duration) -> Result<Self, ClientError> {
        let mut addr = addr;
        if addr.ip().is_unspecified() {
            let loopback: IpAddr = if addr.is_ipv4() {
                Ipv4Addr::LOCALHOST.into()
            } else {
                Ipv6Addr::LOCALHOST.into()
            };
            addr.set_ip(loopback);
        }
        Self::new(format!("http://{addr}"), timeout)
    }

    /// Sends `PUT /update` with `timestamp` as a text/plain body.
    pub async fn put_timestamp(&self, timestamp: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .put(format!("{}{UPDATE_PATH}", self.base_url))
            .header(CONTENT_TYPE, "text/plain")
            .body(timestamp.to_string())
            .send()
            .await
            .map_err(|source| ClientError::Request {
                method: "PUT",
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response.text().await.map_err(|source| ClientError::Request {
                method: "PUT",
                source,
            })?;
            return Err(ClientError::UnexpectedStatus { status, message });
        }

        Ok(())
    }

    /// Sends `GET /retrieve` and returns the body as received.
    pub async fn get_timestamp(&self) -> Result<String, ClientError> {
        let response = self
            .http
            .get(format!("{}{RETRIEVE_PATH}", self.base_url))
            .send()
            .await
            .map_err(|source| ClientError::Request {
                method: "GET",
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ClientError::Request {
            method: "GET",
            source,
        })?;
        if status != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus {
                status,
                message: body,
            });
        }

        Ok(body)
    }

    /// Stores `timestamp` and reads it back. Failures are logged and never retried.
    pub async fn run_sample(&self, timestamp: &str) -> Option<String> {
        if let Err(err) = self.put_timestamp(timestamp).await {
            log_client_error(&err);
        }

        match self.get_timestamp().await {
            Ok(received) => {
                info!(timestamp = %received, "received timestamp from server");
                Some(received)
            }
            Err(err) => {
                log_client_error(&err);
                None
            }
        }
    }
}

fn log_client_error(err: &ClientError) {
    let kind: &'static str = err.into();
    error!(
        kind,
        error = %base::helpers::format_error_chain(err),
        "sample client request failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_listen_addr_uses_loopback_for_wildcard() {
        let timeout = Duration::from_secs(1);

        let client = SampleClient::for_listen_addr("0.0.0.0:8080".parse().unwrap(), timeout).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:8080");

        let client = SampleClient::for_listen_addr("[::]:8080".parse().unwrap(), timeout).unwrap();
        assert_eq!(client.base_url, "http://[::1]:8080");

        let client =
            SampleClient::for_listen_addr("10.0.0.5:9000".parse().unwrap(), timeout).unwrap();
        assert_eq!(client.base_url, "http://10.0.0.5:9000");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) on loopback is expected to refuse connections.
        let client =
            SampleClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();

        let err = client.get_timestamp().await.unwrap_err();
        assert!(matches!(err, ClientError::Request { method: "GET", .. }));
        assert!(client.run_sample("1").await.is_none());
    }
}
