//! HTTP transport for the published catalog objects.
//!
//! Objects are plain public URLs under a bucket prefix. Every request asks
//! intermediaries to revalidate, since a stale version marker would defeat
//! the whole freshness check.

use std::time::Duration;

use reqwest::{header, Client};
use tracing::debug;

use super::{RemoteSource, TransportError};
use crate::config::Config;

/// Size of the published version object.
const VERSION_LEN: usize = 8;

/// HTTP client for the catalog bucket.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: String,
    version_key: String,
    catalog_key: String,
}

impl HttpRemote {
    pub fn new(
        base_url: impl Into<String>,
        version_key: impl Into<String>,
        catalog_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            version_key: version_key.into(),
            catalog_key: catalog_key.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(
            config.base_url.clone(),
            config.version_key.clone(),
            config.catalog_key.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(TransportError::from_status(status, &body))
        }
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, TransportError> {
        let url = self.object_url(key);
        let response = self
            .client
            .get(&url)
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache")
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let body = response.bytes().await?;
        debug!(url = %url, len = body.len(), "Fetched remote object");
        Ok(body.to_vec())
    }
}

impl RemoteSource for HttpRemote {
    async fn fetch_version(&self) -> Result<u64, TransportError> {
        let body = self.get_object(&self.version_key).await?;
        decode_version(&body)
    }

    async fn fetch_catalog(&self) -> Result<Vec<u8>, TransportError> {
        self.get_object(&self.catalog_key).await
    }
}

/// Read a version marker from the first eight bytes of `body`.
fn decode_version(body: &[u8]) -> Result<u64, TransportError> {
    let head: [u8; VERSION_LEN] = body
        .get(..VERSION_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or(TransportError::Truncated {
            expected: VERSION_LEN,
            actual: body.len(),
        })?;
    Ok(u64::from_be_bytes(head))
}

/// Bytes a publisher uploads as the version object.
pub fn encode_version(version: u64) -> [u8; VERSION_LEN] {
    version.to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response and hand back the raw request text.
    async fn serve_once(status: &'static str, body: Vec<u8>) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.ends_with(b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let head = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });
        (format!("http://{}/bucket/", addr), handle)
    }

    fn remote(base_url: &str) -> HttpRemote {
        HttpRemote::new(base_url, "time", "panels.bin", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_decode_version_big_endian() {
        assert_eq!(decode_version(&[0, 0, 0, 0, 0, 0, 1, 2]).unwrap(), 258);
        assert_eq!(decode_version(&encode_version(u64::MAX)).unwrap(), u64::MAX);
    }

    #[test]
    fn test_decode_version_truncated() {
        let err = decode_version(&[1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            TransportError::Truncated {
                expected: 8,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_object_url_trims_slash() {
        let r = remote("https://example.com/storage/");
        assert_eq!(r.object_url("time"), "https://example.com/storage/time");
    }

    #[tokio::test]
    async fn test_fetch_version_disables_caching() {
        let (url, server) = serve_once("200 OK", encode_version(1_700_000_000).to_vec()).await;
        let version = remote(&url).fetch_version().await.unwrap();
        assert_eq!(version, 1_700_000_000);

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /bucket/time "));
        assert!(request.contains("cache-control: no-cache"));
    }

    #[tokio::test]
    async fn test_fetch_version_short_body() {
        let (url, _server) = serve_once("200 OK", vec![0, 1, 2, 3]).await;
        let err = remote(&url).fetch_version().await.unwrap_err();
        assert!(matches!(err, TransportError::Truncated { actual: 4, .. }));
    }

    #[tokio::test]
    async fn test_fetch_catalog_not_found() {
        let (url, _server) = serve_once("404 Not Found", b"no such object".to_vec()).await;
        let err = remote(&url).fetch_catalog().await.unwrap_err();
        assert!(matches!(err, TransportError::NotFound(ref body) if body == "no such object"));
    }

    #[tokio::test]
    async fn test_fetch_catalog_returns_body() {
        let (url, server) = serve_once("200 OK", vec![9, 8, 7]).await;
        assert_eq!(remote(&url).fetch_catalog().await.unwrap(), vec![9, 8, 7]);
        assert!(server.await.unwrap().starts_with("GET /bucket/panels.bin "));
    }
}
