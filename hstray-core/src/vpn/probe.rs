//! Network reachability probe
//!
//! A single bounded round trip to a fixed well-known address, used as a
//! precondition gate before every connect attempt. Any HTTP response counts
//! as reachable; only network-level failures count against it.

use std::time::Duration;
use url::Url;

/// Errors that can occur while building a probe
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Invalid probe URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP client creation failed: {0}")]
    ClientCreationFailed(#[from] reqwest::Error),
}

/// Seam over the reachability check so tests can force either outcome
#[allow(async_fn_in_trait)]
pub trait ReachabilityProbe {
    async fn is_reachable(&self) -> bool;
}

/// HTTP-based reachability probe
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpProbe {
    /// Create a probe against `endpoint` with the given per-attempt timeout
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, ProbeError> {
        let url = Url::parse(&endpoint)
            .map_err(|e| ProbeError::InvalidUrl(format!("Failed to parse URL: {e}")))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ProbeError::InvalidUrl(format!(
                    "Only HTTP/HTTPS schemes are supported, got: {scheme}"
                )));
            }
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .use_rustls_tls()
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ReachabilityProbe for HttpProbe {
    async fn is_reachable(&self) -> bool {
        match self.client.get(&self.endpoint).send().await {
            Ok(_) => true,
            Err(e) => {
                // Timeouts and refused connections mean unreachable; any
                // other response still proves the network is up
                !(e.is_timeout() || e.is_connect())
            }
        }
    }
}
