//! Synchronous-feeling, typed HTTP surface over `https://<bridge>/clip/v2`.
//!
//! Bridges serve a self-signed certificate pinned by IP, so certificate
//! verification is disabled on this client. Authentication is a static
//! `hue-application-key` header. The client performs no retries; callers
//! that hold semantic context (the event consumer, the scheduler) own
//! retry and timeout policy.

pub mod entertainment;
pub mod lights;
pub mod native;
pub mod scenes;
pub mod sensors;
pub mod types;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::error::AppError;
use types::BridgeApiError;

/// Wire-level timeout for individual REST calls. Scheduler- and batch-
/// initiated calls are additionally bounded by their own 5 s deadline.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Every v2 response body carries this envelope. A non-empty `errors`
/// array is surfaced as [`AppError::Bridge`] with the first description.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::Deserialize<'de>"))]
struct Envelope<T> {
    #[serde(default)]
    errors: Vec<BridgeApiError>,
    #[serde(default)]
    data: Vec<T>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<Vec<T>, AppError> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(AppError::Bridge {
                description: error.description,
            });
        }
        Ok(self.data)
    }
}

/// Thread-safe Hue v2 REST client. One instance is shared by every
/// subsystem; cloning is cheap (the connection pool is shared).
#[derive(Debug, Clone)]
pub struct BridgeClient {
    bridge_ip: String,
    base_url: String,
    http: reqwest::Client,
}

impl BridgeClient {
    pub fn new(bridge_ip: impl Into<String>, application_key: &str) -> Result<Self, AppError> {
        let bridge_ip = bridge_ip.into();

        let mut headers = reqwest::header::HeaderMap::new();
        let key = reqwest::header::HeaderValue::from_str(application_key)
            .map_err(|e| AppError::input(format!("invalid application key: {e}")))?;
        headers.insert("hue-application-key", key);

        let http = reqwest::Client::builder()
            // Bridges present a self-signed certificate pinned by IP.
            .danger_accept_invalid_certs(true)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .tcp_keepalive(Some(Duration::from_secs(5)))
            .build()
            .map_err(|e| AppError::Transport {
                message: e.to_string(),
            })?;

        Ok(Self {
            base_url: format!("https://{bridge_ip}/clip/v2"),
            bridge_ip,
            http,
        })
    }

    pub fn bridge_ip(&self) -> &str {
        &self.bridge_ip
    }

    /// Verify the bridge is reachable and the application key is accepted.
    pub async fn test_connection(&self) -> Result<(), AppError> {
        self.get_data::<serde_json::Value>("/resource/bridge")
            .await
            .map(|_| ())
    }

    /// Open the server-sent-events stream. The caller owns framing,
    /// reconnection, and backoff.
    pub async fn open_event_stream(&self) -> Result<reqwest::Response, AppError> {
        let url = format!("https://{}/eventstream/clip/v2", self.bridge_ip);
        let resp = self
            .http
            .get(&url)
            .header("Accept", "text/event-stream")
            .header("Cache-Control", "no-cache")
            // The stream is long-lived; the per-request timeout must not
            // apply here.
            .timeout(Duration::from_secs(86400))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AppError::Http {
                code: resp.status().as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(resp)
    }

    // ── Request plumbing ────────────────────────────────────────

    async fn read_envelope<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<Vec<T>, AppError> {
        let status = resp.status();
        let body = resp.text().await?;
        if status.as_u16() >= 400 {
            return Err(AppError::Http {
                code: status.as_u16(),
                body,
            });
        }
        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        envelope.into_data()
    }

    pub(crate) async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, AppError> {
        let resp = self.http.get(format!("{}{path}", self.base_url)).send().await?;
        Self::read_envelope(resp).await
    }

    /// GET a single resource; an empty `data` array means not found.
    pub(crate) async fn get_one<T: DeserializeOwned>(
        &self,
        path: &str,
        what: &str,
    ) -> Result<T, AppError> {
        self.get_data::<T>(path)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound {
                what: what.to_string(),
            })
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), AppError> {
        let resp = self
            .http
            .put(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await?;
        Self::read_envelope::<serde_json::Value>(resp).await.map(|_| ())
    }

    pub(crate) async fn post_data<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<T>, AppError> {
        let resp = self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await?;
        Self::read_envelope(resp).await
    }

    pub(crate) async fn delete_resource(&self, path: &str) -> Result<(), AppError> {
        let resp = self
            .http
            .delete(format!("{}{path}", self.base_url))
            .send()
            .await?;
        Self::read_envelope::<serde_json::Value>(resp).await.map(|_| ())
    }
}
