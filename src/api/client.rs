//! Native HTTP client for the two backends

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::{
    ApiError, ApiResult, Backend, BackendUrls, Endpoint, LoginRequest, LoginResponse,
    RegisterRequest, RegisterResponse, ServerInfo,
};
use crate::dashboard::ServerLogs;
use crate::logs::{LogEntry, LogsPayload};

/// Client pre-configured with both backend origins
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    urls: BackendUrls,
}

impl BackendClient {
    /// Create a client with the given origins and per-request timeout
    pub fn new(urls: BackendUrls, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, urls })
    }

    pub fn urls(&self) -> &BackendUrls {
        &self.urls
    }

    /// `POST /login`
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        self.post_json(Endpoint::Login, request).await
    }

    /// `POST /register`
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<RegisterResponse> {
        self.post_json(Endpoint::Register, request).await
    }

    /// `GET /getInfo`
    pub async fn server_info(&self) -> ApiResult<ServerInfo> {
        self.get_json(Endpoint::Info).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> ApiResult<T> {
        let url = self.urls.url(endpoint);
        tracing::debug!(%url, "GET");

        let response = self.client.get(&url).send().await.map_err(map_request_error)?;
        Self::parse(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.urls.url(endpoint);
        tracing::debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_request_error)?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }
}

fn map_request_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Network("request timed out".to_string())
    } else {
        ApiError::Network(e.to_string())
    }
}

/// Anything that can produce a server's log array
#[async_trait]
pub trait LogSource: Send + Sync {
    async fn fetch_logs(&self, backend: Backend) -> ApiResult<Vec<LogEntry>>;
}

#[async_trait]
impl LogSource for BackendClient {
    async fn fetch_logs(&self, backend: Backend) -> ApiResult<Vec<LogEntry>> {
        let endpoint = match backend {
            Backend::Primary => Endpoint::PrimaryLogs,
            Backend::Secondary => Endpoint::SecondaryLogs,
        };
        let payload: LogsPayload = self.get_json(endpoint).await?;
        Ok(payload.into_entries())
    }
}

/// Fetch both servers' logs concurrently.
///
/// A failed fetch is logged and yields an empty array for that server so
/// the dashboard still renders.
pub async fn fetch_dashboard_logs<S: LogSource + ?Sized>(source: &S) -> ServerLogs {
    let (server1, server2) = tokio::join!(
        source.fetch_logs(Backend::Primary),
        source.fetch_logs(Backend::Secondary)
    );

    let unwrap_or_empty = |result: ApiResult<Vec<LogEntry>>, backend: &str| {
        result.unwrap_or_else(|e| {
            tracing::warn!(backend, error = %e, "Failed to fetch logs");
            Vec::new()
        })
    };

    ServerLogs::new(
        unwrap_or_empty(server1, "server1"),
        unwrap_or_empty(server2, "server2"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource {
        primary: ApiResult<Vec<LogEntry>>,
        secondary: ApiResult<Vec<LogEntry>>,
    }

    #[async_trait]
    impl LogSource for FakeSource {
        async fn fetch_logs(&self, backend: Backend) -> ApiResult<Vec<LogEntry>> {
            match backend {
                Backend::Primary => self.primary.clone(),
                Backend::Secondary => self.secondary.clone(),
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_both_servers() {
        let source = FakeSource {
            primary: Ok(vec![LogEntry::new("info", "GET", "200")]),
            secondary: Ok(vec![
                LogEntry::new("warn", "GET", "429"),
                LogEntry::new("error", "POST", "500"),
            ]),
        };

        let logs = fetch_dashboard_logs(&source).await;
        assert_eq!(logs.server1.len(), 1);
        assert_eq!(logs.server2.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_degrades_to_empty() {
        let source = FakeSource {
            primary: Err(ApiError::Network("connection refused".to_string())),
            secondary: Ok(vec![LogEntry::new("info", "GET", "200")]),
        };

        let logs = fetch_dashboard_logs(&source).await;
        assert!(logs.server1.is_empty());
        assert_eq!(logs.server2.len(), 1);
    }

    #[test]
    fn test_client_construction() {
        let client = BackendClient::new(BackendUrls::default(), Duration::from_secs(5)).unwrap();
        assert_eq!(client.urls().primary, crate::api::DEV_PRIMARY_URL);
    }
}
