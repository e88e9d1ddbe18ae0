//! HTTP API Client
//!
//! Functions for communicating with the two backends. Origins are fixed at
//! build time: `LOGSCOPE_ENV` picks the development or production pair and
//! `LOGSCOPE_BACKEND1_URL` / `LOGSCOPE_BACKEND2_URL` override either one.

use futures_util::future::join;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use logscope::api::{
    ApiError, ApiResult, Backend, BackendUrls, Endpoint, Environment, LoginRequest,
    LoginResponse, RegisterRequest, RegisterResponse, ServerInfo,
};
use logscope::dashboard::ServerLogs;
use logscope::logs::{LogEntry, LogsPayload};

/// Backend origins for this build
pub fn backend_urls() -> BackendUrls {
    let env = option_env!("LOGSCOPE_ENV")
        .and_then(|e| e.parse::<Environment>().ok())
        .unwrap_or_default();
    let defaults = BackendUrls::for_environment(env);

    BackendUrls::new(
        option_env!("LOGSCOPE_BACKEND1_URL")
            .map(str::to_string)
            .unwrap_or(defaults.primary),
        option_env!("LOGSCOPE_BACKEND2_URL")
            .map(str::to_string)
            .unwrap_or(defaults.secondary),
    )
}

// ============ API Functions ============

/// `POST /login` on backend 1
pub async fn login(request: &LoginRequest) -> ApiResult<LoginResponse> {
    post_json(Endpoint::Login, request).await
}

/// `POST /register` on backend 1
pub async fn register(request: &RegisterRequest) -> ApiResult<RegisterResponse> {
    post_json(Endpoint::Register, request).await
}

/// `GET /getInfo` on backend 1
pub async fn server_info() -> ApiResult<ServerInfo> {
    get_json(Endpoint::Info).await
}

/// One server's log array
pub async fn fetch_logs(backend: Backend) -> ApiResult<Vec<LogEntry>> {
    let endpoint = match backend {
        Backend::Primary => Endpoint::PrimaryLogs,
        Backend::Secondary => Endpoint::SecondaryLogs,
    };
    let payload: LogsPayload = get_json(endpoint).await?;
    Ok(payload.into_entries())
}

/// Both servers' logs, fetched concurrently.
///
/// A failed fetch is logged to the console and yields an empty array.
pub async fn fetch_dashboard_logs() -> ServerLogs {
    let (server1, server2) = join(fetch_logs(Backend::Primary), fetch_logs(Backend::Secondary)).await;

    let or_empty = |result: ApiResult<Vec<LogEntry>>, name: &str| {
        result.unwrap_or_else(|e| {
            web_sys::console::error_1(&format!("Failed to fetch {} logs: {}", name, e).into());
            Vec::new()
        })
    };

    ServerLogs::new(or_empty(server1, "server1"), or_empty(server2, "server2"))
}

async fn get_json<T: DeserializeOwned>(endpoint: Endpoint) -> ApiResult<T> {
    let url = backend_urls().url(endpoint);

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    parse(response).await
}

async fn post_json<B: Serialize, T: DeserializeOwned>(endpoint: Endpoint, body: &B) -> ApiResult<T> {
    let url = backend_urls().url(endpoint);

    let response = Request::post(&url)
        .json(body)
        .map_err(|e| ApiError::Network(format!("Request build error: {}", e)))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    parse(response).await
}

async fn parse<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_status(status, &body));
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_backend_urls_are_distinct() {
        let urls = backend_urls();
        assert_ne!(urls.primary, urls.secondary);
        assert!(urls.url(Endpoint::SecondaryLogs).ends_with("/logs2"));
    }
}
