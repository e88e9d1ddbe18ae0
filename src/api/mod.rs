//! Backend API
//!
//! Wire types and endpoint table for the two log backends. Backend 1 handles
//! authentication, server info and its own logs; backend 2 only serves logs.
//! The types here are shared by the browser UI and the native client.
//!
//! ## Endpoints
//!
//! - `POST {primary}/login`
//! - `POST {primary}/register`
//! - `GET  {primary}/getInfo`
//! - `GET  {primary}/logs`
//! - `GET  {secondary}/logs2`

#[cfg(feature = "native")]
pub mod client;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "native")]
pub use client::{BackendClient, LogSource};

/// Local development origins
pub const DEV_PRIMARY_URL: &str = "http://localhost:5001/api";
pub const DEV_SECONDARY_URL: &str = "http://localhost:5002/api";

/// Deployed origins, overridable through configuration
pub const PROD_PRIMARY_URL: &str = "https://logscope-server1.example.com/api";
pub const PROD_SECONDARY_URL: &str = "https://logscope-server2.example.com/api";

pub const LOGIN_FALLBACK: &str = "Error en login";
pub const REGISTER_FALLBACK: &str = "Error al registrar";

// ============ Errors ============

/// Errors talking to a backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response, with the backend's `message` when it sent one
    #[error("Request failed ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a status error from a response body, keeping `message` if present
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty());
        ApiError::Status { status, message }
    }

    /// Text to show the user: the backend's message verbatim, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Result type alias for backend calls
pub type ApiResult<T> = Result<T, ApiError>;

// ============ Wire Types ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// MFA one-time code
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for the session
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: String,
    /// MFA provisioning value (usually an `otpauth://` URI)
    #[serde(default, rename = "mfaSetup")]
    pub mfa_setup: Option<String>,
}

/// `GET /getInfo`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(default, rename = "nodeVersion")]
    pub node_version: Option<String>,
    #[serde(default)]
    pub mensaje: Option<String>,
}

impl ServerInfo {
    /// Node version and message, only when the backend reported a version
    pub fn details(&self) -> Option<(&str, &str)> {
        let version = self.node_version.as_deref().filter(|v| !v.is_empty())?;
        Some((version, self.mensaje.as_deref().unwrap_or("")))
    }
}

/// Error body both backends use
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// ============ Endpoints ============

/// Build-time / config-time environment selecting the backend origins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// Base URLs of the two backends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendUrls {
    pub primary: String,
    pub secondary: String,
}

impl BackendUrls {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::new(DEV_PRIMARY_URL, DEV_SECONDARY_URL),
            Environment::Production => Self::new(PROD_PRIMARY_URL, PROD_SECONDARY_URL),
        }
    }

    /// Full URL of `endpoint`
    pub fn url(&self, endpoint: Endpoint) -> String {
        let base = match endpoint.backend() {
            Backend::Primary => &self.primary,
            Backend::Secondary => &self.secondary,
        };
        format!("{}{}", base.trim_end_matches('/'), endpoint.path())
    }
}

impl Default for BackendUrls {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

/// Which backend serves an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Register,
    Info,
    PrimaryLogs,
    SecondaryLogs,
}

impl Endpoint {
    pub fn backend(self) -> Backend {
        match self {
            Endpoint::SecondaryLogs => Backend::Secondary,
            _ => Backend::Primary,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Login => "/login",
            Endpoint::Register => "/register",
            Endpoint::Info => "/getInfo",
            Endpoint::PrimaryLogs => "/logs",
            Endpoint::SecondaryLogs => "/logs2",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let urls = BackendUrls::for_environment(Environment::Development);
        assert_eq!(urls.url(Endpoint::Login), "http://localhost:5001/api/login");
        assert_eq!(urls.url(Endpoint::Info), "http://localhost:5001/api/getInfo");
        assert_eq!(urls.url(Endpoint::SecondaryLogs), "http://localhost:5002/api/logs2");

        let urls = BackendUrls::new("https://a.example/api/", "https://b.example/api");
        assert_eq!(urls.url(Endpoint::PrimaryLogs), "https://a.example/api/logs");
    }

    #[test]
    fn test_environment_selects_distinct_origins() {
        let dev = BackendUrls::for_environment(Environment::Development);
        let prod = BackendUrls::for_environment(Environment::Production);
        assert_ne!(dev, prod);
        assert_ne!(prod.primary, prod.secondary);
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Production));
    }

    #[test]
    fn test_user_message() {
        let err = ApiError::from_status(401, r#"{"message":"Código MFA inválido"}"#);
        assert_eq!(err.user_message(LOGIN_FALLBACK), "Código MFA inválido");

        let err = ApiError::from_status(500, "<html>oops</html>");
        assert_eq!(err.user_message(LOGIN_FALLBACK), LOGIN_FALLBACK);

        let err = ApiError::from_status(400, r#"{"message":""}"#);
        assert_eq!(err.user_message(REGISTER_FALLBACK), REGISTER_FALLBACK);

        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.user_message(LOGIN_FALLBACK), LOGIN_FALLBACK);
    }

    #[test]
    fn test_wire_names() {
        let info: ServerInfo =
            serde_json::from_str(r#"{"nodeVersion":"v20.1.0","mensaje":"hola"}"#).unwrap();
        assert_eq!(info.node_version.as_deref(), Some("v20.1.0"));

        let reg: RegisterResponse =
            serde_json::from_str(r#"{"message":"ok","mfaSetup":"otpauth://totp/x"}"#).unwrap();
        assert_eq!(reg.mfa_setup.as_deref(), Some("otpauth://totp/x"));
    }

    #[test]
    fn test_server_details_need_node_version() {
        let info: ServerInfo =
            serde_json::from_str(r#"{"nodeVersion":"v20.1.0","mensaje":"hola"}"#).unwrap();
        assert_eq!(info.details(), Some(("v20.1.0", "hola")));

        let info: ServerInfo = serde_json::from_str(r#"{"mensaje":"hola"}"#).unwrap();
        assert_eq!(info.details(), None);
        assert_eq!(ServerInfo::default().details(), None);
    }
}
