//! # Logscope
//!
//! Authentication and request-log dashboard for two backend servers.
//!
//! The core is platform neutral and shared by the browser UI
//! (`logscope-ui`) and the native `logscope` command-line client.
//!
//! ## Modules
//!
//! - [`forms`]: login / registration form state and validation
//! - [`auth`]: login, registration and logout flows
//! - [`mfa`]: QR rendering of the MFA enrollment value
//! - [`session`]: token storage and display-only claim decoding
//! - [`guard`]: route table and access decisions
//! - [`api`]: backend wire types, endpoints and (native) HTTP client
//! - [`logs`]: log entries, aggregation and chart series
//! - [`dashboard`]: server selector and dashboard cards
//! - [`config`]: TOML configuration with environment overrides (native)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logscope::api::{BackendClient, BackendUrls};
//! use logscope::api::client::fetch_dashboard_logs;
//! use logscope::dashboard::{DashboardView, ServerFilter};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BackendClient::new(BackendUrls::default(), Duration::from_secs(10))?;
//!
//!     let logs = fetch_dashboard_logs(&client).await;
//!     let view = DashboardView::build(&logs, ServerFilter::All);
//!
//!     for card in &view.cards {
//!         println!("{}", card.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
#[cfg(feature = "native")]
pub mod config;
pub mod dashboard;
pub mod forms;
pub mod guard;
pub mod logs;
pub mod mfa;
pub mod session;

// Re-export top-level types for convenience
pub use api::{
    ApiError, ApiResult, Backend, BackendUrls, Endpoint, Environment, LoginRequest, LoginResponse,
    RegisterRequest, RegisterResponse, ServerInfo,
};

#[cfg(feature = "native")]
pub use api::{BackendClient, LogSource};

pub use auth::{AuthError, Enrollment, LoginOutcome, REDIRECT_DELAY};

#[cfg(feature = "native")]
pub use config::{BackendsConfig, Config, ConfigError, LoggingConfig, SessionConfig};

pub use dashboard::{
    Card, CardBody, Dashboard, DashboardPhase, DashboardView, ServerFilter, ServerLogs, StatLine,
};

pub use forms::{Field, FormAction, FormKind, FormState, ValidationError};

pub use guard::{resolve, Access, Route};

pub use logs::{CategoryCounts, LogEntry, LogField};

pub use mfa::{EnrollmentCode, MfaError};

pub use session::{MemorySessionStore, SessionError, SessionStore, TokenClaims, TokenError};

#[cfg(feature = "native")]
pub use session::FileSessionStore;
