//! Backend API
//!
//! Browser fetch client for the two log backends.

pub mod client;

pub use client::{
    backend_urls, fetch_dashboard_logs, fetch_logs, login, register, server_info,
};
