//! Logscope Dashboard
//!
//! Login, MFA registration and request-log dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Login with email, password and MFA code
//! - Registration with an MFA enrollment QR code
//! - Protected home and logs pages
//! - Side-by-side charts of two backends' request logs
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Form validation, the route guard and all log aggregation come
//! from the shared `logscope` crate; this crate only fetches and renders.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
