//! Global Application State
//!
//! Reactive state management using Leptos signals.

use leptos::*;
use logscope::api::LoginResponse;
use logscope::auth::{self, LoginOutcome};
use logscope::guard::Route;
use logscope::session::{SessionError, SessionStore, TokenClaims};

use super::session::LocalStorageSession;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Mirrors whether a token is stored, so guarded views re-render on
    /// login and logout
    pub authenticated: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        authenticated: create_rw_signal(LocalStorageSession.is_authenticated()),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Claims of the stored token, for display only
    pub fn claims(&self) -> Option<TokenClaims> {
        if !self.authenticated.get() {
            return None;
        }
        LocalStorageSession.claims()
    }

    /// Store the token from a successful login
    pub fn sign_in(&self, response: &LoginResponse) -> Result<LoginOutcome, SessionError> {
        let outcome = auth::complete_login(&LocalStorageSession, response)?;
        self.authenticated.set(true);
        Ok(outcome)
    }

    /// Drop the stored token and return where to go next
    pub fn sign_out(&self) -> Route {
        if let Err(e) = auth::logout(&LocalStorageSession) {
            web_sys::console::error_1(&format!("Failed to clear session: {}", e).into());
        }
        self.authenticated.set(false);
        Route::Login
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}
