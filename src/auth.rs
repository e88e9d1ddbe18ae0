//! Login, registration and logout flows
//!
//! The steps around the HTTP call are shared: validate the form, build the
//! request, then apply the response to the session. The browser UI performs
//! the call with its own fetch client; native callers use [`login`] and
//! [`register`], which drive [`BackendClient`](crate::api::BackendClient).

use std::time::Duration;
use thiserror::Error;

use crate::api::{
    ApiError, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, LOGIN_FALLBACK,
    REGISTER_FALLBACK,
};
use crate::forms::{Field, FormKind, FormState, ValidationError};
use crate::guard::Route;
use crate::session::{SessionError, SessionStore};

/// Pause between a successful login and navigating to the home page
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1000);

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login exitoso";

/// Errors from an authentication flow
#[derive(Error, Debug)]
pub enum AuthError {
    /// Rejected before anything was sent
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Backend rejected the request or could not be reached
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Token could not be stored or removed
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl AuthError {
    /// Inline message for the form
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AuthError::Validation(e) => e.message.clone(),
            AuthError::Api(e) => e.user_message(fallback),
            AuthError::Session(e) => e.to_string(),
        }
    }
}

/// What the login page does after a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub message: String,
    pub redirect_to: Route,
    pub delay: Duration,
}

/// Result of a successful registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub message: String,
    /// MFA provisioning value to show as a QR code
    pub provisioning: Option<String>,
}

/// Validate a login form and build its request
pub fn login_request(form: &FormState) -> Result<LoginRequest, ValidationError> {
    debug_assert_eq!(form.kind(), FormKind::Login);
    form.validate()?;
    Ok(LoginRequest {
        email: form.value(Field::Email).to_string(),
        password: form.value(Field::Password).to_string(),
        token: form.value(Field::MfaCode).to_string(),
    })
}

/// Validate a registration form and build its request.
///
/// The confirmation field is only checked locally and never sent.
pub fn register_request(form: &FormState) -> Result<RegisterRequest, ValidationError> {
    debug_assert_eq!(form.kind(), FormKind::Register);
    form.validate()?;
    Ok(RegisterRequest {
        email: form.value(Field::Email).to_string(),
        username: form.value(Field::Username).to_string(),
        password: form.value(Field::Password).to_string(),
    })
}

/// Store the issued token and schedule the move to the home page
pub fn complete_login<S: SessionStore + ?Sized>(
    session: &S,
    response: &LoginResponse,
) -> Result<LoginOutcome, SessionError> {
    session.write(&response.token)?;
    tracing::info!("Login succeeded, session stored");

    Ok(LoginOutcome {
        message: LOGIN_SUCCESS_MESSAGE.to_string(),
        redirect_to: Route::Home,
        delay: REDIRECT_DELAY,
    })
}

pub fn complete_registration(response: RegisterResponse) -> Enrollment {
    Enrollment {
        message: response.message,
        provisioning: response.mfa_setup.filter(|v| !v.trim().is_empty()),
    }
}

/// Clear the session; the caller navigates to the returned route
pub fn logout<S: SessionStore + ?Sized>(session: &S) -> Result<Route, SessionError> {
    session.clear()?;
    tracing::info!("Logged out");
    Ok(Route::Login)
}

/// Full login against backend 1
#[cfg(feature = "native")]
pub async fn login<S: SessionStore + ?Sized>(
    client: &crate::api::BackendClient,
    session: &S,
    form: &FormState,
) -> Result<LoginOutcome, AuthError> {
    let request = login_request(form)?;
    let response = client.login(&request).await.map_err(|e| {
        tracing::warn!(error = %e, "Login rejected");
        e
    })?;
    Ok(complete_login(session, &response)?)
}

/// Full registration against backend 1
#[cfg(feature = "native")]
pub async fn register(
    client: &crate::api::BackendClient,
    form: &FormState,
) -> Result<Enrollment, AuthError> {
    let request = register_request(form)?;
    let response = client.register(&request).await.map_err(|e| {
        tracing::warn!(error = %e, "Registration rejected");
        e
    })?;
    Ok(complete_registration(response))
}

/// Message for a failed login
pub fn login_failure(error: &AuthError) -> String {
    error.user_message(LOGIN_FALLBACK)
}

/// Message for a failed registration
pub fn register_failure(error: &AuthError) -> String {
    error.user_message(REGISTER_FALLBACK)
}
