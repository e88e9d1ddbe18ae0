//! Routes and the route guard
//!
//! The guard is a usability gate: a protected page renders when any
//! non-empty token is stored. Expiry and signature are not checked.

use std::fmt;

use crate::session::SessionStore;

/// Pages of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Home,
    Logs,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Home => "/home",
            Route::Logs => "/logs",
        }
    }

    /// Resolve a location path; unknown paths fall back to the login page
    pub fn parse(path: &str) -> Route {
        let path = path.split(|c| c == '?' || c == '#').next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "/register" => Route::Register,
            "/home" => Route::Home,
            "/logs" => Route::Logs,
            _ => Route::Login,
        }
    }

    /// Whether the page requires a stored session
    pub fn is_protected(self) -> bool {
        matches!(self, Route::Home | Route::Logs)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a guarded navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Render(Route),
    Redirect(Route),
}

/// Decide whether `route` renders or redirects to login
pub fn resolve<S: SessionStore + ?Sized>(route: Route, session: &S) -> Access {
    if route.is_protected() && !session.is_authenticated() {
        tracing::debug!(route = %route, "No session, redirecting to login");
        Access::Redirect(Route::Login)
    } else {
        Access::Render(route)
    }
}
