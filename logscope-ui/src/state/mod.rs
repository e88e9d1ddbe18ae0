//! State Management
//!
//! Global application state and the browser-backed session store.

pub mod global;
pub mod session;

pub use global::{provide_global_state, GlobalState};
pub use session::LocalStorageSession;
