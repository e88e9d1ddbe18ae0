//! Pages
//!
//! Top-level page components for each route.

pub mod home;
pub mod login;
pub mod logs;
pub mod register;

pub use home::Home;
pub use login::Login;
pub use logs::Logs;
pub use register::Register;
