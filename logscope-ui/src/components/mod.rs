//! UI Components
//!
//! Reusable Leptos components for the forms and the dashboard.

pub mod card;
pub mod chart;
pub mod form_field;
pub mod loading;
pub mod toast;

pub use card::DashboardCard;
pub use form_field::{FormFeedback, FormField, SubmitButton};
pub use loading::{CardSkeleton, Loading};
pub use toast::Toast;
