pub mod api;
pub mod auth;

pub use api::{ApiClient, ApiError, CreateBookingRequest};
pub use auth::AuthProvider;
