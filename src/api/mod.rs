//! Resource client for the booking backend's REST API.
//!
//! Bearer-token JSON over HTTP. Collections arrive either bare or wrapped in
//! a `results` envelope and are unwrapped before reaching screen logic. Any
//! 401 clears the session and sends the user to `/login`.

pub mod client;
pub mod endpoints;
pub mod error;

pub use client::{unwrap_list, ApiClient};
pub use endpoints::{ConfirmResponse, LoginResponse, RdvQuery, RegistrationResponse};
pub use error::{parse_field_errors, ApiError};
