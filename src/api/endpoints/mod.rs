//! Typed endpoint wrappers, one module per backend resource.
//!
//! Each module adds an `impl ApiClient` block; paths are relative to the
//! configured base URL and always end with `/`.

pub mod annulations;
pub mod auth;
pub mod logs;
pub mod patients;
pub mod praticiens;
pub mod rappels;
pub mod rendez_vous;
pub mod statistiques;

pub use auth::{LoginResponse, RegistrationResponse};
pub use rendez_vous::{ConfirmResponse, RdvQuery};

/// `Some(true)` → `"true"`, as the backend compares lowercase strings.
pub(crate) fn bool_param(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}
