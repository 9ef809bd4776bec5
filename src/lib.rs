pub mod api; // Resource client over the booking REST backend
pub mod auth; // Login, logout, registration, session restore
pub mod config;
pub mod error;
pub mod guard; // Access guard for protected screens
pub mod lifecycle; // Appointment status machine and cancellation review
pub mod models;
pub mod navigation;
pub mod session; // Token + user, persisted between runs
pub mod validation;
pub mod views; // Per-screen controllers

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

pub use api::{ApiClient, ApiError};
pub use config::ClientConfig;
pub use error::{Error, Notice};
pub use navigation::{History, Navigator, Route};
pub use session::SessionState;

/// Install the fmt subscriber. `RUST_LOG` wins over the default filter.
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Open the persisted session described by `config` and build a client on it.
///
/// Call `auth::restore` afterwards to re-validate any stored token.
pub fn connect(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> Result<ApiClient, Error> {
    let session = Arc::new(SessionState::from_config(config));
    tracing::info!(
        version = config::APP_VERSION,
        api = %config.api_base_url,
        signed_in = session.is_authenticated(),
        "Starting {}",
        config::APP_NAME
    );
    ApiClient::new(config, session, navigator).map_err(Error::from)
}

/// `connect` with the configuration read from `RDV_API_URL` / `RDV_SESSION_FILE`.
pub fn connect_from_env(navigator: Arc<dyn Navigator>) -> Result<ApiClient, Error> {
    let config = ClientConfig::from_env()?;
    connect(&config, navigator)
}
