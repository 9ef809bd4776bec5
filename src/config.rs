use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "PlateformeRdv";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend used when nothing else is configured (local Django dev server).
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Environment variable overriding the backend base URL.
pub const ENV_API_URL: &str = "RDV_API_URL";
/// Environment variable overriding where credentials are persisted.
pub const ENV_SESSION_FILE: &str = "RDV_SESSION_FILE";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "rdv_client=info,warn"
}

/// Get the application data directory, e.g. `~/.local/share/PlateformeRdv`.
///
/// `None` when the platform exposes no data directory (minimal containers).
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .map(|base| base.join(APP_NAME))
}

/// Default location of the persisted session (token + user).
pub fn session_file() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join("session.json"))
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Connection settings for the REST backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash, e.g. `http://127.0.0.1:8000/api`.
    pub api_base_url: String,
    /// Where credentials survive restarts. `None` keeps them in memory only.
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_file: session_file(),
        }
    }
}

impl ClientConfig {
    /// Build a config for an explicit backend, validating the URL.
    pub fn with_base_url(url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: normalize_base_url(url)?,
            ..Self::default()
        })
    }

    /// Read `RDV_API_URL` / `RDV_SESSION_FILE`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(ENV_API_URL) {
            Ok(url) if !url.trim().is_empty() => Self::with_base_url(&url)?,
            _ => Self::default(),
        };
        if let Ok(path) = std::env::var(ENV_SESSION_FILE) {
            if !path.trim().is_empty() {
                config.session_file = Some(PathBuf::from(path));
            }
        }
        tracing::debug!(api_base_url = %config.api_base_url, "Client configuration loaded");
        Ok(config)
    }

    /// Memory-only credentials (tests, kiosks).
    pub fn without_persistence(mut self) -> Self {
        self.session_file = None;
        self
    }
}

fn normalize_base_url(url: &str) -> Result<String, ConfigError> {
    let trimmed = url.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl {
            url: url.to_string(),
            reason: "missing host".into(),
        });
    }
    Ok(trimmed.to_string())
}
