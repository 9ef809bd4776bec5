//! Crate-level error returned by screen controllers, and its mapping to
//! what the user sees.

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::lifecycle::Rejected;
use crate::session::StoreError;
use crate::validation::{FieldErrors, NON_FIELD};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caught locally; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Role or state precondition failed before any request.
    #[error("Transition refused: {0}")]
    Transition(#[from] Rejected),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// User-facing rendering of a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Messages shown next to their inputs.
    Inline(FieldErrors),
    /// Blocking alert with a single message.
    Alert(String),
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::Inline(fields) => fields.to_string(),
            Notice::Alert(message) => message.clone(),
        }
    }
}

pub const MSG_NETWORK: &str = "Erreur de connexion au serveur";
pub const MSG_SESSION_EXPIRED: &str = "Votre session a expiré, veuillez vous reconnecter";
pub const MSG_INVALID_CREDENTIALS: &str = "Identifiants invalides";
pub const MSG_NOT_FOUND: &str = "Élément introuvable";
pub const MSG_FORBIDDEN_ACTION: &str = "Action non autorisée";
pub const MSG_GENERIC: &str = "Une erreur est survenue";

impl Error {
    pub fn notice(&self) -> Notice {
        self.notice_or(MSG_GENERIC)
    }

    /// Like `notice`, with the screen's own wording for otherwise generic
    /// failures (e.g. "Erreur lors de la confirmation").
    pub fn notice_or(&self, fallback: &str) -> Notice {
        match self {
            Error::Validation(fields) => Notice::Inline(fields.clone()),
            Error::Api(api) => api_notice(api, fallback),
            Error::Transition(_) => Notice::Alert(MSG_FORBIDDEN_ACTION.into()),
            Error::Config(_) | Error::Store(_) => Notice::Alert(fallback.into()),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Api(ApiError::Unauthorized))
    }
}

fn api_notice(err: &ApiError, fallback: &str) -> Notice {
    match err {
        ApiError::Rejected { fields, .. } => {
            if fields.iter().any(|(field, _)| field != NON_FIELD) {
                Notice::Inline(fields.clone())
            } else if let Some(message) = fields.get(NON_FIELD) {
                Notice::Alert(message.to_string())
            } else {
                Notice::Alert(fallback.into())
            }
        }
        ApiError::Unauthorized => Notice::Alert(MSG_SESSION_EXPIRED.into()),
        ApiError::InvalidCredentials => Notice::Alert(MSG_INVALID_CREDENTIALS.into()),
        ApiError::NotFound => Notice::Alert(MSG_NOT_FOUND.into()),
        ApiError::Network(_) => Notice::Alert(MSG_NETWORK.into()),
        ApiError::Decode(_) | ApiError::Server { .. } => Notice::Alert(fallback.into()),
    }
}
