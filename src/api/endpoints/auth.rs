//! Authentication endpoints.
//!
//! - `POST /auth/login/` → token, refresh token and user
//! - `POST /auth/logout/`
//! - `POST /auth/register/` → new patient id
//! - `GET /auth/user/` → current user

use reqwest::Method;
use serde::Deserialize;

use crate::api::client::{ApiClient, AuthMode};
use crate::api::error::ApiError;
use crate::models::{Id, User};
use crate::session::AuthToken;
use crate::validation::{Credentials, RegistrationForm};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: AuthToken,
    #[serde(default)]
    pub refresh: Option<AuthToken>,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationResponse {
    #[serde(default)]
    pub message: String,
    pub patient_id: Id,
}

impl ApiClient {
    /// A 401 here means wrong credentials, not an expired session.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.send_json(Method::POST, "/auth/login/", credentials, AuthMode::Login)
            .await
    }

    pub async fn logout_remote(&self) -> Result<(), ApiError> {
        self.send_unit(Method::POST, "/auth/logout/").await
    }

    pub async fn register(
        &self,
        form: &RegistrationForm,
    ) -> Result<RegistrationResponse, ApiError> {
        self.send_json(Method::POST, "/auth/register/", form, AuthMode::Login)
            .await
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/auth/user/", &[]).await
    }
}
