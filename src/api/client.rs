//! HTTP plumbing shared by every endpoint: bearer header, JSON in/out,
//! list-envelope unwrapping, status mapping and the global 401 handler.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::error::{from_status, ApiError};
use crate::config::{ClientConfig, APP_NAME, APP_VERSION};
use crate::navigation::{Navigator, Route};
use crate::session::SessionState;

/// How a 401 on this request is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthMode {
    /// Token expired or revoked: clear the session, go to `/login`.
    Session,
    /// Anonymous endpoints (login, register): no bearer is sent and a 401
    /// means wrong credentials. The session is left alone.
    Login,
}

/// Resource client. The session and navigator are injected; there is no
/// hidden global token.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionState>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        session: Arc<SessionState>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("{APP_NAME}/{APP_VERSION}"))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            session,
            navigator,
        })
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_as(method, path, AuthMode::Session)
    }

    /// The token is read fresh for every request.
    fn request_as(&self, method: Method, path: &str, mode: AuthMode) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match (mode, self.session.token()) {
            (AuthMode::Session, Some(token)) => {
                builder.header(reqwest::header::AUTHORIZATION, token.bearer())
            }
            _ => builder,
        }
    }

    /// Drop credentials and force navigation to login (unless already there).
    /// Runs once per failed response.
    fn handle_unauthorized(&self) {
        let had_credentials = self.session.invalidate();
        tracing::warn!(had_credentials, "Backend returned 401, session cleared");
        if self.navigator.current() != Route::Login {
            self.navigator.navigate(Route::Login);
        }
    }

    /// Send and return the raw body of a successful response.
    pub(crate) async fn execute(
        &self,
        builder: RequestBuilder,
        mode: AuthMode,
    ) -> Result<String, ApiError> {
        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!(%method, %path, "request");

        let response = self.http.execute(request).await.map_err(|e| {
            if e.is_connect() {
                tracing::warn!(base_url = %self.base_url, "Backend unreachable");
            }
            ApiError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(match mode {
                AuthMode::Session => {
                    self.handle_unauthorized();
                    ApiError::Unauthorized
                }
                AuthMode::Login => ApiError::InvalidCredentials,
            });
        }
        if !status.is_success() {
            let err = from_status(status.as_u16(), &body);
            if status.is_server_error() {
                tracing::error!(%method, %path, %status, "Backend error");
            } else {
                tracing::debug!(%method, %path, %status, "Request rejected");
            }
            return Err(err);
        }
        Ok(body)
    }

    // ── Typed helpers ───────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let body = self
            .execute(self.request(Method::GET, path).query(query), AuthMode::Session)
            .await?;
        decode(path, &body)
    }

    /// GET a collection; bare list or `{ "results": [...] }`.
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ApiError> {
        let value: Value = self.get(path, query).await?;
        unwrap_list(path, value)
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        mode: AuthMode,
    ) -> Result<T, ApiError> {
        let body = self
            .execute(self.request_as(method, path, mode).json(body), mode)
            .await?;
        decode(path, &body)
    }

    /// POST without a body (action endpoints such as `confirmer`). An empty
    /// 2xx body decodes as `{}`.
    pub(crate) async fn post_action<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self
            .execute(self.request(Method::POST, path), AuthMode::Session)
            .await?;
        if body.trim().is_empty() {
            return decode(path, "{}");
        }
        decode(path, &body)
    }

    /// JSON request whose response body is ignored.
    pub(crate) async fn send_json_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.execute(self.request(method, path).json(body), AuthMode::Session)
            .await
            .map(|_| ())
    }

    /// Request whose response body is ignored.
    pub(crate) async fn send_unit(&self, method: Method, path: &str) -> Result<(), ApiError> {
        self.execute(self.request(method, path), AuthMode::Session)
            .await
            .map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(%path, error = %e, "Failed to decode response");
        ApiError::Decode(format!("{path}: {e}"))
    })
}

/// Pagination envelope: accept a bare array or an object carrying `results`.
pub fn unwrap_list<T: DeserializeOwned>(path: &str, value: Value) -> Result<Vec<T>, ApiError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => {
                tracing::error!(%path, "List response without results");
                return Err(ApiError::Decode(format!("{path}: expected a list")));
            }
        },
        _ => return Err(ApiError::Decode(format!("{path}: expected a list"))),
    };
    serde_json::from_value(Value::Array(items)).map_err(|e| {
        tracing::error!(%path, error = %e, "Failed to decode list item");
        ApiError::Decode(format!("{path}: {e}"))
    })
}
