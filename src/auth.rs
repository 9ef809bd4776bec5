//! Sign-in, sign-out, self-registration and session restore.
//!
//! These are the only places that install or clear credentials on purpose;
//! the resource client clears them on its own when the backend answers 401.

use crate::api::{ApiClient, ApiError};
use crate::error::Error;
use crate::models::{Id, User};
use crate::navigation::Route;
use crate::validation::{Credentials, RegistrationForm};

/// Validate, authenticate, install the session and go to the dashboard.
pub async fn login(client: &ApiClient, username: &str, password: &str) -> Result<User, Error> {
    let credentials = Credentials::new(username.trim(), password);
    credentials.validate()?;

    let response = client.login(&credentials).await.map_err(|e| {
        tracing::info!(username = %credentials.username, error = %e, "Login refused");
        e
    })?;
    let user = response.user.clone();
    client.session().establish(response.token, response.user);
    client.navigator().navigate(Route::Dashboard);
    Ok(user)
}

/// Always ends signed out on `/login`, whatever the backend says.
pub async fn logout(client: &ApiClient) {
    if client.session().is_authenticated() {
        if let Err(e) = client.logout_remote().await {
            tracing::warn!(error = %e, "Remote logout failed, clearing local session anyway");
        }
    }
    client.session().invalidate();
    tracing::info!("Signed out");
    if client.navigator().current() != Route::Login {
        client.navigator().navigate(Route::Login);
    }
}

/// Create a patient account. Returns the new patient profile id.
pub async fn register(client: &ApiClient, form: &RegistrationForm) -> Result<Id, Error> {
    form.validate()?;
    let response = client.register(form).await?;
    tracing::info!(patient_id = response.patient_id, "Patient registered");
    client.navigator().navigate(Route::Login);
    Ok(response.patient_id)
}

/// Re-validate persisted credentials at startup.
///
/// While this runs the guard reports `Loading`. A 401 has already cleared the
/// session by the time it returns; any other failure keeps the stored user.
pub async fn restore(client: &ApiClient) -> Option<User> {
    let session = client.session();
    if !session.is_authenticated() {
        return None;
    }
    session.begin_resolution();
    let result = client.current_user().await;
    match result {
        Ok(user) => session.refresh_user(user),
        Err(ApiError::Unauthorized) => {}
        Err(e) => tracing::warn!(error = %e, "Could not refresh user, keeping stored profile"),
    }
    session.finish_resolution();
    session.user()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::Method;
    use serde_json::json;

    use super::*;
    use crate::error::Notice;
    use crate::models::Role;
    use crate::navigation::{History, Navigator};
    use crate::session::{AuthToken, SessionState};
    use crate::test_support::{fixtures, MockBackend};

    fn setup(backend: &MockBackend, start: Route) -> (ApiClient, Arc<SessionState>, Arc<History>) {
        let session = Arc::new(SessionState::in_memory());
        let history = Arc::new(History::new(start));
        let client = ApiClient::new(&backend.config(), session.clone(), history.clone()).unwrap();
        (client, session, history)
    }

    #[tokio::test]
    async fn login_establishes_session_and_goes_to_dashboard() {
        let backend = MockBackend::start().await;
        backend.on(
            Method::POST,
            "/auth/login/",
            200,
            json!({"token": "abc", "refresh": "def", "user": fixtures::user(7, Role::Praticien)}),
        );
        let (client, session, history) = setup(&backend, Route::Login);

        let user = login(&client, " jdupont ", "secret").await.unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(session.token(), Some(AuthToken::new("abc")));
        assert_eq!(session.role(), Some(Role::Praticien));
        assert_eq!(history.current(), Route::Dashboard);

        let sent = &backend.requests_to(Method::POST, "/auth/login/")[0];
        assert!(sent.authorization.is_none());
        assert_eq!(sent.body, Some(json!({"username": "jdupont", "password": "secret"})));
    }

    #[tokio::test]
    async fn login_blank_fields_never_sent() {
        let backend = MockBackend::start().await;
        let (client, _, _) = setup(&backend, Route::Login);

        let err = login(&client, "  ", "").await.unwrap_err();
        assert!(matches!(err, Error::Validation(ref f) if f.len() == 2));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn wrong_password_is_not_a_session_expiry() {
        let backend = MockBackend::start().await;
        backend.on(Method::POST, "/auth/login/", 401, json!({"message": "Identifiants invalides"}));
        let (client, session, history) = setup(&backend, Route::Login);
        session.establish(AuthToken::new("stale"), fixtures::user(1, Role::Admin));

        let err = login(&client, "admin", "nope").await.unwrap_err();
        assert_eq!(err.notice(), Notice::Alert("Identifiants invalides".into()));
        assert!(session.is_authenticated());
        assert_eq!(history.visited(), vec![Route::Login]);
    }

    #[tokio::test]
    async fn logout_clears_even_when_backend_fails() {
        let backend = MockBackend::start().await;
        backend.on(Method::POST, "/auth/logout/", 500, json!({}));
        let (client, session, history) = setup(&backend, Route::Dashboard);
        session.establish(AuthToken::new("abc"), fixtures::user(1, Role::Admin));

        logout(&client).await;
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert_eq!(history.current(), Route::Login);
        assert_eq!(backend.requests_to(Method::POST, "/auth/logout/").len(), 1);
    }

    #[tokio::test]
    async fn register_returns_patient_id_and_goes_to_login() {
        let backend = MockBackend::start().await;
        backend.on(
            Method::POST,
            "/auth/register/",
            201,
            json!({"message": "Inscription réussie", "patient_id": 31}),
        );
        let (client, _, history) = setup(&backend, Route::Register);
        let form = RegistrationForm {
            username: "mcurie".into(),
            email: "mc@rdv.local".into(),
            first_name: "Marie".into(),
            last_name: "Curie".into(),
            password: "radium-88".into(),
            password2: "radium-88".into(),
            telephone: "0612345678".into(),
            adresse: "Paris".into(),
            date_naissance: chrono::NaiveDate::from_ymd_opt(1990, 6, 15),
            ..Default::default()
        };

        assert_eq!(register(&client, &form).await.unwrap(), 31);
        assert_eq!(history.current(), Route::Login);
    }

    #[tokio::test]
    async fn register_surfaces_backend_field_errors() {
        let backend = MockBackend::start().await;
        backend.on(
            Method::POST,
            "/auth/register/",
            400,
            json!({"username": ["Un utilisateur avec ce nom existe déjà."]}),
        );
        let (client, _, history) = setup(&backend, Route::Register);
        let form = RegistrationForm {
            username: "mcurie".into(),
            email: "mc@rdv.local".into(),
            first_name: "Marie".into(),
            last_name: "Curie".into(),
            password: "pw".into(),
            password2: "pw".into(),
            telephone: "0612345678".into(),
            adresse: "Paris".into(),
            date_naissance: chrono::NaiveDate::from_ymd_opt(1990, 6, 15),
            ..Default::default()
        };

        let notice = register(&client, &form).await.unwrap_err().notice();
        match notice {
            Notice::Inline(fields) => assert!(fields.contains("username")),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(history.current(), Route::Register);
    }

    #[tokio::test]
    async fn restore_refreshes_user() {
        let backend = MockBackend::start().await;
        let mut fresh = fixtures::user(1, Role::Admin);
        fresh.first_name = "Alicia".into();
        backend.on(Method::GET, "/auth/user/", 200, serde_json::to_value(&fresh).unwrap());
        let (client, session, _) = setup(&backend, Route::Dashboard);
        session.establish(AuthToken::new("abc"), fixtures::user(1, Role::Admin));

        let user = restore(&client).await.unwrap();
        assert_eq!(user.first_name, "Alicia");
        assert!(!session.snapshot().loading);
    }

    #[tokio::test]
    async fn restore_with_revoked_token_signs_out() {
        let backend = MockBackend::start().await;
        backend.on(Method::GET, "/auth/user/", 401, json!({}));
        let (client, session, history) = setup(&backend, Route::Dashboard);
        session.establish(AuthToken::new("revoked"), fixtures::user(1, Role::Admin));

        assert!(restore(&client).await.is_none());
        assert!(!session.snapshot().loading);
        assert_eq!(history.current(), Route::Login);
    }

    #[tokio::test]
    async fn restore_keeps_stored_user_when_backend_down() {
        let backend = MockBackend::start().await;
        backend.on(Method::GET, "/auth/user/", 503, json!({}));
        let (client, session, _) = setup(&backend, Route::Dashboard);
        session.establish(AuthToken::new("abc"), fixtures::user(1, Role::Admin));

        assert_eq!(restore(&client).await.map(|u| u.id), Some(1));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn restore_without_token_sends_nothing() {
        let backend = MockBackend::start().await;
        let (client, _, _) = setup(&backend, Route::Login);
        assert!(restore(&client).await.is_none());
        assert!(backend.requests().is_empty());
    }
}
