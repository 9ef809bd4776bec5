//! Access guard: decides, per evaluation, whether a protected screen renders.
//!
//! `check` is a pure predicate over the session snapshot and an allow-list.
//! `enter` composes it with the single side effect (the redirect). Nothing is
//! remembered between evaluations.

use crate::models::Role;
use crate::navigation::{Navigator, Route};
use crate::session::{SessionSnapshot, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Session still resolving: show a loader, never redirect.
    Loading,
    Redirect(Route),
    Allow,
}

/// Fails closed: a user without a role is refused by any non-empty allow-list.
pub fn check(snapshot: &SessionSnapshot, allowed_roles: &[Role]) -> Decision {
    if snapshot.loading {
        return Decision::Loading;
    }
    let Some(user) = &snapshot.user else {
        return Decision::Redirect(Route::Login);
    };
    if allowed_roles.is_empty() {
        return Decision::Allow;
    }
    match user.role {
        Some(role) if allowed_roles.contains(&role) => Decision::Allow,
        _ => Decision::Redirect(Route::Dashboard),
    }
}

/// Evaluate `route` against the live session and perform any redirect.
pub fn enter(route: Route, session: &SessionState, navigator: &dyn Navigator) -> Decision {
    if route.is_public() {
        return Decision::Allow;
    }
    let decision = check(&session.snapshot(), route.allowed_roles());
    tracing::debug!(%route, ?decision, "access guard");
    if let Decision::Redirect(target) = decision {
        navigator.navigate(target);
    }
    decision
}
