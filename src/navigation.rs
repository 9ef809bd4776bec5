//! Route table, navigation sink and role-filtered menu.

use std::sync::{Mutex, PoisonError};

use crate::models::{Id, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    RendezVousList,
    RendezVousCreate,
    RendezVousDetail(Id),
    PraticiensList,
    PraticienCreate,
    PraticienEdit(Id),
    PraticienPlanning(Id),
    PatientsList,
    PatientCreate,
    PatientDetail(Id),
    PatientEdit(Id),
    Annulations,
    Rappels,
    Statistiques,
    Logs,
}

const ADMIN: &[Role] = &[Role::Admin];
const STAFF: &[Role] = &[Role::Admin, Role::Praticien];
const ANY: &[Role] = &[];

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".into(),
            Route::Register => "/register".into(),
            Route::Dashboard => "/dashboard".into(),
            Route::RendezVousList => "/rendez-vous".into(),
            Route::RendezVousCreate => "/rendez-vous/create".into(),
            Route::RendezVousDetail(id) => format!("/rendez-vous/{id}"),
            Route::PraticiensList => "/praticiens".into(),
            Route::PraticienCreate => "/praticiens/create".into(),
            Route::PraticienEdit(id) => format!("/praticiens/{id}/edit"),
            Route::PraticienPlanning(id) => format!("/praticiens/{id}/planning"),
            Route::PatientsList => "/patients".into(),
            Route::PatientCreate => "/patients/create".into(),
            Route::PatientDetail(id) => format!("/patients/{id}"),
            Route::PatientEdit(id) => format!("/patients/{id}/edit"),
            Route::Annulations => "/annulations".into(),
            Route::Rappels => "/rappels".into(),
            Route::Statistiques => "/statistiques".into(),
            Route::Logs => "/logs".into(),
        }
    }

    /// Resolve a path. `/` and anything unknown land on the dashboard.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let id = |s: &str| s.parse::<Id>().ok();

        match segments.as_slice() {
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["dashboard"] => Route::Dashboard,
            ["rendez-vous"] => Route::RendezVousList,
            ["rendez-vous", "create"] => Route::RendezVousCreate,
            ["rendez-vous", n] => id(n).map_or(Route::Dashboard, Route::RendezVousDetail),
            ["praticiens"] => Route::PraticiensList,
            ["praticiens", "create"] => Route::PraticienCreate,
            ["praticiens", n, "edit"] => id(n).map_or(Route::Dashboard, Route::PraticienEdit),
            ["praticiens", n, "planning"] => {
                id(n).map_or(Route::Dashboard, Route::PraticienPlanning)
            }
            ["patients"] => Route::PatientsList,
            ["patients", "create"] => Route::PatientCreate,
            ["patients", n] => id(n).map_or(Route::Dashboard, Route::PatientDetail),
            ["patients", n, "edit"] => id(n).map_or(Route::Dashboard, Route::PatientEdit),
            ["annulations"] => Route::Annulations,
            ["rappels"] => Route::Rappels,
            ["statistiques"] => Route::Statistiques,
            ["logs"] => Route::Logs,
            _ => Route::Dashboard,
        }
    }

    /// Roles allowed in. Empty means any authenticated user.
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Route::Login
            | Route::Register
            | Route::Dashboard
            | Route::RendezVousList
            | Route::RendezVousCreate
            | Route::RendezVousDetail(_) => ANY,
            Route::PraticiensList
            | Route::PraticienCreate
            | Route::PraticienEdit(_)
            | Route::PraticienPlanning(_)
            | Route::Rappels
            | Route::Statistiques
            | Route::Logs => ADMIN,
            Route::PatientsList
            | Route::PatientCreate
            | Route::PatientDetail(_)
            | Route::PatientEdit(_)
            | Route::Annulations => STAFF,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where forced redirects and post-action navigation go.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
    fn current(&self) -> Route;
}

/// In-memory navigation history.
pub struct History {
    stack: Mutex<Vec<Route>>,
}

impl History {
    pub fn new(start: Route) -> Self {
        Self {
            stack: Mutex::new(vec![start]),
        }
    }

    /// Every route visited so far, oldest first.
    pub fn visited(&self) -> Vec<Route> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route) {
        tracing::debug!(%route, "navigate");
        self.stack.lock().unwrap_or_else(PoisonError::into_inner).push(route);
    }

    fn current(&self) -> Route {
        self.stack
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
            .unwrap_or(Route::Login)
    }
}

// ─── Menu ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub route: Route,
    pub label: &'static str,
}

const MENU: &[(Route, &str)] = &[
    (Route::Dashboard, "Tableau de bord"),
    (Route::PraticiensList, "Praticiens"),
    (Route::PatientsList, "Patients"),
    (Route::RendezVousList, "Rendez-vous"),
    (Route::Annulations, "Annulations"),
    (Route::Rappels, "Rappels"),
    (Route::Statistiques, "Statistiques"),
    (Route::Logs, "Logs"),
];

/// Navigation entries visible to `role`; nothing without a role.
pub fn menu_for(role: Option<Role>) -> Vec<MenuEntry> {
    let Some(role) = role else {
        return Vec::new();
    };
    MENU.iter()
        .filter(|(route, _)| {
            let allowed = route.allowed_roles();
            allowed.is_empty() || allowed.contains(&role)
        })
        .map(|&(route, label)| MenuEntry { route, label })
        .collect()
}
