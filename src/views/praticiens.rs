//! Practitioner administration: list, create/edit form, planning.

use std::sync::Arc;

use super::{Dialogs, Outcome, Screen, StatusCounts};
use crate::api::{ApiClient, ApiError, RdvQuery};
use crate::error::{Error, Notice};
use crate::models::filters::{sort_by_date, PraticienFilter};
use crate::models::{Id, Praticien, RendezVous};
use crate::navigation::Route;
use crate::validation::{FieldErrors, FormMode, PraticienForm};

pub struct PraticiensView {
    client: ApiClient,
    dialogs: Arc<dyn Dialogs>,
    screen: Screen<Vec<Praticien>>,
    pub filter: PraticienFilter,
}

impl PraticiensView {
    pub fn new(client: ApiClient, dialogs: Arc<dyn Dialogs>) -> Self {
        Self {
            client,
            dialogs,
            screen: Screen::default(),
            filter: PraticienFilter::default(),
        }
    }

    pub fn screen(&self) -> &Screen<Vec<Praticien>> {
        &self.screen
    }

    pub async fn load(&mut self) -> Result<(), Error> {
        self.screen.begin();
        let result = self.client.list_praticiens(None).await.map_err(Error::from);
        self.screen
            .settle(result, "Erreur lors du chargement des praticiens")
    }

    pub fn visible(&self) -> Vec<&Praticien> {
        self.screen
            .data()
            .map(|list| self.filter.apply(list))
            .unwrap_or_default()
    }

    pub async fn delete(&mut self, id: Id) -> Result<Outcome, Error> {
        if !self
            .dialogs
            .confirm("Êtes-vous sûr de vouloir supprimer ce praticien ?")
        {
            return Ok(Outcome::Declined);
        }
        if let Err(e) = self.client.delete_praticien(id).await {
            return Err(self.screen.fail(e.into(), "Erreur lors de la suppression"));
        }
        tracing::info!(praticien_id = id, "practitioner deleted");
        if let Err(e) = self.load().await {
            tracing::warn!(praticien_id = id, error = %e, "refetch after delete failed");
        }
        Ok(Outcome::Done)
    }
}

// ═══════════════════════════════════════════════════════════
// Create / edit
// ═══════════════════════════════════════════════════════════

fn prefill(praticien: &Praticien) -> PraticienForm {
    PraticienForm {
        username: String::new(),
        password: String::new(),
        civilite: Some(praticien.civilite),
        first_name: praticien.user.first_name.clone(),
        last_name: praticien.user.last_name.clone(),
        email: praticien.user.email.clone(),
        telephone: praticien.telephone.clone(),
        specialite: praticien.specialite.clone(),
        numero_rpps: praticien.numero_rpps.clone().unwrap_or_default(),
        actif: praticien.actif,
    }
}

pub struct PraticienFormView {
    client: ApiClient,
    id: Option<Id>,
    screen: Screen<Praticien>,
    pub form: PraticienForm,
    pub errors: FieldErrors,
}

impl PraticienFormView {
    pub fn create(client: ApiClient) -> Self {
        Self {
            client,
            id: None,
            screen: Screen::default(),
            form: PraticienForm::default(),
            errors: FieldErrors::new(),
        }
    }

    /// Call `load` before showing the form.
    pub fn edit(client: ApiClient, id: Id) -> Self {
        Self {
            id: Some(id),
            ..Self::create(client)
        }
    }

    pub fn mode(&self) -> FormMode {
        if self.id.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        }
    }

    pub fn screen(&self) -> &Screen<Praticien> {
        &self.screen
    }

    /// Prefill from the stored record; a failed load goes back to the list.
    pub async fn load(&mut self) -> Result<(), Error> {
        let Some(id) = self.id else {
            return Ok(());
        };
        self.screen.begin();
        let result = self.client.get_praticien(id).await.map_err(Error::from);
        if let Ok(praticien) = &result {
            self.form = prefill(praticien);
        }
        let settled = self
            .screen
            .settle(result, "Erreur lors du chargement du praticien");
        if settled.is_err() {
            self.client.navigator().navigate(Route::PraticiensList);
        }
        settled
    }

    pub async fn submit(&mut self) -> Result<Praticien, Error> {
        let mode = self.mode();
        let fallback = match mode {
            FormMode::Create => "Erreur lors de la création du praticien",
            FormMode::Edit => "Erreur lors de la modification",
        };
        if let Err(fields) = self.form.validate(mode) {
            self.errors = fields.clone();
            return Err(self.screen.fail(fields.into(), fallback));
        }
        self.errors = FieldErrors::new();

        let result = match self.id {
            Some(id) => self.client.update_praticien(id, &self.form).await,
            None => self.client.create_praticien(&self.form).await,
        };
        match result {
            Ok(saved) => {
                tracing::info!(praticien_id = saved.id, ?mode, "practitioner saved");
                self.client.navigator().navigate(Route::PraticiensList);
                Ok(saved)
            }
            Err(e) => {
                let err = self.screen.fail(e.into(), fallback);
                if let Some(Notice::Inline(fields)) = self.screen.notice() {
                    self.errors = fields.clone();
                }
                Err(err)
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Planning
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct PraticienPlanning {
    pub praticien: Praticien,
    /// Soonest first.
    pub rendez_vous: Vec<RendezVous>,
    pub counts: StatusCounts,
}

pub struct PraticienPlanningView {
    client: ApiClient,
    id: Id,
    screen: Screen<PraticienPlanning>,
}

impl PraticienPlanningView {
    pub fn new(client: ApiClient, id: Id) -> Self {
        Self {
            client,
            id,
            screen: Screen::default(),
        }
    }

    pub fn screen(&self) -> &Screen<PraticienPlanning> {
        &self.screen
    }

    pub fn planning(&self) -> Option<&PraticienPlanning> {
        self.screen.data()
    }

    /// The practitioner must load; their appointment list may come back empty.
    pub async fn load(&mut self) -> Result<(), Error> {
        self.screen.begin();
        let query = RdvQuery::for_praticien(self.id);
        let (praticien, rdv) = tokio::join!(
            self.client.get_praticien(self.id),
            self.client.list_rendez_vous(&query)
        );
        let result = match praticien {
            Ok(praticien) => {
                let mut rendez_vous: Vec<RendezVous> = match rdv {
                    Ok(list) => list.into_iter().filter(|r| r.praticien_id() == self.id).collect(),
                    Err(e) => {
                        tracing::warn!(praticien_id = self.id, error = %e, "planning appointments unavailable");
                        Vec::new()
                    }
                };
                sort_by_date(&mut rendez_vous);
                let counts = StatusCounts::of(&rendez_vous);
                Ok(PraticienPlanning {
                    praticien,
                    rendez_vous,
                    counts,
                })
            }
            Err(e) => Err(Error::from(e)),
        };
        let missing = matches!(result, Err(Error::Api(ApiError::NotFound)));
        let settled = self
            .screen
            .settle(result, "Erreur lors du chargement du praticien");
        if missing {
            self.client.navigator().navigate(Route::PraticiensList);
        }
        settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, StatutRdv};
    use crate::navigation::Navigator;
    use crate::test_support::{fixtures, signed_in, MockBackend, ScriptedDialogs};
    use axum::http::Method;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn praticiens_json() -> serde_json::Value {
        let mut inactive = fixtures::praticien(4, "Claire", "Bernard", "Pédiatrie");
        inactive.actif = false;
        json!([
            fixtures::praticien(3, "Jean", "Dupont", "Cardiologie"),
            inactive,
            fixtures::praticien(5, "Luc", "Moreau", "Dermatologie"),
        ])
    }

    #[tokio::test]
    async fn search_and_actif_filter() {
        let backend = MockBackend::start().await;
        backend.on(Method::GET, "/praticiens/", 200, praticiens_json());
        let (client, _, _) = signed_in(&backend, Role::Admin, Route::PraticiensList);
        let mut view = PraticiensView::new(client, ScriptedDialogs::accepting());
        view.load().await.unwrap();
        assert_eq!(view.visible().len(), 3);

        view.filter.search = Some("cardio".into());
        assert_eq!(view.visible()[0].id, 3);

        view.filter.search = None;
        view.filter.actif = Some(false);
        assert_eq!(view.visible().iter().map(|p| p.id).collect::<Vec<_>>(), vec![4]);
    }

    #[tokio::test]
    async fn delete_confirms_then_refetches() {
        let backend = MockBackend::start().await;
        backend.on(Method::GET, "/praticiens/", 200, praticiens_json());
        backend.on(Method::GET, "/praticiens/", 200, json!([fixtures::praticien(3, "Jean", "Dupont", "Cardiologie")]));
        backend.on(Method::DELETE, "/praticiens/5/", 204, serde_json::Value::Null);
        let (client, _, _) = signed_in(&backend, Role::Admin, Route::PraticiensList);
        let dialogs = ScriptedDialogs::accepting();
        let mut view = PraticiensView::new(client, dialogs.clone());
        view.load().await.unwrap();

        assert_eq!(view.delete(5).await.unwrap(), Outcome::Done);
        assert_eq!(view.visible().len(), 1);
        assert_eq!(dialogs.prompts(), vec!["Êtes-vous sûr de vouloir supprimer ce praticien ?"]);
    }

    #[tokio::test]
    async fn failed_delete_keeps_list() {
        let backend = MockBackend::start().await;
        backend.on(Method::GET, "/praticiens/", 200, praticiens_json());
        backend.on(Method::DELETE, "/praticiens/5/", 500, json!({}));
        let (client, _, _) = signed_in(&backend, Role::Admin, Route::PraticiensList);
        let mut view = PraticiensView::new(client, ScriptedDialogs::accepting());
        view.load().await.unwrap();

        assert!(view.delete(5).await.is_err());
        assert_eq!(view.visible().len(), 3);
        assert_eq!(
            view.screen().notice(),
            Some(&Notice::Alert("Erreur lors de la suppression".into()))
        );
    }

    #[tokio::test]
    async fn edit_prefills_and_puts() {
        let backend = MockBackend::start().await;
        let praticien = fixtures::praticien(3, "Jean", "Dupont", "Cardiologie");
        backend.on(Method::GET, "/praticiens/3/", 200, serde_json::to_value(&praticien).unwrap());
        backend.on(Method::PUT, "/praticiens/3/", 200, serde_json::to_value(&praticien).unwrap());
        let (client, _, history) = signed_in(&backend, Role::Admin, Route::PraticienEdit(3));
        let mut view = PraticienFormView::edit(client, 3);

        view.load().await.unwrap();
        assert_eq!(view.mode(), FormMode::Edit);
        assert_eq!(view.form.specialite, "Cardiologie");
        view.form.email = "jean.dupont@rdv.local".into();
        view.form.specialite = "Cardiologie interventionnelle".into();

        view.submit().await.unwrap();
        let body = backend.requests_to(Method::PUT, "/praticiens/3/")[0].body.clone().unwrap();
        assert_eq!(body["specialite"], "Cardiologie interventionnelle");
        assert!(body.get("password").is_none());
        assert_eq!(history.current(), Route::PraticiensList);
    }

    #[tokio::test]
    async fn create_requires_credentials() {
        let backend = MockBackend::start().await;
        let (client, _, _) = signed_in(&backend, Role::Admin, Route::PraticienCreate);
        let mut view = PraticienFormView::create(client);
        view.form.first_name = "Jean".into();

        assert!(view.submit().await.is_err());
        assert!(view.errors.contains("username"));
        assert!(view.errors.contains("password"));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn planning_counts() {
        let backend = MockBackend::start().await;
        let now = Utc::now();
        backend.on(
            Method::GET,
            "/praticiens/3/",
            200,
            serde_json::to_value(fixtures::praticien(3, "Jean", "Dupont", "Cardiologie")).unwrap(),
        );
        backend.on(
            Method::GET,
            "/rendez-vous/",
            200,
            json!([
                fixtures::rdv(2, StatutRdv::EnAttente, now + Duration::days(2)),
                fixtures::rdv(1, StatutRdv::Confirme, now + Duration::days(1)),
            ]),
        );
        let (client, _, _) = signed_in(&backend, Role::Admin, Route::PraticienPlanning(3));
        let mut view = PraticienPlanningView::new(client, 3);

        view.load().await.unwrap();
        let planning = view.planning().unwrap();
        assert_eq!(planning.rendez_vous.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(planning.counts.confirme, 1);
        assert_eq!(planning.counts.en_attente, 1);
        assert_eq!(
            backend.requests_to(Method::GET, "/rendez-vous/")[0].query.as_deref(),
            Some("praticien_id=3")
        );
    }

    #[tokio::test]
    async fn unknown_practitioner_returns_to_list() {
        let backend = MockBackend::start().await;
        backend.on(Method::GET, "/rendez-vous/", 200, json!([]));
        let (client, _, history) = signed_in(&backend, Role::Admin, Route::PraticienPlanning(9));
        let mut view = PraticienPlanningView::new(client, 9);

        assert!(view.load().await.is_err());
        assert_eq!(history.current(), Route::PraticiensList);
    }
}
