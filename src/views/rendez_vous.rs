//! Appointment screens: list, detail with lifecycle actions, creation form.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{actor_role, Dialogs, Outcome, Screen};
use crate::api::{ApiClient, ApiError, RdvQuery};
use crate::error::{Error, Notice};
use crate::lifecycle::{self, RdvAction};
use crate::models::filters::{sort_by_date, RendezVousFilter};
use crate::models::{Id, NewAnnulation, Patient, Praticien, RendezVous, RendezVousPayload, Role, User};
use crate::navigation::Route;
use crate::validation::{validate_cancellation_motif, FieldErrors, NewRendezVous};

/// Server query restricting the list to the actor's own profile.
///
/// `None` means the actor can see nothing (no role, or a role without the
/// matching profile).
pub(crate) fn own_query(user: Option<&User>) -> Option<RdvQuery> {
    let user = user?;
    match user.role? {
        Role::Admin => Some(RdvQuery::default()),
        Role::Praticien => user.praticien_id().map(RdvQuery::for_praticien),
        Role::Patient => user.patient_id().map(RdvQuery::for_patient),
    }
}

/// Drop records outside the actor's own profile, whatever the backend sent.
pub(crate) fn scope_to_actor(list: Vec<RendezVous>, user: Option<&User>) -> Vec<RendezVous> {
    let Some(query) = own_query(user) else {
        return Vec::new();
    };
    list.into_iter()
        .filter(|r| query.praticien_id.map_or(true, |id| r.praticien_id() == id))
        .filter(|r| query.patient_id.map_or(true, |id| r.patient_id() == id))
        .collect()
}

// ═══════════════════════════════════════════════════════════
// List
// ═══════════════════════════════════════════════════════════

pub struct RendezVousListView {
    client: ApiClient,
    screen: Screen<Vec<RendezVous>>,
    pub filter: RendezVousFilter,
}

impl RendezVousListView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            screen: Screen::default(),
            filter: RendezVousFilter::default(),
        }
    }

    pub fn screen(&self) -> &Screen<Vec<RendezVous>> {
        &self.screen
    }

    pub async fn load(&mut self) -> Result<(), Error> {
        self.screen.begin();
        let user = self.client.session().user();
        let result = match own_query(user.as_ref()) {
            Some(query) => self
                .client
                .list_rendez_vous(&query)
                .await
                .map(|list| {
                    let mut list = scope_to_actor(list, user.as_ref());
                    sort_by_date(&mut list);
                    list
                })
                .map_err(Error::from),
            None => Ok(Vec::new()),
        };
        self.screen
            .settle(result, "Erreur lors du chargement des rendez-vous")
    }

    /// Loaded appointments passing the current filter, soonest first.
    pub fn visible(&self) -> Vec<&RendezVous> {
        self.screen
            .data()
            .map(|list| self.filter.apply(list))
            .unwrap_or_default()
    }

    pub fn can_create(&self) -> bool {
        self.client.session().role().is_some()
    }
}

// ═══════════════════════════════════════════════════════════
// Detail
// ═══════════════════════════════════════════════════════════

pub struct RendezVousDetailView {
    client: ApiClient,
    dialogs: Arc<dyn Dialogs>,
    id: Id,
    screen: Screen<RendezVous>,
    /// Inline errors of the cancellation form.
    pub cancellation_errors: FieldErrors,
}

impl RendezVousDetailView {
    pub fn new(client: ApiClient, dialogs: Arc<dyn Dialogs>, id: Id) -> Self {
        Self {
            client,
            dialogs,
            id,
            screen: Screen::default(),
            cancellation_errors: FieldErrors::new(),
        }
    }

    pub fn screen(&self) -> &Screen<RendezVous> {
        &self.screen
    }

    pub fn rdv(&self) -> Option<&RendezVous> {
        self.screen.data()
    }

    /// On a missing record the user is sent back to the list.
    pub async fn load(&mut self) -> Result<(), Error> {
        self.screen.begin();
        let result = self.client.get_rendez_vous(self.id).await.map_err(Error::from);
        let missing = matches!(result, Err(Error::Api(ApiError::NotFound)));
        let settled = self
            .screen
            .settle(result, "Erreur lors du chargement du rendez-vous");
        if missing {
            self.client.navigator().navigate(Route::RendezVousList);
        }
        settled
    }

    /// Buttons to show for the loaded record and the signed-in role.
    pub fn available_actions(&self) -> Vec<RdvAction> {
        match self.rdv() {
            Some(rdv) => lifecycle::available_actions(rdv.statut, self.client.session().role()),
            None => Vec::new(),
        }
    }

    pub async fn confirm(&mut self) -> Result<Outcome, Error> {
        self.run(RdvAction::Confirm, "").await
    }

    /// Raise a cancellation request. A blank motif is refused inline.
    pub async fn request_cancellation(&mut self, motif: &str) -> Result<Outcome, Error> {
        self.run(RdvAction::RequestCancellation, motif).await
    }

    pub async fn complete(&mut self) -> Result<Outcome, Error> {
        self.run(RdvAction::Complete, "").await
    }

    pub async fn mark_absent(&mut self) -> Result<Outcome, Error> {
        self.run(RdvAction::MarkAbsent, "").await
    }

    async fn run(&mut self, action: RdvAction, motif: &str) -> Result<Outcome, Error> {
        let fallback = match action {
            RdvAction::Confirm => "Erreur lors de la confirmation",
            RdvAction::RequestCancellation => "Erreur lors de la demande d'annulation",
            RdvAction::Complete | RdvAction::MarkAbsent => "Erreur lors de la mise à jour du rendez-vous",
        };
        match self.perform(action, motif).await {
            Ok(Outcome::Declined) => Ok(Outcome::Declined),
            Ok(Outcome::Done) => {
                tracing::info!(rdv_id = self.id, action = action.as_str(), "appointment action done");
                if let Err(e) = self.load().await {
                    tracing::warn!(rdv_id = self.id, error = %e, "refetch after action failed");
                }
                Ok(Outcome::Done)
            }
            Err(Error::Validation(fields)) => {
                self.cancellation_errors = fields.clone();
                Err(self.screen.fail(Error::Validation(fields), fallback))
            }
            Err(e) => Err(self.screen.fail(e, fallback)),
        }
    }

    async fn perform(&mut self, action: RdvAction, motif: &str) -> Result<Outcome, Error> {
        let rdv = self.rdv().cloned().ok_or(ApiError::NotFound)?;
        let motif = if action == RdvAction::RequestCancellation {
            let motif = validate_cancellation_motif(motif)?;
            self.cancellation_errors = FieldErrors::new();
            motif
        } else {
            String::new()
        };
        let next = lifecycle::apply_transition(rdv.statut, action, self.client.session().role())?;

        if !self.dialogs.confirm(action.prompt()) {
            return Ok(Outcome::Declined);
        }

        match action {
            RdvAction::Confirm => {
                self.client.confirmer_rendez_vous(rdv.id).await?;
            }
            RdvAction::RequestCancellation => {
                let request = NewAnnulation {
                    rdv_id: rdv.id,
                    motif,
                };
                self.client.submit_annulation(&request).await?;
            }
            RdvAction::Complete | RdvAction::MarkAbsent => {
                let payload = RendezVousPayload::with_statut(&rdv, next);
                self.client.update_rendez_vous(rdv.id, &payload).await?;
            }
        }
        Ok(Outcome::Done)
    }
}

// ═══════════════════════════════════════════════════════════
// Create
// ═══════════════════════════════════════════════════════════

/// Selector data for the creation form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateChoices {
    pub praticiens: Vec<Praticien>,
    /// Empty for patients, who always book for themselves.
    pub patients: Vec<Patient>,
}

pub struct RendezVousCreateView {
    client: ApiClient,
    screen: Screen<CreateChoices>,
    pub form: NewRendezVous,
    pub errors: FieldErrors,
}

impl RendezVousCreateView {
    pub fn new(client: ApiClient) -> Self {
        let form = NewRendezVous {
            patient_id: client.session().user().and_then(|u| u.patient_id()),
            ..Default::default()
        };
        Self {
            client,
            screen: Screen::default(),
            form,
            errors: FieldErrors::new(),
        }
    }

    pub fn screen(&self) -> &Screen<CreateChoices> {
        &self.screen
    }

    pub fn choices(&self) -> Option<&CreateChoices> {
        self.screen.data()
    }

    /// Whether the patient selector is shown.
    pub fn asks_for_patient(&self) -> bool {
        actor_role(self.client.session().user().as_ref()) != Some(Role::Patient)
    }

    pub async fn load(&mut self) -> Result<(), Error> {
        self.screen.begin();
        let result = if self.asks_for_patient() {
            tokio::try_join!(self.client.list_praticiens(Some(true)), self.client.list_patients())
                .map(|(praticiens, patients)| CreateChoices { praticiens, patients })
        } else {
            self.client
                .list_praticiens(Some(true))
                .await
                .map(|praticiens| CreateChoices {
                    praticiens,
                    patients: Vec::new(),
                })
        };
        self.screen
            .settle(result.map_err(Error::from), "Erreur lors du chargement du formulaire")
    }

    /// Validate and post. On success the user lands on the appointment list.
    pub async fn submit(&mut self, now: DateTime<Utc>) -> Result<RendezVous, Error> {
        let fallback = "Erreur lors de la création du rendez-vous";
        let Some(actor) = self.client.session().user() else {
            return Err(self.screen.fail(ApiError::Unauthorized.into(), fallback));
        };
        let payload = match self.form.validate(&actor, now) {
            Ok(payload) => payload,
            Err(fields) => {
                self.errors = fields.clone();
                return Err(self.screen.fail(fields.into(), fallback));
            }
        };
        self.errors = FieldErrors::new();

        match self.client.create_rendez_vous(&payload).await {
            Ok(created) => {
                tracing::info!(rdv_id = created.id, "appointment created");
                self.client.navigator().navigate(Route::RendezVousList);
                Ok(created)
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
