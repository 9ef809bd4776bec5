//! Patient records (staff side): list, create/edit form, detail with history.

use std::sync::Arc;

use super::{Dialogs, Outcome, Screen, StatusCounts};
use crate::api::{ApiClient, ApiError, RdvQuery};
use crate::error::{Error, Notice};
use crate::models::filters::{sort_by_date, PatientFilter};
use crate::models::{Id, Patient, RendezVous};
use crate::navigation::Route;
use crate::validation::{FieldErrors, FormMode, PatientForm};

pub struct PatientsView {
    client: ApiClient,
    dialogs: Arc<dyn Dialogs>,
    screen: Screen<Vec<Patient>>,
    pub filter: PatientFilter,
}

impl PatientsView {
    pub fn new(client: ApiClient, dialogs: Arc<dyn Dialogs>) -> Self {
        Self {
            client,
            dialogs,
            screen: Screen::default(),
            filter: PatientFilter::default(),
        }
    }

    pub fn screen(&self) -> &Screen<Vec<Patient>> {
        &self.screen
    }

    pub async fn load(&mut self) -> Result<(), Error> {
        self.screen.begin();
        let result = self.client.list_patients().await.map_err(Error::from);
        self.screen
            .settle(result, "Erreur lors du chargement des patients")
    }

    pub fn visible(&self) -> Vec<&Patient> {
        self.screen
            .data()
            .map(|list| self.filter.apply(list))
            .unwrap_or_default()
    }

    pub async fn delete(&mut self, id: Id) -> Result<Outcome, Error> {
        if !self
            .dialogs
            .confirm("Êtes-vous sûr de vouloir supprimer ce patient ?")
        {
            return Ok(Outcome::Declined);
        }
        if let Err(e) = self.client.delete_patient(id).await {
            return Err(self.screen.fail(e.into(), "Erreur lors de la suppression"));
        }
        tracing::info!(patient_id = id, "patient deleted");
        if let Err(e) = self.load().await {
            tracing::warn!(patient_id = id, error = %e, "refetch after delete failed");
        }
        Ok(Outcome::Done)
    }
}

// ── Create / edit ──────────────────────────────────────────

pub struct PatientFormView {
    client: ApiClient,
    id: Option<Id>,
    screen: Screen<Patient>,
    pub form: PatientForm,
    pub errors: FieldErrors,
}

impl PatientFormView {
    pub fn create(client: ApiClient) -> Self {
        Self {
            client,
            id: None,
            screen: Screen::default(),
            form: PatientForm::default(),
            errors: FieldErrors::new(),
        }
    }

    pub fn edit(client: ApiClient, id: Id) -> Self {
        Self {
            id: Some(id),
            ..Self::create(client)
        }
    }

    pub fn mode(&self) -> FormMode {
        match self.id {
            Some(_) => FormMode::Edit,
            None => FormMode::Create,
        }
    }

    pub fn screen(&self) -> &Screen<Patient> {
        &self.screen
    }

    pub async fn load(&mut self) -> Result<(), Error> {
        let Some(id) = self.id else {
            return Ok(());
        };
        self.screen.begin();
        let result = self.client.get_patient(id).await.map_err(Error::from);
        if let Ok(patient) = &result {
            self.form = PatientForm {
                civilite: Some(patient.civilite),
                first_name: patient.user.first_name.clone(),
                last_name: patient.user.last_name.clone(),
                email: patient.user.email.clone(),
                telephone: patient.telephone.clone(),
                adresse: patient.adresse.clone(),
                date_naissance: Some(patient.date_naissance),
                ..PatientForm::default()
            };
        }
        let settled = self
            .screen
            .settle(result, "Erreur lors du chargement du patient");
        if settled.is_err() {
            self.client.navigator().navigate(Route::PatientsList);
        }
        settled
    }

    pub async fn submit(&mut self) -> Result<Patient, Error> {
        let fallback = match self.mode() {
            FormMode::Create => "Erreur lors de la création du patient",
            FormMode::Edit => "Erreur lors de la modification",
        };
        if let Err(fields) = self.form.validate() {
            self.errors = fields.clone();
            return Err(self.screen.fail(fields.into(), fallback));
        }
        self.errors = FieldErrors::new();

        let result = match self.id {
            Some(id) => self.client.update_patient(id, &self.form).await,
            None => self.client.create_patient(&self.form).await,
        };
        match result {
            Ok(saved) => {
                tracing::info!(patient_id = saved.id, "patient saved");
                self.client.navigator().navigate(Route::PatientsList);
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

// ── Detail ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PatientDetail {
    pub patient: Patient,
    /// Soonest first.
    pub history: Vec<RendezVous>,
    pub counts: StatusCounts,
}

pub struct PatientDetailView {
    client: ApiClient,
    id: Id,
    screen: Screen<PatientDetail>,
}

impl PatientDetailView {
    pub fn new(client: ApiClient, id: Id) -> Self {
        Self {
            client,
            id,
            screen: Screen::default(),
        }
    }

    pub fn screen(&self) -> &Screen<PatientDetail> {
        &self.screen
    }

    pub fn detail(&self) -> Option<&PatientDetail> {
        self.screen.data()
    }

    pub async fn load(&mut self) -> Result<(), Error> {
        self.screen.begin();
        let query = RdvQuery::for_patient(self.id);
        let (patient, rdv) = tokio::join!(
            self.client.get_patient(self.id),
            self.client.list_rendez_vous(&query)
        );
        let id = self.id;
        let result = patient.map_err(Error::from).map(|patient| {
            let mut history: Vec<RendezVous> = match rdv {
                Ok(list) => list.into_iter().filter(|r| r.patient_id() == id).collect(),
                Err(e) => {
                    tracing::warn!(patient_id = id, error = %e, "patient history unavailable");
                    Vec::new()
                }
            };
            sort_by_date(&mut history);
            PatientDetail {
                counts: StatusCounts::of(&history),
                patient,
                history,
            }
        });
        let missing = matches!(result, Err(Error::Api(ApiError::NotFound)));
        let settled = self
            .screen
            .settle(result, "Erreur lors du chargement du patient");
        if missing {
            self.client.navigator().navigate(Route::PatientsList);
        }
        settled
    }
}
