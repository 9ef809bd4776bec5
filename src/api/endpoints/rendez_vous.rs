//! Appointment endpoints.
//!
//! - `GET/POST /rendez-vous/`
//! - `GET/PUT/DELETE /rendez-vous/{id}/`
//! - `POST /rendez-vous/{id}/confirmer/`
//! - `GET /rendez-vous/calendrier/?month=&year=`

use reqwest::Method;
use serde::Deserialize;

use crate::api::client::{ApiClient, AuthMode};
use crate::api::error::ApiError;
use crate::models::{Id, RendezVous, RendezVousPayload, StatutRdv};

/// Server-side filters for the appointment list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RdvQuery {
    pub praticien_id: Option<Id>,
    pub patient_id: Option<Id>,
    pub statut: Option<StatutRdv>,
}

impl RdvQuery {
    pub fn for_praticien(id: Id) -> Self {
        Self {
            praticien_id: Some(id),
            ..Self::default()
        }
    }

    pub fn for_patient(id: Id) -> Self {
        Self {
            patient_id: Some(id),
            ..Self::default()
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(id) = self.praticien_id {
            params.push(("praticien_id", id.to_string()));
        }
        if let Some(id) = self.patient_id {
            params.push(("patient_id", id.to_string()));
        }
        if let Some(statut) = self.statut {
            params.push(("statut", statut.as_str().to_string()));
        }
        params
    }
}

/// Response of `POST /rendez-vous/{id}/confirmer/`. The record is only
/// present when the backend echoes it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub rdv: Option<RendezVous>,
}

impl ApiClient {
    pub async fn list_rendez_vous(&self, query: &RdvQuery) -> Result<Vec<RendezVous>, ApiError> {
        self.get_list("/rendez-vous/", &query.params()).await
    }

    pub async fn get_rendez_vous(&self, id: Id) -> Result<RendezVous, ApiError> {
        self.get(&format!("/rendez-vous/{id}/"), &[]).await
    }

    pub async fn create_rendez_vous(&self, payload: &RendezVousPayload) -> Result<RendezVous, ApiError> {
        self.send_json(Method::POST, "/rendez-vous/", payload, AuthMode::Session)
            .await
    }

    pub async fn update_rendez_vous(
        &self,
        id: Id,
        payload: &RendezVousPayload,
    ) -> Result<RendezVous, ApiError> {
        self.send_json(Method::PUT, &format!("/rendez-vous/{id}/"), payload, AuthMode::Session)
            .await
    }

    pub async fn delete_rendez_vous(&self, id: Id) -> Result<(), ApiError> {
        self.send_unit(Method::DELETE, &format!("/rendez-vous/{id}/")).await
    }

    pub async fn confirmer_rendez_vous(&self, id: Id) -> Result<ConfirmResponse, ApiError> {
        self.post_action(&format!("/rendez-vous/{id}/confirmer/")).await
    }

    /// Appointments of one month (`month` is 1-based).
    pub async fn calendrier(&self, month: u32, year: i32) -> Result<Vec<RendezVous>, ApiError> {
        let query = [("month", month.to_string()), ("year", year.to_string())];
        self.get_list("/rendez-vous/calendrier/", &query).await
    }
}
